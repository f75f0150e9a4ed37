//! Provider kinds and output languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AicommitError;

/// Supported LLM backends.
///
/// Each kind knows its default endpoint, default model and the
/// conventional environment variable that may hold its API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions API.
    #[default]
    OpenAi,
    /// Azure OpenAI deployment.
    Azure,
    /// Alibaba DashScope (Qwen) native API.
    Qwen,
    /// Deepseek chat completions API.
    Deepseek,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Azure,
        ProviderKind::Qwen,
        ProviderKind::Deepseek,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Azure => "azure",
            ProviderKind::Qwen => "qwen",
            ProviderKind::Deepseek => "deepseek",
        }
    }

    /// Base URL used when `base_url` is not configured.
    ///
    /// Azure has no public default; the resource URL must be configured.
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("https://api.openai.com"),
            ProviderKind::Azure => None,
            ProviderKind::Qwen => Some("https://dashscope.aliyuncs.com"),
            ProviderKind::Deepseek => Some("https://api.deepseek.com"),
        }
    }

    /// Model used when `model` is not configured.
    ///
    /// For Azure this is the deployment name.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi | ProviderKind::Azure => "gpt-4o",
            ProviderKind::Qwen => "qwen-max",
            ProviderKind::Deepseek => "deepseek-chat",
        }
    }

    /// Environment variable consulted when no key is configured.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Azure => "AZURE_OPENAI_API_KEY",
            ProviderKind::Qwen => "DASHSCOPE_API_KEY",
            ProviderKind::Deepseek => "DEEPSEEK_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AicommitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "azure" => Ok(ProviderKind::Azure),
            "qwen" | "dashscope" => Ok(ProviderKind::Qwen),
            "deepseek" => Ok(ProviderKind::Deepseek),
            other => Err(AicommitError::InvalidInput(
                rust_i18n::t!("config.invalid_provider", value = other).to_string(),
            )),
        }
    }
}

/// Language of generated commit messages and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-CN", alias = "zh", alias = "zh-cn")]
    ZhCn,
    #[serde(rename = "zh-TW", alias = "zh-tw")]
    ZhTw,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::ZhCn => "zh-CN",
            Language::ZhTw => "zh-TW",
        }
    }

    /// UI locale used by the localized terminal messages.
    pub fn ui_locale(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::ZhCn | Language::ZhTw => "zh-CN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = AicommitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "en-gb" | "english" => Ok(Language::En),
            "zh" | "zh-cn" | "zh-hans" => Ok(Language::ZhCn),
            "zh-tw" | "zh-hk" | "zh-hant" => Ok(Language::ZhTw),
            _ => Err(AicommitError::InvalidInput(
                rust_i18n::t!("config.invalid_language", value = s).to_string(),
            )),
        }
    }
}
