//! Top-level application configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::commit::DEFAULT_MAX_DIFF_SIZE;
use crate::error::{AicommitError, Result};

use super::network::NetworkConfig;
use super::provider::{Language, ProviderKind};

/// Application configuration.
///
/// Effective configuration is merged from multiple sources (low to high):
/// 1. Rust defaults (`Default` + `serde(default)`)
/// 2. `~/.config/aicommit/config.json` (or the file named by `AICOMMIT_CONFIG`)
/// 3. `AICOMMIT__*` environment variables
///
/// # Example
/// ```json
/// {
///   "provider": "qwen",
///   "api_keys": { "qwen": "sk-...", "openai": "sk-..." },
///   "language": "zh-CN",
///   "model": "qwen-max"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Active provider.
    #[serde(default)]
    pub provider: ProviderKind,

    /// Shared API key, used when no per-provider key is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-provider API keys, keyed by provider name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub api_keys: BTreeMap<String, String>,

    /// Overrides the provider's default base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Overrides the provider's default model (Azure: deployment name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Language of generated messages.
    #[serde(default)]
    pub language: Language,

    /// Azure OpenAI `api-version` query parameter.
    #[serde(default = "default_azure_api_version")]
    pub azure_api_version: String,

    /// Diff budget in bytes before the diff is embedded in a prompt.
    #[serde(default = "default_max_diff_size")]
    pub max_diff_size: usize,

    /// HTTP timeout, proxy and retry settings.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Terminal UI behavior.
    #[serde(default)]
    pub ui: UIConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            api_keys: BTreeMap::new(),
            base_url: None,
            model: None,
            language: Language::default(),
            azure_api_version: default_azure_api_version(),
            max_diff_size: default_max_diff_size(),
            network: NetworkConfig::default(),
            ui: UIConfig::default(),
        }
    }
}

impl AppConfig {
    /// Validates configuration consistency.
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        if self.max_diff_size == 0 {
            return Err(AicommitError::Config("max_diff_size cannot be 0".into()));
        }
        if self.azure_api_version.trim().is_empty() {
            return Err(AicommitError::Config(
                "azure_api_version cannot be empty".into(),
            ));
        }
        Ok(())
    }

    /// API key for `kind`.
    ///
    /// Lookup order: `api_keys[kind]`, `api_key`, then the provider's
    /// conventional environment variable. Empty strings are ignored.
    pub fn api_key_for(&self, kind: ProviderKind) -> Option<String> {
        self.api_keys
            .get(kind.as_str())
            .filter(|k| !k.trim().is_empty())
            .cloned()
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .or_else(|| {
                std::env::var(kind.api_key_env())
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }

    /// Stores a key for `kind` in the per-provider table.
    pub fn set_api_key(&mut self, kind: ProviderKind, key: &str) {
        self.api_keys
            .insert(kind.as_str().to_string(), key.trim().to_string());
    }

    /// Model for `kind`: the configured override or the provider default.
    pub fn model_for(&self, kind: ProviderKind) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| kind.default_model().to_string())
    }

    /// Base URL for `kind`: the configured override or the provider default.
    pub fn base_url_for(&self, kind: ProviderKind) -> Option<String> {
        self.base_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| kind.default_base_url().map(str::to_string))
    }
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UIConfig {
    /// Enables colored output.
    #[serde(default = "default_true")]
    pub colored: bool,

    /// Locale of terminal messages; follows `language` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            colored: true,
            language: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_azure_api_version() -> String {
    "2024-02-15-preview".to_string()
}

fn default_max_diff_size() -> usize {
    DEFAULT_MAX_DIFF_SIZE
}
