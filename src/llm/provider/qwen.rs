use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::base::chat::build_messages;
use super::base::{ChatMessage, ProviderSettings, RetryPolicy, complete_endpoint, send_llm_request};
use crate::config::ProviderKind;
use crate::constants::llm::{DEFAULT_TEMPERATURE, QWEN_TOP_K, QWEN_TOP_P};
use crate::error::{AicommitError, Result};
use crate::llm::{LLMProvider, ProgressReporter};

/// DashScope text generation endpoint suffix
pub const QWEN_API_SUFFIX: &str = "/api/v1/services/aigc/text-generation/generation";

/// Tongyi Qwen provider (DashScope native API).
pub struct QwenProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct QwenRequest {
    model: String,
    input: QwenInput,
    parameters: QwenParameters,
}

#[derive(Serialize)]
struct QwenInput {
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct QwenParameters {
    result_format: &'static str,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct QwenResponse {
    output: QwenOutput,
}

/// `result_format = "message"` fills `choices`; `"text"` fills `text`.
#[derive(Deserialize)]
struct QwenOutput {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    choices: Vec<QwenChoice>,
}

#[derive(Deserialize)]
struct QwenChoice {
    message: ChatMessage,
}

impl QwenOutput {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .or(self.text)
    }
}

impl QwenProvider {
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let base = settings
            .base_url
            .clone()
            .or_else(|| settings.kind.default_base_url().map(str::to_string))
            .unwrap_or_default();

        Ok(Self {
            client: super::create_http_client(&settings.network)?,
            api_key: settings.api_key.clone(),
            endpoint: complete_endpoint(&base, QWEN_API_SUFFIX),
            model: settings.model.clone(),
            retry: RetryPolicy::from(&settings.network),
        })
    }
}

#[async_trait]
impl LLMProvider for QwenProvider {
    async fn send_prompt(
        &self,
        system_prompt: Option<&str>,
        user_prompt: &str,
        max_tokens: u32,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<String> {
        let request = QwenRequest {
            model: self.model.clone(),
            input: QwenInput {
                messages: build_messages(system_prompt, user_prompt),
            },
            parameters: QwenParameters {
                result_format: "message",
                temperature: DEFAULT_TEMPERATURE,
                top_p: QWEN_TOP_P,
                top_k: QWEN_TOP_K,
                max_tokens,
            },
        };

        tracing::debug!(
            "Qwen API request: model={}, max_tokens={}",
            self.model,
            max_tokens
        );

        let auth_header = format!("Bearer {}", self.api_key);
        let response: QwenResponse = send_llm_request(
            &self.client,
            &self.endpoint,
            &[("Authorization", auth_header.as_str())],
            &request,
            "qwen",
            progress,
            self.retry,
        )
        .await?;

        response.output.into_text().ok_or_else(|| {
            AicommitError::Llm(rust_i18n::t!("provider.no_choices", provider = "qwen").to_string())
        })
    }

    fn name(&self) -> &str {
        "qwen"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
