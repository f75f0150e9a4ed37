use async_trait::async_trait;
use reqwest::Client;

use super::base::chat::build_messages;
use super::base::{ChatRequest, ChatResponse, ProviderSettings, RetryPolicy, complete_endpoint, send_llm_request};
use crate::config::ProviderKind;
use crate::constants::llm::DEFAULT_TEMPERATURE;
use crate::error::Result;
use crate::llm::{LLMProvider, ProgressReporter};

/// OpenAI chat completion endpoint suffix
pub const OPENAI_API_SUFFIX: &str = "/v1/chat/completions";

/// OpenAI-compatible chat completion provider.
///
/// Serves both `openai` (default base `https://api.openai.com`, model
/// `gpt-4o`) and `deepseek` (base `https://api.deepseek.com`, model
/// `deepseek-chat`); the wire format is identical.
///
/// # Configuration example
/// ```json
/// {
///   "provider": "deepseek",
///   "api_keys": { "deepseek": "sk-..." },
///   "model": "deepseek-chat"
/// }
/// ```
pub struct OpenAIProvider {
    name: &'static str,
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    retry: RetryPolicy,
}

impl OpenAIProvider {
    /// Builds an OpenAI-compatible provider from resolved settings.
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let base = settings
            .base_url
            .clone()
            .or_else(|| settings.kind.default_base_url().map(str::to_string))
            .unwrap_or_default();

        Ok(Self {
            name: settings.kind.as_str(),
            client: super::create_http_client(&settings.network)?,
            api_key: settings.api_key.clone(),
            endpoint: complete_endpoint(&base, OPENAI_API_SUFFIX),
            model: settings.model.clone(),
            retry: RetryPolicy::from(&settings.network),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn send_prompt(
        &self,
        system_prompt: Option<&str>,
        user_prompt: &str,
        max_tokens: u32,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<String> {
        let request = ChatRequest {
            model: Some(self.model.clone()),
            messages: build_messages(system_prompt, user_prompt),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens,
        };

        tracing::debug!(
            "{} API request: model={}, max_tokens={}, user_len={}",
            self.name,
            self.model,
            max_tokens,
            user_prompt.len()
        );

        let auth_header = format!("Bearer {}", self.api_key);
        let response: ChatResponse = send_llm_request(
            &self.client,
            &self.endpoint,
            &[("Authorization", auth_header.as_str())],
            &request,
            self.name,
            progress,
            self.retry,
        )
        .await?;

        response.into_text(self.name)
    }

    fn name(&self) -> &str {
        self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}
