use async_trait::async_trait;
use reqwest::Client;

use super::base::chat::build_messages;
use super::base::{ChatRequest, ChatResponse, ProviderSettings, RetryPolicy, send_llm_request};
use crate::constants::llm::DEFAULT_TEMPERATURE;
use crate::error::Result;
use crate::llm::{LLMProvider, ProgressReporter};

/// Azure OpenAI provider.
///
/// Requests go to
/// `{base_url}/openai/deployments/{model}/chat/completions?api-version={version}`
/// with the key in the `api-key` header; `model` is the deployment name.
pub struct AzureProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    deployment: String,
    retry: RetryPolicy,
}

/// Full chat completion URL for a deployment.
pub fn azure_endpoint(base_url: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        base_url.trim_end_matches('/'),
        deployment,
        api_version
    )
}

impl AzureProvider {
    /// # Errors
    /// [`AicommitError::Config`](crate::error::AicommitError::Config) when no
    /// `base_url` is configured.
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let base_url = settings.require_base_url()?;
        Ok(Self {
            client: super::create_http_client(&settings.network)?,
            api_key: settings.api_key.clone(),
            endpoint: azure_endpoint(base_url, &settings.model, &settings.azure_api_version),
            deployment: settings.model.clone(),
            retry: RetryPolicy::from(&settings.network),
        })
    }
}

#[async_trait]
impl LLMProvider for AzureProvider {
    async fn send_prompt(
        &self,
        system_prompt: Option<&str>,
        user_prompt: &str,
        max_tokens: u32,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<String> {
        let request = ChatRequest {
            model: None,
            messages: build_messages(system_prompt, user_prompt),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens,
        };

        tracing::debug!(
            "Azure API request: deployment={}, max_tokens={}",
            self.deployment,
            max_tokens
        );

        let response: ChatResponse = send_llm_request(
            &self.client,
            &self.endpoint,
            &[("api-key", self.api_key.as_str())],
            &request,
            "azure",
            progress,
            self.retry,
        )
        .await?;

        response.into_text("azure")
    }

    fn name(&self) -> &str {
        "azure"
    }

    fn model(&self) -> &str {
        &self.deployment
    }
}
