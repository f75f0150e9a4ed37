//! Per-provider runtime settings resolved from [`AppConfig`].

use crate::config::{AppConfig, NetworkConfig, ProviderKind};
use crate::error::{AicommitError, Result};

/// Everything a provider needs to send requests.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub azure_api_version: String,
    pub network: NetworkConfig,
}

impl ProviderSettings {
    /// Resolves key, base URL and model for `kind`.
    ///
    /// # Errors
    /// - [`AicommitError::MissingApiKey`] - no key in config or environment
    pub fn resolve(config: &AppConfig, kind: ProviderKind) -> Result<Self> {
        let api_key = config
            .api_key_for(kind)
            .ok_or_else(|| AicommitError::MissingApiKey {
                provider: kind.to_string(),
            })?;

        Ok(Self {
            kind,
            api_key,
            base_url: config.base_url_for(kind),
            model: config.model_for(kind),
            azure_api_version: config.azure_api_version.clone(),
            network: config.network.clone(),
        })
    }

    /// Base URL, required for providers without a default (Azure).
    pub fn require_base_url(&self) -> Result<&str> {
        self.base_url.as_deref().ok_or_else(|| {
            AicommitError::Config(
                rust_i18n::t!("provider.base_url_required", provider = self.kind.as_str())
                    .to_string(),
            )
        })
    }
}

/// Appends `suffix` to `base_url` unless it is already there.
///
/// # Example
/// ```
/// use aicommit::llm::provider::base::complete_endpoint;
///
/// assert_eq!(
///     complete_endpoint("https://api.deepseek.com/", "/v1/chat/completions"),
///     "https://api.deepseek.com/v1/chat/completions"
/// );
/// assert_eq!(
///     complete_endpoint("https://proxy.local/v1/chat/completions", "/v1/chat/completions"),
///     "https://proxy.local/v1/chat/completions"
/// );
/// ```
pub fn complete_endpoint(base_url: &str, suffix: &str) -> String {
    let url = base_url.trim_end_matches('/');
    if url.ends_with(suffix) {
        return url.to_string();
    }
    format!("{}{}", url, suffix)
}
