pub mod azure;
pub mod base;
pub mod openai;
pub mod qwen;

#[cfg(test)]
pub mod test_utils;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use reqwest::{Client, Proxy};

use crate::config::{AppConfig, NetworkConfig, ProviderKind};
use crate::error::{AicommitError, Result};
use crate::llm::LLMProvider;

use base::ProviderSettings;

/// 全局 HTTP 客户端（共享连接池）
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// 全局 HTTP 客户端初始化错误信息
///
/// 第一次创建失败时保存错误字符串，后续调用直接返回同样的错误。
static HTTP_CLIENT_ERROR: OnceLock<String> = OnceLock::new();

fn build_http_client(network_config: &NetworkConfig) -> reqwest::Result<Client> {
    let user_agent = format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    let mut builder = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(network_config.request_timeout))
        .connect_timeout(Duration::from_secs(network_config.connect_timeout));

    if let Some(proxy) = network_config.proxy.as_deref() {
        tracing::debug!("Using proxy: {}", proxy);
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    builder.build()
}

/// 获取或创建全局 HTTP 客户端
///
/// 所有 provider 共享同一个连接池，第一次调用时的 NetworkConfig 决定 timeout 与代理配置。
pub(crate) fn create_http_client(network_config: &NetworkConfig) -> Result<Client> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client.clone());
    }

    if let Some(err_msg) = HTTP_CLIENT_ERROR.get() {
        return Err(AicommitError::Llm(
            rust_i18n::t!("provider.http_client_init_failed", error = err_msg.as_str()).to_string(),
        ));
    }

    match build_http_client(network_config) {
        Ok(client) => {
            let _ = HTTP_CLIENT.set(client.clone());
            Ok(client)
        }
        Err(e) => {
            let err_msg = e.to_string();
            let _ = HTTP_CLIENT_ERROR.set(err_msg.clone());
            Err(AicommitError::Llm(
                rust_i18n::t!("provider.http_client_init_failed", error = err_msg.as_str())
                    .to_string(),
            ))
        }
    }
}

/// 根据配置创建 LLM Provider
///
/// `provider_override`（命令行 `-p`）优先于配置文件中的 `provider`。
///
/// # Errors
/// - [`AicommitError::MissingApiKey`] - 未找到该 provider 的 API key
/// - [`AicommitError::Config`] - Azure 未配置 `base_url`
pub fn create_provider(
    config: &AppConfig,
    provider_override: Option<ProviderKind>,
) -> Result<Arc<dyn LLMProvider>> {
    let kind = provider_override.unwrap_or(config.provider);
    let settings = ProviderSettings::resolve(config, kind)?;
    tracing::debug!(
        "Creating provider {} (model: {}, base_url: {:?})",
        kind,
        settings.model,
        settings.base_url
    );

    match kind {
        ProviderKind::OpenAi | ProviderKind::Deepseek => {
            Ok(Arc::new(openai::OpenAIProvider::new(&settings)?))
        }
        ProviderKind::Azure => Ok(Arc::new(azure::AzureProvider::new(&settings)?)),
        ProviderKind::Qwen => Ok(Arc::new(qwen::QwenProvider::new(&settings)?)),
    }
}
