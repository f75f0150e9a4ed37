//! Test utilities for provider tests

use crate::config::{NetworkConfig, ProviderKind};

use super::base::ProviderSettings;

/// 在测试中安装 rustls crypto provider
///
/// reqwest 0.13 + rustls-no-provider 需要手动安装 crypto provider，
/// 生产代码在 main.rs 中完成，测试需要单独调用。多次调用是安全的。
pub fn ensure_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// `NetworkConfig` with retries disabled.
pub fn test_network_config_no_retry() -> NetworkConfig {
    NetworkConfig {
        max_retries: 0,
        ..Default::default()
    }
}

/// Provider settings pointing at a mock server.
pub fn test_settings(kind: ProviderKind, base_url: String, model: &str) -> ProviderSettings {
    ProviderSettings {
        kind,
        api_key: "sk-test".to_string(),
        base_url: Some(base_url),
        model: model.to_string(),
        azure_api_version: "2024-02-15-preview".to_string(),
        network: test_network_config_no_retry(),
    }
}
