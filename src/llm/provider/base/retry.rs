//! HTTP 请求发送与重试逻辑
//!
//! 提供通用的 LLM API 请求发送函数，包含重试、429 限流处理和指数退避

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, SystemTime};

use crate::config::NetworkConfig;
use crate::error::{AicommitError, Result};
use crate::llm::ProgressReporter;

/// 重试参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
}

impl From<&NetworkConfig> for RetryPolicy {
    fn from(network: &NetworkConfig) -> Self {
        Self {
            max_retries: network.max_retries,
            retry_delay_ms: network.retry_delay_ms,
            max_retry_delay_ms: network.max_retry_delay_ms,
        }
    }
}

impl RetryPolicy {
    /// 计算指数退避延迟（attempt 从 1 开始）
    fn backoff(&self, attempt: usize) -> Duration {
        const MIN_RETRY_DELAY_MS: u64 = 100;
        let shift = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        let multiplier = 1u64.checked_shl(shift).unwrap_or(u64::MAX);
        let delay_ms = self
            .retry_delay_ms
            .saturating_mul(multiplier)
            .min(self.max_retry_delay_ms)
            .max(MIN_RETRY_DELAY_MS);
        Duration::from_millis(delay_ms)
    }
}

/// 判断错误是否应该重试（当前仅对连接失败重试）
fn is_retryable_error(error: &AicommitError) -> bool {
    matches!(error, AicommitError::LlmConnection { .. })
}

/// 解析 Retry-After header 值
///
/// 支持两种格式：
/// - 秒数：`120`
/// - HTTP 日期：`Wed, 21 Oct 2015 07:28:00 GMT`
///
/// 日期早于当前时间时返回 `Some(0)`，格式无效时返回 `None`。
fn parse_retry_after(value: &str) -> Option<u64> {
    if let Ok(secs) = value.trim().parse::<u64>() {
        return Some(secs);
    }

    if let Ok(date) = httpdate::parse_http_date(value) {
        let now = SystemTime::now();
        return Some(date.duration_since(now).map(|d| d.as_secs()).unwrap_or(0));
    }

    None
}

/// 尝试发送一次 HTTP 请求（只处理网络层错误）
async fn try_send_request<Req: Serialize>(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    request_body: &Req,
    provider_name: &str,
) -> Result<reqwest::Response> {
    let mut req = client
        .post(endpoint)
        .header("Content-Type", "application/json");

    for (key, value) in headers {
        req = req.header(*key, *value);
    }

    tracing::debug!("Sending request to: {}", endpoint);

    req.json(request_body).send().await.map_err(|e| {
        tracing::debug!("{} API request failed: {}", provider_name, e);

        if e.is_timeout() {
            AicommitError::LlmTimeout {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        } else if e.is_connect() {
            AicommitError::LlmConnection {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        } else {
            AicommitError::Network(e)
        }
    })
}

fn report_retry(progress: Option<&dyn ProgressReporter>, attempt: usize, max: usize) {
    if let Some(p) = progress {
        p.append_suffix(&rust_i18n::t!(
            "provider.retrying_suffix",
            attempt = attempt,
            max = max
        ));
    }
}

/// 发送 LLM API 请求的通用函数（带重试机制）
///
/// - 连接失败：指数退避后重试
/// - 429：优先按 `Retry-After` 等待，超过 `max_retry_delay_ms` 时直接失败
/// - 其他非 2xx：返回 [`AicommitError::LlmApi`]
///
/// # Arguments
/// * `client` - HTTP 客户端
/// * `endpoint` - API 端点（可包含 query）
/// * `headers` - 额外的请求头
/// * `request_body` - 请求体
/// * `provider_name` - Provider 名称（用于日志和错误信息）
/// * `progress` - 可选的进度回调（用于显示重试进度）
/// * `policy` - 重试参数
pub async fn send_llm_request<Req, Resp>(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    request_body: &Req,
    provider_name: &str,
    progress: Option<&dyn ProgressReporter>,
    policy: RetryPolicy,
) -> Result<Resp>
where
    Req: Serialize + Sync,
    Resp: DeserializeOwned,
{
    let max_retries = policy.max_retries;
    let mut attempt = 0;

    loop {
        attempt += 1;

        let response =
            match try_send_request(client, endpoint, headers, request_body, provider_name).await {
                Ok(resp) => resp,
                Err(e) => {
                    if !is_retryable_error(&e) || attempt > max_retries {
                        return Err(e);
                    }

                    report_retry(progress, attempt, max_retries);

                    let delay = policy.backoff(attempt);
                    tracing::debug!(
                        "{} API network error (attempt {}/{}): {}. Retrying in {:.1}s...",
                        provider_name,
                        attempt,
                        max_retries + 1,
                        e,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };

        let status = response.status();

        // 429 限流：解析 Retry-After 并重试
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| {
                    let result = parse_retry_after(v);
                    if result.is_none() {
                        tracing::warn!("Ignoring invalid Retry-After header: {}", v);
                    }
                    result
                });

            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<body read error: {}>", e));

            tracing::debug!(
                "{} API rate limited (429), Retry-After: {:?}",
                provider_name,
                retry_after
            );

            if attempt > max_retries {
                return Err(AicommitError::LlmApi {
                    status: 429,
                    message: format!("{}: {}", provider_name, body),
                });
            }

            let delay = match retry_after {
                Some(secs) => {
                    let retry_after_ms = secs.saturating_mul(1000);
                    if retry_after_ms > policy.max_retry_delay_ms {
                        return Err(AicommitError::LlmApi {
                            status: 429,
                            message: rust_i18n::t!(
                                "provider.rate_limited_exceeds_limit",
                                provider = provider_name,
                                seconds = secs
                            )
                            .to_string(),
                        });
                    }
                    Duration::from_secs(secs)
                }
                None => policy.backoff(attempt),
            };

            report_retry(progress, attempt, max_retries);

            tracing::debug!(
                "{} API rate limited (attempt {}/{}). Retrying in {:.1}s...",
                provider_name,
                attempt,
                max_retries + 1,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
            continue;
        }

        let response_text = response.text().await?;

        tracing::debug!("{} API response status: {}", provider_name, status);
        tracing::debug!("{} API response body: {}", provider_name, response_text);

        if !status.is_success() {
            return Err(AicommitError::LlmApi {
                status: status.as_u16(),
                message: format!("{}: {}", provider_name, response_text),
            });
        }

        if attempt > 1 {
            tracing::debug!(
                "{} API request succeeded after {} attempts",
                provider_name,
                attempt
            );
        }

        return serde_json::from_str(&response_text).map_err(|e| AicommitError::LlmResponse {
            provider: provider_name.to_string(),
            detail: format!("{} (body: {})", e, response_text),
        });
    }
}
