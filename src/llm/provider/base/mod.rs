//! Provider 公共抽象和辅助函数
//!
//! 模块结构：
//! - `chat` - OpenAI 风格 chat completion 的请求/响应结构
//! - `config` - 从 AppConfig 解析单个 provider 的运行参数
//! - `response` - 回复文本清理与 commit message 拆分
//! - `retry` - HTTP 请求发送与重试逻辑

pub mod chat;
pub mod config;
pub mod response;
pub mod retry;

pub use chat::{ChatMessage, ChatRequest, ChatResponse};
pub use config::{ProviderSettings, complete_endpoint};
pub use response::*;
pub use retry::{RetryPolicy, send_llm_request};
