use thiserror::Error;

pub type Result<T> = std::result::Result<T, AicommitError>;

#[derive(Error, Debug)]
pub enum AicommitError {
    #[error("git executable not found in PATH")]
    GitNotFound,

    #[error("Not a git repository")]
    NotARepository,

    #[error("Git command failed: {0}")]
    GitCommand(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key not configured for provider '{provider}'")]
    MissingApiKey { provider: String },

    #[error("LLM provider error: {0}")]
    Llm(String),

    #[error("LLM API error ({status}): {message}")]
    LlmApi { status: u16, message: String },

    #[error("{provider} API request timed out: {detail}")]
    LlmTimeout { provider: String, detail: String },

    /// 连接失败（可重试）
    #[error("{provider} API connection failed: {detail}")]
    LlmConnection { provider: String, detail: String },

    #[error("Failed to parse {provider} response: {detail}")]
    LlmResponse { provider: String, detail: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration parsing error: {0}")]
    ConfigParse(#[from] config::ConfigError),

    #[error("UI error: {0}")]
    Prompt(inquire::InquireError),

    /// 无法进入 raw 模式（stdin 不是终端）
    #[error("Interactive terminal required (stdin is not a TTY)")]
    NoTty,

    #[error("No changes found in working tree")]
    NoChanges,

    #[error("No staged changes found")]
    NoStagedChanges,

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Maximum regenerations reached ({0})")]
    MaxRegenerations(usize),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 通用错误类型，用于不适合其他分类的错误
    #[error("{0}")]
    Other(String),
}

impl From<inquire::InquireError> for AicommitError {
    fn from(e: inquire::InquireError) -> Self {
        match e {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => AicommitError::UserCancelled,
            inquire::InquireError::NotTTY => AicommitError::NoTty,
            other => AicommitError::Prompt(other),
        }
    }
}

impl AicommitError {
    /// 本地化的错误消息（用于终端输出）
    pub fn localized_message(&self) -> String {
        match self {
            AicommitError::GitNotFound => rust_i18n::t!("error.git_not_found").to_string(),
            AicommitError::NotARepository => rust_i18n::t!("error.not_a_repository").to_string(),
            AicommitError::GitCommand(msg) => {
                rust_i18n::t!("error.git_command", detail = msg.as_str()).to_string()
            }
            AicommitError::Config(msg) => {
                rust_i18n::t!("error.config", detail = msg.as_str()).to_string()
            }
            AicommitError::MissingApiKey { provider } => {
                rust_i18n::t!("error.missing_api_key", provider = provider.as_str()).to_string()
            }
            AicommitError::LlmApi { status, message } => rust_i18n::t!(
                "error.llm_api",
                status = status,
                detail = message.as_str()
            )
            .to_string(),
            AicommitError::LlmTimeout { provider, detail } => rust_i18n::t!(
                "error.llm_timeout",
                provider = provider.as_str(),
                detail = detail.as_str()
            )
            .to_string(),
            AicommitError::LlmConnection { provider, detail } => rust_i18n::t!(
                "error.llm_connection",
                provider = provider.as_str(),
                detail = detail.as_str()
            )
            .to_string(),
            AicommitError::LlmResponse { provider, detail } => rust_i18n::t!(
                "error.llm_response",
                provider = provider.as_str(),
                detail = detail.as_str()
            )
            .to_string(),
            AicommitError::NoTty => rust_i18n::t!("error.no_tty").to_string(),
            AicommitError::NoChanges => rust_i18n::t!("error.no_changes").to_string(),
            AicommitError::NoStagedChanges => rust_i18n::t!("error.no_staged_changes").to_string(),
            AicommitError::UserCancelled => rust_i18n::t!("error.user_cancelled").to_string(),
            AicommitError::MaxRegenerations(limit) => {
                rust_i18n::t!("error.max_regenerations", limit = limit).to_string()
            }
            AicommitError::InvalidInput(msg) => {
                rust_i18n::t!("error.invalid_input", detail = msg.as_str()).to_string()
            }
            other => other.to_string(),
        }
    }

    /// 获取错误的解决建议
    pub fn localized_suggestion(&self) -> Option<String> {
        let suggestion = match self {
            AicommitError::GitNotFound => rust_i18n::t!("suggestion.install_git"),
            AicommitError::NotARepository => rust_i18n::t!("suggestion.not_a_repository"),
            AicommitError::NoStagedChanges => rust_i18n::t!("suggestion.no_staged_changes"),
            AicommitError::NoTty => rust_i18n::t!("suggestion.no_tty"),
            AicommitError::MissingApiKey { provider } => {
                rust_i18n::t!("suggestion.missing_api_key", provider = provider.as_str())
            }
            AicommitError::Network(_) => rust_i18n::t!("suggestion.network"),
            AicommitError::LlmTimeout { .. } => rust_i18n::t!("suggestion.timeout"),
            AicommitError::LlmConnection { .. } => rust_i18n::t!("suggestion.connection_failed"),
            AicommitError::LlmResponse { .. } => rust_i18n::t!("suggestion.parse_failed"),
            AicommitError::LlmApi {
                status: 401 | 403, ..
            } => rust_i18n::t!("suggestion.unauthorized"),
            AicommitError::LlmApi { status: 429, .. } => rust_i18n::t!("suggestion.rate_limited"),
            AicommitError::LlmApi { status, .. } if *status >= 500 => {
                rust_i18n::t!("suggestion.server_error")
            }
            AicommitError::ConfigParse(_) => rust_i18n::t!("suggestion.config_parse"),
            _ => return None,
        };
        Some(suggestion.to_string())
    }
}
