//! OpenAI chat completion wire format (shared by OpenAI, Deepseek and Azure).

use serde::{Deserialize, Serialize};

use crate::error::{AicommitError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// `[system?, user]` message list.
pub fn build_messages(system: Option<&str>, user: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(user));
    messages
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Azure 的模型由 deployment 决定，不在 body 中发送
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessageContent,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessageContent {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice.
    pub fn into_text(self, provider_name: &str) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                AicommitError::Llm(
                    rust_i18n::t!("provider.no_choices", provider = provider_name).to_string(),
                )
            })
    }
}
