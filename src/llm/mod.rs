//! LLM abstractions, shared types, and provider traits.
//!
//! This module defines the provider interface used by the commit and
//! report flows.

/// Prompt templates for commit and report generation.
pub mod prompt;
/// Built-in provider implementations and factory helpers.
pub mod provider;

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::Language;
use crate::constants::llm::{CHECK_MAX_TOKENS, CHECK_PROMPT, COMMIT_MAX_TOKENS, REPORT_MAX_TOKENS};
use crate::error::{AicommitError, Result};
use crate::git::CommitRecord;

/// Progress reporting interface for LLM operations.
///
/// The LLM layer reports retries through this trait instead of depending
/// on a concrete UI implementation.
pub trait ProgressReporter: Send + Sync {
    /// Appends an informative suffix to a progress message.
    fn append_suffix(&self, suffix: &str);
}

/// Input for commit message generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitInfo {
    /// Paths included in the commit, in git order.
    pub files_changed: Vec<String>,
    /// Staged diff, already truncated to the configured budget.
    pub diff: String,
    /// Current branch name.
    pub branch: String,
}

/// A generated commit message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    pub title: String,
    pub body: String,
}

impl CommitMessage {
    /// Splits `text` at the first blank line into title and body.
    pub fn from_text(text: &str) -> Self {
        match text.split_once("\n\n") {
            Some((title, body)) => Self {
                title: title.trim().to_string(),
                body: body.trim().to_string(),
            },
            None => Self {
                title: text.trim().to_string(),
                body: String::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body.is_empty()
    }
}

/// Full message as passed to `git commit -m`.
impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}\n\n{}", self.title, self.body)
        }
    }
}

/// Input for work report generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportInfo {
    pub author: String,
    /// `None` 表示从仓库最早的提交开始
    pub since: Option<NaiveDate>,
    pub until: NaiveDate,
    pub commits: Vec<CommitRecord>,
}

/// Unified interface implemented by all LLM providers.
///
/// The only **required** request method is [`send_prompt`](Self::send_prompt);
/// commit and report generation build their prompts through
/// [`llm::prompt`](crate::llm::prompt) and delegate to it.
///
/// # Built-In Implementations
/// - [`OpenAIProvider`](provider::openai::OpenAIProvider) - OpenAI and Deepseek
/// - [`AzureProvider`](provider::azure::AzureProvider) - Azure OpenAI deployments
/// - [`QwenProvider`](provider::qwen::QwenProvider) - DashScope native API
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Sends one prompt and returns the raw reply text.
    ///
    /// # Parameters
    /// - `system_prompt`: optional system message
    /// - `user_prompt`: user message
    /// - `max_tokens`: completion limit
    /// - `progress`: optional progress reporter for retry feedback
    async fn send_prompt(
        &self,
        system_prompt: Option<&str>,
        user_prompt: &str,
        max_tokens: u32,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<String>;

    /// Generates a commit message for the staged changes in `info`.
    async fn generate_commit_message(
        &self,
        info: &CommitInfo,
        language: Language,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<CommitMessage> {
        let system = prompt::build_commit_system_prompt(language);
        let user = prompt::build_commit_user_prompt(info, language);
        tracing::debug!(
            "Commit prompt - system ({} chars), user ({} chars)",
            system.len(),
            user.len()
        );

        let response = self
            .send_prompt(Some(&system), &user, COMMIT_MAX_TOKENS, progress)
            .await?;
        let message = provider::base::process_commit_response(&response);
        if message.title.is_empty() {
            return Err(AicommitError::Llm(
                rust_i18n::t!("provider.empty_commit_message", provider = self.name()).to_string(),
            ));
        }
        Ok(message)
    }

    /// Generates a Markdown work report from the commits in `info`.
    async fn generate_report(
        &self,
        info: &ReportInfo,
        language: Language,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<String> {
        let user = prompt::build_report_prompt(info, language);
        tracing::debug!("Report prompt ({} chars)", user.len());

        let response = self
            .send_prompt(None, &user, REPORT_MAX_TOKENS, progress)
            .await?;
        let report = provider::base::clean_commit_response(&response);
        if report.trim().is_empty() {
            return Err(AicommitError::Llm(
                rust_i18n::t!("provider.empty_report", provider = self.name()).to_string(),
            ));
        }
        Ok(report)
    }

    /// Sends a minimal prompt to verify key, endpoint and model.
    async fn validate(&self) -> Result<()> {
        self.send_prompt(None, CHECK_PROMPT, CHECK_MAX_TOKENS, None)
            .await
            .map(|_| ())
    }

    /// Provider name (used for logs and error messages).
    fn name(&self) -> &str;

    /// Model (or Azure deployment) requests are sent to.
    fn model(&self) -> &str;
}
