//! Command option structs.
//!
//! Built from parsed CLI arguments and passed to the command entry points,
//! so the commands themselves never depend on clap types.

use crate::cli::{Cli, ConfigArgs, ReportArgs};
use crate::config::{AppConfig, Language, ProviderKind};

/// Commit flow options.
///
/// # Example
/// ```
/// use aicommit::commands::options::CommitOptions;
///
/// let options = CommitOptions {
///     yes: true,
///     ..Default::default()
/// };
/// assert!(options.message.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// `-m`: commit this message directly
    pub message: Option<String>,
    /// `-y`: use staged changes and accept the first message
    pub yes: bool,
    pub verbose: bool,
    pub provider: Option<ProviderKind>,
    pub language: Option<Language>,
}

impl CommitOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            message: cli.message.clone(),
            yes: cli.yes,
            verbose: cli.verbose,
            provider: cli.provider,
            language: cli.language,
        }
    }

    /// Output language: the CLI override or the configured one.
    pub fn effective_language(&self, config: &AppConfig) -> Language {
        self.language.unwrap_or(config.language)
    }
}

/// Values `aicommit config` persists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub provider: Option<ProviderKind>,
    pub language: Option<Language>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub azure_api_version: Option<String>,
}

impl ConfigUpdate {
    pub fn from_cli(cli: &Cli, args: &ConfigArgs) -> Self {
        Self {
            provider: cli.provider,
            language: cli.language,
            api_key: args.api_key.clone(),
            model: args.model.clone(),
            base_url: args.base_url.clone(),
            azure_api_version: args.azure_api_version.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Report command options.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub this_week: bool,
    pub last_week: bool,
    pub since: Option<String>,
    pub until: Option<String>,
    pub author: Option<String>,
    pub provider: Option<ProviderKind>,
    pub language: Option<Language>,
}

impl ReportOptions {
    pub fn from_cli(cli: &Cli, args: &ReportArgs) -> Self {
        Self {
            this_week: args.this_week,
            last_week: args.last_week,
            since: args.since.clone(),
            until: args.until.clone(),
            author: args.author.clone(),
            provider: cli.provider,
            language: cli.language,
        }
    }
}
