use clap::{Args, Parser, Subcommand, builder::styling};

use crate::config::{Language, ProviderKind};

const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::Green.on_default().bold())
    .usage(styling::AnsiColor::Green.on_default().bold())
    .literal(styling::AnsiColor::Cyan.on_default().bold())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// 不带子命令时执行 commit 流程
#[derive(Parser, Debug)]
#[command(name = "aicommit")]
#[command(author, version, long_about = None)]
#[command(styles = STYLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Commit with this message directly (no model call)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Use staged changes and accept the first generated message
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Override the configured provider (openai, azure, qwen, deepseek)
    #[arg(short, long, global = true, value_parser = parse_provider)]
    pub provider: Option<ProviderKind>,

    /// Override the output language (en, zh-CN, zh-TW)
    #[arg(short, long, global = true, value_parser = parse_language)]
    pub language: Option<Language>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show or change configuration
    Config(ConfigArgs),

    /// Generate a work report from your commits
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,

    /// API key for the selected provider
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Model (Azure: deployment name)
    #[arg(long)]
    pub model: Option<String>,

    /// API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Azure OpenAI API version
    #[arg(long)]
    pub azure_api_version: Option<String>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the current configuration (keys masked)
    Show,

    /// Check the configuration and test the API connection
    Check,

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Report on the current week (Monday to Sunday)
    #[arg(long, conflicts_with_all = ["last_week", "since", "until"])]
    pub this_week: bool,

    /// Report on the previous week
    #[arg(long, conflicts_with_all = ["since", "until"])]
    pub last_week: bool,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// End date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub until: Option<String>,

    /// Author filter (defaults to git config user.email)
    #[arg(long)]
    pub author: Option<String>,
}

fn parse_provider(value: &str) -> Result<ProviderKind, String> {
    value.parse().map_err(|e: crate::error::AicommitError| e.localized_message())
}

fn parse_language(value: &str) -> Result<Language, String> {
    value.parse().map_err(|e: crate::error::AicommitError| e.localized_message())
}
