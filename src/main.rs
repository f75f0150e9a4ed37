#[macro_use]
extern crate rust_i18n;

use aicommit::*;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches};
use cli::{Cli, Commands};
use tokio::runtime::Runtime;

// Initialize i18n for binary crate
i18n!("locales", fallback = "en");

fn main() -> Result<()> {
    human_panic::setup_panic!();
    // raw 模式下 panic 时先恢复终端，再交给 human-panic 输出报告
    let report_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ui::restore_terminal();
        report_hook(info);
    }));

    // 在解析 CLI 之前初始化语言（支持多语言 help text）
    init_locale_early();

    let cli = parse_cli_localized()?;

    let directive = if cli.verbose {
        "aicommit=debug"
    } else {
        "aicommit=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // reqwest 使用 rustls-no-provider，需要显式安装 crypto provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    // config 命令可以在配置损坏时运行（用于修复）
    let config = match &cli.command {
        Some(Commands::Config(_)) => config::load_config().unwrap_or_default(),
        _ => match config::load_config() {
            Ok(config) => config,
            Err(e) => exit_with_error(&e, true),
        },
    };
    let colored = config.ui.colored;

    let rt = Runtime::new()?;

    let result = rt.block_on(async {
        match &cli.command {
            None => {
                let options = commands::CommitOptions::from_cli(&cli);
                commands::commit::run(&options, &config).await
            }
            Some(Commands::Config(args)) => {
                let update = commands::ConfigUpdate::from_cli(&cli, args);
                commands::config::run(args.action, update, cli.provider, colored).await
            }
            Some(Commands::Report(args)) => {
                let options = commands::ReportOptions::from_cli(&cli, args);
                commands::report::run(&options, &config).await
            }
        }
    });

    match result {
        Ok(()) => Ok(()),
        Err(error::AicommitError::UserCancelled) => {
            // 用户取消不算错误，正常退出
            println!("{}", ui::info(&rust_i18n::t!("common.cancelled"), colored));
            std::process::exit(0);
        }
        Err(e) => exit_with_error(&e, colored),
    }
}

fn exit_with_error(e: &error::AicommitError, colored: bool) -> ! {
    ui::error(&e.localized_message(), colored);
    if let Some(suggestion) = e.localized_suggestion() {
        println!();
        ui::hint(&suggestion, colored);
    }
    std::process::exit(1);
}

/// Parse CLI arguments with localized help text
///
/// Uses clap's derive + runtime override pattern:
/// 1. Get Command from derive macro (type-safe parsing)
/// 2. Override help text at runtime with rust_i18n::t!()
/// 3. Parse and reconstruct the Cli struct
fn parse_cli_localized() -> Result<Cli> {
    let cmd = Cli::command()
        .about(rust_i18n::t!("cli.about").to_string())
        .mut_arg("message", |arg| {
            arg.help(rust_i18n::t!("cli.message").to_string())
        })
        .mut_arg("yes", |arg| arg.help(rust_i18n::t!("cli.yes").to_string()))
        .mut_arg("provider", |arg| {
            arg.help(rust_i18n::t!("cli.provider").to_string())
        })
        .mut_arg("language", |arg| {
            arg.help(rust_i18n::t!("cli.language").to_string())
        })
        .mut_arg("verbose", |arg| {
            arg.help(rust_i18n::t!("cli.verbose").to_string())
        })
        .mut_subcommand("config", |cmd| {
            cmd.about(rust_i18n::t!("cli.config").to_string())
                .mut_arg("api_key", |arg| {
                    arg.help(rust_i18n::t!("cli.config.api_key").to_string())
                })
                .mut_arg("model", |arg| {
                    arg.help(rust_i18n::t!("cli.config.model").to_string())
                })
                .mut_arg("base_url", |arg| {
                    arg.help(rust_i18n::t!("cli.config.base_url").to_string())
                })
                .mut_arg("azure_api_version", |arg| {
                    arg.help(rust_i18n::t!("cli.config.azure_api_version").to_string())
                })
                .mut_subcommand("show", |s| {
                    s.about(rust_i18n::t!("cli.config.show").to_string())
                })
                .mut_subcommand("check", |s| {
                    s.about(rust_i18n::t!("cli.config.check").to_string())
                })
                .mut_subcommand("path", |s| {
                    s.about(rust_i18n::t!("cli.config.path").to_string())
                })
        })
        .mut_subcommand("report", |cmd| {
            cmd.about(rust_i18n::t!("cli.report").to_string())
                .mut_arg("this_week", |arg| {
                    arg.help(rust_i18n::t!("cli.report.this_week").to_string())
                })
                .mut_arg("last_week", |arg| {
                    arg.help(rust_i18n::t!("cli.report.last_week").to_string())
                })
                .mut_arg("since", |arg| {
                    arg.help(rust_i18n::t!("cli.report.since").to_string())
                })
                .mut_arg("until", |arg| {
                    arg.help(rust_i18n::t!("cli.report.until").to_string())
                })
                .mut_arg("author", |arg| {
                    arg.help(rust_i18n::t!("cli.report.author").to_string())
                })
        });

    let matches = cmd.get_matches();
    Cli::from_arg_matches(&matches)
        .map_err(|e| anyhow::anyhow!("Failed to parse CLI arguments: {}", e))
}

/// Initialize locale early in the startup process
///
/// Priority order:
/// 1. Environment variable AICOMMIT_UI_LANGUAGE (highest priority)
/// 2. Configuration file `ui.language`, then `language`
/// 3. System locale detection
/// 4. Fallback to English
fn init_locale_early() {
    let locale = std::env::var("AICOMMIT_UI_LANGUAGE")
        .ok()
        .or_else(|| get_language_from_config().ok())
        .or_else(detect_system_locale)
        .unwrap_or_else(|| "en".to_string());

    rust_i18n::set_locale(normalize_locale(&locale));
}

/// 只有 en 和 zh-CN 两套界面文案
fn normalize_locale(locale: &str) -> &'static str {
    if locale.to_ascii_lowercase().starts_with("zh") {
        "zh-CN"
    } else {
        "en"
    }
}

/// Attempt to read the UI language from the config file
///
/// This is a lightweight read that does not validate the configuration.
fn get_language_from_config() -> Result<String> {
    let config_path = config::config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let content = std::fs::read_to_string(&config_path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    value
        .get("ui")
        .and_then(|ui| ui.get("language"))
        .or_else(|| value.get("language"))
        .and_then(|lang| lang.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("language not found in config"))
}

/// Detect system locale using sys-locale crate
fn detect_system_locale() -> Option<String> {
    sys_locale::get_locale().map(|locale| locale.replace('_', "-"))
}
