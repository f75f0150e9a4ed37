use std::path::{Path, PathBuf};
use std::time::Instant;

use colored::Colorize;

use crate::cli::ConfigAction;
use crate::commands::options::ConfigUpdate;
use crate::config::{
    self, AppConfig, ProviderKind, load_config, load_file_config, mask_api_key, save_config,
};
use crate::error::{AicommitError, Result};
use crate::llm::provider::create_provider;
use crate::ui;

/// `aicommit config` 入口
///
/// 有子命令时执行子命令；否则保存传入的设置，没有任何设置时显示当前配置。
pub async fn run(
    action: Option<ConfigAction>,
    update: ConfigUpdate,
    provider_override: Option<ProviderKind>,
    colored: bool,
) -> Result<()> {
    match action {
        Some(ConfigAction::Show) => show(colored),
        Some(ConfigAction::Check) => check(provider_override, colored).await,
        Some(ConfigAction::Path) => {
            println!("{}", require_config_path()?.display());
            Ok(())
        }
        None if update.is_empty() => show(colored),
        None => set(update, colored),
    }
}

fn require_config_path() -> Result<PathBuf> {
    config::config_path()
        .ok_or_else(|| AicommitError::Config(rust_i18n::t!("config.no_home").to_string()))
}

/// One persisted change, for the confirmation output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    pub field: &'static str,
    pub value: String,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Applies `update` to `config`.
///
/// The API key is stored for the provider named in the same invocation,
/// or the configured one. Empty `model` / `base_url` values clear the
/// override.
pub fn apply_update(config: &mut AppConfig, update: &ConfigUpdate) -> Result<Vec<AppliedChange>> {
    let mut changes = Vec::new();

    if let Some(provider) = update.provider {
        config.provider = provider;
        changes.push(AppliedChange {
            field: "provider",
            value: provider.to_string(),
        });
    }

    if let Some(key) = &update.api_key {
        if key.trim().is_empty() {
            return Err(AicommitError::InvalidInput(
                rust_i18n::t!("config.empty_api_key").to_string(),
            ));
        }
        let kind = update.provider.unwrap_or(config.provider);
        config.set_api_key(kind, key);
        changes.push(AppliedChange {
            field: "api_key",
            value: format!("{} ({})", mask_api_key(key.trim()), kind),
        });
    }

    if let Some(model) = &update.model {
        config.model = non_empty(model);
        changes.push(AppliedChange {
            field: "model",
            value: config.model_for(config.provider),
        });
    }

    if let Some(base_url) = &update.base_url {
        config.base_url = non_empty(base_url);
        changes.push(AppliedChange {
            field: "base_url",
            value: config.base_url.clone().unwrap_or_else(|| "-".to_string()),
        });
    }

    if let Some(language) = update.language {
        config.language = language;
        changes.push(AppliedChange {
            field: "language",
            value: language.to_string(),
        });
    }

    if let Some(version) = &update.azure_api_version {
        config.azure_api_version = version.trim().to_string();
        changes.push(AppliedChange {
            field: "azure_api_version",
            value: config.azure_api_version.clone(),
        });
    }

    config.validate()?;
    Ok(changes)
}

/// 写入配置文件（只读写文件本身，不混入环境变量）
fn set(update: ConfigUpdate, colored: bool) -> Result<()> {
    let path = require_config_path()?;
    let mut file_config = load_file_config(&path)?;
    let changes = apply_update(&mut file_config, &update)?;
    save_config(&file_config, &path)?;

    for change in &changes {
        ui::success(
            &rust_i18n::t!(
                "config.updated",
                field = change.field,
                value = change.value.as_str()
            ),
            colored,
        );
    }
    println!(
        "{}",
        ui::info(
            &rust_i18n::t!("config.file_location", path = path.display().to_string()),
            colored
        )
    );
    Ok(())
}

/// Lines of the `config show` box.
pub fn summary_lines(config: &AppConfig) -> Vec<String> {
    let kind = config.provider;
    let key = config
        .api_key_for(kind)
        .map(|k| mask_api_key(&k))
        .unwrap_or_else(|| rust_i18n::t!("config.not_set").to_string());
    let proxy = config.network.proxy.clone().unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        format!("provider:           {}", kind),
        format!("model:              {}", config.model_for(kind)),
        format!(
            "base_url:           {}",
            config.base_url_for(kind).unwrap_or_else(|| "-".to_string())
        ),
        format!("api_key:            {}", key),
        format!("language:           {}", config.language),
    ];
    if kind == ProviderKind::Azure {
        lines.push(format!("azure_api_version:  {}", config.azure_api_version));
    }
    lines.extend([
        format!("max_diff_size:      {}", config.max_diff_size),
        format!(
            "network:            timeout {}s, connect {}s, retries {}",
            config.network.request_timeout,
            config.network.connect_timeout,
            config.network.max_retries
        ),
        format!("proxy:              {}", proxy),
    ]);
    lines
}

fn show(colored: bool) -> Result<()> {
    let config = load_config()?;
    ui::print_box(&rust_i18n::t!("config.show_title"), &summary_lines(&config));
    if let Some(path) = config::config_path() {
        println!(
            "{}",
            ui::info(
                &rust_i18n::t!("config.file_location", path = path.display().to_string()),
                colored
            )
        );
    }
    Ok(())
}

/// One row of the `config check` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    pub ok: bool,
    pub label: String,
    pub value: String,
}

impl CheckItem {
    fn new(ok: bool, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ok,
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn render(&self, colored: bool) -> String {
        let mark = match (self.ok, colored) {
            (true, true) => "✓".green().bold().to_string(),
            (false, true) => "✗".red().bold().to_string(),
            (true, false) => "✓".to_string(),
            (false, false) => "✗".to_string(),
        };
        format!("{} {}: {}", mark, self.label, self.value)
    }
}

/// Static part of `config check`, before any request is sent.
pub fn build_checklist(
    config: &AppConfig,
    kind: ProviderKind,
    config_file: Option<&Path>,
    api_key: Option<&str>,
) -> Vec<CheckItem> {
    let file_item = match config_file {
        Some(path) if path.exists() => CheckItem::new(
            true,
            rust_i18n::t!("check.config_file"),
            path.display().to_string(),
        ),
        Some(path) => CheckItem::new(
            false,
            rust_i18n::t!("check.config_file"),
            rust_i18n::t!("check.file_missing", path = path.display().to_string()),
        ),
        None => CheckItem::new(
            false,
            rust_i18n::t!("check.config_file"),
            rust_i18n::t!("config.no_home"),
        ),
    };

    let key_item = match api_key {
        Some(key) => CheckItem::new(true, rust_i18n::t!("check.api_key"), mask_api_key(key)),
        None => CheckItem::new(
            false,
            rust_i18n::t!("check.api_key"),
            rust_i18n::t!("config.not_set"),
        ),
    };

    let base_url_item = match config.base_url_for(kind) {
        Some(url) => CheckItem::new(true, rust_i18n::t!("check.base_url"), url),
        None => CheckItem::new(
            false,
            rust_i18n::t!("check.base_url"),
            rust_i18n::t!("check.base_url_required"),
        ),
    };

    vec![
        file_item,
        key_item,
        CheckItem::new(true, rust_i18n::t!("check.provider"), kind.to_string()),
        CheckItem::new(true, rust_i18n::t!("check.model"), config.model_for(kind)),
        base_url_item,
    ]
}

async fn check(provider_override: Option<ProviderKind>, colored: bool) -> Result<()> {
    let config = load_config()?;
    let kind = provider_override.unwrap_or(config.provider);
    let path = config::config_path();
    let api_key = config.api_key_for(kind);

    println!("{}", ui::info(&rust_i18n::t!("check.title"), colored));
    for item in build_checklist(&config, kind, path.as_deref(), api_key.as_deref()) {
        println!("  {}", item.render(colored));
    }
    println!();

    if api_key.is_none() {
        return Err(AicommitError::MissingApiKey {
            provider: kind.to_string(),
        });
    }

    let provider = create_provider(&config, Some(kind))?;
    let spinner = ui::Spinner::new(&rust_i18n::t!("check.testing"));
    let started = Instant::now();
    let result = provider.validate().await;
    let elapsed = started.elapsed().as_millis();
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            let item = CheckItem::new(
                true,
                rust_i18n::t!("check.connection"),
                rust_i18n::t!("check.connection_ok", ms = elapsed),
            );
            println!("  {}", item.render(colored));
            Ok(())
        }
        Err(e) => {
            tracing::debug!("Connectivity check failed after {} ms: {}", elapsed, e);
            let item = CheckItem::new(
                false,
                rust_i18n::t!("check.connection"),
                rust_i18n::t!("check.connection_failed"),
            );
            println!("  {}", item.render(colored));
            Err(e)
        }
    }
}
