// 配置加载逻辑
//
// 此文件负责从 JSON 文件和环境变量加载配置，以及写回配置文件。

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use directories::BaseDirs;

use super::structs::AppConfig;
use crate::error::{AicommitError, Result};

/// 指定配置文件路径的环境变量
const CONFIG_PATH_ENV: &str = "AICOMMIT_CONFIG";

/// 加载应用配置
///
/// 配置加载优先级（从高到低）：
/// 1. 环境变量（AICOMMIT__* 前缀，双下划线表示嵌套）
///    - 例如：`AICOMMIT__PROVIDER=qwen`
///    - 例如：`AICOMMIT__NETWORK__REQUEST_TIMEOUT=30`
/// 2. 配置文件（~/.config/aicommit/config.json）
/// 3. 默认值（来自 structs 的 Default trait 和 serde(default) 属性）
pub fn load_config() -> Result<AppConfig> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::warn!("Could not determine home directory, using default config");
            build(None)
        }
    }
}

/// 从指定文件加载配置（同样应用环境变量覆盖）
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    build(path.exists().then_some(path))
}

fn build(path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        tracing::debug!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path).format(FileFormat::Json));
    }

    // 使用双下划线作为嵌套层级分隔符，避免与字段名中的单下划线冲突
    // 例如：AICOMMIT__NETWORK__MAX_RETRIES -> network.max_retries
    builder = builder.add_source(
        Environment::with_prefix("AICOMMIT")
            .separator("__")
            .try_parsing(true),
    );

    let app_config: AppConfig = builder.build()?.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}

/// 只读取配置文件本身（不应用环境变量）
///
/// `config` 子命令修改配置时使用，避免把环境变量的值写回文件。
/// 文件不存在时返回默认配置。
pub fn load_file_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_json::from_str(&content).map_err(|e| {
        AicommitError::Config(
            rust_i18n::t!(
                "config.parse_failed",
                path = path.display().to_string(),
                error = e.to_string()
            )
            .to_string(),
        )
    })
}

/// 保存配置到文件（缩进 JSON），自动创建父目录
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, format!("{}\n", content))?;
    tracing::debug!("Config saved to {}", path.display());
    Ok(())
}

/// 获取配置文件路径
///
/// `AICOMMIT_CONFIG` 优先，否则为 `~/.config/aicommit/config.json`
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("aicommit")
            .join("config.json")
    })
}
