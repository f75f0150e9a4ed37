//! # aicommit
//!
//! AI 驱动的 Git 工具：根据 staged changes 生成 commit message，
//! 根据一段时间内的提交记录生成工作周报。
//!
//! ## 功能
//! - **Commit message 生成**：Conventional Commits 格式，支持 en / zh-CN / zh-TW
//! - **交互式暂存**：终端内选择要提交的文件，接受 / 编辑 / 重新生成
//! - **工作周报**：`--this-week` / `--last-week` / 自定义日期范围
//! - **多 Provider 支持**：OpenAI, Azure OpenAI, Qwen (DashScope), Deepseek
//! - **国际化**：界面支持中英文
//!
//! ## 快速开始
//! ```bash
//! # 保存 API key
//! aicommit config -p qwen -k sk-...
//!
//! # 生成 commit message
//! git add .
//! aicommit
//!
//! # 本周周报
//! aicommit report --this-week
//! ```
//!
//! ### 作为库使用
//! ```ignore
//! use aicommit::config::{load_config, Language};
//! use aicommit::git::repository::GitRepository;
//! use aicommit::git::GitOperations;
//! use aicommit::llm::provider::create_provider;
//! use aicommit::llm::CommitInfo;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repo = GitRepository::open(None)?;
//! let info = CommitInfo {
//!     files_changed: repo.staged_files()?,
//!     diff: repo.staged_diff()?,
//!     branch: repo.current_branch()?,
//! };
//!
//! let provider = create_provider(&load_config()?, None)?;
//! let message = provider.generate_commit_message(&info, Language::En, None).await?;
//! println!("Generated: {}", message);
//! # Ok(())
//! # }
//! ```
//!
//! ## 核心模块
//! - [`git`] - Git 操作抽象
//! - [`llm`] - Prompt 构建和 LLM provider 实现
//! - [`commands`] - CLI 命令实现
//! - [`config`] - 配置管理
//! - [`error`] - 统一错误类型
//! - [`ui`] - 终端交互工具
//!
//! ## 配置
//! 配置文件位置：`~/.config/aicommit/config.json`（可用 `AICOMMIT_CONFIG` 覆盖）
//!
//! ```json
//! {
//!   "provider": "qwen",
//!   "api_keys": { "qwen": "sk-..." },
//!   "language": "zh-CN"
//! }
//! ```

#[macro_use]
extern crate rust_i18n;

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod git;
pub mod llm;
pub mod ui;

// Initialize i18n for library modules
i18n!("locales", fallback = "en");
