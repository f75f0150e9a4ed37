//! Command implementations.
//!
//! # Modules
//! - `commit` - Commit message generation flow (default command).
//! - `commit_state_machine` - Commit workflow state machine.
//! - `config` - Configuration persistence, `show`, `check` and `path`.
//! - `report` - Work report generation from commit history.
//! - `options` - Command option structs.
//!
//! # Architecture
//! ```text
//! CLI (cli.rs)
//!   ├── commands/commit.rs ─> commit_state_machine.rs
//!   ├── commands/config.rs
//!   ├── commands/report.rs
//!   └── shared command options (commands/options.rs)
//! ```

/// Commit generation command flow.
pub mod commit;
/// Commit workflow state machine.
pub mod commit_state_machine;
/// Configuration edit/validation commands.
pub mod config;
/// Shared command option structs.
pub mod options;
/// Work report command flow.
pub mod report;

pub use options::{CommitOptions, ConfigUpdate, ReportOptions};
