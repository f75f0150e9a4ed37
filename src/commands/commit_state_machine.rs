//! Commit process state machine
//!
//! Pure state transitions for the generate / review / commit loop.
//! IO (model calls, menus, the editor, `git commit`) lives in
//! `commands/commit.rs`.
//!
//! # State transition diagram
//! ```text
//! Generating ──────> WaitingForAction ──────> Accepted ──> git commit
//!     ▲                 │    │    │
//!     └── Regenerate ───┘    │    └──> Cancelled
//!                            └── EditCancelled (stay)
//! Generating at the regeneration limit ──> Err(MaxRegenerations)
//! ```
//!
//! # Usage example
//! ```
//! use aicommit::commands::commit_state_machine::{CommitState, GenerationResult, UserAction};
//! use aicommit::llm::CommitMessage;
//!
//! # fn main() -> anyhow::Result<()> {
//! let state = CommitState::Generating { attempt: 0 };
//! let state = state.handle_generation(
//!     GenerationResult::Success(CommitMessage::from_text("feat: add login")),
//!     false,
//! )?;
//! let state = state.handle_action(UserAction::Accept);
//! assert!(matches!(state, CommitState::Accepted { .. }));
//! # Ok(())
//! # }
//! ```

use crate::error::{AicommitError, Result};
use crate::llm::CommitMessage;

/// Commit process status
#[derive(Debug, Clone, PartialEq)]
pub enum CommitState {
    /// Waiting for the model (initial state, or after Regenerate)
    Generating {
        /// Zero-based attempt counter
        attempt: usize,
    },
    /// Message shown, waiting for accept / edit / regenerate / cancel
    WaitingForAction {
        message: CommitMessage,
        attempt: usize,
    },
    /// Ready to commit
    Accepted { message: CommitMessage },
    /// Nothing will be committed
    Cancelled,
}

/// Choice made in the [`CommitState::WaitingForAction`] menu.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Accept,
    /// 编辑后直接提交
    Edit { new_message: CommitMessage },
    /// Editor closed with empty content
    EditCancelled,
    Regenerate,
    Cancel,
}

/// Outcome of one generation step.
#[derive(Debug, Clone)]
pub enum GenerationResult {
    Success(CommitMessage),
    MaxRegenerationsExceeded,
}

impl CommitState {
    /// Whether another generation is allowed.
    ///
    /// ```
    /// # use aicommit::commands::commit_state_machine::CommitState;
    /// let state = CommitState::Generating { attempt: 10 };
    /// assert!(state.is_at_max_regenerations(10));
    /// assert!(!state.is_at_max_regenerations(11));
    /// ```
    pub fn is_at_max_regenerations(&self, limit: usize) -> bool {
        matches!(self, CommitState::Generating { attempt } if *attempt >= limit)
    }

    /// Applies a generation result to a `Generating` state.
    ///
    /// `auto_accept` (`--yes`) skips the menu.
    ///
    /// # Errors
    /// - [`AicommitError::MaxRegenerations`] on `MaxRegenerationsExceeded`
    /// - [`AicommitError::InvalidInput`] when called in another state
    pub fn handle_generation(self, result: GenerationResult, auto_accept: bool) -> Result<Self> {
        match self {
            CommitState::Generating { attempt } => match result {
                GenerationResult::MaxRegenerationsExceeded => {
                    Err(AicommitError::MaxRegenerations(attempt))
                }
                GenerationResult::Success(message) if auto_accept => {
                    Ok(CommitState::Accepted { message })
                }
                GenerationResult::Success(message) => {
                    Ok(CommitState::WaitingForAction { message, attempt })
                }
            },
            other => Err(AicommitError::InvalidInput(format!(
                "handle_generation called in wrong state: {:?}",
                other
            ))),
        }
    }

    /// Applies a menu choice to a `WaitingForAction` state.
    ///
    /// Any other state yields `Cancelled`.
    pub fn handle_action(self, action: UserAction) -> Self {
        match self {
            CommitState::WaitingForAction { message, attempt } => match action {
                UserAction::Accept => CommitState::Accepted { message },
                UserAction::Edit { new_message } => CommitState::Accepted {
                    message: new_message,
                },
                UserAction::EditCancelled => CommitState::WaitingForAction { message, attempt },
                UserAction::Regenerate => CommitState::Generating {
                    attempt: attempt + 1,
                },
                UserAction::Cancel => CommitState::Cancelled,
            },
            other => {
                tracing::error!("handle_action called in wrong state: {:?}", other);
                CommitState::Cancelled
            }
        }
    }
}
