use crate::error::{AicommitError, Result};

/// Opens the user's editor on `initial_content`.
///
/// The `edit` crate picks `$VISUAL`, then `$EDITOR`, then a platform default.
///
/// # Errors
/// - [`AicommitError::UserCancelled`] - the saved text is blank
pub fn edit_text(initial_content: &str) -> Result<String> {
    let edited = edit::edit(initial_content)?;

    if edited.trim().is_empty() {
        return Err(AicommitError::UserCancelled);
    }

    Ok(edited.trim_end().to_string())
}
