//! Reply post-processing.

use crate::llm::CommitMessage;

/// Issue references the model tends to invent; such lines are dropped.
const ISSUE_REFERENCE_PREFIXES: &[&str] = &[
    "Fixes #", "fixes #", "Fix #", "fix #", "Closes #", "closes #", "修复 #",
];

fn is_issue_reference(line: &str) -> bool {
    let trimmed = line.trim();
    ISSUE_REFERENCE_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}

/// Cleans a raw model reply.
///
/// Removes a surrounding code fence (with optional language tag such as
/// ```` ```plaintext ````), leading blank lines and issue-reference lines.
pub fn clean_commit_response(response: &str) -> String {
    let mut content = response.trim();

    if let Some(rest) = content.strip_prefix("```") {
        content = match rest.split_once('\n') {
            Some((tag, body)) if !tag.trim().contains(' ') => body,
            _ => rest,
        };
    }
    content = content.strip_suffix("```").unwrap_or(content);
    let content = content.trim_start_matches(['\n', '\r']);

    content
        .lines()
        .filter(|line| !is_issue_reference(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Cleans a reply and splits it into title and body.
pub fn process_commit_response(response: &str) -> CommitMessage {
    let message = CommitMessage::from_text(&clean_commit_response(response));
    tracing::debug!("Generated commit message: {:?}", message);
    message
}
