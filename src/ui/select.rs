//! Interactive terminal selection.
//!
//! Two widgets share the raw-mode key input from [`keys`](super::keys):
//! - [`select_files`]: a checkbox list redrawn in place
//! - [`select_single_action`]: a framed single-key menu with an arrow-list fallback
//!
//! The state transitions are pure ([`SelectionState::apply`], [`resolve_action_key`])
//! and the drivers take any [`KeyReader`] / [`Write`] pair so they can run
//! against scripted input.

use std::io::{self, Write};

use colored::Colorize;
use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use super::keys::{ByteKeyReader, Key, KeyReader, RawModeGuard};
use super::layout::print_box;
use crate::error::{AicommitError, Result};
use crate::git::ChangedFiles;

/// Relationship of a file to the next commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Staged,
    Modified,
    Untracked,
}

impl FileStatus {
    pub fn glyph(&self) -> &'static str {
        match self {
            FileStatus::Staged => "✓",
            FileStatus::Modified => "•",
            FileStatus::Untracked => "+",
        }
    }

    pub fn label(&self) -> String {
        match self {
            FileStatus::Staged => rust_i18n::t!("file_status.staged").to_string(),
            FileStatus::Modified => rust_i18n::t!("file_status.modified").to_string(),
            FileStatus::Untracked => rust_i18n::t!("file_status.untracked").to_string(),
        }
    }

    pub(crate) fn paint(&self, text: &str, colored: bool) -> String {
        if !colored {
            return text.to_string();
        }
        match self {
            FileStatus::Staged => text.green().to_string(),
            FileStatus::Modified => text.yellow().to_string(),
            FileStatus::Untracked => text.cyan().to_string(),
        }
    }
}

/// One selectable file row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub status: FileStatus,
    pub selected: bool,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, status: FileStatus, selected: bool) -> Self {
        Self {
            name: name.into(),
            status,
            selected,
        }
    }
}

/// Builds the selection rows for a set of changes.
///
/// Staged files come first and are pre-selected. A path that is both
/// staged and modified appears once, as staged.
pub fn entries_from_changes(changes: &ChangedFiles) -> Vec<FileEntry> {
    let mut entries: Vec<FileEntry> = Vec::new();
    let groups = [
        (&changes.staged, FileStatus::Staged),
        (&changes.modified, FileStatus::Modified),
        (&changes.untracked, FileStatus::Untracked),
    ];
    for (names, status) in groups {
        for name in names {
            if entries.iter().any(|e| &e.name == name) {
                continue;
            }
            entries.push(FileEntry::new(
                name.clone(),
                status,
                status == FileStatus::Staged,
            ));
        }
    }
    entries
}

/// Result of a file selection session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Names of the selected entries in list order (possibly empty).
    Chosen(Vec<String>),
    Cancelled,
}

/// What the session should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Continue,
    Confirm,
    Cancel,
}

/// Checkbox list state.
///
/// Rows are the entries followed by a "confirm" row and a "cancel" row;
/// the cursor always points at one of them.
#[derive(Debug, Clone)]
pub struct SelectionState {
    entries: Vec<FileEntry>,
    cursor: usize,
}

impl SelectionState {
    pub fn new(entries: Vec<FileEntry>) -> Self {
        Self { entries, cursor: 0 }
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn confirm_row(&self) -> usize {
        self.entries.len()
    }

    pub fn cancel_row(&self) -> usize {
        self.entries.len() + 1
    }

    fn row_count(&self) -> usize {
        self.entries.len() + 2
    }

    fn toggle_current(&mut self) {
        if let Some(entry) = self.entries.get_mut(self.cursor) {
            entry.selected = !entry.selected;
        }
    }

    /// Selects everything unless everything is already selected,
    /// in which case everything is deselected.
    fn toggle_all(&mut self) {
        let all_selected = self.entries.iter().all(|e| e.selected);
        for entry in &mut self.entries {
            entry.selected = !all_selected;
        }
    }

    /// Applies one key press.
    pub fn apply(&mut self, key: Key) -> Transition {
        match key {
            Key::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Key::Down => {
                if self.cursor + 1 < self.row_count() {
                    self.cursor += 1;
                }
            }
            Key::Space => self.toggle_current(),
            Key::Char('a') | Key::Char('A') => self.toggle_all(),
            Key::Enter if self.cursor == self.confirm_row() => return Transition::Confirm,
            Key::Enter if self.cursor == self.cancel_row() => return Transition::Cancel,
            Key::Enter => self.toggle_current(),
            Key::Char('q') | Key::Char('Q') | Key::Esc | Key::Interrupt => {
                return Transition::Cancel;
            }
            _ => {}
        }
        Transition::Continue
    }

    pub fn selected_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.name.clone())
            .collect()
    }

    /// Lines of the current frame.
    pub fn render_lines(&self, colored: bool) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 4);
        lines.push(rust_i18n::t!("select.files_header").to_string());

        for (i, entry) in self.entries.iter().enumerate() {
            let checkbox = if entry.selected { "[x]" } else { "[ ]" };
            let name = entry.status.paint(
                &format!("{} {}", entry.status.glyph(), entry.name),
                colored,
            );
            let row = format!("{} {} ({})", checkbox, name, entry.status.label());
            lines.push(self.row(i, row, colored));
        }

        lines.push(format!("  {}", "─".repeat(24)));
        lines.push(self.row(
            self.confirm_row(),
            format!("✓ {}", rust_i18n::t!("select.confirm")),
            colored,
        ));
        lines.push(self.row(
            self.cancel_row(),
            format!("✗ {}", rust_i18n::t!("select.cancel")),
            colored,
        ));
        lines
    }

    fn row(&self, index: usize, text: String, colored: bool) -> String {
        if index != self.cursor {
            return format!("  {}", text);
        }
        if colored {
            format!("{} {}", ">".bold(), text.reversed())
        } else {
            format!("> {}", text)
        }
    }
}

/// Redraws a block of lines in place.
///
/// Every redraw moves the cursor back up over the previous frame and
/// clears each line before rewriting it.
#[derive(Debug, Default)]
pub struct ListRenderer {
    drawn: usize,
}

impl ListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw<W: Write>(&mut self, out: &mut W, lines: &[String]) -> io::Result<()> {
        if self.drawn > 0 {
            queue!(out, MoveUp(self.drawn as u16))?;
        }
        for line in lines {
            queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            // raw 模式下 \n 不会回到行首
            write!(out, "{}\r\n", line)?;
        }
        queue!(out, Clear(ClearType::FromCursorDown))?;
        out.flush()?;
        self.drawn = lines.len();
        Ok(())
    }
}

/// Runs a checkbox session until confirm or cancel.
///
/// A failed key read ends the session as [`Selection::Cancelled`].
pub fn run_file_selection<R, W>(
    mut state: SelectionState,
    keys: &mut R,
    out: &mut W,
    colored: bool,
) -> io::Result<Selection>
where
    R: KeyReader,
    W: Write,
{
    let mut renderer = ListRenderer::new();

    loop {
        renderer.draw(out, &state.render_lines(colored))?;

        let key = match keys.read_key() {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!("Key read failed, cancelling selection: {}", e);
                return Ok(Selection::Cancelled);
            }
        };

        match state.apply(key) {
            Transition::Continue => {}
            Transition::Confirm => return Ok(Selection::Chosen(state.selected_names())),
            Transition::Cancel => return Ok(Selection::Cancelled),
        }
    }
}

/// Lets the user pick files on the terminal.
///
/// `entries` carry their initial `selected` flags.
///
/// # Errors
/// - [`AicommitError::NoTty`] - stdin is not an interactive terminal
/// - [`AicommitError::InvalidInput`] - `entries` is empty
pub fn select_files(entries: Vec<FileEntry>, colored: bool) -> Result<Selection> {
    if entries.is_empty() {
        return Err(AicommitError::InvalidInput(
            rust_i18n::t!("select.no_files").to_string(),
        ));
    }

    let _guard = RawModeGuard::acquire()?;
    let mut keys = ByteKeyReader::stdin();
    let mut out = io::stdout().lock();
    let selection = run_file_selection(SelectionState::new(entries), &mut keys, &mut out, colored)?;
    Ok(selection)
}

/// One entry of a single-key menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOption<A> {
    pub key: char,
    pub label: String,
    pub is_default: bool,
    pub action: A,
}

impl<A> ActionOption<A> {
    pub fn new(key: char, label: impl Into<String>, action: A) -> Self {
        Self {
            key,
            label: label.into(),
            is_default: false,
            action,
        }
    }

    pub fn default_if(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

/// How a single key press maps onto a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResolution {
    /// Index of the chosen option.
    Chosen(usize),
    Cancelled,
    /// Not a menu key; fall back to the arrow list.
    Fallback,
}

/// Maps a key press onto `options`.
///
/// Enter picks the default option (a menu without one treats Enter as
/// invalid), an option key picks that option case-insensitively and Ctrl+C
/// cancels.
pub fn resolve_action_key<A>(options: &[ActionOption<A>], key: Key) -> KeyResolution {
    match key {
        Key::Enter => options
            .iter()
            .position(|o| o.is_default)
            .map_or(KeyResolution::Fallback, KeyResolution::Chosen),
        Key::Interrupt => KeyResolution::Cancelled,
        Key::Char(c) => options
            .iter()
            .position(|o| o.key.eq_ignore_ascii_case(&c))
            .map_or(KeyResolution::Fallback, KeyResolution::Chosen),
        _ => KeyResolution::Fallback,
    }
}

/// Result of a single-key menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionChoice<A> {
    Selected(A),
    Cancelled,
}

fn option_lines<A>(options: &[ActionOption<A>]) -> Vec<String> {
    options
        .iter()
        .map(|o| {
            if o.is_default {
                format!("[{}] {} {}", o.key, o.label, rust_i18n::t!("select.default_marker"))
            } else {
                format!("[{}] {}", o.key, o.label)
            }
        })
        .collect()
}

fn key_prompt<A>(options: &[ActionOption<A>]) -> String {
    let keys: Vec<String> = options.iter().map(|o| o.key.to_string()).collect();
    match options.iter().find(|o| o.is_default) {
        Some(default) => rust_i18n::t!(
            "select.key_prompt_default",
            keys = keys.join("/"),
            default = default.key.to_string()
        )
        .to_string(),
        None => rust_i18n::t!("select.key_prompt", keys = keys.join("/")).to_string(),
    }
}

/// Prompts for and reads a single menu key.
///
/// A failed key read counts as cancellation.
pub fn read_action_key<A, R, W>(
    options: &[ActionOption<A>],
    keys: &mut R,
    out: &mut W,
) -> io::Result<KeyResolution>
where
    R: KeyReader,
    W: Write,
{
    write!(out, "{} ", key_prompt(options))?;
    out.flush()?;

    let resolution = match keys.read_key() {
        Ok(key) => resolve_action_key(options, key),
        Err(e) => {
            tracing::debug!("Key read failed, cancelling menu: {}", e);
            KeyResolution::Cancelled
        }
    };
    write!(out, "\r\n")?;
    out.flush()?;
    Ok(resolution)
}

fn take_action<A>(options: Vec<ActionOption<A>>, index: Option<usize>) -> ActionChoice<A> {
    match index.and_then(|i| options.into_iter().nth(i)) {
        Some(option) => ActionChoice::Selected(option.action),
        None => ActionChoice::Cancelled,
    }
}

fn labels_and_default<A>(options: &[ActionOption<A>]) -> (Vec<String>, usize) {
    let labels = options.iter().map(|o| o.label.clone()).collect();
    let default = options.iter().position(|o| o.is_default).unwrap_or(0);
    (labels, default)
}

/// Turns a key resolution into the picked action, handing any key outside
/// the menu to `fallback`.
///
/// `fallback` receives the option labels and the default index and
/// returns the picked index, or `None` when the user aborts.
pub fn finish_action<A, F>(
    options: Vec<ActionOption<A>>,
    resolution: KeyResolution,
    fallback: F,
) -> Result<ActionChoice<A>>
where
    F: FnOnce(&[String], usize) -> Result<Option<usize>>,
{
    let index = match resolution {
        KeyResolution::Chosen(index) => Some(index),
        KeyResolution::Cancelled => None,
        KeyResolution::Fallback => {
            let (labels, default) = labels_and_default(&options);
            fallback(&labels, default)?
        }
    };
    Ok(take_action(options, index))
}

/// Shows `options` in a box under `title` and waits for one key.
///
/// Keys outside the menu switch to an arrow-key list over the same labels.
///
/// # Errors
/// - [`AicommitError::NoTty`] - stdin is not an interactive terminal
pub fn select_single_action<A>(
    title: &str,
    options: Vec<ActionOption<A>>,
) -> Result<ActionChoice<A>> {
    print_box(title, &option_lines(&options));

    // raw 模式只覆盖单键读取，fallback 列表在恢复终端后显示
    let resolution = {
        let _guard = RawModeGuard::acquire()?;
        let mut keys = ByteKeyReader::stdin();
        let mut stdout = io::stdout();
        read_action_key(&options, &mut keys, &mut stdout)?
    };

    finish_action(options, resolution, arrow_list_fallback)
}

/// Arrow-key list over `labels` (terminal must be in normal mode).
pub fn arrow_list_fallback(labels: &[String], default: usize) -> Result<Option<usize>> {
    println!("{}", rust_i18n::t!("select.fallback_hint"));
    let result = inquire::Select::new(&rust_i18n::t!("select.fallback_prompt"), labels.to_vec())
        .with_starting_cursor(default.min(labels.len().saturating_sub(1)))
        .raw_prompt();

    match result {
        Ok(option) => Ok(Some(option.index)),
        Err(inquire::InquireError::OperationCanceled)
        | Err(inquire::InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    /// Replays a fixed key sequence, then reports EOF.
    struct ScriptedKeys(VecDeque<Key>);

    impl ScriptedKeys {
        fn new(keys: &[Key]) -> Self {
            Self(keys.iter().copied().collect())
        }
    }

    impl KeyReader for ScriptedKeys {
        fn read_key(&mut self) -> io::Result<Key> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }
    }

    fn unselected(names: &[&str]) -> Vec<FileEntry> {
        names
            .iter()
            .map(|n| FileEntry::new(*n, FileStatus::Modified, false))
            .collect()
    }

    fn run(entries: Vec<FileEntry>, keys: &[Key]) -> Selection {
        let mut out = Vec::new();
        run_file_selection(
            SelectionState::new(entries),
            &mut ScriptedKeys::new(keys),
            &mut out,
            false,
        )
        .unwrap()
    }

    /// 与 select_single_action 相同的流程：先读一个键，再交给 finish_action
    fn choose<F>(keys: &[Key], fallback: F) -> ActionChoice<&'static str>
    where
        F: FnOnce(&[String], usize) -> Result<Option<usize>>,
    {
        let options = action_options();
        let mut out = Vec::new();
        let resolution = read_action_key(&options, &mut ScriptedKeys::new(keys), &mut out).unwrap();
        finish_action(options, resolution, fallback).unwrap()
    }

    fn action_options() -> Vec<ActionOption<&'static str>> {
        vec![
            ActionOption::new('u', "Use staged", "use"),
            ActionOption::new('a', "Stage all", "all").default_if(true),
            ActionOption::new('q', "Quit", "quit"),
        ]
    }

    // === entries_from_changes ===

    #[test]
    fn test_entries_from_changes_preselects_staged() {
        let changes = ChangedFiles {
            staged: vec!["a.rs".into(), "b.rs".into()],
            modified: vec!["b.rs".into(), "c.rs".into()],
            untracked: vec!["d.rs".into()],
        };
        let entries = entries_from_changes(&changes);
        assert_eq!(
            entries,
            vec![
                FileEntry::new("a.rs", FileStatus::Staged, true),
                FileEntry::new("b.rs", FileStatus::Staged, true),
                FileEntry::new("c.rs", FileStatus::Modified, false),
                FileEntry::new("d.rs", FileStatus::Untracked, false),
            ]
        );
    }

    #[test]
    fn test_file_status_glyphs() {
        assert_eq!(FileStatus::Staged.glyph(), "✓");
        assert_eq!(FileStatus::Modified.glyph(), "•");
        assert_eq!(FileStatus::Untracked.glyph(), "+");
    }

    // === SelectionState ===

    #[test]
    fn test_cursor_clamps_at_both_ends() {
        let mut state = SelectionState::new(unselected(&["a", "b"]));
        state.apply(Key::Up);
        assert_eq!(state.cursor(), 0);
        for _ in 0..10 {
            state.apply(Key::Down);
        }
        assert_eq!(state.cursor(), state.cancel_row());
    }

    #[test]
    fn test_space_toggles_without_moving() {
        let mut state = SelectionState::new(unselected(&["a", "b"]));
        assert_eq!(state.apply(Key::Space), Transition::Continue);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.selected_names(), vec!["a".to_string()]);
        state.apply(Key::Space);
        assert!(state.selected_names().is_empty());
    }

    #[test]
    fn test_space_on_action_rows_is_ignored() {
        let mut state = SelectionState::new(unselected(&["a"]));
        state.apply(Key::Down);
        assert_eq!(state.apply(Key::Space), Transition::Continue);
        assert!(state.selected_names().is_empty());
    }

    #[test]
    fn test_toggle_all_from_partial_selects_everything() {
        let mut entries = unselected(&["a", "b", "c"]);
        entries[1].selected = true;
        let mut state = SelectionState::new(entries);

        state.apply(Key::Char('a'));
        assert_eq!(state.selected_names().len(), 3);
        // 全选之后再按一次是全部取消，而不是回到部分选中
        state.apply(Key::Char('A'));
        assert!(state.selected_names().is_empty());
    }

    #[test]
    fn test_toggle_all_twice_restores_none_selected() {
        let original = unselected(&["a", "b", "c"]);
        let mut state = SelectionState::new(original.clone());

        state.apply(Key::Char('a'));
        assert!(state.entries().iter().all(|e| e.selected));
        state.apply(Key::Char('a'));
        assert_eq!(state.entries(), original.as_slice());
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_toggle_all_twice_restores_all_selected() {
        let mut original = unselected(&["a", "b"]);
        for entry in &mut original {
            entry.selected = true;
        }
        let mut state = SelectionState::new(original.clone());

        state.apply(Key::Char('A'));
        assert!(state.selected_names().is_empty());
        state.apply(Key::Char('A'));
        assert_eq!(state.entries(), original.as_slice());
    }

    #[test]
    fn test_enter_on_entry_toggles() {
        let mut state = SelectionState::new(unselected(&["a", "b"]));
        state.apply(Key::Down);
        assert_eq!(state.apply(Key::Enter), Transition::Continue);
        assert_eq!(state.selected_names(), vec!["b".to_string()]);
    }

    #[test]
    fn test_enter_on_confirm_and_cancel_rows() {
        let mut state = SelectionState::new(unselected(&["a"]));
        state.apply(Key::Down);
        assert_eq!(state.cursor(), state.confirm_row());
        assert_eq!(state.apply(Key::Enter), Transition::Confirm);

        state.apply(Key::Down);
        assert_eq!(state.apply(Key::Enter), Transition::Cancel);
    }

    #[test]
    fn test_cancel_keys() {
        for key in [Key::Char('q'), Key::Char('Q'), Key::Esc, Key::Interrupt] {
            let mut state = SelectionState::new(unselected(&["a"]));
            assert_eq!(state.apply(key), Transition::Cancel, "{:?}", key);
        }
    }

    #[test]
    fn test_unknown_keys_do_nothing() {
        let mut state = SelectionState::new(unselected(&["a"]));
        assert_eq!(state.apply(Key::Unknown), Transition::Continue);
        assert_eq!(state.apply(Key::Char('x')), Transition::Continue);
        assert_eq!(state.cursor(), 0);
        assert!(state.selected_names().is_empty());
    }

    #[test]
    fn test_render_lines_marks_cursor_and_checkboxes() {
        let mut entries = unselected(&["a.go", "b.go"]);
        entries[1].selected = true;
        let state = SelectionState::new(entries);
        let lines = state.render_lines(false);

        // header + 2 entries + separator + confirm + cancel
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("> [ ] • a.go"));
        assert!(lines[2].starts_with("  [x] • b.go"));
    }

    // === run_file_selection ===

    #[test]
    fn test_select_two_of_two() {
        let selection = run(
            unselected(&["a.go", "b.go"]),
            &[Key::Space, Key::Down, Key::Space, Key::Down, Key::Enter],
        );
        assert_eq!(
            selection,
            Selection::Chosen(vec!["a.go".to_string(), "b.go".to_string()])
        );
    }

    #[test]
    fn test_select_first_two_of_three() {
        let selection = run(
            unselected(&["x", "y", "z"]),
            &[
                Key::Space,
                Key::Down,
                Key::Space,
                Key::Down,
                Key::Down,
                Key::Enter,
            ],
        );
        assert_eq!(
            selection,
            Selection::Chosen(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn test_confirm_with_nothing_selected() {
        let selection = run(unselected(&["a"]), &[Key::Down, Key::Enter]);
        assert_eq!(selection, Selection::Chosen(vec![]));
    }

    #[test]
    fn test_q_cancels_selection() {
        let selection = run(unselected(&["a"]), &[Key::Space, Key::Char('q')]);
        assert_eq!(selection, Selection::Cancelled);
    }

    #[test]
    fn test_eof_cancels_selection() {
        let selection = run(unselected(&["a"]), &[Key::Space]);
        assert_eq!(selection, Selection::Cancelled);
    }

    #[test]
    fn test_redraw_moves_up_over_previous_frame() {
        let mut out = Vec::new();
        let mut renderer = ListRenderer::new();
        renderer.draw(&mut out, &["one".into(), "two".into()]).unwrap();
        let first = String::from_utf8(out.clone()).unwrap();
        // 第一帧不需要上移
        assert!(!first.contains("\x1b[2A"));
        assert!(first.contains("one\r\n"));

        out.clear();
        renderer.draw(&mut out, &["three".into()]).unwrap();
        let second = String::from_utf8(out).unwrap();
        assert!(second.starts_with("\x1b[2A"));
        assert!(second.contains("three\r\n"));
    }

    // === single-key menu ===

    #[test]
    fn test_resolve_action_key() {
        let options = action_options();
        assert_eq!(resolve_action_key(&options, Key::Char('u')), KeyResolution::Chosen(0));
        assert_eq!(resolve_action_key(&options, Key::Char('Q')), KeyResolution::Chosen(2));
        assert_eq!(resolve_action_key(&options, Key::Enter), KeyResolution::Chosen(1));
        assert_eq!(resolve_action_key(&options, Key::Interrupt), KeyResolution::Cancelled);
        assert_eq!(resolve_action_key(&options, Key::Char('z')), KeyResolution::Fallback);
        assert_eq!(resolve_action_key(&options, Key::Down), KeyResolution::Fallback);
    }

    #[test]
    fn test_enter_without_default_falls_back() {
        let options = vec![ActionOption::new('y', "Yes", 1), ActionOption::new('n', "No", 2)];
        assert_eq!(resolve_action_key(&options, Key::Enter), KeyResolution::Fallback);
    }

    #[test]
    fn test_choose_action_by_key() {
        let choice = choose(&[Key::Char('U')], |_, _| panic!("fallback should not run"));
        assert_eq!(choice, ActionChoice::Selected("use"));
    }

    #[test]
    fn test_choose_action_fallback_receives_labels() {
        let choice = choose(&[Key::Char('x')], |labels, default| {
            assert_eq!(labels, ["Use staged", "Stage all", "Quit"]);
            assert_eq!(default, 1);
            Ok(Some(2))
        });
        assert_eq!(choice, ActionChoice::Selected("quit"));
    }

    #[test]
    fn test_choose_action_interrupt_cancels() {
        let choice = choose(&[Key::Interrupt], |_, _| Ok(Some(0)));
        assert_eq!(choice, ActionChoice::Cancelled);
    }

    #[test]
    fn test_choose_action_read_error_cancels() {
        let choice = choose(&[], |_, _| panic!("fallback should not run"));
        assert_eq!(choice, ActionChoice::Cancelled);
    }

    #[test]
    fn test_choose_action_fallback_abort_cancels() {
        let choice = choose(&[Key::Esc], |_, _| Ok(None));
        assert_eq!(choice, ActionChoice::Cancelled);
    }

    // === 分片输入驱动完整会话 ===

    /// 每次 read() 返回一个 chunk，chunk 之间视为"仍有输入"
    struct Chunks(VecDeque<&'static str>);

    impl io::Read for Chunks {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.pop_front() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(chunk.as_bytes());
                    Ok(chunk.len())
                }
                None => Ok(0),
            }
        }
    }

    #[test]
    fn test_split_up_arrow_moves_cursor_instead_of_toggling_all() {
        let input = Chunks(["\x1b[B", "\x1b[", "A", "\x1b[B", "\r", "\x1b[B", "\r"].into());
        let mut keys = ByteKeyReader::with_input_wait(input, |c: &Chunks, _| Ok(!c.0.is_empty()));
        let mut out = Vec::new();
        let selection = run_file_selection(
            SelectionState::new(unselected(&["a.go", "b.go"])),
            &mut keys,
            &mut out,
            false,
        )
        .unwrap();
        // Down, Up, Down 停在 b.go；Enter 勾选；Down 到 confirm；Enter 确认
        assert_eq!(selection, Selection::Chosen(vec!["b.go".to_string()]));
    }
}
