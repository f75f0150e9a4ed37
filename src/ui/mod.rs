//! Terminal output helpers and interactive widgets.

pub mod colors;
pub mod editor;
pub mod keys;
pub mod layout;
pub mod select;
pub mod spinner;

pub use colors::*;
pub use editor::*;
pub use keys::restore_terminal;
pub use layout::{display_width, pad_to_width, print_box, render_box};
pub use select::{
    ActionChoice, ActionOption, FileEntry, FileStatus, Selection, entries_from_changes,
    select_files, select_single_action,
};
pub use spinner::Spinner;
