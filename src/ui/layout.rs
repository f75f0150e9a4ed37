//! Width-aware box drawing.

use crate::constants::ui::MIN_BOX_WIDTH;

/// Visible width of `s` in terminal columns.
///
/// ANSI color sequences are ignored and East Asian wide characters count
/// as two columns.
pub fn display_width(s: &str) -> usize {
    console::measure_text_width(s)
}

/// Pads `s` with spaces up to `width` visible columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let current = display_width(s);
    if current >= width {
        return s.to_string();
    }
    format!("{}{}", s, " ".repeat(width - current))
}

/// Renders a framed box:
///
/// ```text
/// ┌─ Title ──────────┐
/// │ first line       │
/// │ second line      │
/// └──────────────────┘
/// ```
///
/// Every returned line has the same visible width.
pub fn render_box(title: &str, lines: &[String]) -> Vec<String> {
    let title_width = display_width(title);
    let content_width = lines
        .iter()
        .map(|l| display_width(l))
        .max()
        .unwrap_or(0)
        .max(MIN_BOX_WIDTH)
        .max(title_width + 2);

    let mut out = Vec::with_capacity(lines.len() + 2);

    if title.is_empty() {
        out.push(format!("┌{}┐", "─".repeat(content_width + 2)));
    } else {
        out.push(format!(
            "┌─ {} {}┐",
            title,
            "─".repeat(content_width - title_width - 1)
        ));
    }

    for line in lines {
        out.push(format!("│ {} │", pad_to_width(line, content_width)));
    }

    out.push(format!("└{}┘", "─".repeat(content_width + 2)));
    out
}

/// Prints a box built by [`render_box`].
pub fn print_box(title: &str, lines: &[String]) {
    for line in render_box(title, lines) {
        println!("{}", line);
    }
}
