use crate::constants::diff::{FILE_HEADER_PREFIX, TRUNCATION_MARKER};
use crate::git::DiffStats;

/// Diff 中一个文件的完整段落
///
/// `text` 是原始 diff 的一个切片（含结尾换行），
/// 所有段落按顺序拼接后与原始 diff 完全一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffSection<'a> {
    /// `diff --git ...` 头部行；前导段落（第一个头部之前的内容）为 `None`
    pub header: Option<&'a str>,
    /// 段落全文（头部 + 正文）
    pub text: &'a str,
}

impl DiffSection<'_> {
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

fn extract_filename_from_diff_header(line: &str) -> Option<String> {
    let rest = line.strip_prefix(FILE_HEADER_PREFIX)?;

    // 通过 " b/" 分隔符定位 a/ 和 b/ 的边界，避免空格路径被截断。
    if let Some(b_pos) = rest.find(" b/") {
        return rest[..b_pos]
            .strip_prefix("a/")
            .map(|filename| filename.to_string());
    }

    // 处理带引号的路径：diff --git "a/path with spaces.rs" "b/path with spaces.rs"
    if let Some(stripped) = rest.strip_prefix('"')
        && let Some(end) = stripped.find('"')
    {
        return stripped[..end]
            .strip_prefix("a/")
            .map(|filename| filename.to_string());
    }

    rest.split_whitespace()
        .next()
        .and_then(|s| s.strip_prefix("a/"))
        .map(|s| s.to_string())
}

/// 从 diff 文本中提取统计信息
pub fn parse_diff_stats(diff: &str) -> DiffStats {
    let mut stats = DiffStats::default();

    for line in diff.lines() {
        if line.starts_with(FILE_HEADER_PREFIX) {
            if let Some(filename) = extract_filename_from_diff_header(line) {
                stats.files_changed.push(filename);
            }
        } else if line.starts_with('+') && !line.starts_with("+++") {
            stats.insertions += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            stats.deletions += 1;
        }
    }

    stats
}

/// 按文件边界把 diff 拆成段落
///
/// 每个以 `diff --git ` 开头的行开启一个新段落；
/// 第一个头部之前若有内容，则作为前导段落（`header == None`）。
/// 没有任何头部的 diff 视为一个段落。
pub fn split_diff_sections(diff: &str) -> Vec<DiffSection<'_>> {
    let mut sections = Vec::new();
    let mut start = 0usize;
    let mut offset = 0usize;

    for line in diff.split_inclusive('\n') {
        if line.starts_with(FILE_HEADER_PREFIX) && offset > start {
            sections.push(make_section(&diff[start..offset]));
            start = offset;
        }
        offset += line.len();
    }

    if start < diff.len() {
        sections.push(make_section(&diff[start..]));
    }

    sections
}

fn make_section(text: &str) -> DiffSection<'_> {
    let first_line = text.lines().next().unwrap_or_default();
    let header = first_line
        .starts_with(FILE_HEADER_PREFIX)
        .then_some(first_line);
    DiffSection { header, text }
}

/// 把 diff 限制在 `max_len` 字节左右，只在文件边界处截断
///
/// - 输入为空或不超过预算时原样返回
/// - 依次保留完整段落，直到下一个段落会超出预算；该段落及之后的全部丢弃
/// - 第一个段落总会保留，即使它本身就超出预算
/// - 超出预算时在末尾追加一行 `... N more lines [truncated]`，N 为被丢弃的行数
/// - `max_len == 0` 时不保留任何段落，只输出截断行
pub fn truncate_diff(diff: &str, max_len: usize) -> String {
    if diff.len() <= max_len {
        return diff.to_string();
    }

    let sections = split_diff_sections(diff);
    let mut kept_len = 0usize;
    let mut kept = 0usize;

    if max_len > 0 {
        for section in &sections {
            if kept > 0 && kept_len + section.text.len() > max_len {
                break;
            }
            kept_len += section.text.len();
            kept += 1;
        }
    }

    let omitted_lines: usize = sections[kept..].iter().map(DiffSection::line_count).sum();

    tracing::debug!(
        "Diff truncated: kept {}/{} sections ({} bytes), omitted {} lines",
        kept,
        sections.len(),
        kept_len,
        omitted_lines
    );

    let mut result = String::with_capacity(kept_len + 48);
    result.push_str(&diff[..kept_len]);
    if !result.is_empty() && !result.ends_with('\n') {
        result.push('\n');
    }
    result.push_str(&format!(
        "... {} more lines {}\n",
        omitted_lines, TRUNCATION_MARKER
    ));
    result
}
