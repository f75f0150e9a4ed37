use colored::Colorize;

use crate::git::DiffStats;

/// 显示成功消息（绿色 ✓）
pub fn success(msg: &str, colored: bool) {
    if colored {
        println!("{} {}", "✓".green().bold(), msg.green());
    } else {
        println!("✓ {}", msg);
    }
}

/// 显示错误消息（红色 ✗，输出到 stderr）
pub fn error(msg: &str, colored: bool) {
    if colored {
        eprintln!("{} {}", "✗".red().bold(), msg.red());
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// 显示警告消息（黄色 ⚠）
pub fn warning(msg: &str, colored: bool) {
    if colored {
        println!("{} {}", "⚠".yellow().bold(), msg.yellow());
    } else {
        println!("⚠ {}", msg);
    }
}

/// 格式化信息消息（蓝色 ℹ）
pub fn info(msg: &str, colored: bool) -> String {
    if colored {
        format!("{} {}", "ℹ".blue().bold(), msg.blue())
    } else {
        format!("ℹ {}", msg)
    }
}

/// 错误下方的建议（黄色）
pub fn hint(msg: &str, colored: bool) {
    if colored {
        eprintln!("  {} {}", "→".yellow().bold(), msg.yellow());
    } else {
        eprintln!("  → {}", msg);
    }
}

/// 显示步骤提示（灰色）
pub fn step(step: &str, msg: &str, colored: bool) {
    if colored {
        println!(
            "{} {}",
            format!("[{}]", step).bright_black().bold(),
            msg.bright_black()
        );
    } else {
        println!("[{}] {}", step, msg);
    }
}

/// 分隔线（report 输出前后）
pub fn rule(colored: bool) -> String {
    let line = "─".repeat(60);
    if colored {
        line.bright_black().to_string()
    } else {
        line
    }
}

/// 格式化 diff 统计信息
pub fn format_diff_stats(stats: &DiffStats, colored: bool) -> String {
    let files = rust_i18n::t!("diff_stats.files", count = stats.files_changed.len()).to_string();
    let insertions = format!("+{}", stats.insertions);
    let deletions = format!("-{}", stats.deletions);

    if colored {
        format!(
            "{}, {} {}",
            files.bold(),
            insertions.green(),
            deletions.red()
        )
    } else {
        format!("{}, {} {}", files, insertions, deletions)
    }
}
