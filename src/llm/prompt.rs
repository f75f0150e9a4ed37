//! Prompt templates for commit messages and work reports.
//!
//! Every template exists in English, Simplified and Traditional Chinese;
//! the output language of the model follows the prompt language.

use crate::config::Language;
use crate::llm::{CommitInfo, ReportInfo};

/// One conventional commit type with its localized description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitType {
    pub name: &'static str,
    pub description: &'static str,
}

const fn ct(name: &'static str, description: &'static str) -> CommitType {
    CommitType { name, description }
}

const COMMIT_TYPES_EN: [CommitType; 7] = [
    ct("feat", "New feature"),
    ct("fix", "Bug fix"),
    ct("refactor", "Code refactoring"),
    ct("docs", "Documentation changes"),
    ct("style", "Code style changes (formatting, missing semicolons, etc)"),
    ct("test", "Adding or modifying tests"),
    ct("chore", "Maintenance tasks, dependencies, build changes"),
];

const COMMIT_TYPES_ZH_CN: [CommitType; 7] = [
    ct("feat", "新功能"),
    ct("fix", "修复缺陷"),
    ct("refactor", "代码重构"),
    ct("docs", "文档更新"),
    ct("style", "代码格式"),
    ct("test", "测试相关"),
    ct("chore", "其他更新"),
];

const COMMIT_TYPES_ZH_TW: [CommitType; 7] = [
    ct("feat", "新功能"),
    ct("fix", "修復缺陷"),
    ct("refactor", "代碼重構"),
    ct("docs", "文檔更新"),
    ct("style", "代碼格式"),
    ct("test", "測試相關"),
    ct("chore", "其他更新"),
];

/// Commit types offered to the model, localized for `language`.
pub fn commit_types(language: Language) -> &'static [CommitType] {
    match language {
        Language::En => &COMMIT_TYPES_EN,
        Language::ZhCn => &COMMIT_TYPES_ZH_CN,
        Language::ZhTw => &COMMIT_TYPES_ZH_TW,
    }
}

/// `- type: description` lines, one per commit type.
fn format_commit_types(language: Language) -> String {
    commit_types(language)
        .iter()
        .map(|t| format!("- {}: {}\n", t.name, t.description))
        .collect()
}

/// `- path` lines, one per file.
fn format_files_list(files: &[String]) -> String {
    files.iter().map(|f| format!("- {}\n", f)).collect()
}

/// System prompt describing the commit message format.
pub fn build_commit_system_prompt(language: Language) -> String {
    let types = format_commit_types(language);

    match language {
        Language::ZhCn => format!(
            r#"您是一个帮助生成标准化git提交信息的助手。
请严格遵循以下提交信息格式规则：

1. 格式：<类型>(<范围>): <主题>

<正文>

<脚注>

2. 类型必须是以下之一：
{types}
3. 范围：可选，描述影响的区域（如：router、auth、db）
4. 主题：简短摘要（不超过50个字符）
5. 正文：详细说明（每行不超过72个字符）
6. 脚注：可选，用于说明重大变更或引用问题编号

示例：
feat(认证): 实现JWT认证系统

添加基于JWT的认证系统，支持刷新令牌
- 实现令牌生成和验证
- 添加用户会话管理
- 设置安全Cookie处理

重大变更：需要新的认证头"#
        ),
        Language::ZhTw => format!(
            r#"您是一個幫助生成標準化git提交信息的助手。
請嚴格遵循以下提交信息格式規則：

1. 格式：<類型>(<範圍>): <主題>

<正文>

<腳註>

2. 類型必須是以下之一：
{types}
3. 範圍：可選，描述影響的區域（如：router、auth、db）
4. 主題：簡短摘要（不超過50個字符）
5. 正文：詳細說明（每行不超過72個字符）
6. 腳註：可選，用於說明重大變更或引用問題編號

示例：
feat(認證): 實現JWT認證系統

添加基於JWT的認證系統，支持刷新令牌
- 實現令牌生成和驗證
- 添加用戶會話管理
- 設置安全Cookie處理

重大變更：需要新的認證頭"#
        ),
        Language::En => format!(
            r#"You are a helpful assistant that generates standardized git commit messages.
Follow these strict rules for commit message format:

1. Format: <type>(<scope>): <subject>

<body>

<footer>

2. Types must be one of:
{types}
3. Scope: Optional, describes the affected area (e.g., router, auth, db)
4. Subject: Short summary (50 chars or less)
5. Body: Detailed explanation (72 chars per line)
6. Footer: Optional, for breaking changes or issue references

Example:
feat(auth): implement JWT authentication

Add JWT-based authentication system with refresh tokens
- Implement token generation and validation
- Add user session management
- Set up secure cookie handling

BREAKING CHANGE: New authentication headers required"#
        ),
    }
}

/// User prompt carrying branch, file list and diff.
pub fn build_commit_user_prompt(info: &CommitInfo, language: Language) -> String {
    let branch = &info.branch;
    let files = format_files_list(&info.files_changed);
    let diff = &info.diff;

    match language {
        Language::ZhCn => format!(
            "请为以下Git更改生成标准化的提交信息：\n\n分支：{branch}\n\n更改的文件：\n{files}\n更改内容：\n{diff}\n\n请严格按照系统提示中的格式要求生成提交信息。"
        ),
        Language::ZhTw => format!(
            "請為以下Git更改生成標準化的提交信息：\n\n分支：{branch}\n\n更改的文件：\n{files}\n更改內容：\n{diff}\n\n請嚴格按照系統提示中的格式要求生成提交信息。"
        ),
        Language::En => format!(
            "Please generate a standardized commit message for the following Git changes:\n\nBranch: {branch}\n\nFiles changed:\n{files}\nChanges:\n{diff}\n\nPlease strictly follow the format requirements in the system prompt."
        ),
    }
}

/// Single user prompt asking for a per-day Markdown work report.
pub fn build_report_prompt(info: &ReportInfo, language: Language) -> String {
    let since = match info.since {
        Some(day) => day.format("%Y-%m-%d").to_string(),
        None => match language {
            Language::ZhCn | Language::ZhTw => "最早的提交".to_string(),
            Language::En => "the first commit".to_string(),
        },
    };
    let until = info.until.format("%Y-%m-%d").to_string();
    let commits = info
        .commits
        .iter()
        .map(|c| format!("- {}", c))
        .collect::<Vec<_>>()
        .join("\n");

    match language {
        Language::ZhCn => format!(
            r#"请根据以下 Git commit 记录（格式为 "- YYYY-MM-DD -- Commit Subject"），为日期范围 {since} 至 {until} 总结生成一份简洁的工作日报。

要求：
1.  使用 Markdown 格式。
2.  按日期**总结**当天完成的主要工作，**不要**罗列单个 commit message。
3.  忽略所有 "Merge branch" 或 "Merge remote-tracking branch" 相关的提交。
4.  报告标题或开头应明确指出报告的时间范围是 {since} 到 {until}。
5.  语言为简体中文。

Commit 记录:
{commits}

请生成日报内容："#
        ),
        Language::ZhTw => format!(
            r#"請根據以下 Git commit 記錄（格式為 "- YYYY-MM-DD -- Commit Subject"），為日期範圍 {since} 至 {until} 總結生成一份簡潔的工作日報。

要求：
1.  使用 Markdown 格式。
2.  按日期**總結**當天完成的主要工作，**不要**羅列單個 commit message。
3.  忽略所有 "Merge branch" 或 "Merge remote-tracking branch" 相關的提交。
4.  報告標題或開頭應明確指出報告的時間範圍是 {since} 到 {until}。
5.  語言為繁體中文。

Commit 記錄:
{commits}

請生成日報內容："#
        ),
        Language::En => format!(
            r#"Please summarize the following Git commit records (formatted as "- YYYY-MM-DD -- Commit Subject") into a concise work report for the period {since} to {until}.

Requirements:
1.  Use Markdown format.
2.  Summarize the main work completed **per day**. **Do not** list individual commit messages.
3.  Ignore any commits related to "Merge branch" or "Merge remote-tracking branch".
4.  The report title or beginning should clearly state the reporting period is from {since} to {until}.
5.  The language should be English.

Commit Records:
{commits}

Please generate the report content:"#
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::CommitRecord;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn commit_info() -> CommitInfo {
        CommitInfo {
            files_changed: vec!["src/main.rs".into(), "README.md".into()],
            diff: "diff --git a/src/main.rs b/src/main.rs\n+fn main() {}".into(),
            branch: "feature/login".into(),
        }
    }

    fn report_info() -> ReportInfo {
        ReportInfo {
            author: "dev@example.com".into(),
            since: NaiveDate::from_ymd_opt(2024, 5, 6),
            until: NaiveDate::from_ymd_opt(2024, 5, 12).unwrap(),
            commits: vec![
                CommitRecord {
                    date: "2024-05-06".into(),
                    subject: "feat: add login".into(),
                },
                CommitRecord {
                    date: "2024-05-07".into(),
                    subject: "fix: session leak".into(),
                },
            ],
        }
    }

    // === commit types ===

    #[test]
    fn test_commit_types_same_order_in_every_language() {
        let names = |lang| commit_types(lang).iter().map(|t| t.name).collect::<Vec<_>>();
        let en = names(Language::En);
        assert_eq!(
            en,
            vec!["feat", "fix", "refactor", "docs", "style", "test", "chore"]
        );
        assert_eq!(names(Language::ZhCn), en);
        assert_eq!(names(Language::ZhTw), en);
        assert_eq!(commit_types(Language::ZhCn)[1].description, "修复缺陷");
        assert_eq!(commit_types(Language::ZhTw)[1].description, "修復缺陷");
    }

    // === system prompt ===

    #[test]
    fn test_system_prompt_lists_types() {
        let prompt = build_commit_system_prompt(Language::En);
        assert!(prompt.contains("- feat: New feature\n"));
        assert!(prompt.contains("- chore: Maintenance tasks, dependencies, build changes\n"));
        assert!(prompt.contains("50 chars or less"));
        assert!(!prompt.contains("Fixes #"));
    }

    #[test]
    fn test_system_prompt_localized() {
        let zh = build_commit_system_prompt(Language::ZhCn);
        assert!(zh.contains("- feat: 新功能\n"));
        assert!(zh.contains("不超过50个字符"));

        let tw = build_commit_system_prompt(Language::ZhTw);
        assert!(tw.contains("- refactor: 代碼重構\n"));
    }

    // === user prompt ===

    #[test]
    fn test_user_prompt_en() {
        let prompt = build_commit_user_prompt(&commit_info(), Language::En);
        assert!(prompt.starts_with("Please generate a standardized commit message"));
        assert!(prompt.contains("Branch: feature/login\n"));
        assert!(prompt.contains("Files changed:\n- src/main.rs\n- README.md\n\nChanges:\n"));
        assert!(prompt.contains("+fn main() {}"));
    }

    #[test]
    fn test_user_prompt_zh() {
        let prompt = build_commit_user_prompt(&commit_info(), Language::ZhCn);
        assert!(prompt.contains("分支：feature/login"));
        assert!(prompt.contains("更改的文件：\n- src/main.rs\n"));
        assert!(prompt.contains("更改内容：\n"));

        let tw = build_commit_user_prompt(&commit_info(), Language::ZhTw);
        assert!(tw.contains("更改內容：\n"));
    }

    // === report prompt ===

    #[test]
    fn test_report_prompt_en() {
        let prompt = build_report_prompt(&report_info(), Language::En);
        assert!(prompt.contains("for the period 2024-05-06 to 2024-05-12."));
        assert!(prompt.contains("reporting period is from 2024-05-06 to 2024-05-12."));
        assert!(prompt.contains(
            "Commit Records:\n- 2024-05-06 -- feat: add login\n- 2024-05-07 -- fix: session leak\n\n"
        ));
        assert!(prompt.ends_with("Please generate the report content:"));
    }

    #[test]
    fn test_report_prompt_zh() {
        let prompt = build_report_prompt(&report_info(), Language::ZhCn);
        assert!(prompt.contains("为日期范围 2024-05-06 至 2024-05-12"));
        assert!(prompt.contains("语言为简体中文"));

        let tw = build_report_prompt(&report_info(), Language::ZhTw);
        assert!(tw.contains("語言為繁體中文"));
    }

    #[test]
    fn test_report_prompt_without_commits() {
        let mut info = report_info();
        info.commits.clear();
        let prompt = build_report_prompt(&info, Language::En);
        assert!(prompt.contains("Commit Records:\n\n\nPlease generate"));
    }

    #[test]
    fn test_report_prompt_open_start() {
        let mut info = report_info();
        info.since = None;
        let prompt = build_report_prompt(&info, Language::En);
        assert!(prompt.contains("for the period the first commit to 2024-05-12."));

        let zh = build_report_prompt(&info, Language::ZhCn);
        assert!(zh.contains("为日期范围 最早的提交 至 2024-05-12"));
    }
}
