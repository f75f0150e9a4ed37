use std::sync::Arc;

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::commands::options::ReportOptions;
use crate::config::AppConfig;
use crate::constants::report::DATE_FORMAT;
use crate::error::{AicommitError, Result};
use crate::git::{GitOperations, repository::GitRepository};
use crate::llm::provider::create_provider;
use crate::llm::{LLMProvider, ReportInfo};
use crate::ui;

/// Inclusive report range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// `None`：只给了 `--until`，不限制起点
    pub since: Option<NaiveDate>,
    pub until: NaiveDate,
    /// 未指定任何范围参数，使用了本周
    pub defaulted: bool,
}

/// 周一
fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

fn week_of(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = week_start(day);
    (start, start + Duration::days(6))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        AicommitError::InvalidInput(rust_i18n::t!("report.invalid_date", value = value).to_string())
    })
}

/// Resolves the report range relative to `today`.
///
/// Weeks run Monday to Sunday. `--since` alone runs to `today`, `--until`
/// alone leaves the start open (all history up to that day), and no flags
/// select the current week.
pub fn resolve_date_range(today: NaiveDate, options: &ReportOptions) -> Result<DateRange> {
    let (since, until, defaulted) = if options.this_week {
        let (since, until) = week_of(today);
        (Some(since), until, false)
    } else if options.last_week {
        let (since, until) = week_of(today - Duration::days(7));
        (Some(since), until, false)
    } else {
        match (&options.since, &options.until) {
            (Some(since), Some(until)) => (Some(parse_date(since)?), parse_date(until)?, false),
            (Some(since), None) => (Some(parse_date(since)?), today, false),
            (None, Some(until)) => (None, parse_date(until)?, false),
            (None, None) => {
                let (since, until) = week_of(today);
                (Some(since), until, true)
            }
        }
    };

    if let Some(since) = since.filter(|since| until < *since) {
        return Err(AicommitError::InvalidInput(
            rust_i18n::t!(
                "report.range_reversed",
                since = since.to_string(),
                until = until.to_string()
            )
            .to_string(),
        ));
    }

    Ok(DateRange {
        since,
        until,
        defaulted,
    })
}

/// `aicommit report` 入口
pub async fn run(options: &ReportOptions, config: &AppConfig) -> Result<()> {
    let repo = GitRepository::open(None)?;
    let provider = create_provider(config, options.provider)?;
    run_with_deps(options, config, &repo, &provider, Local::now().date_naive()).await
}

/// Report flow against injected git and provider implementations.
pub async fn run_with_deps(
    options: &ReportOptions,
    config: &AppConfig,
    repo: &dyn GitOperations,
    provider: &Arc<dyn LLMProvider>,
    today: NaiveDate,
) -> Result<()> {
    let colored = config.ui.colored;
    let language = options.language.unwrap_or(config.language);
    let range = resolve_date_range(today, options)?;

    if let Some(since) = range.since.filter(|_| range.defaulted) {
        println!(
            "{}",
            ui::info(
                &rust_i18n::t!(
                    "report.default_range",
                    since = since.to_string(),
                    until = range.until.to_string()
                ),
                colored
            )
        );
    }

    let author = match options.author.clone().filter(|a| !a.trim().is_empty()) {
        Some(author) => author,
        None => repo.user_email()?.ok_or_else(|| {
            AicommitError::InvalidInput(rust_i18n::t!("report.no_author").to_string())
        })?,
    };

    // git log 的 --until 按时间点比较，补全到当天结束；空 since 表示不传 --since
    let since = range
        .since
        .map(|day| format!("{} 00:00:00", day))
        .unwrap_or_default();
    let until = format!("{} 23:59:59", range.until);
    let commits = repo.commits_between(&author, &since, &until)?;
    tracing::debug!(
        "Found {} commits for {} between {} and {}",
        commits.len(),
        author,
        since,
        until
    );

    if commits.is_empty() {
        let message = match range.since {
            Some(since) => rust_i18n::t!(
                "report.no_commits",
                author = author.as_str(),
                since = since.to_string(),
                until = range.until.to_string()
            ),
            None => rust_i18n::t!(
                "report.no_commits_until",
                author = author.as_str(),
                until = range.until.to_string()
            ),
        };
        println!("{}", ui::info(&message, colored));
        return Ok(());
    }

    ui::step(
        "1/2",
        &rust_i18n::t!("report.collected", count = commits.len()),
        colored,
    );

    let info = ReportInfo {
        author,
        since: range.since,
        until: range.until,
        commits,
    };

    ui::step(
        "2/2",
        &rust_i18n::t!(
            "report.generating",
            provider = provider.name(),
            model = provider.model()
        ),
        colored,
    );
    let spinner = ui::Spinner::new(&rust_i18n::t!("commit.waiting_for_model"));
    let report = provider.generate_report(&info, language, Some(&spinner)).await;
    spinner.finish_and_clear();
    let report = report?;

    println!();
    println!("{}", ui::rule(colored));
    println!("{}", report);
    println!("{}", ui::rule(colored));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{CommitRecord, MockGitOperations};
    use crate::llm::ProgressReporter;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    // 2024-05-15 是周三
    fn wednesday() -> NaiveDate {
        date("2024-05-15")
    }

    // === resolve_date_range ===

    #[test]
    fn test_this_week() {
        let options = ReportOptions {
            this_week: true,
            ..Default::default()
        };
        let range = resolve_date_range(wednesday(), &options).unwrap();
        assert_eq!(range.since, Some(date("2024-05-13")));
        assert_eq!(range.until, date("2024-05-19"));
        assert!(!range.defaulted);
    }

    #[test]
    fn test_sunday_belongs_to_previous_monday() {
        let options = ReportOptions {
            this_week: true,
            ..Default::default()
        };
        let range = resolve_date_range(date("2024-05-19"), &options).unwrap();
        assert_eq!(range.since, Some(date("2024-05-13")));
    }

    #[test]
    fn test_last_week() {
        let options = ReportOptions {
            last_week: true,
            ..Default::default()
        };
        let range = resolve_date_range(wednesday(), &options).unwrap();
        assert_eq!(range.since, Some(date("2024-05-06")));
        assert_eq!(range.until, date("2024-05-12"));
    }

    #[test]
    fn test_no_flags_defaults_to_this_week() {
        let range = resolve_date_range(wednesday(), &ReportOptions::default()).unwrap();
        assert_eq!(range.since, Some(date("2024-05-13")));
        assert_eq!(range.until, date("2024-05-19"));
        assert!(range.defaulted);
    }

    #[test]
    fn test_since_only_runs_to_today() {
        let options = ReportOptions {
            since: Some("2024-05-01".into()),
            ..Default::default()
        };
        let range = resolve_date_range(wednesday(), &options).unwrap();
        assert_eq!(range.since, Some(date("2024-05-01")));
        assert_eq!(range.until, wednesday());
    }

    #[test]
    fn test_until_only_leaves_start_open() {
        let options = ReportOptions {
            until: Some("2024-05-09".into()),
            ..Default::default()
        };
        let range = resolve_date_range(wednesday(), &options).unwrap();
        assert_eq!(range.since, None);
        assert_eq!(range.until, date("2024-05-09"));
        assert!(!range.defaulted);
    }

    #[test]
    fn test_until_only_accepts_any_past_date() {
        let options = ReportOptions {
            until: Some("2001-01-01".into()),
            ..Default::default()
        };
        let range = resolve_date_range(wednesday(), &options).unwrap();
        assert_eq!(range.since, None);
        assert_eq!(range.until, date("2001-01-01"));
    }

    #[test]
    fn test_invalid_and_reversed_dates_rejected() {
        let bad = ReportOptions {
            since: Some("2024/05/01".into()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_date_range(wednesday(), &bad),
            Err(AicommitError::InvalidInput(_))
        ));

        let reversed = ReportOptions {
            since: Some("2024-05-10".into()),
            until: Some("2024-05-01".into()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_date_range(wednesday(), &reversed),
            Err(AicommitError::InvalidInput(_))
        ));
    }

    // === run_with_deps ===

    struct CannedProvider {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LLMProvider for CannedProvider {
        async fn send_prompt(
            &self,
            _system_prompt: Option<&str>,
            user_prompt: &str,
            _max_tokens: u32,
            _progress: Option<&dyn ProgressReporter>,
        ) -> Result<String> {
            self.prompts.lock().unwrap().push(user_prompt.to_string());
            Ok(self.reply.clone())
        }

        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            "canned-model"
        }
    }

    fn canned(reply: &str) -> Arc<CannedProvider> {
        Arc::new(CannedProvider {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn plain_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.ui.colored = false;
        config
    }

    #[tokio::test]
    async fn test_report_uses_git_email_and_full_days() {
        let mut repo = MockGitOperations::new();
        repo.expect_user_email()
            .returning(|| Ok(Some("dev@example.com".into())));
        repo.expect_commits_between()
            .withf(|author, since, until| {
                author == "dev@example.com"
                    && since == "2024-05-06 00:00:00"
                    && until == "2024-05-12 23:59:59"
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![CommitRecord {
                    date: "2024-05-07".into(),
                    subject: "feat: ship reports".into(),
                }])
            });

        let canned = canned("## Summary\n\n- shipped reports");
        let provider: Arc<dyn LLMProvider> = canned.clone();
        let options = ReportOptions {
            last_week: true,
            ..Default::default()
        };

        run_with_deps(&options, &plain_config(), &repo, &provider, wednesday())
            .await
            .unwrap();

        let prompts = canned.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- 2024-05-07 -- feat: ship reports"));
    }

    #[tokio::test]
    async fn test_report_without_commits_skips_model() {
        let mut repo = MockGitOperations::new();
        repo.expect_user_email().never();
        repo.expect_commits_between()
            .withf(|author, _, _| author == "other@example.com")
            .returning(|_, _, _| Ok(vec![]));

        let canned = canned("unused");
        let provider: Arc<dyn LLMProvider> = canned.clone();
        let options = ReportOptions {
            author: Some("other@example.com".into()),
            ..Default::default()
        };

        run_with_deps(&options, &plain_config(), &repo, &provider, wednesday())
            .await
            .unwrap();
        assert!(canned.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_until_only_omits_since() {
        let mut repo = MockGitOperations::new();
        repo.expect_commits_between()
            .withf(|author, since, until| {
                author == "dev@example.com" && since.is_empty() && until == "2024-05-09 23:59:59"
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![CommitRecord {
                    date: "2023-11-02".into(),
                    subject: "chore: initial import".into(),
                }])
            });

        let canned = canned("report");
        let provider: Arc<dyn LLMProvider> = canned.clone();
        let options = ReportOptions {
            until: Some("2024-05-09".into()),
            author: Some("dev@example.com".into()),
            ..Default::default()
        };

        run_with_deps(&options, &plain_config(), &repo, &provider, wednesday())
            .await
            .unwrap();

        let prompts = canned.prompts.lock().unwrap();
        assert!(prompts[0].contains("for the period the first commit to 2024-05-09."));
    }

    #[tokio::test]
    async fn test_report_requires_author() {
        let mut repo = MockGitOperations::new();
        repo.expect_user_email().returning(|| Ok(None));
        repo.expect_commits_between().never();

        let provider: Arc<dyn LLMProvider> = canned("unused");
        let err = run_with_deps(
            &ReportOptions::default(),
            &plain_config(),
            &repo,
            &provider,
            wednesday(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AicommitError::InvalidInput(_)));
    }
}
