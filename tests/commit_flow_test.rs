//! commit / report 流程集成测试
//!
//! 使用 `run_with_deps()` 注入 git 与 provider：
//! - yes 模式直接提交第一次生成的消息
//! - 无变更 / 无暂存 / LLM 失败的错误处理
//! - 真实临时仓库上的完整 commit 流程
//! - report 流程
//!
//! 交互菜单部分需要终端，由各模块的单元测试覆盖。

use aicommit::commands::{CommitOptions, ReportOptions, commit, report};
use aicommit::config::{AppConfig, Language};
use aicommit::error::{AicommitError, Result};
use aicommit::git::{ChangedFiles, CommitRecord, MockGitOperations, repository::GitRepository};
use aicommit::llm::{LLMProvider, ProgressReporter};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// === Fake provider ===

struct FakeProvider {
    reply: Result<String>,
    prompts: Mutex<Vec<(Option<String>, String)>>,
}

impl FakeProvider {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(AicommitError::LlmApi {
                status: 500,
                message: "upstream down".into(),
            }),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMProvider for FakeProvider {
    async fn send_prompt(
        &self,
        system_prompt: Option<&str>,
        user_prompt: &str,
        _max_tokens: u32,
        _progress: Option<&dyn ProgressReporter>,
    ) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.map(str::to_string), user_prompt.to_string()));
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(AicommitError::LlmApi { status, message }) => Err(AicommitError::LlmApi {
                status: *status,
                message: message.clone(),
            }),
            Err(other) => Err(AicommitError::Other(other.to_string())),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

fn plain_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.ui.colored = false;
    config
}

fn yes_options() -> CommitOptions {
    CommitOptions {
        yes: true,
        ..Default::default()
    }
}

fn staged_repo_mock() -> MockGitOperations {
    let mut repo = MockGitOperations::new();
    repo.expect_changed_files().returning(|| {
        Ok(ChangedFiles {
            staged: vec!["src/lib.rs".into()],
            modified: vec![],
            untracked: vec!["notes.txt".into()],
        })
    });
    repo.expect_staged_files()
        .returning(|| Ok(vec!["src/lib.rs".into()]));
    repo.expect_staged_diff().returning(|| {
        Ok("diff --git a/src/lib.rs b/src/lib.rs\n--- a/src/lib.rs\n+++ b/src/lib.rs\n+pub fn add() {}\n".into())
    });
    repo.expect_current_branch()
        .returning(|| Ok("feature/add".into()));
    repo
}

// === commit: yes 模式 ===

#[tokio::test]
async fn test_yes_mode_commits_generated_message() {
    let mut repo = staged_repo_mock();
    repo.expect_commit()
        .withf(|m| m == "feat(lib): add helper\n\n- add `add`")
        .times(1)
        .returning(|_| Ok(()));
    repo.expect_stage_all().never();

    let fake = FakeProvider::replying("```\nfeat(lib): add helper\n\n- add `add`\n```");
    let provider: Arc<dyn LLMProvider> = fake.clone();

    commit::run_with_deps(&yes_options(), &plain_config(), &repo, &provider)
        .await
        .unwrap();

    assert_eq!(fake.calls(), 1);
    let prompts = fake.prompts.lock().unwrap();
    assert!(prompts[0].0.is_some());
    assert!(prompts[0].1.contains("Branch: feature/add"));
    assert!(prompts[0].1.contains("- src/lib.rs"));
}

#[tokio::test]
async fn test_yes_mode_respects_language_override() {
    let mut repo = staged_repo_mock();
    repo.expect_commit().times(1).returning(|_| Ok(()));

    let fake = FakeProvider::replying("feat: 新增辅助函数");
    let provider: Arc<dyn LLMProvider> = fake.clone();
    let options = CommitOptions {
        yes: true,
        language: Some(Language::ZhCn),
        ..Default::default()
    };

    commit::run_with_deps(&options, &plain_config(), &repo, &provider)
        .await
        .unwrap();

    let prompts = fake.prompts.lock().unwrap();
    assert!(prompts[0].1.contains("分支：feature/add"));
}

#[tokio::test]
async fn test_no_changes_error() {
    let mut repo = MockGitOperations::new();
    repo.expect_changed_files()
        .returning(|| Ok(ChangedFiles::default()));
    repo.expect_commit().never();

    let fake = FakeProvider::replying("unused");
    let provider: Arc<dyn LLMProvider> = fake.clone();

    let err = commit::run_with_deps(&yes_options(), &plain_config(), &repo, &provider)
        .await
        .unwrap_err();
    assert!(matches!(err, AicommitError::NoChanges));
    assert_eq!(fake.calls(), 0);
}

#[tokio::test]
async fn test_yes_mode_requires_staged_changes() {
    let mut repo = MockGitOperations::new();
    repo.expect_changed_files().returning(|| {
        Ok(ChangedFiles {
            staged: vec![],
            modified: vec!["a.rs".into()],
            untracked: vec![],
        })
    });
    repo.expect_stage_all().never();
    repo.expect_commit().never();

    let provider: Arc<dyn LLMProvider> = FakeProvider::replying("unused");
    let err = commit::run_with_deps(&yes_options(), &plain_config(), &repo, &provider)
        .await
        .unwrap_err();
    assert!(matches!(err, AicommitError::NoStagedChanges));
}

#[tokio::test]
async fn test_llm_failure_does_not_commit() {
    let mut repo = staged_repo_mock();
    repo.expect_commit().never();

    let provider: Arc<dyn LLMProvider> = FakeProvider::failing();
    let err = commit::run_with_deps(&yes_options(), &plain_config(), &repo, &provider)
        .await
        .unwrap_err();
    assert!(matches!(err, AicommitError::LlmApi { status: 500, .. }));
}

#[tokio::test]
async fn test_large_diff_is_truncated_before_prompt() {
    let mut repo = MockGitOperations::new();
    repo.expect_changed_files().returning(|| {
        Ok(ChangedFiles {
            staged: vec!["a.rs".into(), "b.rs".into()],
            ..Default::default()
        })
    });
    repo.expect_staged_files()
        .returning(|| Ok(vec!["a.rs".into(), "b.rs".into()]));
    repo.expect_staged_diff().returning(|| {
        let a = format!("diff --git a/a.rs b/a.rs\n{}", "+a\n".repeat(10));
        let b = format!("diff --git a/b.rs b/b.rs\n{}", "+b\n".repeat(200));
        Ok(format!("{a}{b}"))
    });
    repo.expect_current_branch().returning(|| Ok("main".into()));
    repo.expect_commit().times(1).returning(|_| Ok(()));

    let fake = FakeProvider::replying("chore: trim");
    let provider: Arc<dyn LLMProvider> = fake.clone();
    let mut config = plain_config();
    config.max_diff_size = 100;

    commit::run_with_deps(&yes_options(), &config, &repo, &provider)
        .await
        .unwrap();

    let prompts = fake.prompts.lock().unwrap();
    assert!(prompts[0].1.contains("diff --git a/a.rs"));
    assert!(!prompts[0].1.contains("diff --git a/b.rs"));
    assert!(prompts[0].1.contains("[truncated]"));
}

// === commit: 真实仓库 ===

#[tokio::test]
async fn test_yes_mode_on_real_repository() {
    let dir = TempDir::new().unwrap();
    let mut opts = git2::RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = git2::Repository::init_opts(dir.path(), &opts).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        config.set_bool("commit.gpgsign", false).unwrap();
    }
    std::fs::write(dir.path().join("hello.txt"), "hello\n").unwrap();
    {
        let mut index = repo.index().unwrap();
        index.add_path(std::path::Path::new("hello.txt")).unwrap();
        index.write().unwrap();
    }

    let git = GitRepository::open(Some(dir.path())).unwrap();
    let fake = FakeProvider::replying("docs: add greeting\n\n- add hello.txt");
    let provider: Arc<dyn LLMProvider> = fake.clone();

    commit::run_with_deps(&yes_options(), &plain_config(), &git, &provider)
        .await
        .unwrap();

    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(
        head.message().unwrap().trim_end(),
        "docs: add greeting\n\n- add hello.txt"
    );
    assert!(fake.prompts.lock().unwrap()[0].1.contains("+hello"));
}

// === report ===

#[tokio::test]
async fn test_report_flow_with_explicit_range() {
    let mut repo = MockGitOperations::new();
    repo.expect_user_email().never();
    repo.expect_commits_between()
        .withf(|author, since, until| {
            author == "dev@example.com"
                && since == "2024-05-01 00:00:00"
                && until == "2024-05-03 23:59:59"
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(vec![
                CommitRecord {
                    date: "2024-05-02".into(),
                    subject: "feat: add report".into(),
                },
                CommitRecord {
                    date: "2024-05-01".into(),
                    subject: "fix: date range".into(),
                },
            ])
        });

    let fake = FakeProvider::replying("## 本周工作\n\n- 完成周报功能");
    let provider: Arc<dyn LLMProvider> = fake.clone();
    let options = ReportOptions {
        since: Some("2024-05-01".into()),
        until: Some("2024-05-03".into()),
        author: Some("dev@example.com".into()),
        language: Some(Language::ZhCn),
        ..Default::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();

    report::run_with_deps(&options, &plain_config(), &repo, &provider, today)
        .await
        .unwrap();

    let prompts = fake.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].0.is_none());
    assert!(prompts[0].1.contains("2024-05-01 至 2024-05-03"));
    assert!(prompts[0].1.contains("- 2024-05-02 -- feat: add report\n- 2024-05-01 -- fix: date range"));
}

#[tokio::test]
async fn test_report_llm_error_propagates() {
    let mut repo = MockGitOperations::new();
    repo.expect_user_email()
        .returning(|| Ok(Some("dev@example.com".into())));
    repo.expect_commits_between().returning(|_, _, _| {
        Ok(vec![CommitRecord {
            date: "2024-05-14".into(),
            subject: "feat: x".into(),
        }])
    });

    let provider: Arc<dyn LLMProvider> = FakeProvider::failing();
    let options = ReportOptions {
        this_week: true,
        ..Default::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();

    let err = report::run_with_deps(&options, &plain_config(), &repo, &provider, today)
        .await
        .unwrap_err();
    assert!(matches!(err, AicommitError::LlmApi { .. }));
}
