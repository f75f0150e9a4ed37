pub mod diff;
pub mod repository;

use std::fmt;

use crate::error::Result;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// 一条用于生成周报的 commit 记录
///
/// 来自 `git log --pretty=format:"%cs -- %s"`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// 提交日期（YYYY-MM-DD）
    pub date: String,
    /// Commit 标题
    pub subject: String,
}

impl fmt::Display for CommitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.date.is_empty() {
            // 无法解析的 git log 行原样输出
            return f.write_str(&self.subject);
        }
        write!(f, "{} -- {}", self.date, self.subject)
    }
}

/// 工作区的三类变更文件
///
/// 每个列表都已去重，顺序与 git 输出一致。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFiles {
    pub staged: Vec<String>,
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
}

impl ChangedFiles {
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty() && self.modified.is_empty() && self.untracked.is_empty()
    }

    pub fn has_staged(&self) -> bool {
        !self.staged.is_empty()
    }

    /// 工作区有修改或未跟踪的文件
    pub fn has_unstaged(&self) -> bool {
        !self.modified.is_empty() || !self.untracked.is_empty()
    }
}

/// Git 操作的统一接口
///
/// 该 trait 抽象了所有 Git 仓库操作，便于测试和扩展。
/// 主要实现：[`GitRepository`](repository::GitRepository)，通过调用 `git` 可执行文件实现。
///
/// # 示例
/// ```no_run
/// use aicommit::git::{GitOperations, repository::GitRepository};
///
/// # fn main() -> anyhow::Result<()> {
/// let repo = GitRepository::open(None)?;
/// let diff = repo.staged_diff()?;
/// println!("Staged changes:\n{}", diff);
/// # Ok(())
/// # }
/// ```
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait GitOperations {
    /// 已暂存的文件（`git diff --cached --name-only`）
    fn staged_files(&self) -> Result<Vec<String>>;

    /// 已修改但未暂存的文件（`git diff --name-only`）
    fn modified_files(&self) -> Result<Vec<String>>;

    /// 未跟踪的文件（`git ls-files --others --exclude-standard`）
    fn untracked_files(&self) -> Result<Vec<String>>;

    /// 一次性获取三类变更文件
    fn changed_files(&self) -> Result<ChangedFiles>;

    /// 获取 staged changes 的 diff
    ///
    /// # 返回
    /// - `Ok(diff)` - diff 内容（可能为空字符串）
    /// - `Err(_)` - git 命令失败
    fn staged_diff(&self) -> Result<String>;

    /// 获取未暂存部分的 diff（`git diff`）
    fn unstaged_diff(&self) -> Result<String>;

    /// 获取指定文件的 diff
    ///
    /// # 参数
    /// - `files`: 相对仓库根目录的路径
    /// - `staged`: `true` 时加上 `--cached`
    fn diff_for_files(&self, files: &[String], staged: bool) -> Result<String>;

    /// 获取当前分支名
    ///
    /// 依次尝试 `rev-parse --abbrev-ref HEAD`、`symbolic-ref --short HEAD`，
    /// 都失败时返回 `"main"`。
    fn current_branch(&self) -> Result<String>;

    /// 执行 git commit
    ///
    /// 使用 git CLI 提交，会触发 hooks 并遵循 git config（含 GPG 签名）。
    ///
    /// # 错误
    /// - [`AicommitError::GitCommand`] - 无 staged changes、hook 失败等
    ///
    /// [`AicommitError::GitCommand`]: crate::error::AicommitError::GitCommand
    fn commit(&self, message: &str) -> Result<()>;

    /// 暂存所有变更（`git add .`）
    fn stage_all(&self) -> Result<()>;

    /// 暂存指定文件
    fn stage_files(&self, files: &[String]) -> Result<()>;

    /// 取消暂存指定文件
    fn unstage_files(&self, files: &[String]) -> Result<()>;

    /// `user.email`，本地配置优先，其次全局配置
    fn user_email(&self) -> Result<Option<String>>;

    /// `user.name`，本地配置优先，其次全局配置
    fn user_name(&self) -> Result<Option<String>>;

    /// 获取某作者在时间范围内的 commit（已过滤 merge commit）
    ///
    /// # 参数
    /// - `author`: `--author` 过滤值（通常是邮箱）
    /// - `since` / `until`: 传给 `--since` / `--until` 的时间，`since` 为空时不限制起点
    ///
    /// # 注意
    /// - 空仓库返回空列表
    fn commits_between(&self, author: &str, since: &str, until: &str)
    -> Result<Vec<CommitRecord>>;

    /// 仓库是否已有提交
    fn has_commits(&self) -> Result<bool>;
}

/// Diff 统计信息
///
/// # 示例
/// ```
/// use aicommit::git::DiffStats;
///
/// let stats = DiffStats {
///     files_changed: vec!["src/main.rs".to_string(), "README.md".to_string()],
///     insertions: 42,
///     deletions: 13,
/// };
/// assert_eq!(stats.files_changed.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub files_changed: Vec<String>,
    pub insertions: usize,
    pub deletions: usize,
}
