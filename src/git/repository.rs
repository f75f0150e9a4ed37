use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::constants::report::MERGE_SUBJECT_PREFIXES;
use crate::error::{AicommitError, Result};
use crate::git::{ChangedFiles, CommitRecord, GitOperations};

/// 通过 `git` 可执行文件操作仓库
///
/// 除 `stage_all` 外的命令都以仓库根目录为工作目录执行，
/// 因此 `git diff --name-only` 等输出的路径可以直接传回给 `git add`。
/// `stage_all` 在打开仓库时的目录执行 `git add .`，只暂存该目录下的变更。
pub struct GitRepository {
    git: PathBuf,
    root: PathBuf,
    workdir: PathBuf,
}

impl GitRepository {
    /// 打开 `path`（默认当前目录）所在的 git 仓库
    ///
    /// # 错误
    /// - [`AicommitError::GitNotFound`] - PATH 中没有 git
    /// - [`AicommitError::NotARepository`] - 不在 git 仓库中
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let git = which::which("git").map_err(|_| AicommitError::GitNotFound)?;
        let start = match path {
            Some(p) => p.to_path_buf(),
            None => std::env::current_dir()?,
        };

        let output = Command::new(&git)
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(&start)
            .output()?;

        if !output.status.success() {
            tracing::debug!(
                "git rev-parse failed in {}: {}",
                start.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(AicommitError::NotARepository);
        }

        let root = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        tracing::debug!("Opened git repository at {}", root.display());

        Ok(Self {
            git,
            root,
            workdir: start,
        })
    }

    /// 仓库根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 执行 git 命令并返回原始输出（不检查退出码）
    fn output<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.output_in(&self.root, args)
    }

    fn output_in<I, S>(&self, dir: &Path, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.git);
        command.args(args).current_dir(dir);
        tracing::debug!("Running {:?}", command);
        Ok(command.output()?)
    }

    /// 执行 git 命令，非零退出码转换为 [`AicommitError::GitCommand`]
    fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(AicommitError::GitCommand(failure_message(&output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// 执行命令，成功且输出非空时返回去掉空白的 stdout
    fn try_trimmed(&self, args: &[&str]) -> Result<Option<String>> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!text.is_empty()).then_some(text))
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        if let Some(value) = self.try_trimmed(&["config", key])? {
            return Ok(Some(value));
        }
        self.try_trimmed(&["config", "--global", key])
    }
}

/// 提取 git 失败时的错误信息（部分错误输出到 stdout）
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr.trim().to_string()
    }
}

/// 还原 git 对特殊路径的 C 风格转义
///
/// `core.quotePath` 开启时，git 会把非 ASCII 或含控制字符的路径输出为
/// `"\346\226\207\344\273\266.txt"` 这样的形式。
pub fn unquote_git_path(path: &str) -> String {
    let Some(inner) = path
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return path.to_string();
    };

    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 >= bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let next = bytes[i + 1];
        let simple = match next {
            b'n' => Some(b'\n'),
            b't' => Some(b'\t'),
            b'r' => Some(b'\r'),
            b'a' => Some(0x07),
            b'b' => Some(0x08),
            b'f' => Some(0x0c),
            b'v' => Some(0x0b),
            b'\\' => Some(b'\\'),
            b'"' => Some(b'"'),
            _ => None,
        };

        if let Some(byte) = simple {
            out.push(byte);
            i += 2;
            continue;
        }

        let octal = bytes.get(i + 1..i + 4).filter(|digits| {
            digits.len() == 3 && digits.iter().all(|d| (b'0'..=b'7').contains(d))
        });
        match octal {
            Some(digits) => {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                out.push((value & 0xff) as u8);
                i += 4;
            }
            None => {
                out.push(b'\\');
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// 解析 `--name-only` 风格的输出：去空行、还原转义、按出现顺序去重
pub fn parse_path_list(output: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(unquote_git_path)
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// 解析 `git log --pretty=format:"%cs -- %s"` 的输出，并过滤 merge commit
///
/// 没有 ` -- ` 分隔符的行保留为日期为空、subject 为整行的记录。
pub fn parse_commit_log(output: &str) -> Vec<CommitRecord> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(" -- ") {
            Some((date, subject)) => CommitRecord {
                date: date.trim().to_string(),
                subject: subject.trim().to_string(),
            },
            None => CommitRecord {
                date: String::new(),
                subject: line.to_string(),
            },
        })
        .filter(|record| {
            !MERGE_SUBJECT_PREFIXES
                .iter()
                .any(|prefix| record.subject.starts_with(prefix))
        })
        .collect()
}

impl GitOperations for GitRepository {
    fn staged_files(&self) -> Result<Vec<String>> {
        let output = self.run(["diff", "--cached", "--name-only"])?;
        Ok(parse_path_list(&output))
    }

    fn modified_files(&self) -> Result<Vec<String>> {
        let output = self.run(["diff", "--name-only"])?;
        Ok(parse_path_list(&output))
    }

    fn untracked_files(&self) -> Result<Vec<String>> {
        let output = self.run(["ls-files", "--others", "--exclude-standard"])?;
        Ok(parse_path_list(&output))
    }

    fn changed_files(&self) -> Result<ChangedFiles> {
        Ok(ChangedFiles {
            staged: self.staged_files()?,
            modified: self.modified_files()?,
            untracked: self.untracked_files()?,
        })
    }

    fn staged_diff(&self) -> Result<String> {
        self.run(["diff", "--no-color", "--cached"])
    }

    fn unstaged_diff(&self) -> Result<String> {
        self.run(["diff", "--no-color"])
    }

    fn diff_for_files(&self, files: &[String], staged: bool) -> Result<String> {
        let mut args: Vec<&str> = vec!["diff", "--no-color"];
        if staged {
            args.push("--cached");
        }
        args.push("--");
        args.extend(files.iter().map(String::as_str));
        self.run(args)
    }

    fn current_branch(&self) -> Result<String> {
        let abbrev = self.try_trimmed(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        if let Some(branch) = abbrev.as_deref().filter(|b| *b != "HEAD") {
            return Ok(branch.to_string());
        }

        if let Some(branch) = self.try_trimmed(&["symbolic-ref", "--short", "HEAD"])? {
            return Ok(branch);
        }

        // detached HEAD
        if abbrev.is_some() {
            return Ok("HEAD".to_string());
        }

        Ok("main".to_string())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run(["commit", "-m", message])?;
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        let output = self.output_in(&self.workdir, ["add", "."])?;
        if !output.status.success() {
            return Err(AicommitError::GitCommand(failure_message(&output)));
        }
        Ok(())
    }

    fn stage_files(&self, files: &[String]) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        let mut args: Vec<&str> = vec!["add", "--"];
        args.extend(files.iter().map(String::as_str));
        self.run(args)?;
        Ok(())
    }

    fn unstage_files(&self, files: &[String]) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        // 没有 HEAD 时 reset 无法使用，改为直接从 index 移除
        let mut args: Vec<&str> = if self.has_commits()? {
            vec!["reset", "-q", "--"]
        } else {
            vec!["rm", "--cached", "-r", "-q", "--"]
        };
        args.extend(files.iter().map(String::as_str));
        self.run(args)?;
        Ok(())
    }

    fn user_email(&self) -> Result<Option<String>> {
        self.config_value("user.email")
    }

    fn user_name(&self) -> Result<Option<String>> {
        self.config_value("user.name")
    }

    fn commits_between(
        &self,
        author: &str,
        since: &str,
        until: &str,
    ) -> Result<Vec<CommitRecord>> {
        let mut args = vec![
            "log".to_string(),
            format!("--author={}", author),
            "--pretty=format:%cs -- %s".to_string(),
            "--date=short".to_string(),
        ];
        if !since.is_empty() {
            args.push(format!("--since={}", since));
        }
        args.push(format!("--until={}", until));
        let output = self.output(args)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            // 空仓库（没有任何 commit）时 git log 会失败且无输出
            if stdout.trim().is_empty() {
                tracing::debug!("git log failed without output: {}", failure_message(&output));
                return Ok(Vec::new());
            }
            return Err(AicommitError::GitCommand(failure_message(&output)));
        }

        Ok(parse_commit_log(&stdout))
    }

    fn has_commits(&self) -> Result<bool> {
        let output = self.output(["rev-parse", "--verify", "-q", "HEAD"])?;
        Ok(output.status.success())
    }
}
