use std::sync::Arc;

use colored::Colorize;

use crate::commands::commit_state_machine::{CommitState, GenerationResult, UserAction};
use crate::commands::options::CommitOptions;
use crate::config::{AppConfig, Language};
use crate::constants::commit::MAX_REGENERATIONS;
use crate::error::{AicommitError, Result};
use crate::git::diff::{parse_diff_stats, truncate_diff};
use crate::git::{ChangedFiles, GitOperations, repository::GitRepository};
use crate::llm::{CommitInfo, CommitMessage, LLMProvider, prompt, provider::create_provider};
use crate::ui::{self, ActionChoice, ActionOption, Selection};

/// 暂存菜单的选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StagingChoice {
    UseStaged,
    StageAll,
    SelectFiles,
    Quit,
}

/// 生成结果菜单的选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageChoice {
    Accept,
    Edit,
    Regenerate,
    Cancel,
}

/// Files to stage and unstage after a file selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingPlan {
    pub stage: Vec<String>,
    pub unstage: Vec<String>,
}

/// Diffs the chosen files against what is currently staged.
///
/// Chosen files that are not staged yet get staged; staged files that were
/// deselected get unstaged.
pub fn plan_staging(changes: &ChangedFiles, chosen: &[String]) -> StagingPlan {
    StagingPlan {
        stage: chosen
            .iter()
            .filter(|f| !changes.staged.contains(f))
            .cloned()
            .collect(),
        unstage: changes
            .staged
            .iter()
            .filter(|f| !chosen.contains(f))
            .cloned()
            .collect(),
    }
}

/// 执行 commit 流程
pub async fn run(options: &CommitOptions, config: &AppConfig) -> Result<()> {
    let repo = GitRepository::open(None)?;

    if let Some(message) = options.message.as_deref() {
        return commit_with_message(&repo, message, config.ui.colored);
    }

    let provider = create_provider(config, options.provider)?;
    run_with_deps(options, config, &repo, &provider).await
}

/// `-m`: commits the given message without calling a model.
///
/// # Errors
/// - [`AicommitError::InvalidInput`] - blank message
/// - [`AicommitError::NoStagedChanges`] - nothing staged
pub fn commit_with_message(repo: &dyn GitOperations, message: &str, colored: bool) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AicommitError::InvalidInput(
            rust_i18n::t!("commit.empty_message").to_string(),
        ));
    }

    let staged = repo.staged_files()?;
    if staged.is_empty() {
        return Err(AicommitError::NoStagedChanges);
    }

    println!("{}", ui::info(&rust_i18n::t!("commit.staged_files"), colored));
    for file in &staged {
        println!("  ✓ {}", file);
    }

    repo.commit(message)?;
    ui::success(&rust_i18n::t!("commit.committed"), colored);
    Ok(())
}

/// Commit flow against injected git and provider implementations.
///
/// With `options.yes` the staged changes are used as-is and the first
/// generated message is committed; otherwise the staging and message menus
/// need an interactive terminal.
pub async fn run_with_deps(
    options: &CommitOptions,
    config: &AppConfig,
    repo: &dyn GitOperations,
    provider: &Arc<dyn LLMProvider>,
) -> Result<()> {
    let colored = config.ui.colored;
    let language = options.effective_language(config);

    let changes = repo.changed_files()?;
    if changes.is_empty() {
        return Err(AicommitError::NoChanges);
    }

    if options.yes {
        if !changes.has_staged() {
            return Err(AicommitError::NoStagedChanges);
        }
    } else {
        prepare_staging(repo, &changes, colored)?;
    }

    let info = collect_commit_info(repo, config, colored)?;
    if options.verbose {
        print_prompts(&info, language, colored);
    }

    let mut state = CommitState::Generating { attempt: 0 };
    loop {
        state = match state {
            CommitState::Generating { .. } => {
                handle_generating(state, provider, &info, language, options.yes, colored).await?
            }
            CommitState::WaitingForAction { .. } => handle_waiting_for_action(state, colored)?,
            CommitState::Accepted { message } => {
                repo.commit(&message.to_string())?;
                println!();
                ui::success(&rust_i18n::t!("commit.committed"), colored);
                println!("  {}", message.title);
                return Ok(());
            }
            CommitState::Cancelled => return Err(AicommitError::UserCancelled),
        };
    }
}

/// 变更概览框中的行
fn change_lines(changes: &ChangedFiles, colored: bool) -> Vec<String> {
    ui::entries_from_changes(changes)
        .iter()
        .map(|entry| {
            format!(
                "{} {} ({})",
                entry.status.paint(entry.status.glyph(), colored),
                entry.name,
                entry.status.label()
            )
        })
        .collect()
}

/// 暂存菜单：只提供当前变更下可用的选项
fn staging_options(has_staged: bool, has_unstaged: bool) -> Vec<ActionOption<StagingChoice>> {
    let mut options = Vec::with_capacity(4);
    if has_staged {
        options.push(
            ActionOption::new(
                'u',
                rust_i18n::t!("commit.option_use_staged"),
                StagingChoice::UseStaged,
            )
            .default_if(true),
        );
    }
    if has_unstaged {
        options.push(
            ActionOption::new(
                'a',
                rust_i18n::t!("commit.option_stage_all"),
                StagingChoice::StageAll,
            )
            .default_if(!has_staged),
        );
        options.push(ActionOption::new(
            's',
            rust_i18n::t!("commit.option_select_files"),
            StagingChoice::SelectFiles,
        ));
    }
    options.push(ActionOption::new(
        'q',
        rust_i18n::t!("commit.option_quit"),
        StagingChoice::Quit,
    ));
    options
}

fn message_options() -> Vec<ActionOption<MessageChoice>> {
    vec![
        ActionOption::new('a', rust_i18n::t!("commit.option_accept"), MessageChoice::Accept)
            .default_if(true),
        ActionOption::new('e', rust_i18n::t!("commit.option_edit"), MessageChoice::Edit),
        ActionOption::new(
            'r',
            rust_i18n::t!("commit.option_regenerate"),
            MessageChoice::Regenerate,
        ),
        ActionOption::new('c', rust_i18n::t!("commit.option_cancel"), MessageChoice::Cancel),
    ]
}

/// 显示变更并让用户决定暂存哪些文件
fn prepare_staging(repo: &dyn GitOperations, changes: &ChangedFiles, colored: bool) -> Result<()> {
    ui::print_box(
        &rust_i18n::t!("commit.changes_title"),
        &change_lines(changes, colored),
    );

    let choice = ui::select_single_action(
        &rust_i18n::t!("commit.staging_title"),
        staging_options(changes.has_staged(), changes.has_unstaged()),
    )?;

    match choice {
        ActionChoice::Cancelled | ActionChoice::Selected(StagingChoice::Quit) => {
            Err(AicommitError::UserCancelled)
        }
        ActionChoice::Selected(StagingChoice::UseStaged) => Ok(()),
        ActionChoice::Selected(StagingChoice::StageAll) => {
            repo.stage_all()?;
            ui::success(&rust_i18n::t!("commit.staged_all"), colored);
            Ok(())
        }
        ActionChoice::Selected(StagingChoice::SelectFiles) => {
            match ui::select_files(ui::entries_from_changes(changes), colored)? {
                Selection::Cancelled => Err(AicommitError::UserCancelled),
                Selection::Chosen(chosen) if chosen.is_empty() => {
                    ui::warning(&rust_i18n::t!("commit.no_files_selected"), colored);
                    Err(AicommitError::UserCancelled)
                }
                Selection::Chosen(chosen) => {
                    let plan = plan_staging(changes, &chosen);
                    tracing::debug!(
                        "Staging {} file(s), unstaging {} file(s)",
                        plan.stage.len(),
                        plan.unstage.len()
                    );
                    if !plan.stage.is_empty() {
                        repo.stage_files(&plan.stage)?;
                    }
                    if !plan.unstage.is_empty() {
                        repo.unstage_files(&plan.unstage)?;
                    }
                    ui::success(
                        &rust_i18n::t!("commit.staged_selected", count = chosen.len()),
                        colored,
                    );
                    Ok(())
                }
            }
        }
    }
}

/// 读取 staged diff、截断并组装 CommitInfo
fn collect_commit_info(
    repo: &dyn GitOperations,
    config: &AppConfig,
    colored: bool,
) -> Result<CommitInfo> {
    let diff = repo.staged_diff()?;
    if diff.trim().is_empty() {
        return Err(AicommitError::NoStagedChanges);
    }

    let stats = parse_diff_stats(&diff);
    ui::step(
        "1/3",
        &rust_i18n::t!(
            "commit.analyzed",
            stats = ui::format_diff_stats(&stats, colored)
        ),
        colored,
    );

    let truncated = truncate_diff(&diff, config.max_diff_size);
    if truncated.len() != diff.len() {
        ui::warning(
            &rust_i18n::t!(
                "commit.diff_truncated",
                size = diff.len(),
                limit = config.max_diff_size
            ),
            colored,
        );
    }

    Ok(CommitInfo {
        files_changed: repo.staged_files()?,
        diff: truncated,
        branch: repo.current_branch()?,
    })
}

async fn handle_generating(
    state: CommitState,
    provider: &Arc<dyn LLMProvider>,
    info: &CommitInfo,
    language: Language,
    auto_accept: bool,
    colored: bool,
) -> Result<CommitState> {
    if state.is_at_max_regenerations(MAX_REGENERATIONS) {
        ui::warning(
            &rust_i18n::t!("commit.max_regenerations", limit = MAX_REGENERATIONS),
            colored,
        );
        return state.handle_generation(GenerationResult::MaxRegenerationsExceeded, auto_accept);
    }

    let attempt = match state {
        CommitState::Generating { attempt } => attempt,
        _ => 0,
    };

    ui::step("2/3", &format_generating_step(attempt, provider.as_ref()), colored);
    let spinner = ui::Spinner::new(&rust_i18n::t!("commit.waiting_for_model"));
    let result = provider
        .generate_commit_message(info, language, Some(&spinner))
        .await;
    spinner.finish_and_clear();
    let message = result?;

    if auto_accept {
        display_message(&message, attempt, colored);
    }
    let next = state.handle_generation(GenerationResult::Success(message), auto_accept)?;
    if let CommitState::WaitingForAction { message, attempt } = &next {
        display_message(message, *attempt, colored);
    }
    Ok(next)
}

fn handle_waiting_for_action(state: CommitState, colored: bool) -> Result<CommitState> {
    let CommitState::WaitingForAction { message, .. } = &state else {
        return Ok(state);
    };

    ui::step("3/3", &rust_i18n::t!("commit.choose_action"), colored);
    let action = match ui::select_single_action(
        &rust_i18n::t!("commit.actions_title"),
        message_options(),
    )? {
        ActionChoice::Selected(MessageChoice::Accept) => UserAction::Accept,
        ActionChoice::Selected(MessageChoice::Edit) => match ui::edit_text(&message.to_string()) {
            Ok(edited) => UserAction::Edit {
                new_message: CommitMessage::from_text(&edited),
            },
            Err(AicommitError::UserCancelled) => {
                ui::warning(&rust_i18n::t!("commit.edit_cancelled"), colored);
                UserAction::EditCancelled
            }
            Err(e) => return Err(e),
        },
        ActionChoice::Selected(MessageChoice::Regenerate) => UserAction::Regenerate,
        ActionChoice::Selected(MessageChoice::Cancel) | ActionChoice::Cancelled => {
            UserAction::Cancel
        }
    };

    Ok(state.handle_action(action))
}

fn format_generating_step(attempt: usize, provider: &dyn LLMProvider) -> String {
    if attempt == 0 {
        rust_i18n::t!(
            "commit.generating",
            provider = provider.name(),
            model = provider.model()
        )
        .to_string()
    } else {
        rust_i18n::t!(
            "commit.regenerating",
            attempt = attempt + 1,
            max = MAX_REGENERATIONS + 1
        )
        .to_string()
    }
}

/// 生成的消息显示在框内，标题加粗
fn message_box_lines(message: &CommitMessage, colored: bool) -> Vec<String> {
    let mut lines = vec![if colored {
        message.title.bold().to_string()
    } else {
        message.title.clone()
    }];
    if !message.body.is_empty() {
        lines.push(String::new());
        lines.extend(message.body.lines().map(str::to_string));
    }
    lines
}

fn format_message_title(attempt: usize) -> String {
    if attempt == 0 {
        rust_i18n::t!("commit.message_title").to_string()
    } else {
        rust_i18n::t!("commit.message_title_attempt", attempt = attempt + 1).to_string()
    }
}

fn display_message(message: &CommitMessage, attempt: usize, colored: bool) {
    println!();
    ui::print_box(
        &format_message_title(attempt),
        &message_box_lines(message, colored),
    );
}

fn print_prompts(info: &CommitInfo, language: Language, colored: bool) {
    let system = prompt::build_commit_system_prompt(language);
    let user = prompt::build_commit_user_prompt(info, language);
    let header = |text: &str| {
        if colored {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    };
    println!("\n{}", header("=== Verbose: Generated Prompt ==="));
    println!("{}", header("--- System Prompt ---"));
    println!("{}", system);
    println!("{}", header("--- User Message ---"));
    println!("{}", user);
    println!("{}\n", header("================================="));
}
