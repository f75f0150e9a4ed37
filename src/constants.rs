//! 全局常量定义

/// LLM 相关常量
pub mod llm {
    /// 默认 temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// 生成 commit message 时的 max_tokens
    pub const COMMIT_MAX_TOKENS: u32 = 1500;

    /// 生成周报时的 max_tokens
    pub const REPORT_MAX_TOKENS: u32 = 2000;

    /// 连通性检查时的 max_tokens
    pub const CHECK_MAX_TOKENS: u32 = 5;

    /// 连通性检查发送的内容
    pub const CHECK_PROMPT: &str = "Hi";

    /// Qwen (DashScope) 采样参数
    pub const QWEN_TOP_P: f32 = 0.8;
    pub const QWEN_TOP_K: u32 = 50;
}

/// Commit 相关常量
pub mod commit {
    /// 最大重新生成次数
    pub const MAX_REGENERATIONS: usize = 10;

    /// 送入 prompt 的 diff 默认预算（字节）
    pub const DEFAULT_MAX_DIFF_SIZE: usize = 100_000;
}

/// Diff 相关常量
pub mod diff {
    /// 每个文件 diff 段落的起始标记
    pub const FILE_HEADER_PREFIX: &str = "diff --git ";

    /// 截断标记
    pub const TRUNCATION_MARKER: &str = "[truncated]";
}

/// Report 相关常量
pub mod report {
    /// 过滤掉的 merge commit 前缀
    pub const MERGE_SUBJECT_PREFIXES: &[&str] = &["Merge branch", "Merge remote-tracking branch"];

    /// 日期参数格式
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}

/// UI 相关常量
pub mod ui {
    /// 信息框最小内容宽度
    pub const MIN_BOX_WIDTH: usize = 40;
}
