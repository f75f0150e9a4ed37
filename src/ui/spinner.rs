use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::llm::ProgressReporter;

/// 进度指示器（旋转动画）
pub struct Spinner {
    pb: ProgressBar,
    base_message: String,
}

impl Spinner {
    /// 创建新的 spinner
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        // 模板是常量，解析失败时退回默认样式
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        Self {
            pb,
            base_message: message.to_string(),
        }
    }

    /// 在基础消息后追加后缀
    pub fn append_suffix(&self, suffix: &str) {
        self.pb
            .set_message(format!("{} {}", self.base_message, suffix));
    }

    /// 完成并清除
    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}

impl ProgressReporter for Spinner {
    fn append_suffix(&self, suffix: &str) {
        Spinner::append_suffix(self, suffix);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.pb.finish_and_clear();
    }
}
