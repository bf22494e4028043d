//! Progress display for the pipeline stages.
//!
//! On a terminal each archive gets a byte bar and each stage a spinner line,
//! all owned by one `MultiProgress` so log lines print above them. Elsewhere
//! every bar is hidden and the logs carry progress.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const ARCHIVE_TEMPLATE: &str = "{prefix:<24.dim} {bar:30.green/dim} {binary_bytes:>7}/{binary_total_bytes:7} {eta:>4} {wide_msg:.dim}";
const STAGE_TEMPLATE: &str = "{spinner:.green} {prefix:<10.cyan.bold} {wide_msg}";

/// Archive names longer than this are cut in the bar prefix
const PREFIX_WIDTH: usize = 24;

pub struct ProgressContext {
    multi: MultiProgress,
    is_tty: bool,
}

impl ProgressContext {
    /// Draw only when stderr is a terminal
    pub fn new() -> Self {
        Self::with_tty(std::io::stderr().is_terminal())
    }

    /// Never draw
    pub fn hidden() -> Self {
        Self::with_tty(false)
    }

    fn with_tty(is_tty: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty,
        }
    }

    /// Register a bar styled with `template`, or a hidden bar off-terminal
    fn attach(&self, len: u64, template: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let pb = self.multi.add(ProgressBar::new(len));
        match ProgressStyle::with_template(template) {
            Ok(style) => pb.set_style(style.progress_chars("--")),
            Err(e) => log::debug!("progress template rejected: {e}"),
        }
        pb
    }

    /// Bar over the `total` compressed bytes of one archive
    pub fn archive_bar(&self, name: &str, total: u64) -> ProgressBar {
        let pb = self.attach(total, ARCHIVE_TEMPLATE);
        pb.set_prefix(name.chars().take(PREFIX_WIDTH).collect::<String>());
        pb
    }

    /// Spinner line for a stage; set its message as work advances
    pub fn stage_line(&self, name: &str) -> ProgressBar {
        let pb = self.attach(0, STAGE_TEMPLATE);
        pb.set_prefix(name.to_string());
        if self.is_tty {
            pb.enable_steady_tick(Duration::from_millis(80));
        }
        pb
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// Bars container, used by the logger to print above them
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedProgress = Arc<ProgressContext>;

/// `1234567` → `1,234,567`
pub fn fmt_num(n: usize) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut groups: Vec<&str> = Vec::new();
    if head > 0 {
        groups.push(&digits[..head]);
    }
    groups.extend(
        digits.as_bytes()[head..]
            .chunks(3)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok()),
    );
    groups.join(",")
}
