//! Progress indicators for long-running imports.
//!
//! Bars are drawn only when stderr is an interactive terminal.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{IsTerminal, stderr};

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Check if we should show progress indicators.
#[must_use]
pub fn should_show_progress() -> bool {
    stderr().is_terminal()
}

/// Create a determinate progress bar.
///
/// When `show` is false the bar is hidden but still counts.
#[must_use]
pub fn create_progress_bar(total: u64, message: &str, show: bool) -> ProgressBar {
    let pb = ProgressBar::new(total);

    if show {
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style.progress_chars("=>-"));
        pb.set_message(message.to_string());
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    pb
}

/// Progress bar wrapper that remembers whether it is visible.
pub struct ProgressTracker {
    bar: ProgressBar,
    showing: bool,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(total: u64, message: &str) -> Self {
        Self::with_visibility(total, message, should_show_progress())
    }

    #[must_use]
    pub fn with_visibility(total: u64, message: &str, show: bool) -> Self {
        Self {
            bar: create_progress_bar(total, message, show),
            showing: show,
        }
    }

    /// Set the total once it becomes known.
    pub fn set_total(&self, total: u64) {
        self.bar.set_length(total);
    }

    pub fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }

    #[must_use]
    pub const fn is_showing(&self) -> bool {
        self.showing
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}
