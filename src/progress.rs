//! Progress display while package metadata is fetched
//!
//! Provides visual feedback using indicatif.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for metadata fetching
pub struct Progress {
    /// Whether progress display is enabled (disabled in debug mode and tests)
    enabled: bool,
    /// Current progress bar
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Start a bar for a known number of packages
    pub fn start(&mut self, total: u64, message: &str) {
        if !self.enabled {
            return;
        }

        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .progress_chars("█▓▒░");
        let bar = ProgressBar::new(total);
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(bar);
    }

    /// Increment progress by one
    pub fn inc(&self) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    /// Update the message
    pub fn set_message(&self, message: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Finish and clear the current bar
    pub fn finish_and_clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_disabled() {
        let mut progress = Progress::disabled();
        progress.start(10, "test");
        progress.inc();
        progress.set_message("test");
        assert!(progress.bar.is_none());
        progress.finish_and_clear();
    }

    #[test]
    fn test_progress_enabled() {
        let mut progress = Progress::new(true);
        progress.start(3, "Fetching");
        progress.inc();
        progress.set_message("react");
        assert!(progress.bar.is_some());
        progress.finish_and_clear();
        assert!(progress.bar.is_none());
    }
}
