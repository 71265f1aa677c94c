//! Spinner shown while talking to the registry.
//!
//! Wraps `indicatif` so the rest of the crate never has to care whether
//! progress output is enabled. Progress is disabled when the
//! `VIZKIT_NO_PROGRESS` environment variable is set, which `--no-progress`
//! and `--quiet` both do.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Environment variable that disables progress output.
pub const NO_PROGRESS_ENV: &str = "VIZKIT_NO_PROGRESS";

fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV).is_some()
}

/// A spinner for indeterminate operations such as downloads.
///
/// When progress is disabled the spinner is hidden and every call is a no-op.
///
/// ```rust,no_run
/// use vizkit_cli::utils::progress::Spinner;
///
/// let spinner = Spinner::new("Downloading recharts/generic/bar");
/// // ... fetch ...
/// spinner.finish_and_clear();
/// ```
#[derive(Clone)]
pub struct Spinner {
    inner: ProgressBar,
}

impl Spinner {
    /// Start a spinner with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        let inner = if is_progress_disabled() {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
            }
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        inner.set_message(message.into());
        Self { inner }
    }

    /// Remove the spinner from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle_does_not_panic() {
        let spinner = Spinner::new("Downloading");
        spinner.finish_and_clear();
    }
}
