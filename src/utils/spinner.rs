use crate::utils::logger::{LogLevel, Logger};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::Cell;
use std::time::Duration;

/// Terminal spinner for network round trips. Ends either silently or in one Logger line.
pub struct Spinner {
    bar: ProgressBar,
    active: Cell<bool>,
}

impl Spinner {
    pub fn new(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        bar.set_style(style);
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(80));

        Spinner {
            bar,
            active: Cell::new(true),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Clears the spinner and reports `message` as a success.
    pub fn succeed(&self, message: impl Into<String>) {
        if self.stop() {
            Logger::new().log_message(LogLevel::Success, &message.into());
        }
    }

    /// Clears the spinner without logging; used when the outcome is reported elsewhere.
    pub fn finish_and_clear(&self) {
        self.stop();
    }

    fn stop(&self) -> bool {
        if !self.active.replace(false) {
            return false;
        }
        self.bar.finish_and_clear();
        true
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if self.active.replace(false) {
            self.bar.abandon();
        }
    }
}

pub fn with_spinner(message: &str) -> Spinner {
    Spinner::new(message)
}
