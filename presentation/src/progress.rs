//! Spinner implementing the progress port.

use foreman_application::ports::progress::ProgressPort;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Indicatif-backed spinner shown while the agent is working
pub struct SpinnerProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPort for SpinnerProgress {
    fn start(&self, label: &str) {
        let mut guard = self.bar.lock().unwrap();
        match guard.as_ref() {
            Some(bar) => bar.set_message(label.to_string()),
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(Self::style());
                bar.set_message(label.to_string());
                bar.enable_steady_tick(Duration::from_millis(100));
                *guard = Some(bar);
            }
        }
    }

    fn stop(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_idempotent() {
        let progress = SpinnerProgress::new();
        progress.start("working");
        progress.stop();
        progress.stop();
    }

    #[test]
    fn test_start_twice_updates_label() {
        let progress = SpinnerProgress::new();
        progress.start("one");
        progress.start("two");
        progress.stop();
    }
}
