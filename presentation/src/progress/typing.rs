//! Typing indicator shown while a reply is pending

use indicatif::{ProgressBar, ProgressStyle};
use mindmingle_application::ReplyProgressNotifier;
use mindmingle_domain::truncate;
use std::sync::Mutex;
use std::time::Duration;

/// Spinner driven by [`ReplyProgressNotifier`] callbacks
pub struct TypingIndicator {
    bar: Mutex<Option<ProgressBar>>,
}

impl TypingIndicator {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
    }
}

impl Default for TypingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyProgressNotifier for TypingIndicator {
    fn on_reply_start(&self, session_title: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(format!(
            "MindMingle is typing... ({})",
            truncate(session_title, 30)
        ));
        pb.enable_steady_tick(Duration::from_millis(80));

        if let Ok(mut slot) = self.bar.lock() {
            if let Some(previous) = slot.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_reply_complete(&self) {
        if let Ok(mut slot) = self.bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_complete_clear_the_spinner() {
        let indicator = TypingIndicator::new();
        indicator.on_reply_start("Tell me a joke about");
        assert!(indicator.bar.lock().unwrap().is_some());

        indicator.on_reply_complete();
        assert!(indicator.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_complete_without_start_is_harmless() {
        TypingIndicator::new().on_reply_complete();
    }
}
