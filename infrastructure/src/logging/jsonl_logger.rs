//! JSONL transcript writer.
//!
//! Each [`Exchange`] becomes one JSON line: its fields plus `type` and
//! `timestamp`. The file is opened for appending, so successive runs share
//! one transcript.

use mindmingle_application::{ConversationLogger, Exchange};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open the log at `path`, creating the file and its parent directories.
    ///
    /// Returns `None` (after a warning) if the file cannot be opened; the
    /// caller then runs without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open conversation log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn record(&self, exchange: &Exchange) {
        let Ok(Value::Object(mut fields)) = serde_json::to_value(exchange) else {
            warn!("Could not serialize exchange for {}", self.path.display());
            return;
        };
        fields.insert("type".into(), exchange.outcome.event_type().into());
        fields.insert(
            "timestamp".into(),
            chrono::Utc::now()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
                .into(),
        );

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        let written = serde_json::to_writer(&mut *writer, &fields)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(writer))
            .and_then(|()| writer.flush());
        if let Err(e) = written {
            warn!("Failed to append to {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmingle_application::ExchangeOutcome;

    fn exchange(outcome: ExchangeOutcome, prompt: &str) -> Exchange {
        Exchange {
            outcome,
            model: "gemini-2.5-flash".to_string(),
            turns: 1,
            prompt: prompt.to_string(),
            reply: (outcome == ExchangeOutcome::Replied).then(|| "hello".to_string()),
            error: (outcome == ExchangeOutcome::Failed).then(|| "timeout".to_string()),
        }
    }

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_exchange() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("conversation.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.record(&exchange(ExchangeOutcome::Replied, "hi"));
        logger.record(&exchange(ExchangeOutcome::Failed, "again"));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "reply_generated");
        assert_eq!(lines[0]["reply"], "hello");
        assert_eq!(lines[0]["model"], "gemini-2.5-flash");
        assert!(lines[0]["timestamp"].is_string());
        assert!(lines[0].get("error").is_none());
        assert_eq!(lines[1]["type"], "reply_failed");
        assert_eq!(lines[1]["error"], "timeout");
        assert!(lines[1].get("reply").is_none());
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversation.jsonl");

        for prompt in ["first run", "second run"] {
            let logger = JsonlConversationLogger::new(&path).unwrap();
            logger.record(&exchange(ExchangeOutcome::Empty, prompt));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "reply_empty");
        assert_eq!(lines[1]["prompt"], "second run");
    }

    #[test]
    fn test_unwritable_path_gives_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        assert!(JsonlConversationLogger::new(blocker.join("log.jsonl")).is_none());
    }
}
