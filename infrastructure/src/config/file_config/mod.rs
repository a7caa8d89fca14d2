//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod output;
mod provider;
mod repl;
mod storage;

pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;
pub use repl::FileReplConfig;
pub use storage::{FileStorageConfig, STORE_FILE_NAME};

use mindmingle_domain::{ConfigIssue, Severity};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Gemini provider settings
    pub provider: FileProviderConfig,
    /// Persisted state location
    pub storage: FileStorageConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic and conversation logs
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.provider.model.trim().is_empty() {
            issues.push(ConfigIssue::empty_value(Severity::Error, "provider.model"));
        }
        if self.provider.base_url.trim().is_empty() {
            issues.push(ConfigIssue::empty_value(Severity::Error, "provider.base_url"));
        }
        if self.storage.app_name.trim().is_empty() {
            issues.push(ConfigIssue::empty_value(Severity::Error, "storage.app_name"));
        }
        issues.extend(self.output.parse_theme().1);

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[provider]
model = "gemini-2.5-pro"
api_key_env = "MY_GEMINI_KEY"

[storage]
dir = "/tmp/mindmingle"
app_name = "mm"

[repl]
show_progress = false
reveal_delay_ms = 0
history_file = "~/.local/share/mindmingle/history.txt"

[output]
color = false
theme = "light"

[logging]
conversation_log = "/tmp/mindmingle/conversation.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.model, "gemini-2.5-pro");
        assert_eq!(config.provider.api_key_env, "MY_GEMINI_KEY");
        assert_eq!(config.storage.app_name, "mm");
        assert!(!config.repl.show_progress);
        assert_eq!(config.repl.reveal_delay_ms, 0);
        assert!(!config.output.color);
        assert!(config.logging.conversation_log.is_some());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[provider]
model = "gemini-2.0-flash"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.model, "gemini-2.0-flash");
        // Defaults should apply
        assert_eq!(config.provider.api_key_env, "GEMINI_API_KEY");
        assert!(config.output.color);
        assert!(config.repl.show_progress);
        assert_eq!(config.repl.reveal_delay_ms, 20);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.provider.model, "gemini-2.5-flash");
        assert_eq!(config.storage.app_name, "mindmingle");
        assert!(config.storage.dir.is_none());
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_blank_fields() {
        let mut config = FileConfig::default();
        config.provider.model = " ".to_string();
        config.storage.app_name = String::new();
        config.output.theme = "sepia".to_string();

        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 2);
    }
}
