//! Output configuration from TOML (`[output]` section)

use mindmingle_domain::{ConfigIssue, ConfigIssueCode, Severity, Theme};
use serde::{Deserialize, Serialize};

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Initial theme ("dark" or "light") until the user toggles it
    pub theme: String,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            theme: Theme::default().as_str().to_string(),
        }
    }
}

impl FileOutputConfig {
    /// Parse `theme`, falling back to the default on unknown values.
    pub fn parse_theme(&self) -> (Theme, Option<ConfigIssue>) {
        match self.theme.parse::<Theme>() {
            Ok(theme) => (theme, None),
            Err(_) => (
                Theme::default(),
                Some(ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "output.theme".to_string(),
                        value: self.theme.clone(),
                        valid_values: vec!["dark".to_string(), "light".to_string()],
                    },
                    message: format!(
                        "output.theme: unknown value '{}', falling back to 'dark'",
                        self.theme
                    ),
                }),
            ),
        }
    }
}
