//! Structured configuration issues.
//!
//! Config loading never fails on a questionable value; instead each problem
//! is reported as a [`ConfigIssue`] that the binary prints at start-up.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A required string field is blank.
    EmptyValue { field: String },
    /// A string field holds a value outside its allowed set.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn empty_value(severity: Severity, field: &str) -> Self {
        Self {
            severity,
            code: ConfigIssueCode::EmptyValue {
                field: field.to_string(),
            },
            message: format!("{}: must not be empty", field),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
