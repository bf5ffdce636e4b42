/// Shared serializable output types.
///
/// These are what `--output json` writes to stdout (and errors to stderr).
/// They are decoupled from the internal `TestOption` / `Captured` types.
use serde::{Deserialize, Serialize};

use crate::process::{Captured, ProcessError};
use crate::suite::{RunError, TestOption};

/// One entry of the option table, as listed by `--list` or `--dry-run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionOutput {
    /// Menu key ("1".."6").
    pub key: String,
    /// CLI token ("all", "unit", ...).
    pub token: String,
    /// Human-readable label.
    pub description: String,
    /// Space-joined command line.
    pub command: String,
}

impl From<&TestOption> for OptionOutput {
    fn from(option: &TestOption) -> Self {
        Self {
            key: option.key.to_owned(),
            token: option.token.to_owned(),
            description: option.description.to_owned(),
            command: option.command.to_string(),
        }
    }
}

/// Result of executing one test option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecReport {
    /// Menu key of the option that ran.
    pub key: String,
    /// CLI token of the option that ran.
    pub token: String,
    /// Human-readable label.
    pub description: String,
    /// Space-joined command line.
    pub command: String,
    /// True iff the child exited with status zero.
    pub success: bool,
    /// Exit code, or null if the child never produced one.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Wall-clock duration of the child process.
    pub duration_ms: u64,
    /// Why the child could not be started, if it could not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_error: Option<String>,
}

impl ExecReport {
    /// Build from an option and the result of running its command.
    #[must_use]
    pub fn new(option: &TestOption, outcome: &Result<Captured, ProcessError>) -> Self {
        let (captured, launch_error) = match outcome {
            Ok(c) => (c.clone(), None),
            Err(e) => (Captured::default(), Some(e.to_string())),
        };
        Self {
            key: option.key.to_owned(),
            token: option.token.to_owned(),
            description: option.description.to_owned(),
            command: option.command.to_string(),
            success: captured.success(),
            exit_code: captured.code,
            stdout: captured.stdout,
            stderr: captured.stderr,
            duration_ms: u64::try_from(captured.elapsed.as_millis()).unwrap_or(u64::MAX),
            launch_error,
        }
    }
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Suggested alternatives (for mistyped suite names).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
}

impl ErrorOutput {
    /// Construct from a `RunError`.
    #[must_use]
    pub fn from_run_error(err: &RunError) -> Self {
        let candidates = match err {
            RunError::InvalidSelection {
                suggestion: Some(s),
                ..
            } => Some(vec![(*s).to_owned()]),
            _ => None,
        };
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message: err.to_string(),
                candidates,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::suite::{OptionTable, SelectionMode};

    #[test]
    fn test_report_from_success() {
        let table = OptionTable::new("python3");
        let option = table.by_token("unit").unwrap();
        let outcome = Ok(Captured {
            code: Some(0),
            stdout: "2 passed\n".to_owned(),
            stderr: String::new(),
            elapsed: Duration::from_millis(1500),
        });
        let report = ExecReport::new(option, &outcome);
        assert!(report.success);
        assert_eq!(report.key, "2");
        assert_eq!(report.exit_code, Some(0));
        assert_eq!(report.duration_ms, 1500);
        assert!(report.launch_error.is_none());
    }

    #[test]
    fn test_report_from_launch_failure() {
        let table = OptionTable::new("python3");
        let option = table.by_token("all").unwrap();
        let outcome = Err(ProcessError::Spawn {
            program: "python3".to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        let report = ExecReport::new(option, &outcome);
        assert!(!report.success);
        assert_eq!(report.exit_code, None);
        assert!(report.launch_error.unwrap().contains("python3"));
    }

    #[test]
    fn test_error_envelope_carries_suggestion() {
        let err = RunError::InvalidSelection {
            input: "covrage".to_owned(),
            mode: SelectionMode::Argument,
            suggestion: Some("coverage"),
        };
        let value = serde_json::to_value(ErrorOutput::from_run_error(&err)).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["code"], "invalid_selection");
        assert_eq!(value["error"]["candidates"][0], "coverage");
    }
}
