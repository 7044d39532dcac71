//! Call outcomes returned to callers.

use std::time::Duration;

use serde::{Serialize, Serializer};
use tokio::time::Instant;

use crate::textutil::strip_ansi;

/// Terminal status of one `execute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Completed,
    TimedOut,
    /// End sentinel seen without a matching start sentinel.
    MarkerNotFound,
}

/// How output boundaries were determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Sentinel markers bracket the output.
    Structural,
    /// Inferred from prompt-pattern stabilization.
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub output: Vec<String>,
    pub exit_code: Option<i32>,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub confidence: Confidence,
    /// Last stripped capture, attached when the call did not complete cleanly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_snapshot: Option<String>,
}

impl ExecutionResult {
    pub fn is_completed(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }

    pub fn output_text(&self) -> String {
        self.output.join("\n")
    }
}

fn serialize_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}

/// One ANSI-stripped capture and the instant it was taken.
#[derive(Debug, Clone)]
pub struct PaneSnapshot {
    pub text: String,
    pub captured_at: Instant,
}

impl PaneSnapshot {
    pub fn from_capture(raw: &str, captured_at: Instant) -> Self {
        Self {
            text: strip_ansi(raw),
            captured_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_millis_and_snake_case() {
        let result = ExecutionResult {
            status: ExecutionStatus::TimedOut,
            output: vec!["partial".into()],
            exit_code: None,
            elapsed: Duration::from_millis(1200),
            confidence: Confidence::Structural,
            raw_snapshot: Some("$ sleep 100".into()),
        };
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(
            value,
            json!({
                "status": "timed_out",
                "output": ["partial"],
                "exit_code": null,
                "elapsed_ms": 1200,
                "confidence": "structural",
                "raw_snapshot": "$ sleep 100",
            })
        );
    }

    #[test]
    fn omits_missing_snapshot() {
        let result = ExecutionResult {
            status: ExecutionStatus::Completed,
            output: vec!["a".into(), "b".into()],
            exit_code: Some(0),
            elapsed: Duration::from_millis(5),
            confidence: Confidence::Heuristic,
            raw_snapshot: None,
        };
        let value = serde_json::to_value(&result).expect("serialize");
        assert!(value.get("raw_snapshot").is_none());
        assert!(result.is_completed());
        assert_eq!(result.output_text(), "a\nb");
    }

    #[test]
    fn snapshot_strips_styling() {
        let snapshot = PaneSnapshot::from_capture("\x1b[32mok\x1b[0m ✓", Instant::now());
        assert_eq!(snapshot.text, "ok ✓");
    }
}
