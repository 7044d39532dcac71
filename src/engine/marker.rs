//! Sentinel-marker protocol: wrapping commands and slicing their output.
//!
//! A call types a single line into the pane:
//!
//! ```text
//! echo '__BRIDGE_'"START_<tok>__"; eval '<command>'; echo '__BRIDGE_'"END_<tok>__" $?
//! ```
//!
//! The quote split keeps the contiguous sentinels out of the echoed input
//! line, so only the shell's own `echo` output can match. `eval` keeps a
//! trailing comment or `&` in the command from swallowing the end sentinel.

use rand::Rng;

use crate::textutil::trim_blank_edges;

use super::poll::{Extraction, Observation};

const SENTINEL_LEAD: &str = "__BRIDGE_";
const START_TAG: &str = "START_";
const END_TAG: &str = "END_";
const SENTINEL_TAIL: &str = "__";

/// Per-call random token bookending one command's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMarker {
    token: String,
}

impl ExecutionMarker {
    /// Fresh 64-bit token from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let value: u64 = rand::thread_rng().gen();
        Self {
            token: format!("{value:016x}"),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn start_sentinel(&self) -> String {
        format!("{SENTINEL_LEAD}{START_TAG}{}{SENTINEL_TAIL}", self.token)
    }

    pub fn end_sentinel(&self) -> String {
        format!("{SENTINEL_LEAD}{END_TAG}{}{SENTINEL_TAIL}", self.token)
    }

    /// The single line typed into the pane for `command`.
    pub fn wrap_command(&self, command: &str) -> String {
        format!(
            "{}; eval {}; {} $?",
            self.split_echo(START_TAG),
            shell_quote(command),
            self.split_echo(END_TAG),
        )
    }

    fn split_echo(&self, tag: &str) -> String {
        format!("echo {}", self.quoted_sentinel(tag))
    }

    /// Quote-split sentinel as it appears in the typed line only.
    fn quoted_sentinel(&self, tag: &str) -> String {
        format!(
            "'{SENTINEL_LEAD}'\"{tag}{}{SENTINEL_TAIL}\"",
            self.token
        )
    }
}

/// Shell-safe single-quote escaping.
pub(crate) fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        "''".into()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

/// Inspect one stripped capture for the marker pair.
pub(crate) fn scan_marker_capture(capture: &str, marker: &ExecutionMarker) -> Observation {
    let start = marker.start_sentinel();
    let end = marker.end_sentinel();
    let lines: Vec<&str> = capture.lines().collect();

    let Some(end_idx) = lines.iter().rposition(|line| line.contains(&end)) else {
        return Observation::Pending;
    };
    // Nearest preceding start line wins.
    let Some(start_idx) = lines[..end_idx]
        .iter()
        .rposition(|line| line.contains(&start))
    else {
        return Observation::Ambiguous;
    };

    let end_line = lines[end_idx];
    let end_pos = end_line.find(&end).unwrap_or(0);
    let mut output: Vec<String> = lines[start_idx + 1..end_idx]
        .iter()
        .map(|line| (*line).to_string())
        .collect();
    // Output without a trailing newline shares the end sentinel's line.
    let fragment = &end_line[..end_pos];
    if !fragment.trim().is_empty() {
        output.push(fragment.to_string());
    }
    finish_output(&mut output, marker);

    let after_end = &end_line[end_pos + end.len()..];
    let exit_code = parse_exit_code(after_end, &lines[end_idx + 1..]);

    Observation::Complete(Extraction { output, exit_code })
}

/// Best-effort output for a call that never printed its end sentinel.
pub(crate) fn partial_marker_output(capture: &str, marker: &ExecutionMarker) -> Vec<String> {
    let start = marker.start_sentinel();
    let lines: Vec<&str> = capture.lines().collect();
    let from = lines
        .iter()
        .rposition(|line| line.contains(&start))
        .map_or(0, |idx| idx + 1);
    let mut output: Vec<String> = lines[from..].iter().map(|line| (*line).to_string()).collect();
    finish_output(&mut output, marker);
    output
}

/// Exit status printed after the end sentinel, on its line or the next
/// non-empty one. Unparsable tokens leave the code unset.
fn parse_exit_code(after_end: &str, following: &[&str]) -> Option<i32> {
    let token = match after_end.split_whitespace().next() {
        Some(token) => token,
        None => following
            .iter()
            .find(|line| !line.trim().is_empty())?
            .split_whitespace()
            .next()?,
    };
    token.parse::<i32>().ok()
}

fn finish_output(lines: &mut Vec<String>, marker: &ExecutionMarker) {
    drop_typed_line(lines, marker);
    trim_blank_edges(lines);
}

/// Remove the echoed wrapper line. Only the typed input carries the
/// quote-split sentinel, so command output is never matched.
fn drop_typed_line(lines: &mut Vec<String>, marker: &ExecutionMarker) {
    let typed = marker.quoted_sentinel(START_TAG);
    lines.retain(|line| !line.contains(&typed));
}
