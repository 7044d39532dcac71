//! Prompt-pattern fallback for shells that cannot echo sentinels.
//!
//! Completion is inferred from the pane settling on a prompt-looking last
//! line. Output boundaries are heuristic; results carry
//! [`Confidence::Heuristic`](super::Confidence::Heuristic).

use regex::Regex;

use crate::error::RequestError;
use crate::textutil::trim_blank_edges;

use super::poll::{Extraction, Observation};

/// Trailing `$`, `#`, `>` or `%`, optionally followed by spaces, unless it
/// follows a digit, `=` or `-` (`45%`, `[====>`, `-->`).
pub const DEFAULT_PROMPT_PATTERN: &str = r"(?:^|[^0-9=\-])[$#>%]\s*$";

/// Compiled prompt matcher.
///
/// Any line the pattern accepts counts as a prompt. A command that stalls on
/// such a line for two polls is reported `Completed`, so patterns should be
/// as specific to the target shell's prompt as practical.
#[derive(Debug, Clone)]
pub struct PromptPattern {
    regex: Regex,
}

impl PromptPattern {
    pub fn new(pattern: &str) -> Result<Self, RequestError> {
        let regex =
            Regex::new(pattern).map_err(|e| RequestError::InvalidPromptPattern(e.to_string()))?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn matches(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

impl Default for PromptPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_PROMPT_PATTERN).expect("default prompt pattern compiles"),
        }
    }
}

/// Debounced prompt detector for one fallback-mode call.
pub(crate) struct PromptWatcher {
    baseline: Vec<String>,
    pattern: PromptPattern,
    previous: Option<Vec<String>>,
}

impl PromptWatcher {
    /// `baseline` is the stripped capture taken before the command was sent.
    pub(crate) fn new(baseline: &str, pattern: PromptPattern) -> Self {
        Self {
            baseline: baseline.lines().map(str::to_string).collect(),
            pattern,
            previous: None,
        }
    }

    /// Complete once the same prompt-terminated tail shows on two polls in a row.
    pub(crate) fn observe(&mut self, capture: &str) -> Observation {
        let appended = self.appended(capture);
        let Some(prompt_idx) = self.final_prompt_index(&appended) else {
            self.previous = None;
            return Observation::Pending;
        };
        let stable = self.previous.as_ref() == Some(&appended);
        if !stable {
            self.previous = Some(appended);
            return Observation::Pending;
        }

        let mut output = appended[1..prompt_idx].to_vec();
        trim_blank_edges(&mut output);
        Observation::Complete(Extraction {
            output,
            exit_code: None,
        })
    }

    /// Everything appended after the echoed command line.
    pub(crate) fn partial_output(&self, capture: &str) -> Vec<String> {
        let appended = self.appended(capture);
        let mut output = appended.get(1..).map(<[String]>::to_vec).unwrap_or_default();
        trim_blank_edges(&mut output);
        output
    }

    fn appended(&self, capture: &str) -> Vec<String> {
        let current: Vec<String> = capture.lines().map(str::to_string).collect();
        appended_lines(&self.baseline, &current)
    }

    /// Index of a prompt line that follows the echoed command line.
    fn final_prompt_index(&self, appended: &[String]) -> Option<usize> {
        let idx = appended.iter().rposition(|line| !line.trim().is_empty())?;
        (idx >= 1 && self.pattern.matches(&appended[idx])).then_some(idx)
    }
}

/// Lines written since `baseline`, starting at the old prompt row.
///
/// The baseline's last line is the prompt the command gets typed onto, so
/// alignment uses every line before it. When history scrolled past the
/// capture bound, the longest baseline suffix heading `current` is matched.
fn appended_lines(baseline: &[String], current: &[String]) -> Vec<String> {
    let anchor = &baseline[..baseline.len().saturating_sub(1)];
    if anchor.is_empty() {
        return current.to_vec();
    }
    if current.starts_with(anchor) {
        return current[anchor.len()..].to_vec();
    }
    for overlap in (1..anchor.len()).rev() {
        if current.len() >= overlap && current[..overlap] == anchor[anchor.len() - overlap..] {
            return current[overlap..].to_vec();
        }
    }
    current.to_vec()
}
