//! Poll-loop state machine.
//!
//! Decisions are a pure function of (observation, elapsed, timeout) so the
//! loop's policy is testable without a pane or a clock.

use std::time::Duration;

/// What a single capture revealed about the in-flight command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// No completion signal yet.
    Pending,
    /// Completion detected; output sliced out of the capture.
    Complete(Extraction),
    /// End sentinel present but no start sentinel precedes it.
    Ambiguous,
}

/// Output lines and exit status recovered from a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub output: Vec<String>,
    pub exit_code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Command submitted, nothing captured yet.
    Sent,
    Polling { polls: u32 },
    Completed(Extraction),
    MarkerNotFound,
    TimedOut,
}

impl PollState {
    /// Fold one observation into the state. Completion wins over the
    /// deadline when both land on the same poll.
    pub fn advance(self, observation: Observation, elapsed: Duration, timeout: Duration) -> Self {
        let polls = match self {
            Self::Sent => 0,
            Self::Polling { polls } => polls,
            terminal => return terminal,
        };
        match observation {
            Observation::Complete(extraction) => Self::Completed(extraction),
            Observation::Ambiguous => Self::MarkerNotFound,
            Observation::Pending if elapsed >= timeout => Self::TimedOut,
            Observation::Pending => Self::Polling { polls: polls + 1 },
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed(_) | Self::MarkerNotFound | Self::TimedOut
        )
    }
}

/// Sleep before the next capture, clipped so the last poll lands on the
/// deadline rather than past it.
pub fn next_sleep(elapsed: Duration, timeout: Duration, poll_interval: Duration) -> Duration {
    poll_interval.min(timeout.saturating_sub(elapsed))
}
