//! Validated per-call command parameters.

use std::time::Duration;

use crate::error::RequestError;

/// One command submission: text plus its polling contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    command: String,
    timeout: Duration,
    poll_interval: Duration,
    marker_mode: bool,
}

impl CommandRequest {
    /// Build a request; `timeout` must be positive and `poll_interval` must be
    /// positive and no longer than `timeout`.
    pub fn new(
        command: impl Into<String>,
        timeout: Duration,
        poll_interval: Duration,
        marker_mode: bool,
    ) -> Result<Self, RequestError> {
        if timeout.is_zero() {
            return Err(RequestError::InvalidTimeout);
        }
        if poll_interval.is_zero() || poll_interval > timeout {
            return Err(RequestError::InvalidPollInterval {
                interval: poll_interval,
                timeout,
            });
        }
        Ok(Self {
            command: command.into(),
            timeout,
            poll_interval,
            marker_mode,
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// True for structural sentinels, false for the prompt-pattern fallback.
    pub fn marker_mode(&self) -> bool {
        self.marker_mode
    }
}
