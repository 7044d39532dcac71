//! Command-completion engine.
//!
//! Drives one command through a pane: send it, poll captures until a
//! completion signal appears or the deadline passes, then slice the output.
//! Nothing survives between calls.

mod clock;
mod fallback;
mod marker;
mod poll;
mod request;
mod result;

use tokio::time::Instant;

use crate::error::{AdapterError, ExecuteError};
use crate::textutil::strip_ansi;
use crate::tmux::{Multiplexer, PaneTarget, SessionInfo};

pub use clock::{Clock, TokioClock};
pub use fallback::{PromptPattern, DEFAULT_PROMPT_PATTERN};
pub use marker::ExecutionMarker;
pub use poll::{next_sleep, Extraction, Observation, PollState};
pub use request::CommandRequest;
pub use result::{Confidence, ExecutionResult, ExecutionStatus, PaneSnapshot};

use fallback::PromptWatcher;
use marker::{partial_marker_output, scan_marker_capture};

/// Default history bound for each poll capture.
pub const DEFAULT_HISTORY_LINES: usize = 2000;

/// Engine-wide knobs that are not per-call.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Lines of scrollback per capture; `None` captures the full history.
    pub history_lines: Option<usize>,
    /// Prompt matcher for fallback mode.
    pub prompt_pattern: PromptPattern,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            history_lines: Some(DEFAULT_HISTORY_LINES),
            prompt_pattern: PromptPattern::default(),
        }
    }
}

/// Completion detector for one call.
enum Detector {
    Marker(ExecutionMarker),
    Prompt(PromptWatcher),
}

impl Detector {
    fn observe(&mut self, capture: &str) -> Observation {
        match self {
            Self::Marker(marker) => scan_marker_capture(capture, marker),
            Self::Prompt(watcher) => watcher.observe(capture),
        }
    }

    fn partial_output(&self, capture: &str) -> Vec<String> {
        match self {
            Self::Marker(marker) => partial_marker_output(capture, marker),
            Self::Prompt(watcher) => watcher.partial_output(capture),
        }
    }

    fn confidence(&self) -> Confidence {
        match self {
            Self::Marker(_) => Confidence::Structural,
            Self::Prompt(_) => Confidence::Heuristic,
        }
    }
}

pub struct Engine<M, C = TokioClock> {
    multiplexer: M,
    clock: C,
    options: EngineOptions,
}

impl<M: Multiplexer> Engine<M, TokioClock> {
    pub fn new(multiplexer: M, options: EngineOptions) -> Self {
        Self::with_clock(multiplexer, TokioClock, options)
    }
}

impl<M: Multiplexer, C: Clock> Engine<M, C> {
    pub fn with_clock(multiplexer: M, clock: C, options: EngineOptions) -> Self {
        Self {
            multiplexer,
            clock,
            options,
        }
    }

    pub fn multiplexer(&self) -> &M {
        &self.multiplexer
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionInfo>, AdapterError> {
        self.multiplexer.list_sessions().await
    }

    /// ANSI-stripped pane lines; `None` uses the configured history bound.
    pub async fn read_buffer(
        &self,
        target: &PaneTarget,
        lines: Option<usize>,
    ) -> Result<Vec<String>, AdapterError> {
        let raw = self
            .multiplexer
            .capture_pane(target, lines.or(self.options.history_lines))
            .await?;
        Ok(strip_ansi(&raw).lines().map(str::to_string).collect())
    }

    /// Inject keystrokes without waiting for anything to finish.
    pub async fn send_raw(
        &self,
        target: &PaneTarget,
        text: &str,
        submit_enter: bool,
    ) -> Result<(), AdapterError> {
        self.multiplexer.send_keys(target, text, submit_enter).await
    }

    /// Run `request` in `target` and harvest its output.
    ///
    /// Timeouts and marker ambiguity come back as result statuses. Adapter
    /// failures abort the call with an [`ExecuteError`]. Callers must not run
    /// two calls against the same pane at once.
    pub async fn execute(
        &self,
        target: &PaneTarget,
        request: &CommandRequest,
    ) -> Result<ExecutionResult, ExecuteError> {
        let started = self.clock.now();
        let timeout = request.timeout();
        tracing::info!(
            pane = %target,
            marker_mode = request.marker_mode(),
            timeout_ms = timeout.as_millis() as u64,
            "executing command"
        );

        self.multiplexer
            .has_session(target)
            .await
            .map_err(|e| self.abort(e, target, started, None))?;

        let mut detector = if request.marker_mode() {
            let marker = ExecutionMarker::generate();
            let wrapped = marker.wrap_command(request.command());
            self.multiplexer
                .send_keys(target, &wrapped, true)
                .await
                .map_err(|e| self.abort(e, target, started, None))?;
            tracing::debug!(token = marker.token(), "sent wrapped command");
            Detector::Marker(marker)
        } else {
            let baseline = self
                .capture(target)
                .await
                .map_err(|e| self.abort(e, target, started, None))?;
            self.multiplexer
                .send_keys(target, request.command(), true)
                .await
                .map_err(|e| self.abort(e, target, started, Some(&baseline)))?;
            Detector::Prompt(PromptWatcher::new(
                &baseline.text,
                self.options.prompt_pattern.clone(),
            ))
        };

        let mut state = PollState::Sent;
        let mut last: Option<PaneSnapshot> = None;
        loop {
            let elapsed = self.clock.now().saturating_duration_since(started);
            self.clock
                .sleep(next_sleep(elapsed, timeout, request.poll_interval()))
                .await;

            let snapshot = self
                .capture(target)
                .await
                .map_err(|e| self.abort(e, target, started, last.as_ref()))?;
            let elapsed = snapshot.captured_at.saturating_duration_since(started);
            state = state.advance(detector.observe(&snapshot.text), elapsed, timeout);

            let result = match state {
                PollState::Sent | PollState::Polling { .. } => {
                    tracing::debug!(?state, elapsed_ms = elapsed.as_millis() as u64, "poll");
                    last = Some(snapshot);
                    continue;
                }
                PollState::Completed(extraction) => ExecutionResult {
                    status: ExecutionStatus::Completed,
                    output: extraction.output,
                    exit_code: extraction.exit_code,
                    elapsed,
                    confidence: detector.confidence(),
                    raw_snapshot: None,
                },
                PollState::MarkerNotFound => {
                    tracing::warn!(
                        pane = %target,
                        "end sentinel without a preceding start sentinel"
                    );
                    ExecutionResult {
                        status: ExecutionStatus::MarkerNotFound,
                        output: Vec::new(),
                        exit_code: None,
                        elapsed,
                        confidence: detector.confidence(),
                        raw_snapshot: Some(snapshot.text),
                    }
                }
                PollState::TimedOut => {
                    tracing::warn!(
                        pane = %target,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "command timed out"
                    );
                    ExecutionResult {
                        status: ExecutionStatus::TimedOut,
                        output: detector.partial_output(&snapshot.text),
                        exit_code: None,
                        elapsed,
                        confidence: detector.confidence(),
                        raw_snapshot: Some(snapshot.text),
                    }
                }
            };
            tracing::info!(
                status = ?result.status,
                exit_code = ?result.exit_code,
                elapsed_ms = result.elapsed.as_millis() as u64,
                "command finished"
            );
            return Ok(result);
        }
    }

    async fn capture(&self, target: &PaneTarget) -> Result<PaneSnapshot, AdapterError> {
        let raw = self
            .multiplexer
            .capture_pane(target, self.options.history_lines)
            .await?;
        Ok(PaneSnapshot::from_capture(&raw, self.clock.now()))
    }

    fn abort(
        &self,
        source: AdapterError,
        target: &PaneTarget,
        started: Instant,
        last: Option<&PaneSnapshot>,
    ) -> ExecuteError {
        let elapsed = self.clock.now().saturating_duration_since(started);
        tracing::warn!(pane = %target, error = %source, "execute aborted");
        ExecuteError {
            source,
            target: target.to_string(),
            elapsed,
            last_snapshot: last.map(|snapshot| snapshot.text.clone()),
        }
    }
}
