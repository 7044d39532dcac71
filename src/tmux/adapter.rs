//! Real tmux adapter backed by bounded subprocess invocations.

use async_trait::async_trait;
use tokio::time::Duration;

use crate::error::AdapterError;

use super::capture::{build_capture_pane_args, keep_last_lines, trim_trailing_blank_lines};
use super::process::{format_duration, run_process, ProcessFailure, ProcessOutput};
use super::send_keys::{build_send_enter_args, build_send_literal_args};
use super::sessions::{is_no_server_message, parse_list_sessions, SessionInfo};
use super::{Multiplexer, PaneTarget};

/// Default bound for a single tmux invocation.
pub const DEFAULT_INVOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Construction parameters for [`TmuxAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmuxSettings {
    /// Control binary, resolved through `PATH` when not absolute.
    pub binary: String,
    /// `-L` socket name.
    pub socket_name: Option<String>,
    /// `-S` socket path; wins over `socket_name` when both are set.
    pub socket_path: Option<String>,
    pub invocation_timeout: Duration,
}

impl Default for TmuxSettings {
    fn default() -> Self {
        Self {
            binary: "tmux".to_string(),
            socket_name: None,
            socket_path: None,
            invocation_timeout: DEFAULT_INVOCATION_TIMEOUT,
        }
    }
}

/// Stateless tmux invoker. Every call spawns its own process, so one adapter
/// can serve concurrent calls against different panes.
#[derive(Debug, Clone)]
pub struct TmuxAdapter {
    settings: TmuxSettings,
}

impl TmuxAdapter {
    pub fn new(settings: TmuxSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TmuxSettings {
        &self.settings
    }

    fn full_args(&self, args: Vec<String>) -> Vec<String> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if let Some(path) = &self.settings.socket_path {
            full.push("-S".to_string());
            full.push(path.clone());
        } else if let Some(name) = &self.settings.socket_name {
            full.push("-L".to_string());
            full.push(name.clone());
        }
        full.extend(args);
        full
    }

    /// Run one tmux command; nonzero exits are returned, not classified.
    async fn invoke(
        &self,
        args: Vec<String>,
        target: Option<&str>,
    ) -> Result<ProcessOutput, AdapterError> {
        let subcommand = args.first().cloned().unwrap_or_default();
        let args = self.full_args(args);
        tracing::debug!(binary = %self.settings.binary, ?args, "invoking tmux");

        match run_process(
            &self.settings.binary,
            &args,
            self.settings.invocation_timeout,
        )
        .await
        {
            Ok(output) => Ok(output),
            Err(ProcessFailure::Spawn(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AdapterError::invocation_failed(
                    target,
                    format!("control binary `{}` not found", self.settings.binary),
                ))
            }
            Err(ProcessFailure::Spawn(e)) => Err(AdapterError::invocation_failed(
                target,
                format!("{}: {e}", self.settings.binary),
            )),
            Err(ProcessFailure::TimedOut(limit)) => {
                tracing::warn!(%subcommand, "tmux invocation exceeded {}", format_duration(limit));
                Err(AdapterError::invocation_timed_out(
                    target,
                    format!("`{subcommand}` exceeded {}", format_duration(limit)),
                ))
            }
        }
    }

    /// Run a targeted command and classify any failure.
    async fn invoke_targeted(
        &self,
        args: Vec<String>,
        target: &str,
    ) -> Result<String, AdapterError> {
        let output = self.invoke(args, Some(target)).await?;
        if output.success() {
            return Ok(output.stdout);
        }
        Err(classify_targeted_failure(target, &output))
    }
}

impl Default for TmuxAdapter {
    fn default() -> Self {
        Self::new(TmuxSettings::default())
    }
}

/// Map a failed targeted invocation onto the adapter taxonomy.
pub(crate) fn classify_targeted_failure(target: &str, output: &ProcessOutput) -> AdapterError {
    let detail = output.failure_detail();
    if is_missing_target_message(&detail) {
        AdapterError::session_not_found(target, detail)
    } else {
        AdapterError::invocation_failed(Some(target), detail)
    }
}

/// `display-message` fails unless the full target resolves to a pane.
fn build_resolve_target_args(target: &str) -> Vec<String> {
    vec![
        "display-message".into(),
        "-p".into(),
        "-t".into(),
        target.to_string(),
        String::new(),
    ]
}

/// Existence checks report absence through their exit status alone on some
/// tmux versions, so any clean nonzero exit means "missing".
fn require_target(target: &str, output: &ProcessOutput) -> Result<(), AdapterError> {
    if output.success() {
        return Ok(());
    }
    if output.stderr.trim().is_empty() || is_missing_target_message(&output.stderr) {
        return Err(AdapterError::session_not_found(target, output.failure_detail()));
    }
    Err(classify_targeted_failure(target, output))
}

fn is_missing_target_message(detail: &str) -> bool {
    let lower = detail.to_ascii_lowercase();
    [
        "can't find session",
        "can't find window",
        "can't find pane",
        "session not found",
        "no such session",
        "no server running",
        "error connecting to",
    ]
    .iter()
    .any(|needle| lower.contains(needle))
}

#[async_trait]
impl Multiplexer for TmuxAdapter {
    async fn list_sessions(&self) -> Result<Vec<SessionInfo>, AdapterError> {
        let output = self.invoke(vec!["list-sessions".into()], None).await?;
        if output.success() {
            return Ok(parse_list_sessions(&output.stdout));
        }
        if is_no_server_message(&output.stderr) {
            return Ok(Vec::new());
        }
        Err(AdapterError::invocation_failed(None, output.failure_detail()))
    }

    async fn has_session(&self, target: &PaneTarget) -> Result<(), AdapterError> {
        let rendered = target.to_tmux_target();
        let args = vec![
            "has-session".into(),
            "-t".into(),
            target.session_name().to_string(),
        ];
        let output = self.invoke(args, Some(&rendered)).await?;
        require_target(&rendered, &output)?;
        // has-session ignores window and pane indices.
        if target.window().is_some() {
            let output = self
                .invoke(build_resolve_target_args(&rendered), Some(&rendered))
                .await?;
            require_target(&rendered, &output)?;
        }
        Ok(())
    }

    async fn send_keys(
        &self,
        target: &PaneTarget,
        text: &str,
        submit_enter: bool,
    ) -> Result<(), AdapterError> {
        let rendered = target.to_tmux_target();
        if !text.is_empty() {
            self.invoke_targeted(build_send_literal_args(&rendered, text), &rendered)
                .await?;
        }
        if submit_enter {
            self.invoke_targeted(build_send_enter_args(&rendered), &rendered)
                .await?;
        }
        Ok(())
    }

    async fn capture_pane(
        &self,
        target: &PaneTarget,
        max_lines: Option<usize>,
    ) -> Result<String, AdapterError> {
        let rendered = target.to_tmux_target();
        let stdout = self
            .invoke_targeted(build_capture_pane_args(&rendered, max_lines), &rendered)
            .await?;
        Ok(keep_last_lines(&trim_trailing_blank_lines(&stdout), max_lines))
    }
}
