//! Bounded subprocess invocation for tmux control commands.

use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::textutil::truncate_with_suffix_by_chars;

/// Cap on diagnostic text carried into error details.
const MAX_DETAIL_CHARS: usize = 512;

/// Structured process output for one control-binary invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProcessOutput {
    pub(crate) exit_code: i32,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl ProcessOutput {
    pub(crate) fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Best diagnostic text: stderr, else stdout, else the exit status.
    pub(crate) fn failure_detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return truncate_with_suffix_by_chars(stderr, MAX_DETAIL_CHARS, "...");
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return truncate_with_suffix_by_chars(stdout, MAX_DETAIL_CHARS, "...");
        }
        format!("command exited with {}", self.exit_code)
    }
}

/// Why a process produced no output at all.
#[derive(Debug)]
pub(crate) enum ProcessFailure {
    Spawn(std::io::Error),
    TimedOut(Duration),
}

/// Spawn `program` and wait for it, killing it once `limit` elapses.
pub(crate) async fn run_process(
    program: &str,
    args: &[String],
    limit: Duration,
) -> Result<ProcessOutput, ProcessFailure> {
    let mut cmd = Command::new(program);
    // The timeout drops the wait future; the child must not outlive it.
    cmd.kill_on_drop(true);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let child = cmd.spawn().map_err(ProcessFailure::Spawn)?;
    let output = match timeout(limit, child.wait_with_output()).await {
        Ok(result) => result.map_err(ProcessFailure::Spawn)?,
        Err(_) => return Err(ProcessFailure::TimedOut(limit)),
    };

    Ok(ProcessOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Human-oriented duration formatting used in error messages.
pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    if secs == 0 {
        return format!("{millis}ms");
    }
    if millis == 0 {
        if secs % 3600 == 0 {
            return format!("{}h", secs / 3600);
        }
        if secs % 60 == 0 {
            return format!("{}m", secs / 60);
        }
        return format!("{secs}s");
    }
    format!("{secs}.{millis:03}s")
}
