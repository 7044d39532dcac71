//! Throwaway tmux server for the live regression suite.
//!
//! Each harness runs its own server on a private `-L` socket so tests never
//! touch the developer's sessions.

use std::process::Command;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use panebridge::tmux::{PaneTarget, TmuxSettings};

pub type HarnessResult<T> = Result<T, String>;

pub struct LiveTmux {
    socket_name: String,
    session_name: String,
}

impl LiveTmux {
    /// Start a detached session running a plain `sh` with a `$ ` prompt.
    pub fn start(label: &str) -> HarnessResult<Self> {
        command_exists("tmux")?;
        let suffix = unique_suffix();
        let harness = Self {
            socket_name: format!("panebridge-test-{suffix}"),
            session_name: format!("{label}-{suffix}"),
        };
        harness.run([
            "new-session",
            "-d",
            "-s",
            &harness.session_name,
            "-x",
            "200",
            "-y",
            "50",
            "env PS1='$ ' sh",
        ])?;
        // Let the shell print its first prompt.
        std::thread::sleep(Duration::from_millis(300));
        Ok(harness)
    }

    pub fn settings(&self) -> TmuxSettings {
        TmuxSettings {
            socket_name: Some(self.socket_name.clone()),
            ..TmuxSettings::default()
        }
    }

    pub fn target(&self) -> PaneTarget {
        PaneTarget::session(self.session_name.clone()).expect("valid session name")
    }

    fn run<const N: usize>(&self, args: [&str; N]) -> HarnessResult<String> {
        let output = Command::new("tmux")
            .arg("-L")
            .arg(&self.socket_name)
            .args(args)
            .output()
            .map_err(|e| format!("failed to run tmux: {e}"))?;
        if !output.status.success() {
            return Err(format!(
                "tmux {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Drop for LiveTmux {
    fn drop(&mut self) {
        let _ = self.run(["kill-server"]);
    }
}

fn command_exists(program: &str) -> HarnessResult<()> {
    let found = Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {program} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false);
    if found {
        Ok(())
    } else {
        Err(format!("required tool `{program}` is not on PATH"))
    }
}

fn unique_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("{}-{now}", std::process::id())
}
