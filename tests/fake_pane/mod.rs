//! In-memory pane for driving the public engine API without tmux.
//!
//! Submitted lines are echoed after the prompt and answered synchronously by
//! a responder closure, the way a fast shell would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use panebridge::error::AdapterError;
use panebridge::tmux::{Multiplexer, PaneTarget, SessionInfo};

pub const PROMPT: &str = "user@host:~$";

type Responder = Box<dyn Fn(&str) -> Vec<String> + Send + Sync>;

pub struct ReplayPane {
    session: String,
    buffer: Mutex<Vec<String>>,
    responder: Responder,
    captures: AtomicUsize,
}

impl ReplayPane {
    pub fn new(
        session: &str,
        responder: impl Fn(&str) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            session: session.to_string(),
            buffer: Mutex::new(vec![PROMPT.to_string()]),
            responder: Box::new(responder),
            captures: AtomicUsize::new(0),
        }
    }

    /// Replace the screen contents above the prompt.
    pub fn with_scrollback(self, lines: &[&str]) -> Self {
        {
            let mut buffer = self.buffer.lock().expect("buffer");
            *buffer = lines.iter().map(|l| l.to_string()).collect();
            buffer.push(PROMPT.to_string());
        }
        self
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    fn check(&self, target: &PaneTarget) -> Result<(), AdapterError> {
        if target.session_name() == self.session {
            Ok(())
        } else {
            Err(AdapterError::session_not_found(
                &target.to_tmux_target(),
                format!("can't find session: {}", target.session_name()),
            ))
        }
    }
}

#[async_trait]
impl Multiplexer for ReplayPane {
    async fn list_sessions(&self) -> Result<Vec<SessionInfo>, AdapterError> {
        Ok(vec![SessionInfo {
            name: self.session.clone(),
            attached: true,
            windows: 1,
        }])
    }

    async fn has_session(&self, target: &PaneTarget) -> Result<(), AdapterError> {
        self.check(target)
    }

    async fn send_keys(
        &self,
        target: &PaneTarget,
        text: &str,
        submit_enter: bool,
    ) -> Result<(), AdapterError> {
        self.check(target)?;
        let mut buffer = self.buffer.lock().expect("buffer");
        if let Some(last) = buffer.last_mut() {
            last.push(' ');
            last.push_str(text);
        }
        if submit_enter {
            let reply = (self.responder)(text);
            buffer.extend(reply);
        }
        Ok(())
    }

    async fn capture_pane(
        &self,
        target: &PaneTarget,
        max_lines: Option<usize>,
    ) -> Result<String, AdapterError> {
        self.check(target)?;
        self.captures.fetch_add(1, Ordering::SeqCst);
        let buffer = self.buffer.lock().expect("buffer");
        let skip = max_lines.map_or(0, |n| buffer.len().saturating_sub(n));
        Ok(buffer[skip..].join("\n"))
    }
}

/// Token and unquoted command recovered from a typed marker line.
pub fn wrapped_parts(typed: &str) -> Option<(String, String)> {
    let token_start = typed.find("\"START_")? + "\"START_".len();
    let token_end = token_start + typed[token_start..].find("__\"")?;
    let token = typed[token_start..token_end].to_string();

    let eval_start = typed.find("; eval '")? + "; eval ".len();
    let eval_end = typed.rfind("; echo '__BRIDGE_'")?;
    let quoted = &typed[eval_start..eval_end];
    let command = quoted
        .strip_prefix('\'')?
        .strip_suffix('\'')?
        .replace("'\\''", "'");
    Some((token, command))
}

/// Responder that prints `output` between the sentinels and exits `code`.
pub fn shell_reply(token: &str, output: &[&str], code: i32) -> Vec<String> {
    let mut lines = vec![format!("__BRIDGE_START_{token}__")];
    lines.extend(output.iter().map(|l| l.to_string()));
    lines.push(format!("__BRIDGE_END_{token}__ {code}"));
    lines.push(PROMPT.to_string());
    lines
}
