//! Shared test fixtures: a scripted pane and a manually advanced clock.
//!
//! `ScriptedPane` behaves like a shell sitting at a `$` prompt. Typed text is
//! echoed onto the prompt line; submitted commands print their scripted
//! response once the configured number of captures has passed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::{Duration, Instant};

use crate::engine::Clock;
use crate::error::AdapterError;
use crate::tmux::{Multiplexer, PaneTarget, SessionInfo};

const PROMPT: &str = "$";
const START_OPEN: &str = "echo '__BRIDGE_'\"START_";
const END_OPEN: &str = "; echo '__BRIDGE_'\"END_";

#[derive(Debug, Clone)]
enum Script {
    Respond { lines: Vec<String>, exit_code: i32 },
    Hang { lines: Vec<String> },
    LoseStart { lines: Vec<String> },
}

#[derive(Debug, Default)]
struct PaneState {
    buffer: Vec<String>,
    pending: Option<(Vec<String>, usize)>,
}

/// In-memory pane that never spawns a process.
#[derive(Debug)]
pub struct ScriptedPane {
    session: String,
    scripts: HashMap<String, Script>,
    delay_polls: usize,
    fail_capture_after: Option<usize>,
    state: Mutex<PaneState>,
    captures: AtomicUsize,
    sends: AtomicUsize,
}

impl ScriptedPane {
    pub fn new(session: &str) -> Self {
        Self {
            session: session.to_string(),
            scripts: HashMap::new(),
            delay_polls: 0,
            fail_capture_after: None,
            state: Mutex::new(PaneState {
                buffer: vec![PROMPT.to_string()],
                pending: None,
            }),
            captures: AtomicUsize::new(0),
            sends: AtomicUsize::new(0),
        }
    }

    /// Lines already on screen above the prompt.
    pub fn with_history(self, lines: &[&str]) -> Self {
        {
            let mut state = self.state.lock().expect("pane state");
            let mut buffer: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
            buffer.push(PROMPT.to_string());
            state.buffer = buffer;
        }
        self
    }

    /// `command` prints `lines` and exits with `exit_code`.
    pub fn respond(mut self, command: &str, lines: &[&str], exit_code: i32) -> Self {
        self.scripts.insert(
            command.to_string(),
            Script::Respond {
                lines: to_owned(lines),
                exit_code,
            },
        );
        self
    }

    /// `command` prints `lines` and never returns to the prompt.
    pub fn hang(mut self, command: &str, lines: &[&str]) -> Self {
        self.scripts.insert(
            command.to_string(),
            Script::Hang {
                lines: to_owned(lines),
            },
        );
        self
    }

    /// `command` completes but its start sentinel has scrolled out of view.
    pub fn lose_start_sentinel(mut self, command: &str, lines: &[&str]) -> Self {
        self.scripts.insert(
            command.to_string(),
            Script::LoseStart {
                lines: to_owned(lines),
            },
        );
        self
    }

    /// Hold each response back for `polls` captures.
    pub fn with_delay_polls(mut self, polls: usize) -> Self {
        self.delay_polls = polls;
        self
    }

    /// Captures past the first `count` fail with `InvocationTimedOut`.
    pub fn fail_capture_after(mut self, count: usize) -> Self {
        self.fail_capture_after = Some(count);
        self
    }

    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn send_count(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    /// The pane is always `session:0.0`.
    fn check_session(&self, target: &PaneTarget) -> Result<(), AdapterError> {
        if target.session_name() != self.session {
            return Err(AdapterError::session_not_found(
                &target.to_tmux_target(),
                format!("can't find session: {}", target.session_name()),
            ));
        }
        if target.window().unwrap_or(0) != 0 || target.pane().unwrap_or(0) != 0 {
            return Err(AdapterError::session_not_found(
                &target.to_tmux_target(),
                format!("can't find pane: {}", target.to_tmux_target()),
            ));
        }
        Ok(())
    }

    fn run(&self, typed: &str) -> Vec<String> {
        match parse_wrapped(typed) {
            Some((token, command)) => {
                let start = format!("__BRIDGE_START_{token}__");
                let end = format!("__BRIDGE_END_{token}__");
                match self.script_for(&command) {
                    Script::Respond { lines, exit_code } => {
                        let mut out = vec![start];
                        out.extend(lines);
                        out.push(format!("{end} {exit_code}"));
                        out.push(PROMPT.to_string());
                        out
                    }
                    Script::Hang { lines } => {
                        let mut out = vec![start];
                        out.extend(lines);
                        out
                    }
                    Script::LoseStart { lines } => {
                        let mut out = lines;
                        out.push(format!("{end} 0"));
                        out.push(PROMPT.to_string());
                        out
                    }
                }
            }
            None => match self.script_for(typed) {
                Script::Respond { lines, .. } | Script::LoseStart { lines } => {
                    let mut out = lines;
                    out.push(PROMPT.to_string());
                    out
                }
                Script::Hang { lines } => lines,
            },
        }
    }

    fn script_for(&self, command: &str) -> Script {
        self.scripts
            .get(command)
            .cloned()
            .unwrap_or_else(|| Script::Respond {
                lines: vec![format!("sh: {command}: command not found")],
                exit_code: 127,
            })
    }
}

#[async_trait]
impl Multiplexer for ScriptedPane {
    async fn list_sessions(&self) -> Result<Vec<SessionInfo>, AdapterError> {
        Ok(vec![SessionInfo {
            name: self.session.clone(),
            attached: false,
            windows: 1,
        }])
    }

    async fn has_session(&self, target: &PaneTarget) -> Result<(), AdapterError> {
        self.check_session(target)
    }

    async fn send_keys(
        &self,
        target: &PaneTarget,
        text: &str,
        submit_enter: bool,
    ) -> Result<(), AdapterError> {
        self.check_session(target)?;
        self.sends.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().expect("pane state");
        if let Some(last) = state.buffer.last_mut() {
            if !text.is_empty() {
                last.push(' ');
                last.push_str(text);
            }
        }
        if submit_enter {
            let output = self.run(text);
            state.pending = Some((output, self.delay_polls));
        }
        Ok(())
    }

    async fn capture_pane(
        &self,
        target: &PaneTarget,
        max_lines: Option<usize>,
    ) -> Result<String, AdapterError> {
        self.check_session(target)?;
        let count = self.captures.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.lock().expect("pane state");
        if self.fail_capture_after.is_some_and(|limit| count > limit) {
            return Err(AdapterError::invocation_timed_out(
                Some(&target.to_tmux_target()),
                "capture-pane exceeded 5s",
            ));
        }
        match state.pending.take() {
            Some((lines, 0)) => state.buffer.extend(lines),
            Some((lines, remaining)) => state.pending = Some((lines, remaining - 1)),
            None => {}
        }
        let skip = max_lines.map_or(0, |n| state.buffer.len().saturating_sub(n));
        Ok(state.buffer[skip..].join("\n"))
    }
}

/// Token and unquoted command from a typed marker line.
fn parse_wrapped(typed: &str) -> Option<(String, String)> {
    let rest = typed.strip_prefix(START_OPEN)?;
    let (token, rest) = rest.split_once("__\"; eval ")?;
    let end = rest.rfind(END_OPEN)?;
    let quoted = &rest[..end];
    let inner = quoted.strip_prefix('\'')?.strip_suffix('\'')?;
    Some((token.to_string(), inner.replace("'\\''", "'")))
}

fn to_owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

/// Clock whose `sleep` advances time instantly.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().expect("clock offset") += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock().expect("clock offset")
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ExecutionMarker;

    #[test]
    fn parses_wrapped_marker_line() {
        let marker = ExecutionMarker::generate();
        let typed = marker.wrap_command("echo 'it''s'");
        let (token, command) = parse_wrapped(&typed).expect("wrapped line");
        assert_eq!(token, marker.token());
        assert_eq!(command, "echo 'it''s'");
        assert!(parse_wrapped("ls -la").is_none());
    }

    #[test]
    fn manual_clock_advances_on_sleep() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now() - start, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn submitted_command_echoes_then_responds() {
        let pane = ScriptedPane::new("dev").respond("uptime", &["up 3 days"], 0);
        let target = PaneTarget::session("dev").expect("target");
        pane.send_keys(&target, "uptime", true).await.expect("send");
        let text = pane.capture_pane(&target, None).await.expect("capture");
        assert_eq!(text, "$ uptime\nup 3 days\n$");
    }
}
