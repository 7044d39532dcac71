//! Multiplexer adapter: a thin, fail-fast invoker of tmux control commands.
//!
//! Every operation is one (or, for submitted keystrokes, two) bounded
//! subprocess invocations. Failures are classified into [`AdapterError`]
//! kinds and surfaced; retry and poll policy belong to the engine.

mod adapter;
mod capture;
mod process;
mod send_keys;
mod sessions;
mod target;

use async_trait::async_trait;

use crate::error::AdapterError;

pub use adapter::{TmuxAdapter, TmuxSettings, DEFAULT_INVOCATION_TIMEOUT};
pub use sessions::SessionInfo;
pub use target::PaneTarget;

/// Capability set the engine needs from a terminal multiplexer.
///
/// [`TmuxAdapter`] is the real implementation; tests substitute scripted
/// panes that never spawn processes.
#[async_trait]
pub trait Multiplexer: Send + Sync {
    /// List sessions; "no server running" yields an empty list.
    async fn list_sessions(&self) -> Result<Vec<SessionInfo>, AdapterError>;

    /// Fail with `SessionNotFound` unless the target's session exists.
    async fn has_session(&self, target: &PaneTarget) -> Result<(), AdapterError>;

    /// Send `text` literally, then an Enter keystroke when `submit_enter`.
    async fn send_keys(
        &self,
        target: &PaneTarget,
        text: &str,
        submit_enter: bool,
    ) -> Result<(), AdapterError>;

    /// Pane text oldest-to-newest, trailing blank lines trimmed. `None`
    /// requests the full scrollback.
    async fn capture_pane(
        &self,
        target: &PaneTarget,
        max_lines: Option<usize>,
    ) -> Result<String, AdapterError>;
}
