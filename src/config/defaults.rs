//! Default configuration values.

/// Control binary resolved through `PATH`.
pub(super) const DEFAULT_TMUX_BINARY: &str = "tmux";
/// Bound on a single tmux invocation.
pub(super) const DEFAULT_INVOCATION_TIMEOUT_MS: u64 = 5_000;
/// Overall per-command timeout.
pub(super) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(super) const DEFAULT_POLL_INTERVAL_MS: u64 = 200;
/// Scrollback lines captured per poll.
pub(super) const DEFAULT_HISTORY_LINES: usize = 2_000;
/// File name looked up in the working directory and the config root.
pub(super) const CONFIG_FILE_NAME: &str = "panebridge.toml";
/// Directory under the config root holding the global file.
pub(super) const CONFIG_DIR_NAME: &str = "panebridge";
