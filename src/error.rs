//! Unified error types for the bridge.

use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// AdapterError
// ---------------------------------------------------------------------------

/// Closed classification of tmux invocation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterErrorKind {
    /// Target session/window/pane does not exist at call time.
    SessionNotFound,
    /// tmux ran (or failed to spawn) and reported some other failure.
    InvocationFailed,
    /// A single tmux invocation exceeded its bounded subprocess timeout.
    InvocationTimedOut,
}

impl fmt::Display for AdapterErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionNotFound => write!(f, "session not found"),
            Self::InvocationFailed => write!(f, "invocation failed"),
            Self::InvocationTimedOut => write!(f, "invocation timed out"),
        }
    }
}

/// Failure surfaced by the multiplexer adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterError {
    pub kind: AdapterErrorKind,
    /// Rendered tmux target, when the failing call had one.
    pub target: Option<String>,
    /// Captured stderr or spawn error text.
    pub detail: String,
}

impl AdapterError {
    pub fn new(kind: AdapterErrorKind, target: Option<&str>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.map(str::to_string),
            detail: detail.into(),
        }
    }

    pub fn session_not_found(target: &str, detail: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::SessionNotFound, Some(target), detail)
    }

    pub fn invocation_failed(target: Option<&str>, detail: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::InvocationFailed, target, detail)
    }

    pub fn invocation_timed_out(target: Option<&str>, detail: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::InvocationTimedOut, target, detail)
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{} (target `{target}`)", self.kind)?,
            None => write!(f, "{}", self.kind)?,
        }
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for AdapterError {}

// ---------------------------------------------------------------------------
// ExecuteError
// ---------------------------------------------------------------------------

/// Adapter failure that aborted an in-progress `execute` call.
#[derive(Debug, Clone)]
pub struct ExecuteError {
    pub source: AdapterError,
    pub target: String,
    pub elapsed: Duration,
    /// Last ANSI-stripped capture taken before the failure, if any.
    pub last_snapshot: Option<String>,
}

impl ExecuteError {
    pub fn kind(&self) -> AdapterErrorKind {
        self.source.kind
    }
}

impl fmt::Display for ExecuteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "command on `{}` aborted after {}ms: {}",
            self.target,
            self.elapsed.as_millis(),
            self.source
        )
    }
}

impl std::error::Error for ExecuteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

// ---------------------------------------------------------------------------
// RequestError
// ---------------------------------------------------------------------------

/// Invalid caller-supplied parameters rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    InvalidTimeout,
    InvalidPollInterval { interval: Duration, timeout: Duration },
    InvalidTarget(String),
    InvalidPromptPattern(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimeout => write!(f, "timeout must be greater than zero"),
            Self::InvalidPollInterval { interval, timeout } => write!(
                f,
                "poll interval {}ms must be greater than zero and at most the timeout {}ms",
                interval.as_millis(),
                timeout.as_millis()
            ),
            Self::InvalidTarget(msg) => write!(f, "invalid pane target: {msg}"),
            Self::InvalidPromptPattern(msg) => write!(f, "invalid prompt pattern: {msg}"),
        }
    }
}

impl std::error::Error for RequestError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// BridgeError
// ---------------------------------------------------------------------------

/// Top-level error type for CLI surfaces.
#[derive(Debug)]
pub enum BridgeError {
    Config(ConfigError),
    Request(RequestError),
    Adapter(AdapterError),
    Execute(ExecuteError),
    /// Failed to render machine-readable output.
    Render(serde_json::Error),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Request(e) => write!(f, "request: {e}"),
            Self::Adapter(e) => write!(f, "tmux: {e}"),
            Self::Execute(e) => write!(f, "execute: {e}"),
            Self::Render(e) => write!(f, "render: {e}"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<ConfigError> for BridgeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<RequestError> for BridgeError {
    fn from(e: RequestError) -> Self {
        Self::Request(e)
    }
}

impl From<AdapterError> for BridgeError {
    fn from(e: AdapterError) -> Self {
        Self::Adapter(e)
    }
}

impl From<ExecuteError> for BridgeError {
    fn from(e: ExecuteError) -> Self {
        Self::Execute(e)
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Render(e)
    }
}
