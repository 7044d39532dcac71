//! Configuration data model.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::{EngineOptions, PromptPattern, DEFAULT_PROMPT_PATTERN};
use crate::error::ConfigError;
use crate::tmux::TmuxSettings;

use super::defaults::{
    DEFAULT_HISTORY_LINES, DEFAULT_INVOCATION_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TMUX_BINARY,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub tmux: TmuxConfig,
    pub execution: ExecutionConfig,
}

impl Config {
    /// Adapter construction parameters.
    pub fn tmux_settings(&self) -> TmuxSettings {
        TmuxSettings {
            binary: self.tmux.binary.clone(),
            socket_name: self.tmux.socket_name.clone(),
            socket_path: self.tmux.socket_path.clone(),
            invocation_timeout: Duration::from_millis(self.tmux.invocation_timeout_ms),
        }
    }

    /// Adapter parameters for a call bounded by `timeout`. The invocation
    /// timeout is clamped to half of it so one stalled tmux process cannot
    /// outlast the call.
    pub fn tmux_settings_for(&self, timeout: Duration) -> TmuxSettings {
        let mut settings = self.tmux_settings();
        settings.invocation_timeout = settings.invocation_timeout.min(timeout / 2);
        settings
    }

    /// Engine options; fails only when the prompt pattern does not compile.
    pub fn engine_options(&self) -> Result<EngineOptions, ConfigError> {
        let prompt_pattern = PromptPattern::new(&self.execution.prompt_pattern)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(EngineOptions {
            history_lines: Some(self.execution.history_lines),
            prompt_pattern,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.execution.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.execution.poll_interval_ms)
    }
}

/// `[tmux]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmuxConfig {
    pub binary: String,
    /// Passed as `-L`.
    pub socket_name: Option<String>,
    /// Passed as `-S`; wins over `socket_name`.
    pub socket_path: Option<String>,
    pub invocation_timeout_ms: u64,
}

impl Default for TmuxConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_TMUX_BINARY.to_string(),
            socket_name: None,
            socket_path: None,
            invocation_timeout_ms: DEFAULT_INVOCATION_TIMEOUT_MS,
        }
    }
}

/// `[execution]` section: defaults for `exec` calls.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecutionConfig {
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub history_lines: usize,
    /// Sentinel markers when true, prompt-pattern fallback otherwise.
    pub marker_mode: bool,
    pub prompt_pattern: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            history_lines: DEFAULT_HISTORY_LINES,
            marker_mode: true,
            prompt_pattern: DEFAULT_PROMPT_PATTERN.to_string(),
        }
    }
}

/// Configuration plus the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when built-in defaults were used.
    pub source: Option<PathBuf>,
}
