//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Command-line flags (applied by the CLI after loading)
//! 2. Environment variables (`PANEBRIDGE_TMUX_BIN`, `PANEBRIDGE_TIMEOUT_SECS`,
//!    `PANEBRIDGE_POLL_INTERVAL_MS`)
//! 3. TOML file specified via --config CLI flag
//! 4. ./panebridge.toml in the current directory
//! 5. $XDG_CONFIG_HOME/panebridge/panebridge.toml (or
//!    ~/.config/panebridge/panebridge.toml)
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use crate::engine::PromptPattern;
use crate::error::ConfigError;

mod defaults;
mod env;
mod sources;
mod types;

pub use types::{Config, ExecutionConfig, LoadedConfig, TmuxConfig};

use env::apply_env_overrides;
use sources::{config_root_dir, read_config_text_with_sources};

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&config_text)?;
    apply_env_overrides(&mut config, &env_lookup)?;
    validate(&config)?;
    tracing::debug!(source = ?source, "configuration loaded");
    Ok(LoadedConfig { config, source })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject settings the engine or adapter cannot run with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let tmux = &config.tmux;
    let execution = &config.execution;
    if tmux.binary.trim().is_empty() {
        return Err(ConfigError::Invalid("tmux.binary must not be empty".into()));
    }
    if execution.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "execution.timeout_secs must be greater than zero".into(),
        ));
    }
    let timeout_ms = execution.timeout_secs.saturating_mul(1000);
    if tmux.invocation_timeout_ms == 0 || tmux.invocation_timeout_ms >= timeout_ms {
        return Err(ConfigError::Invalid(format!(
            "tmux.invocation_timeout_ms ({}) must be greater than zero and below execution.timeout_secs ({}s)",
            tmux.invocation_timeout_ms, execution.timeout_secs
        )));
    }
    if execution.poll_interval_ms == 0 || execution.poll_interval_ms > timeout_ms {
        return Err(ConfigError::Invalid(format!(
            "execution.poll_interval_ms ({}) must be greater than zero and at most the timeout",
            execution.poll_interval_ms
        )));
    }
    if execution.history_lines == 0 {
        return Err(ConfigError::Invalid(
            "execution.history_lines must be greater than zero".into(),
        ));
    }
    PromptPattern::new(&execution.prompt_pattern)
        .map_err(|e| ConfigError::Invalid(format!("execution.prompt_pattern: {e}")))?;
    Ok(())
}
