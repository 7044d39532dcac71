//! Environment overrides.

use crate::error::ConfigError;

use super::Config;

pub(super) const ENV_TMUX_BIN: &str = "PANEBRIDGE_TMUX_BIN";
pub(super) const ENV_TIMEOUT_SECS: &str = "PANEBRIDGE_TIMEOUT_SECS";
pub(super) const ENV_POLL_INTERVAL_MS: &str = "PANEBRIDGE_POLL_INTERVAL_MS";

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(binary) = non_blank(env_lookup, ENV_TMUX_BIN) {
        config.tmux.binary = binary;
    }
    if let Some(raw) = non_blank(env_lookup, ENV_TIMEOUT_SECS) {
        config.execution.timeout_secs = parse_positive(ENV_TIMEOUT_SECS, &raw, "seconds")?;
    }
    if let Some(raw) = non_blank(env_lookup, ENV_POLL_INTERVAL_MS) {
        config.execution.poll_interval_ms =
            parse_positive(ENV_POLL_INTERVAL_MS, &raw, "milliseconds")?;
    }
    Ok(())
}

fn non_blank<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_positive(name: &str, raw: &str, unit: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::Invalid(format!(
            "invalid {name} value `{raw}`: expected positive integer {unit}"
        ))),
    }
}
