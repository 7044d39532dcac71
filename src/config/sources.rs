//! Config-file source discovery.
//!
//! Source order: explicit path > `./panebridge.toml` > global file > built-in
//! defaults.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

/// Read config text from the highest-precedence available source.
///
/// Returns empty text and no path when nothing was found.
pub(super) fn read_config_text_with_sources<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, Option<PathBuf>), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    // An explicit path must exist.
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((text, Some(path)));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if let Ok(text) = read_file(&local) {
        return Ok((text, Some(local)));
    }
    if let Some(dir) = config_root() {
        let global = dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        if let Ok(text) = read_file(&global) {
            return Ok((text, Some(global)));
        }
    }

    Ok((String::new(), None))
}

/// `$XDG_CONFIG_HOME`, else `~/.config`, else the platform config dir.
pub(super) fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}
