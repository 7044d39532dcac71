//! `tmux list-sessions` output parsing.

use serde::Serialize;

/// One entry of `tmux list-sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub name: String,
    pub attached: bool,
    pub windows: u32,
}

/// Parse default-format lines: `<name>: <n> windows (created ...) [(attached)]`.
///
/// Lines without the `: <n> windows` shape are kept as bare names so custom
/// `-F '#{session_name}'` style output still yields usable descriptors.
pub(crate) fn parse_list_sessions(stdout: &str) -> Vec<SessionInfo> {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(parse_session_line)
        .collect()
}

fn parse_session_line(line: &str) -> SessionInfo {
    let Some((name, rest)) = line.split_once(": ") else {
        return SessionInfo {
            name: line.trim().to_string(),
            attached: false,
            windows: 0,
        };
    };
    let windows = rest
        .split_whitespace()
        .next()
        .and_then(|count| count.parse::<u32>().ok())
        .unwrap_or(0);
    SessionInfo {
        name: name.to_string(),
        attached: rest.contains("(attached)"),
        windows,
    }
}

/// Whether a failed list-sessions call just means "there are no sessions".
pub(crate) fn is_no_server_message(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("no server running")
        || lower.contains("error connecting to")
        || lower.contains("no sessions")
}
