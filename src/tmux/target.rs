//! Pane addressing in tmux `session[:window[.pane]]` syntax.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::RequestError;

/// Identifies one tmux pane (or the active pane of a session/window).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PaneTarget {
    session: String,
    window: Option<u32>,
    pane: Option<u32>,
}

impl PaneTarget {
    /// Target the active pane of `session`.
    pub fn session(name: impl Into<String>) -> Result<Self, RequestError> {
        Self::new(name, None, None)
    }

    pub fn new(
        session: impl Into<String>,
        window: Option<u32>,
        pane: Option<u32>,
    ) -> Result<Self, RequestError> {
        let session = session.into();
        if session.trim().is_empty() {
            return Err(RequestError::InvalidTarget(
                "session name must not be empty".into(),
            ));
        }
        // tmux reserves these as target separators.
        if session.contains([':', '.']) {
            return Err(RequestError::InvalidTarget(format!(
                "session name `{session}` must not contain `:` or `.`"
            )));
        }
        if pane.is_some() && window.is_none() {
            return Err(RequestError::InvalidTarget(
                "a pane index requires a window index".into(),
            ));
        }
        Ok(Self {
            session,
            window,
            pane,
        })
    }

    /// Parse `session`, `session:window`, or `session:window.pane`.
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let raw = raw.trim();
        let Some((session, rest)) = raw.split_once(':') else {
            return Self::session(raw);
        };
        let (window_raw, pane_raw) = match rest.split_once('.') {
            Some((window, pane)) => (window, Some(pane)),
            None => (rest, None),
        };
        let window = parse_index(window_raw, "window")?;
        let pane = pane_raw
            .map(|value| parse_index(value, "pane"))
            .transpose()?;
        Self::new(session, Some(window), pane)
    }

    pub fn session_name(&self) -> &str {
        &self.session
    }

    pub fn window(&self) -> Option<u32> {
        self.window
    }

    pub fn pane(&self) -> Option<u32> {
        self.pane
    }

    /// Render the `-t` argument tmux expects.
    pub fn to_tmux_target(&self) -> String {
        match (self.window, self.pane) {
            (Some(window), Some(pane)) => format!("{}:{window}.{pane}", self.session),
            (Some(window), None) => format!("{}:{window}", self.session),
            _ => self.session.clone(),
        }
    }
}

fn parse_index(raw: &str, what: &str) -> Result<u32, RequestError> {
    raw.trim().parse::<u32>().map_err(|_| {
        RequestError::InvalidTarget(format!("{what} index `{raw}` is not a non-negative integer"))
    })
}

impl fmt::Display for PaneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tmux_target())
    }
}

impl FromStr for PaneTarget {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
