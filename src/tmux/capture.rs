//! `tmux capture-pane` argument building and output normalization.

/// Build `capture-pane` arguments for the given history bound.
///
/// `-J` joins soft-wrapped lines so a long typed command stays on one line.
/// Without `max_lines` the whole scrollback is requested.
pub(crate) fn build_capture_pane_args(target: &str, max_lines: Option<usize>) -> Vec<String> {
    let start = match max_lines {
        Some(lines) => format!("-{lines}"),
        None => "-".to_string(),
    };
    vec![
        "capture-pane".into(),
        "-p".into(),
        "-J".into(),
        "-t".into(),
        target.into(),
        "-S".into(),
        start,
    ]
}

/// Drop the blank rows tmux pads below the cursor, keeping line order.
pub(crate) fn trim_trailing_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let keep = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |idx| idx + 1);
    lines[..keep].join("\n")
}

/// Keep only the most recent `max_lines` lines.
///
/// `-S -N` starts N lines into history and still returns the whole visible
/// screen below it, so the result is bounded again after trimming.
pub(crate) fn keep_last_lines(text: &str, max_lines: Option<usize>) -> String {
    let Some(limit) = max_lines else {
        return text.to_string();
    };
    let lines: Vec<&str> = text.lines().collect();
    let skip = lines.len().saturating_sub(limit);
    lines[skip..].join("\n")
}
