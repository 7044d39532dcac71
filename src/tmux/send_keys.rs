//! `tmux send-keys` argument building.

/// Literal text injection; `-l` disables key-name lookup and `--` stops tmux
/// from reading text that starts with `-` as a flag.
pub(crate) fn build_send_literal_args(target: &str, text: &str) -> Vec<String> {
    vec![
        "send-keys".into(),
        "-l".into(),
        "-t".into(),
        target.into(),
        "--".into(),
        text.into(),
    ]
}

/// Submit keystroke, sent as its own invocation after the literal payload.
pub(crate) fn build_send_enter_args(target: &str) -> Vec<String> {
    vec![
        "send-keys".into(),
        "-t".into(),
        target.into(),
        "Enter".into(),
    ]
}
