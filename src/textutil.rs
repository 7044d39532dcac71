//! Text cleanup helpers for captured pane content.
//!
//! Captures may carry display-only escape sequences (colors, title updates)
//! when panes run programs that emit them. Detection and extraction work on
//! plain text, so every capture passes through [`strip_ansi`] first.

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Remove terminal escape sequences, leaving only the text payload.
///
/// Handles CSI (including SGR styling), OSC/DCS/APC/PM/SOS string sequences
/// terminated by BEL or ST, charset designations, and two-byte escapes.
/// Output never contains `ESC`, so stripping is idempotent.
pub fn strip_ansi(text: &str) -> String {
    if !text.contains(ESC) {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ESC {
            result.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('[') => {
                chars.next();
                // Parameter and intermediate bytes run until a final byte in @..~.
                for nc in chars.by_ref() {
                    if ('@'..='~').contains(&nc) {
                        break;
                    }
                }
            }
            Some(']' | 'P' | 'X' | '^' | '_') => {
                chars.next();
                while let Some(nc) = chars.next() {
                    if nc == BEL {
                        break;
                    }
                    if nc == ESC && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            Some('(' | ')' | '*' | '+') => {
                chars.next();
                chars.next();
            }
            Some(nc) if ('0'..='~').contains(&nc) => {
                chars.next();
            }
            _ => {}
        }
    }
    result
}

/// Truncate by characters and append `suffix` when truncation occurs.
pub fn truncate_with_suffix_by_chars(text: &str, max_chars: usize, suffix: &str) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let prefix: String = text.chars().take(max_chars).collect();
    format!("{prefix}{suffix}")
}

/// Drop blank lines from both ends of `lines`.
pub fn trim_blank_edges(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    let leading = lines
        .iter()
        .take_while(|line| line.trim().is_empty())
        .count();
    lines.drain(..leading);
}
