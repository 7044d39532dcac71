//! CLI argument parsing via clap.

use std::time::Duration;

use clap::{Parser, Subcommand};
use panebridge::build_info::{HELP_BUILD_METADATA, LONG_VERSION};

/// Drive commands in existing tmux panes and harvest their output.
#[derive(Debug, Parser)]
#[command(
    name = "panebridge",
    version,
    long_version = LONG_VERSION,
    after_help = HELP_BUILD_METADATA
)]
pub struct Args {
    /// Path to config file (default: ./panebridge.toml or
    /// ~/.config/panebridge/panebridge.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tmux sessions.
    Sessions {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Run a command in a pane and wait for its output.
    Exec(ExecOpts),
    /// Print the pane's current buffer without ANSI styling.
    Capture {
        /// Pane target: `session[:window[.pane]]`.
        target: String,
        /// Number of trailing lines to print.
        #[arg(short = 'n', long)]
        lines: Option<usize>,
    },
    /// Type text into a pane without waiting for anything.
    Send {
        target: String,
        text: String,
        /// Do not press Enter after the text.
        #[arg(long)]
        no_enter: bool,
    },
}

#[derive(Debug, clap::Args)]
pub struct ExecOpts {
    /// Pane target: `session[:window[.pane]]`.
    pub target: String,
    /// Command line typed into the pane.
    pub command: String,
    /// Overall timeout in seconds (fractions allowed).
    #[arg(short = 't', long, value_parser = parse_seconds)]
    pub timeout: Option<Duration>,
    /// Delay between captures in seconds (fractions allowed).
    #[arg(long, value_parser = parse_seconds)]
    pub poll_interval: Option<Duration>,
    /// Detect completion by prompt pattern instead of sentinel markers.
    #[arg(long)]
    pub no_markers: bool,
    /// Regex matched against the last line in --no-markers mode.
    #[arg(long)]
    pub prompt_pattern: Option<String>,
    /// Print the full result as JSON.
    #[arg(long)]
    pub json: bool,
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    if secs <= 0.0 {
        return Err("must be greater than zero".to_string());
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}
