//! CLI entry point for panebridge.

mod cli;

use clap::Parser;
use crossterm::style::{Color, Stylize};
use panebridge::config::{load_config, Config};
use panebridge::engine::{
    CommandRequest, Confidence, Engine, ExecutionResult, ExecutionStatus, PromptPattern,
};
use panebridge::error::BridgeError;
use panebridge::tmux::{PaneTarget, SessionInfo, TmuxAdapter, TmuxSettings};
use serde::Serialize;

/// Process exit code for a command that never finished.
const EXIT_TIMED_OUT: i32 = 124;
/// Process exit code when sentinel output could not be paired.
const EXIT_MARKER_NOT_FOUND: i32 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::Args::parse();
    init_tracing(!args.no_color);
    let color = !args.no_color;

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e}", paint("error:", Color::Red, color));
            1
        }
    };
    std::process::exit(code);
}

fn init_tracing(ansi: bool) {
    let filter = std::env::var("PANEBRIDGE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .init();
}

async fn run(args: cli::Args) -> Result<i32, BridgeError> {
    let loaded = load_config(args.config.as_deref())?;
    let config = loaded.config;
    let color = !args.no_color;

    match args.command {
        cli::Command::Sessions { json } => {
            let engine = build_engine(&config, config.tmux_settings(), None)?;
            let sessions = engine.list_sessions().await?;
            if json {
                print_json(&sessions)?;
            } else {
                print!("{}", render_sessions(&sessions));
            }
            Ok(0)
        }
        cli::Command::Exec(opts) => {
            let target = PaneTarget::parse(&opts.target)?;
            let request = CommandRequest::new(
                opts.command,
                opts.timeout.unwrap_or_else(|| config.timeout()),
                opts.poll_interval.unwrap_or_else(|| config.poll_interval()),
                config.execution.marker_mode && !opts.no_markers,
            )?;
            let engine = build_engine(
                &config,
                config.tmux_settings_for(request.timeout()),
                opts.prompt_pattern.as_deref(),
            )?;
            let result = engine.execute(&target, &request).await?;
            if opts.json {
                print_json(&result)?;
            } else {
                for line in &result.output {
                    println!("{line}");
                }
                eprintln!("{}", status_line(&result, color));
            }
            Ok(exit_code_for(&result))
        }
        cli::Command::Capture { target, lines } => {
            let target = PaneTarget::parse(&target)?;
            let engine = build_engine(&config, config.tmux_settings(), None)?;
            for line in engine.read_buffer(&target, lines).await? {
                println!("{line}");
            }
            Ok(0)
        }
        cli::Command::Send {
            target,
            text,
            no_enter,
        } => {
            let target = PaneTarget::parse(&target)?;
            let engine = build_engine(&config, config.tmux_settings(), None)?;
            engine.send_raw(&target, &text, !no_enter).await?;
            Ok(0)
        }
    }
}

fn build_engine(
    config: &Config,
    tmux: TmuxSettings,
    prompt_pattern: Option<&str>,
) -> Result<Engine<TmuxAdapter>, BridgeError> {
    let mut options = config.engine_options()?;
    if let Some(pattern) = prompt_pattern {
        options.prompt_pattern = PromptPattern::new(pattern)?;
    }
    Ok(Engine::new(TmuxAdapter::new(tmux), options))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), BridgeError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_sessions(sessions: &[SessionInfo]) -> String {
    let width = sessions.iter().map(|s| s.name.len()).max().unwrap_or(0);
    sessions
        .iter()
        .map(|s| {
            let attached = if s.attached { " (attached)" } else { "" };
            format!("{:<width$}  {} windows{attached}\n", s.name, s.windows)
        })
        .collect()
}

/// Remote exit status on completion, fixed codes otherwise.
fn exit_code_for(result: &ExecutionResult) -> i32 {
    match result.status {
        ExecutionStatus::Completed => result.exit_code.unwrap_or(0),
        ExecutionStatus::TimedOut => EXIT_TIMED_OUT,
        ExecutionStatus::MarkerNotFound => EXIT_MARKER_NOT_FOUND,
    }
}

fn status_line(result: &ExecutionResult, color: bool) -> String {
    let secs = result.elapsed.as_secs_f64();
    let mut line = match result.status {
        ExecutionStatus::Completed => {
            let exit = result
                .exit_code
                .map_or_else(|| "?".to_string(), |code| code.to_string());
            let tint = if result.exit_code.unwrap_or(0) == 0 {
                Color::Green
            } else {
                Color::Yellow
            };
            format!("{} exit={exit} in {secs:.2}s", paint("completed", tint, color))
        }
        ExecutionStatus::TimedOut => format!(
            "{} after {secs:.2}s; the command may still be running",
            paint("timed out", Color::Red, color)
        ),
        ExecutionStatus::MarkerNotFound => format!(
            "{} after {secs:.2}s; output start scrolled out of the capture",
            paint("marker not found", Color::Red, color)
        ),
    };
    if result.confidence == Confidence::Heuristic {
        line.push_str(" (heuristic boundaries)");
    }
    line
}

fn paint(text: &str, tint: Color, color: bool) -> String {
    if color {
        text.with(tint).to_string()
    } else {
        text.to_string()
    }
}
