//! Panebridge: run commands inside already-authenticated tmux panes and read
//! back their output.
//!
//! The [`engine`] wraps each command in per-call sentinel markers, polls the
//! pane through a [`tmux::Multiplexer`], and slices the output between the
//! markers. A prompt-pattern fallback covers shells that cannot echo markers.
//!
//! # Quick start
//!
//! ```no_run
//! use std::time::Duration;
//! use panebridge::engine::{CommandRequest, Engine, EngineOptions};
//! use panebridge::tmux::{PaneTarget, TmuxAdapter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::new(TmuxAdapter::default(), EngineOptions::default());
//! let target = PaneTarget::parse("dev:0.1")?;
//! let request = CommandRequest::new(
//!     "uname -a",
//!     Duration::from_secs(10),
//!     Duration::from_millis(200),
//!     true,
//! )?;
//! let result = engine.execute(&target, &request).await?;
//! println!("{}", result.output_text());
//! # Ok(())
//! # }
//! ```

pub mod build_info;
pub mod config;
pub mod engine;
pub mod error;
#[cfg(test)]
pub mod testsupport;
pub mod textutil;
pub mod tmux;
