//! Raw-mode terminal control.
//!
//! Wraps crossterm's raw-mode switch in a scoped guard so the terminal's
//! original attributes are restored on every exit path, including errors
//! and panics that unwind through `main`.

use std::io;

use crossterm::terminal;
use crossterm::tty::IsTty;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum TermError {
    #[error("standard input is not a terminal")]
    NotATty,

    #[error("failed to enable raw mode: {0}")]
    EnterRawMode(#[source] io::Error),
}

/// Scoped raw-mode switch.
///
/// While the guard is alive the terminal is in raw mode: no line buffering,
/// no echo, no signal-generating control characters. Dropping the guard
/// restores the previous mode.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Capture the current terminal mode and switch to raw mode.
    ///
    /// Fails before any connection attempt is made when stdin is not a
    /// terminal or the platform refuses the mode change.
    pub fn enter() -> Result<Self, TermError> {
        if !io::stdin().is_tty() {
            return Err(TermError::NotATty);
        }
        terminal::enable_raw_mode().map_err(TermError::EnterRawMode)?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("failed to restore terminal mode: {}", e);
        }
    }
}
