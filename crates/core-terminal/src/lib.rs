//! Terminal I/O primitives (spec §4.A): raw/sane-mode switching, CSI/OSC
//! emission, cursor queries, window-size sensing, SIGWINCH capture.
//!
//! Generalizes the `oxidized` `CrosstermBackend`/`TerminalGuard` split into a
//! hand-rolled backend: the spec requires a `VMIN=0,VTIME=1` read poll that
//! crossterm's raw mode does not expose, so raw mode and byte reads here go
//! straight through `termios`/`libc` (grounded in `james-shell`'s
//! EINTR-retry idiom and `vtio`'s `vtcmd` terminal-command crate).

pub mod ansi;
pub mod error;
pub mod raw;
pub mod winsize;

pub use error::{Result, TerminalError};

use raw::RawMode;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Owns the terminal's raw-mode/alt-screen/KKBP/bracketed-paste state for one
/// session and guarantees teardown in LIFO order on drop, per spec §4.A.
pub struct Terminal {
    raw: RawMode,
    /// Reversal actions pushed as each feature is entered; popped on `leave`.
    undo: Vec<&'static str>,
    kkbp_active: bool,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            raw: RawMode::new(),
            undo: Vec::new(),
            kkbp_active: false,
        }
    }

    /// Enter the session: raw mode, alt screen, KKBP (if detected available
    /// by the caller — detection itself lives in `core-keys`), bracketed
    /// paste, hidden cursor. Idempotent.
    pub fn enter(&mut self, kkbp_available: bool) -> Result<()> {
        self.raw.enable()?;
        winsize::install_sigwinch_handler();
        tracing::debug!(kkbp_available, "terminal session entered");

        let mut out = io::stdout();
        write!(out, "\x1b7{}", ansi::ENTER_ALT_SCREEN)?;
        self.undo.push(ansi::LEAVE_ALT_SCREEN);

        if kkbp_available {
            write!(out, "\x1b[>1u\x1b[=15;1u")?;
            self.kkbp_active = true;
            self.undo.push("\x1b[<u");
        }

        write!(out, "{}", ansi::ENABLE_BRACKETED_PASTE)?;
        self.undo.push(ansi::DISABLE_BRACKETED_PASTE);

        write!(out, "{}", ansi::hide_cursor())?;
        self.undo.push(ansi::show_cursor());

        out.flush()?;
        Ok(())
    }

    /// Reverse every change made by `enter`, in LIFO order, then restore
    /// canonical line discipline.
    pub fn leave(&mut self) -> Result<()> {
        let mut out = io::stdout();
        while let Some(seq) = self.undo.pop() {
            write!(out, "{seq}")?;
        }
        write!(out, "\x1b8")?;
        out.flush()?;
        self.kkbp_active = false;
        self.raw.disable()?;
        Ok(())
    }

    pub fn kkbp_active(&self) -> bool {
        self.kkbp_active
    }

    pub fn window_size(&self) -> Result<(u16, u16)> {
        winsize::window_size()
    }

    /// Latched-and-clear resize flag set by the SIGWINCH handler.
    pub fn resized(&self) -> bool {
        winsize::resized()
    }

    /// Query the cursor position via `ESC [ 6 n`, reading the reply with a
    /// bounded number of VTIME polls. Fails with `TerminalQueryFailed` if the
    /// terminal never replies within the budget.
    pub fn cursor_position(&self) -> Result<(u16, u16)> {
        let mut out = io::stdout();
        write!(out, "{}", ansi::QUERY_CURSOR_POSITION)?;
        out.flush()?;

        let deadline = Instant::now() + Duration::from_millis(500);
        let mut reply = Vec::with_capacity(16);
        loop {
            if Instant::now() >= deadline {
                tracing::warn!("cursor position query timed out waiting for terminal reply");
                return Err(TerminalError::TerminalQueryFailed);
            }
            match raw::read_timeout_byte()? {
                Some(b) => {
                    reply.push(b);
                    if b == b'R' {
                        break;
                    }
                }
                None => continue,
            }
        }
        let text = String::from_utf8_lossy(&reply);
        let start = text.find("\x1b[").ok_or(TerminalError::TerminalQueryFailed)?;
        ansi::parse_cursor_position_reply(&text[start..]).ok_or_else(|| {
            tracing::warn!(reply = %text, "cursor position reply did not parse");
            TerminalError::TerminalQueryFailed
        })
    }

    /// Drops KKBP and bracketed paste before handing fds 0/1 to an attached
    /// child via `TIOCSCTTY` (spec §5 "Handoffs save/restore raw-mode and
    /// KKBP state"); `resume_after_handoff` restores them. Raw mode itself
    /// is left enabled — the attach loop still needs byte-at-a-time reads.
    pub fn pause_for_handoff(&mut self) -> Result<()> {
        let mut out = io::stdout();
        if self.kkbp_active {
            write!(out, "\x1b[<u")?;
        }
        write!(out, "{}", ansi::DISABLE_BRACKETED_PASTE)?;
        out.flush()?;
        Ok(())
    }

    /// Reverses `pause_for_handoff` once the editor has reacquired the
    /// terminal from an attached child.
    pub fn resume_after_handoff(&mut self) -> Result<()> {
        let mut out = io::stdout();
        if self.kkbp_active {
            write!(out, "\x1b[>1u\x1b[=15;1u")?;
        }
        write!(out, "{}", ansi::ENABLE_BRACKETED_PASTE)?;
        out.flush()?;
        Ok(())
    }

    pub fn set_title(&self, title: &str) -> Result<()> {
        let mut out = io::stdout();
        write!(out, "{}", ansi::title(title))?;
        out.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_terminal_has_no_pending_undo() {
        let term = Terminal::new();
        assert!(term.undo.is_empty());
        assert!(!term.kkbp_active());
    }
}
