//! Raw/sane terminal mode switching over fd 0 (spec §4.A).
//!
//! Raw mode disables canonical line discipline and local echo, and shortens
//! reads to a 100ms poll (`VMIN=0, VTIME=1`) so the decoder can interleave
//! with SIGWINCH/job-exit checks between keystrokes (spec §5).

use crate::error::{Result, TerminalError};
use std::os::unix::io::RawFd;

const STDIN: RawFd = libc::STDIN_FILENO;

fn tcgetattr(fd: RawFd) -> Result<libc::termios> {
    unsafe {
        if libc::isatty(fd) != 1 {
            return Err(TerminalError::TerminalUnavailable);
        }
        let mut term: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &mut term) != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        Ok(term)
    }
}

fn tcsetattr(fd: RawFd, term: &libc::termios) -> Result<()> {
    loop {
        let rc = unsafe { libc::tcsetattr(fd, libc::TCSANOW, term) };
        if rc == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EINTR) {
            continue;
        }
        return Err(err.into());
    }
}

/// Raw-mode guard; idempotent `enable`/`disable`, restores the original
/// termios settings captured at construction on `disable`.
pub struct RawMode {
    original: Option<libc::termios>,
}

impl Default for RawMode {
    fn default() -> Self {
        Self::new()
    }
}

impl RawMode {
    pub fn new() -> Self {
        Self { original: None }
    }

    pub fn is_raw(&self) -> bool {
        self.original.is_some()
    }

    /// Enter raw mode. No-op if already raw.
    pub fn enable(&mut self) -> Result<()> {
        if self.original.is_some() {
            return Ok(());
        }
        let original = tcgetattr(STDIN)?;
        let mut raw = original;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG | libc::IEXTEN);
        raw.c_iflag &= !(libc::ICRNL | libc::IXON);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 1;
        tcsetattr(STDIN, &raw)?;
        self.original = Some(original);
        Ok(())
    }

    /// Restore canonical line discipline. No-op if already sane.
    pub fn disable(&mut self) -> Result<()> {
        if let Some(original) = self.original.take() {
            tcsetattr(STDIN, &original)?;
        }
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = self.disable();
    }
}

/// Read a single byte from fd 0, honoring the `VTIME=1` (100ms) poll set by
/// `RawMode::enable`. Returns `Ok(None)` on timeout (no byte available),
/// never blocking longer than one tick — this is the suspension point the
/// controller interleaves SIGWINCH/job polling around (spec §5).
pub fn read_timeout_byte() -> Result<Option<u8>> {
    let mut byte: u8 = 0;
    loop {
        let n = unsafe {
            libc::read(
                STDIN,
                &mut byte as *mut u8 as *mut libc::c_void,
                1,
            )
        };
        if n == 1 {
            return Ok(Some(byte));
        }
        if n == 0 {
            return Ok(None);
        }
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EINTR) {
            continue;
        }
        return Err(err.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_guard_reports_not_raw() {
        let guard = RawMode::new();
        assert!(!guard.is_raw());
    }

    // Enabling/disabling real raw mode requires an attached tty and is
    // exercised by the integration harness under a pty, not unit tests.
}
