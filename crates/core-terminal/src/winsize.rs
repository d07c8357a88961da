//! Window-size sensing and SIGWINCH latch (spec §4.A, §5).

use crate::error::Result;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};

static RESIZED: AtomicBool = AtomicBool::new(false);
static CACHED_ROWS: AtomicU16 = AtomicU16::new(0);
static CACHED_COLS: AtomicU16 = AtomicU16::new(0);

/// Query the current (rows, cols) directly via `TIOCGWINSZ`.
pub fn window_size() -> Result<(u16, u16)> {
    unsafe {
        let mut ws: libc::winsize = std::mem::zeroed();
        if libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        Ok((ws.ws_row, ws.ws_col))
    }
}

extern "C" fn on_sigwinch(_signo: libc::c_int) {
    // Caching rows/cols here trades strict async-signal-safety (ioctl is not
    // on the POSIX async-signal-safe list) for the simplicity the spec calls
    // for; the single-threaded cooperative loop never re-enters this handler
    // concurrently with itself, and the worst case is one stale poll.
    if let Ok((rows, cols)) = window_size() {
        CACHED_ROWS.store(rows, Ordering::Relaxed);
        CACHED_COLS.store(cols, Ordering::Relaxed);
    }
    RESIZED.store(true, Ordering::SeqCst);
}

/// Install the SIGWINCH handler. Call once per session.
pub fn install_sigwinch_handler() {
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = on_sigwinch as usize;
        libc::sigemptyset(&mut action.sa_mask);
        action.sa_flags = libc::SA_RESTART;
        libc::sigaction(libc::SIGWINCH, &action, std::ptr::null_mut());
    }
    if let Ok((rows, cols)) = window_size() {
        CACHED_ROWS.store(rows, Ordering::Relaxed);
        CACHED_COLS.store(cols, Ordering::Relaxed);
    }
}

/// Latched-and-clear: true at most once per resize, until the next poll.
pub fn resized() -> bool {
    RESIZED.swap(false, Ordering::SeqCst)
}

/// Last size cached by the handler (or by `install_sigwinch_handler`).
pub fn cached_size() -> (u16, u16) {
    (
        CACHED_ROWS.load(Ordering::Relaxed),
        CACHED_COLS.load(Ordering::Relaxed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resized_latches_and_clears() {
        RESIZED.store(true, Ordering::SeqCst);
        assert!(resized());
        assert!(!resized());
    }
}
