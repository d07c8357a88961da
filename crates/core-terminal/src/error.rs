//! Error taxonomy for terminal primitives (spec §7).

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// fd 0 is not a tty; raw mode was refused.
    #[error("terminal unavailable: stdin is not a tty")]
    TerminalUnavailable,

    /// A cursor-position (or other) query timed out without a reply.
    #[error("terminal query timed out before a reply was read")]
    TerminalQueryFailed,

    /// A write to the terminal failed; fatal to the enclosing session.
    #[error("terminal lost: {0}")]
    TerminalLost(#[source] io::Error),
}

impl From<io::Error> for TerminalError {
    fn from(err: io::Error) -> Self {
        TerminalError::TerminalLost(err)
    }
}

pub type Result<T> = std::result::Result<T, TerminalError>;
