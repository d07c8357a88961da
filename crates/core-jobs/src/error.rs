//! Job supervisor error taxonomy (spec §7): these surface from `start` as
//! an error value, never as a panic of the enclosing editor.

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("failed to open pty: {0}")]
    PtyOpenFailed(String),

    #[error("fork failed: {0}")]
    ForkFailed(String),

    #[error("exec failed: {0}")]
    ExecFailed(String),

    #[error("unknown job id {0}")]
    UnknownJob(u32),

    #[error("job {0} is not running")]
    NotRunning(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Terminal(#[from] core_terminal::TerminalError),
}

pub type Result<T> = std::result::Result<T, JobError>;
