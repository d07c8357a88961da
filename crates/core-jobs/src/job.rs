//! `Job`: one PTY-backed background child (spec §3, §4.I).

use std::os::unix::io::RawFd;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Exited,
}

pub(crate) fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// An in-flight or finished background job.
pub struct Job {
    pub id: u32,
    pub pid: libc::pid_t,
    pub cmd: String,
    pub args: Vec<String>,
    pub log_path: Option<std::path::PathBuf>,
    pub(crate) master_fd: Option<RawFd>,
    pub(crate) logger_pid: libc::pid_t,
    pub status: JobStatus,
    pub exit_status: Option<i32>,
    pub started: i64,
    pub finished: Option<i64>,
}

/// Read-only snapshot of a `Job`, safe to hand out without exposing fds
/// (spec.md's "JobTable is an ordered map" plus the supplemented
/// `JobTable::snapshot()` introspection hook — see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobView {
    pub id: u32,
    pub pid: libc::pid_t,
    pub cmd: String,
    pub args: Vec<String>,
    pub log_path: Option<std::path::PathBuf>,
    pub status: JobStatus,
    pub exit_status: Option<i32>,
    pub started: i64,
    pub finished: Option<i64>,
}

impl From<&Job> for JobView {
    fn from(job: &Job) -> Self {
        JobView {
            id: job.id,
            pid: job.pid,
            cmd: job.cmd.clone(),
            args: job.args.clone(),
            log_path: job.log_path.clone(),
            status: job.status,
            exit_status: job.exit_status,
            started: job.started,
            finished: job.finished,
        }
    }
}
