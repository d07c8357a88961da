//! `JobTable`: ordered `id -> Job` map plus the lifecycle operations of
//! spec §4.I (`start`, `list`, `reap`, `poll`, `kill`, `attach`).

use std::collections::BTreeMap;
use std::os::unix::io::RawFd;
use std::path::PathBuf;

use core_terminal::Terminal;

use crate::error::{JobError, Result};
use crate::job::{now_unix, Job, JobStatus, JobView};
use crate::pty;

/// Options accepted by `JobTable::start` (spec §4.I step 3).
#[derive(Debug, Clone, Default)]
pub struct JobOpts {
    /// When `false`, the logger still runs but discards output to
    /// `/dev/null` instead of `log_path`.
    pub log: bool,
}

/// ASCII code of the default attach detach key (`Ctrl-]`), overridable via
/// `LILUSH_JOB_DETACH_KEY` (spec §4.I, §6).
pub const DEFAULT_DETACH_KEY: u8 = 0x1D;

pub fn detach_key_from_env() -> u8 {
    std::env::var("LILUSH_JOB_DETACH_KEY")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .map(|v| v as u8)
        .unwrap_or(DEFAULT_DETACH_KEY)
}

#[derive(Default)]
pub struct JobTable {
    jobs: BTreeMap<u32, Job>,
    next_id: u32,
}

impl JobTable {
    pub fn new() -> Self {
        JobTable {
            jobs: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Allocates a PTY, forks the worker and a logger child, and tracks
    /// the result under a fresh monotonic id (spec §4.I steps 1–4).
    pub fn start(&mut self, cmd: &str, args: &[String], opts: JobOpts) -> Result<JobView> {
        let (master, slave_path) = pty::open_pty()?;
        let worker_pid = match pty::spawn_worker(master, &slave_path, cmd, args) {
            Ok(pid) => pid,
            Err(e) => {
                unsafe { libc::close(master) };
                return Err(e);
            }
        };

        let log_path = PathBuf::from(format!("/tmp/{}.log", pty::random_log_name()));
        let logger_pid = match pty::spawn_logger(master, &log_path, opts.log) {
            Ok(pid) => pid,
            Err(e) => {
                unsafe {
                    libc::kill(worker_pid, libc::SIGKILL);
                    libc::waitpid(worker_pid, std::ptr::null_mut(), 0);
                    libc::close(master);
                }
                return Err(e);
            }
        };

        let id = self.next_id;
        self.next_id += 1;
        let job = Job {
            id,
            pid: worker_pid,
            cmd: cmd.to_string(),
            args: args.to_vec(),
            log_path: if opts.log { Some(log_path) } else { None },
            master_fd: Some(master),
            logger_pid,
            status: JobStatus::Running,
            exit_status: None,
            started: now_unix(),
            finished: None,
        };
        let view = JobView::from(&job);
        self.jobs.insert(id, job);
        tracing::debug!(id, pid = worker_pid, cmd, "job started");
        Ok(view)
    }

    /// Insertion order (spec §4.I: `list()` returns entries in insertion
    /// order; `BTreeMap` keyed by the monotonic id already gives that).
    pub fn list(&self) -> Vec<JobView> {
        self.jobs.values().map(JobView::from).collect()
    }

    pub fn snapshot(&self) -> Vec<JobView> {
        self.list()
    }

    /// Non-blocking `waitpid` on every running job; records exit status
    /// and closes `master_fd`/reaps the logger on exit (spec §4.I).
    pub fn poll(&mut self) {
        for job in self.jobs.values_mut() {
            if job.status != JobStatus::Running {
                continue;
            }
            let mut status = 0;
            let rc = unsafe { libc::waitpid(job.pid, &mut status, libc::WNOHANG) };
            if rc == job.pid {
                let exit_status = decode_wait_status(status);
                job.status = JobStatus::Exited;
                job.exit_status = Some(exit_status);
                job.finished = Some(now_unix());
                if let Some(fd) = job.master_fd.take() {
                    unsafe { libc::close(fd) };
                }
                unsafe {
                    libc::waitpid(job.logger_pid, std::ptr::null_mut(), 0);
                }
                tracing::debug!(id = job.id, exit_status, "job exited");
            }
        }
    }

    /// Drops every entry whose `status == exited` (spec §4.I).
    pub fn reap(&mut self) {
        self.jobs.retain(|_, job| job.status != JobStatus::Exited);
    }

    pub fn kill(&mut self, id: u32, signal: i32) -> Result<()> {
        let job = self.jobs.get(&id).ok_or(JobError::UnknownJob(id))?;
        let rc = unsafe { libc::kill(job.pid, signal) };
        if rc != 0 {
            return Err(JobError::Io(std::io::Error::last_os_error()));
        }
        Ok(())
    }

    /// Foreground takeover (spec §4.I `attach`): stop the logger, hand the
    /// terminal's KKBP/bracketed-paste state over to the child (spec §5),
    /// proxy stdin/stdout against the job's PTY master until the detach key
    /// is seen or the job exits, then restore both.
    pub fn attach(&mut self, id: u32, detach_key: u8, terminal: &mut Terminal) -> Result<()> {
        let master = {
            let job = self.jobs.get(&id).ok_or(JobError::UnknownJob(id))?;
            if job.status != JobStatus::Running {
                return Err(JobError::NotRunning(id));
            }
            job.master_fd.ok_or(JobError::NotRunning(id))?
        };
        let (logger_pid, worker_pid) = {
            let job = &self.jobs[&id];
            (job.logger_pid, job.pid)
        };

        unsafe { libc::kill(logger_pid, libc::SIGSTOP) };
        terminal.pause_for_handoff()?;
        let result = attach_loop(master, worker_pid, detach_key);
        terminal.resume_after_handoff()?;
        unsafe { libc::kill(logger_pid, libc::SIGCONT) };
        result
    }
}

/// Proxies stdin <-> pty master until the detach key arrives on stdin or
/// the worker process exits (spec §4.I step 3, §5 "attach loop").
fn attach_loop(master: RawFd, worker_pid: libc::pid_t, detach_key: u8) -> Result<()> {
    const STDIN: RawFd = 0;
    const STDOUT: RawFd = 1;
    let mut buf = [0u8; 4096];

    loop {
        let mut status = 0;
        let rc = unsafe { libc::waitpid(worker_pid, &mut status, libc::WNOHANG) };
        if rc == worker_pid {
            return Ok(());
        }

        let mut fds = [
            libc::pollfd {
                fd: STDIN,
                events: libc::POLLIN,
                revents: 0,
            },
            libc::pollfd {
                fd: master,
                events: libc::POLLIN,
                revents: 0,
            },
        ];
        let n = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, 100) };
        if n < 0 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EINTR) {
                continue;
            }
            return Err(JobError::Io(err));
        }

        if fds[0].revents & libc::POLLIN != 0 {
            let r = unsafe { libc::read(STDIN, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
            if r > 0 {
                if buf[..r as usize].contains(&detach_key) {
                    return Ok(());
                }
                unsafe { libc::write(master, buf.as_ptr() as *const libc::c_void, r as usize) };
            }
        }

        if fds[1].revents & libc::POLLIN != 0 {
            let r = unsafe { libc::read(master, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
            if r > 0 {
                unsafe { libc::write(STDOUT, buf.as_ptr() as *const libc::c_void, r as usize) };
            } else if r == 0 {
                return Ok(());
            }
        }
    }
}

/// Decodes a `waitpid` status into the POSIX exit-status contract (spec §4.I,
/// §6): normal exit code, or `128+sig` for signal termination.
fn decode_wait_status(status: libc::c_int) -> i32 {
    unsafe {
        if libc::WIFEXITED(status) {
            libc::WEXITSTATUS(status)
        } else if libc::WIFSIGNALED(status) {
            128 + libc::WTERMSIG(status)
        } else {
            status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_lifecycle_runs_and_reaps() {
        let mut table = JobTable::new();
        let view = table
            .start("sleep", &["0".to_string()], JobOpts { log: false })
            .expect("start");
        assert_eq!(view.id, 1);
        assert_eq!(view.status, JobStatus::Running);

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        loop {
            table.poll();
            if table.list()[0].status == JobStatus::Exited {
                break;
            }
            if std::time::Instant::now() > deadline {
                panic!("job never exited");
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert_eq!(table.list()[0].exit_status, Some(0));

        table.reap();
        assert!(table.list().is_empty());
    }

    #[test]
    fn kill_unknown_job_errors() {
        let mut table = JobTable::new();
        assert!(table.kill(99, libc::SIGTERM).is_err());
    }

    #[test]
    fn list_is_insertion_order() {
        let mut table = JobTable::new();
        let a = table
            .start("sleep", &["0".to_string()], JobOpts { log: false })
            .unwrap();
        let b = table
            .start("sleep", &["0".to_string()], JobOpts { log: false })
            .unwrap();
        let ids: Vec<u32> = table.list().iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while table.list().iter().any(|j| j.status == JobStatus::Running) {
            table.poll();
            if std::time::Instant::now() > deadline {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        table.reap();
    }
}
