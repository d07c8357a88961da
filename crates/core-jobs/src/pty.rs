//! PTY allocation and the worker fork/exec (spec §4.I steps 1–2).
//!
//! Hand-rolled over `libc` rather than a PTY crate, for the same reason
//! `core-terminal::raw` hand-rolls `termios`: the worker side needs
//! `setsid`/`TIOCSCTTY` sequencing a higher-level PTY crate does not expose
//! in terms this spec can reason about.

use std::ffi::CString;
use std::os::unix::io::RawFd;

use crate::error::{JobError, Result};

/// Opens a PTY master, unlocks its companion slave, and returns the
/// master fd and the slave's device path (e.g. `/dev/pts/7`).
pub fn open_pty() -> Result<(RawFd, String)> {
    unsafe {
        let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
        if master < 0 {
            return Err(JobError::PtyOpenFailed(
                std::io::Error::last_os_error().to_string(),
            ));
        }
        if libc::grantpt(master) != 0 {
            let err = std::io::Error::last_os_error();
            libc::close(master);
            return Err(JobError::PtyOpenFailed(err.to_string()));
        }
        if libc::unlockpt(master) != 0 {
            let err = std::io::Error::last_os_error();
            libc::close(master);
            return Err(JobError::PtyOpenFailed(err.to_string()));
        }
        let name_ptr = libc::ptsname(master);
        if name_ptr.is_null() {
            let err = std::io::Error::last_os_error();
            libc::close(master);
            return Err(JobError::PtyOpenFailed(err.to_string()));
        }
        let slave_path = std::ffi::CStr::from_ptr(name_ptr)
            .to_string_lossy()
            .into_owned();
        Ok((master, slave_path))
    }
}

/// Forks the worker process: new session, slave PTY as fd 0/1/2, then
/// `execvp(cmd, args)` (spec §4.I step 2). Returns the child pid to the
/// parent; never returns in the child — it either execs or calls
/// `_exit(127)`.
pub fn spawn_worker(master: RawFd, slave_path: &str, cmd: &str, args: &[String]) -> Result<libc::pid_t> {
    let slave_cstr =
        CString::new(slave_path).map_err(|e| JobError::PtyOpenFailed(e.to_string()))?;
    let cmd_cstr = CString::new(cmd).map_err(|e| JobError::ExecFailed(e.to_string()))?;
    let mut arg_cstrs: Vec<CString> = Vec::with_capacity(args.len() + 1);
    arg_cstrs.push(cmd_cstr.clone());
    for a in args {
        arg_cstrs.push(CString::new(a.as_str()).map_err(|e| JobError::ExecFailed(e.to_string()))?);
    }
    let mut argv: Vec<*const libc::c_char> = arg_cstrs.iter().map(|c| c.as_ptr()).collect();
    argv.push(std::ptr::null());

    let pid = unsafe { libc::fork() };
    if pid < 0 {
        return Err(JobError::ForkFailed(
            std::io::Error::last_os_error().to_string(),
        ));
    }
    if pid == 0 {
        unsafe {
            libc::setsid();
            let slave_fd = libc::open(slave_cstr.as_ptr(), libc::O_RDWR);
            if slave_fd < 0 {
                libc::_exit(127);
            }
            libc::ioctl(slave_fd, libc::TIOCSCTTY as _, 0);
            libc::dup2(slave_fd, 0);
            libc::dup2(slave_fd, 1);
            libc::dup2(slave_fd, 2);
            if slave_fd > 2 {
                libc::close(slave_fd);
            }
            libc::close(master);
            libc::execvp(cmd_cstr.as_ptr(), argv.as_ptr());
            // execvp only returns on failure.
            libc::_exit(127);
        }
    }
    Ok(pid)
}

/// Forks the logger child: reads from `master` in 4 KiB chunks and writes
/// them to `log_path`, or discards entirely when `want_log` is false
/// (spec §4.I step 3). Exits cleanly on master EOF.
pub fn spawn_logger(master: RawFd, log_path: &std::path::Path, want_log: bool) -> Result<libc::pid_t> {
    let path = if want_log {
        log_path.to_path_buf()
    } else {
        std::path::PathBuf::from("/dev/null")
    };
    let path_cstr =
        CString::new(path.to_string_lossy().into_owned()).map_err(|e| JobError::PtyOpenFailed(e.to_string()))?;

    let pid = unsafe { libc::fork() };
    if pid < 0 {
        return Err(JobError::ForkFailed(
            std::io::Error::last_os_error().to_string(),
        ));
    }
    if pid == 0 {
        unsafe {
            let out_fd = libc::open(path_cstr.as_ptr(), libc::O_WRONLY | libc::O_CREAT | libc::O_APPEND, 0o600);
            let mut buf = [0u8; 4096];
            loop {
                let n = libc::read(master, buf.as_mut_ptr() as *mut libc::c_void, buf.len());
                if n <= 0 {
                    let err = std::io::Error::last_os_error();
                    if n < 0 && err.raw_os_error() == Some(libc::EINTR) {
                        continue;
                    }
                    break;
                }
                if out_fd >= 0 {
                    let mut written = 0isize;
                    while written < n {
                        let w = libc::write(
                            out_fd,
                            buf.as_ptr().add(written as usize) as *const libc::c_void,
                            (n - written) as usize,
                        );
                        if w <= 0 {
                            break;
                        }
                        written += w;
                    }
                }
            }
            if out_fd >= 0 {
                libc::close(out_fd);
            }
            libc::_exit(0);
        }
    }
    Ok(pid)
}

/// Random log-file name component (spec §4.I default `/tmp/<nanoid>.log`).
pub fn random_log_name() -> String {
    use rand::Rng;
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..21)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
