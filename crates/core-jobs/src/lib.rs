//! PTY-backed background-job supervisor (spec §4.I): fork/exec over a PTY,
//! a detached logger child, and list/kill/attach/reap lifecycle management.

pub mod error;
pub mod job;
pub mod pty;
pub mod table;

pub use error::{JobError, Result};
pub use job::{JobStatus, JobView};
pub use table::{detach_key_from_env, JobOpts, JobTable, DEFAULT_DETACH_KEY};
