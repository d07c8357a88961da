//! Opaque history store contract (spec §4.D): the core only ever appends
//! and queries, persistence is someone else's problem.

use crate::entry::HistoryEntry;
use crate::error::{HistoryError, Result};

pub trait HistoryStore {
    fn save_history_entry(&mut self, mode: &str, entry: &HistoryEntry) -> Result<()>;
    fn load_history(&mut self, mode: &str, max: Option<usize>) -> Result<Vec<HistoryEntry>>;
    fn close(&mut self);
}

/// Returned whenever the real store's connection failed; every operation
/// fails deterministically, so `History` can fall back to in-memory-only
/// behavior without the caller ever seeing an exception (spec §7).
#[derive(Debug, Default)]
pub struct NullStore;

impl HistoryStore for NullStore {
    fn save_history_entry(&mut self, _mode: &str, _entry: &HistoryEntry) -> Result<()> {
        Err(HistoryError::Unavailable("no store bound".into()))
    }

    fn load_history(&mut self, _mode: &str, _max: Option<usize>) -> Result<Vec<HistoryEntry>> {
        Err(HistoryError::Unavailable("no store bound".into()))
    }

    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_store_fails_every_operation() {
        let mut store = NullStore;
        assert!(store
            .save_history_entry(
                "shell",
                &HistoryEntry {
                    cmd: "ls".into(),
                    ts: 0,
                    duration: 0,
                    cwd: "~".into(),
                    exit: 0,
                    mode: "shell".into(),
                },
            )
            .is_err());
        assert!(store.load_history("shell", None).is_err());
    }
}
