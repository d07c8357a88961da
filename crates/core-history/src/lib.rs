//! Append-only ranked command history with a pluggable, opaque store.

pub mod entry;
pub mod error;
pub mod history;
pub mod store;

pub use entry::HistoryEntry;
pub use error::{HistoryError, Result};
pub use history::History;
pub use store::{HistoryStore, NullStore};
