//! History store error taxonomy (spec §7): a connection failure degrades to
//! a stub store, it never surfaces as a panic.

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
