//! Decoder error taxonomy (spec §7).

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A CSI sequence did not match any recognized grammar; the caller
    /// should drop it and resync to the next ESC (spec §7).
    #[error("malformed CSI sequence: {0}")]
    MalformedCsi(String),
}
