//! `InputState` error taxonomy: external-editor and buffer failures that
//! degrade gracefully rather than unwind the editor (spec §7).

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("$EDITOR invocation failed: {0}")]
    EditorFailed(String),
    #[error("window too small to render the input line")]
    WindowTooSmall,
}

pub type Result<T> = std::result::Result<T, StateError>;
