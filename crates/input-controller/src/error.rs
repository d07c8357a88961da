//! Controller error taxonomy (spec §7): only the paths that aren't already
//! degraded to a return value by the lower layers end up here.

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The only operational error that ends a session (spec §7): a failed
    /// write to the terminal. `DecodeError` is dropped-and-resynced and
    /// `StateError` (e.g. a misbehaving `$EDITOR`) degrades to a no-op
    /// redraw; neither reaches this taxonomy.
    #[error(transparent)]
    Terminal(#[from] core_terminal::TerminalError),
}

pub type Result<T> = std::result::Result<T, ControllerError>;
