//! Editable multi-line input buffer: cursor, horizontal offset, history
//! and completion integration, last-operation log (spec §4.F).

pub mod error;
pub mod last_op;
pub mod state;
pub mod tab;

pub use error::{Result, StateError};
pub use last_op::LastOp;
pub use state::{InputState, PromoteOutcome};
pub use tab::TabState;
