//! Event loop mapping decoded keys to `InputState` mutations and `InputView`
//! refreshes (spec §4.H).

pub mod config;
pub mod controller;
pub mod error;
pub mod mapping;

pub use config::SessionConfig;
pub use controller::{Controller, RunOutcome};
pub use error::{ControllerError, Result};
pub use mapping::Action;
