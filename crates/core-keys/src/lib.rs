//! Kitty Keyboard Protocol decoding: byte stream in, `DecodedEvent`s out.

pub mod decoder;
pub mod detect;
pub mod error;
pub mod event;
pub mod mods;
pub mod source;
pub mod tables;

pub use decoder::Decoder;
pub use error::DecodeError;
pub use event::{Codepoint, DecodedEvent, EventType, KeyEvent, ModMask, NamedKey, PasteEvent};
pub use source::{ByteSource, SliceSource, TerminalSource};
