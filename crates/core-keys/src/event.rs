//! Decoded terminal input (spec §3): `KeyEvent`, modifiers, event type.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ModMask: u16 {
        const SHIFT     = 1;
        const ALT       = 2;
        const CTRL      = 4;
        const SUPER     = 8;
        const HYPER     = 16;
        const META      = 32;
        const CAPS_LOCK = 64;
        const NUM_LOCK  = 128;
    }
}

impl ModMask {
    /// KKBP encodes modifiers as `raw - 1`; `raw` defaults to 1 (no mods).
    pub fn from_kkbp_raw(raw: u32) -> ModMask {
        ModMask::from_bits_truncate(raw.saturating_sub(1) as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Press = 1,
    Repeat = 2,
    Release = 3,
}

impl EventType {
    pub fn from_kkbp_raw(raw: u32) -> EventType {
        match raw {
            2 => EventType::Repeat,
            3 => EventType::Release,
            _ => EventType::Press,
        }
    }
}

/// Named, non-printable keys the decoder recognizes (spec §4.C step 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Enter,
    Tab,
    BackTab,
    Backspace,
    Esc,
    F(u8),
    Fn(u8),
    Keypad(u8),
    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
    LeftSuper,
    RightSuper,
    LeftMeta,
    RightMeta,
    LeftHyper,
    RightHyper,
    CapsLock,
    NumLock,
    ScrollLock,
}

/// The semantic "codepoint" slot of a `KeyEvent`: a named key, a literal
/// character, or `Tbd` for an unmapped private-use-area codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codepoint {
    Named(NamedKey),
    Char(char),
    Tbd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub codepoint: Codepoint,
    pub mods: ModMask,
    pub event: EventType,
    /// Shifted-variant codepoint, when the terminal reported one.
    pub shifted: Option<Codepoint>,
    /// Base-layout codepoint (layout-independent), when reported.
    pub base: Option<Codepoint>,
}

impl KeyEvent {
    pub fn simple(codepoint: Codepoint) -> Self {
        KeyEvent {
            codepoint,
            mods: ModMask::empty(),
            event: EventType::Press,
            shifted: None,
            base: None,
        }
    }

    pub fn with_mods(codepoint: Codepoint, mods: ModMask) -> Self {
        KeyEvent {
            codepoint,
            mods,
            event: EventType::Press,
            shifted: None,
            base: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteEvent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
    Key(KeyEvent),
    Paste(PasteEvent),
}
