//! KKBP codepoint tables (spec §4.C step 6), grounded in the numeric key
//! codes used by `vtinput`'s `csi.rs`/`esc.rs` mapping tables.

use crate::event::NamedKey;

/// Named key for a CSI final byte with no leading numeric codepoint (bare
/// arrow/edit keys, and the `1;<mods><final>` modified-arrow form).
pub fn named_key_from_final_byte(final_byte: u8) -> Option<NamedKey> {
    match final_byte {
        b'A' => Some(NamedKey::Up),
        b'B' => Some(NamedKey::Down),
        b'C' => Some(NamedKey::Right),
        b'D' => Some(NamedKey::Left),
        b'H' => Some(NamedKey::Home),
        b'F' => Some(NamedKey::End),
        b'P' => Some(NamedKey::F(1)),
        b'Q' => Some(NamedKey::F(2)),
        b'S' => Some(NamedKey::F(4)),
        b'Z' => Some(NamedKey::BackTab),
        _ => None,
    }
}

/// Named key for a KKBP numeric codepoint terminated by `u` (spec example:
/// `57442 u` → `LEFT_CTRL`).
pub fn named_key_from_kkbp_codepoint(code: u32) -> Option<NamedKey> {
    match code {
        13 => Some(NamedKey::Enter),
        9 => Some(NamedKey::Tab),
        27 => Some(NamedKey::Esc),
        127 => Some(NamedKey::Backspace),
        2 => Some(NamedKey::Insert),
        3 => Some(NamedKey::Delete),
        5 => Some(NamedKey::PageUp),
        6 => Some(NamedKey::PageDown),
        7 => Some(NamedKey::Home),
        8 => Some(NamedKey::End),
        57365..=57372 => Some(NamedKey::Fn((code - 57365 + 1) as u8)),
        57399..=57426 => Some(NamedKey::Keypad((code - 57399) as u8)),
        57441 => Some(NamedKey::LeftShift),
        57442 => Some(NamedKey::LeftCtrl),
        57443 => Some(NamedKey::LeftAlt),
        57444 => Some(NamedKey::LeftSuper),
        57445 => Some(NamedKey::LeftHyper),
        57446 => Some(NamedKey::LeftMeta),
        57447 => Some(NamedKey::RightShift),
        57448 => Some(NamedKey::RightCtrl),
        57449 => Some(NamedKey::RightAlt),
        57450 => Some(NamedKey::RightSuper),
        57451 => Some(NamedKey::RightHyper),
        57452 => Some(NamedKey::RightMeta),
        57358 => Some(NamedKey::CapsLock),
        57359 => Some(NamedKey::ScrollLock),
        57360 => Some(NamedKey::NumLock),
        _ => None,
    }
}

/// Named key for a legacy tilde-terminated sequence, e.g. `2~` → `INSERT`,
/// `15~` → `F5` (spec example).
pub fn named_key_from_legacy_tilde(code: u32) -> Option<NamedKey> {
    match code {
        1 | 7 => Some(NamedKey::Home),
        2 => Some(NamedKey::Insert),
        3 => Some(NamedKey::Delete),
        4 | 8 => Some(NamedKey::End),
        5 => Some(NamedKey::PageUp),
        6 => Some(NamedKey::PageDown),
        11 => Some(NamedKey::F(1)),
        12 => Some(NamedKey::F(2)),
        13 => Some(NamedKey::F(3)),
        14 => Some(NamedKey::F(4)),
        15 => Some(NamedKey::F(5)),
        17 => Some(NamedKey::F(6)),
        18 => Some(NamedKey::F(7)),
        19 => Some(NamedKey::F(8)),
        20 => Some(NamedKey::F(9)),
        21 => Some(NamedKey::F(10)),
        23 => Some(NamedKey::F(11)),
        24 => Some(NamedKey::F(12)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_byte_d_is_left() {
        assert_eq!(named_key_from_final_byte(b'D'), Some(NamedKey::Left));
    }

    #[test]
    fn kkbp_13_is_enter() {
        assert_eq!(named_key_from_kkbp_codepoint(13), Some(NamedKey::Enter));
    }

    #[test]
    fn kkbp_57442_is_left_ctrl() {
        assert_eq!(
            named_key_from_kkbp_codepoint(57442),
            Some(NamedKey::LeftCtrl)
        );
    }

    #[test]
    fn legacy_tilde_2_is_insert() {
        assert_eq!(named_key_from_legacy_tilde(2), Some(NamedKey::Insert));
    }

    #[test]
    fn legacy_tilde_15_is_f5() {
        assert_eq!(named_key_from_legacy_tilde(15), Some(NamedKey::F(5)));
    }
}
