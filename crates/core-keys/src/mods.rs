//! Modifier string helpers and `simple_get`-style display collapse
//! (spec §4.C step 8, §8).

use crate::event::{Codepoint, EventType, KeyEvent, ModMask, NamedKey};

const ORDERED: &[(ModMask, &str)] = &[
    (ModMask::CTRL, "ctrl"),
    (ModMask::ALT, "alt"),
    (ModMask::SHIFT, "shift"),
    (ModMask::SUPER, "super"),
    (ModMask::HYPER, "hyper"),
    (ModMask::META, "meta"),
    (ModMask::CAPS_LOCK, "caps_lock"),
    (ModMask::NUM_LOCK, "num_lock"),
];

/// Renders a `ModMask` as `"ctrl+alt"`-style text, empty string for no mods.
pub fn mods_to_string(mods: ModMask) -> String {
    ORDERED
        .iter()
        .filter(|(bit, _)| mods.contains(*bit))
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join("+")
}

/// Parses a `mods_to_string` output back into a `ModMask`.
pub fn string_to_mods(s: &str) -> ModMask {
    let mut mods = ModMask::empty();
    for part in s.split('+') {
        if let Some((bit, _)) = ORDERED.iter().find(|(_, name)| *name == part) {
            mods |= *bit;
        }
    }
    mods
}

fn codepoint_to_char(c: Codepoint) -> Option<char> {
    match c {
        Codepoint::Char(ch) => Some(ch),
        _ => None,
    }
}

fn named_display(key: NamedKey) -> &'static str {
    match key {
        NamedKey::Left => "left",
        NamedKey::Right => "right",
        NamedKey::Up => "up",
        NamedKey::Down => "down",
        NamedKey::Home => "home",
        NamedKey::End => "end",
        NamedKey::PageUp => "page_up",
        NamedKey::PageDown => "page_down",
        NamedKey::Insert => "insert",
        NamedKey::Delete => "delete",
        NamedKey::Enter => "enter",
        NamedKey::Tab => "tab",
        NamedKey::BackTab => "backtab",
        NamedKey::Backspace => "backspace",
        NamedKey::Esc => "esc",
        _ => "key",
    }
}

/// Collapses a decoded `KeyEvent` into the display string the rest of the
/// system reasons about: printable chars pass through (preferring the
/// shifted variant when present), modifiers are joined with `+`, and
/// key-release events return `None` except for TAB (spec §4.C step 8,
/// §4.F: the controller needs TAB release to measure press duration).
pub fn simple_get(ev: &KeyEvent) -> Option<String> {
    if ev.event == EventType::Release && ev.codepoint != Codepoint::Named(NamedKey::Tab) {
        return None;
    }

    let base = match ev.codepoint {
        Codepoint::Char(_) => ev
            .shifted
            .and_then(codepoint_to_char)
            .or_else(|| codepoint_to_char(ev.codepoint))
            .map(|c| c.to_string()),
        Codepoint::Named(key) => Some(named_display(key).to_string()),
        Codepoint::Tbd => None,
    }?;

    let mods = mods_to_string(ev.mods);
    if mods.is_empty() {
        Some(base)
    } else {
        Some(format!("{mods}+{base}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mods_round_trip() {
        let m = ModMask::CTRL | ModMask::SHIFT;
        let s = mods_to_string(m);
        assert_eq!(string_to_mods(&s), m);
    }

    #[test]
    fn plain_char_has_no_mod_prefix() {
        let ev = KeyEvent::simple(Codepoint::Char('a'));
        assert_eq!(simple_get(&ev), Some("a".to_string()));
    }

    #[test]
    fn ctrl_char_gets_prefix() {
        let ev = KeyEvent::with_mods(Codepoint::Char('c'), ModMask::CTRL);
        assert_eq!(simple_get(&ev), Some("ctrl+c".to_string()));
    }

    #[test]
    fn release_of_non_tab_is_none() {
        let mut ev = KeyEvent::simple(Codepoint::Char('a'));
        ev.event = EventType::Release;
        assert_eq!(simple_get(&ev), None);
    }

    #[test]
    fn tab_release_is_reported() {
        let mut ev = KeyEvent::simple(Codepoint::Named(NamedKey::Tab));
        ev.event = EventType::Release;
        assert_eq!(simple_get(&ev), Some("tab".to_string()));
    }
}
