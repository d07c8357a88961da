//! Control-shortcut dispatch table (spec §4.F "Control mapping").
//!
//! The decoder's `simple_get()` string is the whole matching key: this
//! module is deliberately a flat table rather than a second key-event
//! decoder, since config-driven overrides (out of scope here) only ever
//! need to replace this table's lookup, not the decoding beneath it.

/// An editor operation reachable from a fixed-default shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Backspace,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    WordLeft,
    WordRight,
    StartOfLine,
    EndOfLine,
    Newline,
    ExternalEditor,
    InsertLastArg,
    Execute,
    Exit,
    CompletionAction,
}

/// Looks up a `simple_get()`-style display string against the fixed
/// defaults (spec §4.F). Returns `None` for anything unmapped, which the
/// controller reports back as a `combo` for mode switchers to interpret.
pub fn lookup(key: &str) -> Option<Action> {
    Some(match key {
        "backspace" => Action::Backspace,
        "left" => Action::MoveLeft,
        "right" => Action::MoveRight,
        "up" => Action::MoveUp,
        "down" => Action::MoveDown,
        "ctrl+left" => Action::WordLeft,
        "ctrl+right" => Action::WordRight,
        "home" | "ctrl+a" => Action::StartOfLine,
        "end" | "ctrl+e" => Action::EndOfLine,
        "shift+enter" => Action::Newline,
        "alt+enter" => Action::ExternalEditor,
        "alt+." => Action::InsertLastArg,
        "enter" => Action::Execute,
        "esc" => Action::Exit,
        "tab" => Action::CompletionAction,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backspace_maps() {
        assert_eq!(lookup("backspace"), Some(Action::Backspace));
    }

    #[test]
    fn word_jumps_require_ctrl() {
        assert_eq!(lookup("left"), Some(Action::MoveLeft));
        assert_eq!(lookup("ctrl+left"), Some(Action::WordLeft));
    }

    #[test]
    fn unmapped_key_is_none() {
        assert_eq!(lookup("ctrl+shift+z"), None);
    }
}
