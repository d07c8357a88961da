//! CSI/OSC emission helpers (spec §4.A, §6).
//!
//! These build the wire strings; writing them to fd 1 is the caller's job
//! (kept separate so the decoder/render layers can unit-test the strings
//! without a real tty).

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn final_byte(self) -> char {
        match self {
            Direction::Up => 'A',
            Direction::Down => 'B',
            Direction::Right => 'C',
            Direction::Left => 'D',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearLineMode {
    ToEnd = 0,
    ToStart = 1,
    Whole = 2,
}

/// Move the cursor to 1-based (row, col).
pub fn go(row: u16, col: u16) -> String {
    format!("\x1b[{};{}H", row, col)
}

/// Move the cursor `n` cells in `dir`. Empty string for `n == 0`.
pub fn mv(dir: Direction, n: u16) -> String {
    if n == 0 {
        return String::new();
    }
    format!("\x1b[{}{}", n, dir.final_byte())
}

/// Clear the whole screen.
pub fn clear() -> &'static str {
    "\x1b[2J"
}

/// Clear (part of) the current line.
pub fn clear_line(mode: ClearLineMode) -> String {
    format!("\x1b[{}K", mode as u8)
}

/// `CSI <n1;n2;...> m` for the given SGR attribute codes.
pub fn style(attrs: &[u8]) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let mut out = String::from("\x1b[");
    for (i, a) in attrs.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        let _ = write!(out, "{a}");
    }
    out.push('m');
    out
}

pub const RESET: &str = "\x1b[0m";

pub fn hide_cursor() -> &'static str {
    "\x1b[?25l"
}

pub fn show_cursor() -> &'static str {
    "\x1b[?25h"
}

pub fn title(s: &str) -> String {
    format!("\x1b]0;{s}\x07")
}

/// OSC 99 desktop notification, `id` conventionally the current unix timestamp.
pub fn kitty_notify(id: u64, title: &str, body: &str) -> String {
    format!("\x1b]99;i={id}:d=0;{title}\x1b\\\x1b]99;i={id}:d=1;{body}\x1b\\")
}

pub const ENTER_ALT_SCREEN: &str = "\x1b[?47h";
pub const LEAVE_ALT_SCREEN: &str = "\x1b[?47l";
pub const ENABLE_BRACKETED_PASTE: &str = "\x1b[?2004h";
pub const DISABLE_BRACKETED_PASTE: &str = "\x1b[?2004l";

pub const QUERY_CURSOR_POSITION: &str = "\x1b[6n";

/// Parse a `ESC [ row ; col R` cursor-position reply.
pub fn parse_cursor_position_reply(reply: &str) -> Option<(u16, u16)> {
    let body = reply.strip_prefix("\x1b[")?.strip_suffix('R')?;
    let (row, col) = body.split_once(';')?;
    Some((row.parse().ok()?, col.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_formats_1_based_coordinates() {
        assert_eq!(go(3, 7), "\x1b[3;7H");
    }

    #[test]
    fn mv_zero_is_noop() {
        assert_eq!(mv(Direction::Left, 0), "");
    }

    #[test]
    fn mv_nonzero_emits_final_byte() {
        assert_eq!(mv(Direction::Right, 4), "\x1b[4C");
    }

    #[test]
    fn style_joins_attrs_with_semicolons() {
        assert_eq!(style(&[1, 4]), "\x1b[1;4m");
    }

    #[test]
    fn parses_cursor_position_reply() {
        assert_eq!(parse_cursor_position_reply("\x1b[24;80R"), Some((24, 80)));
    }

    #[test]
    fn rejects_malformed_reply() {
        assert_eq!(parse_cursor_position_reply("garbage"), None);
    }
}
