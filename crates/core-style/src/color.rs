//! Color model (spec §3, §6): named basic color, 8-bit index, or 24-bit RGB.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl NamedColor {
    /// SGR base code for this color as a foreground (add 10 for background).
    fn fg_code(self) -> u8 {
        match self {
            NamedColor::Black => 30,
            NamedColor::Red => 31,
            NamedColor::Green => 32,
            NamedColor::Yellow => 33,
            NamedColor::Blue => 34,
            NamedColor::Magenta => 35,
            NamedColor::Cyan => 36,
            NamedColor::White => 37,
            NamedColor::BrightBlack => 90,
            NamedColor::BrightRed => 91,
            NamedColor::BrightGreen => 92,
            NamedColor::BrightYellow => 93,
            NamedColor::BrightBlue => 94,
            NamedColor::BrightMagenta => 95,
            NamedColor::BrightCyan => 96,
            NamedColor::BrightWhite => 97,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    /// SGR parameters for this color, foreground if `is_fg` else background.
    pub fn sgr_params(self, is_fg: bool) -> Vec<u16> {
        match self {
            Color::Named(n) => {
                let code = n.fg_code() as u16;
                vec![if is_fg { code } else { code + 10 }]
            }
            Color::Indexed(i) => {
                vec![if is_fg { 38 } else { 48 }, 5, i as u16]
            }
            Color::Rgb(r, g, b) => {
                vec![
                    if is_fg { 38 } else { 48 },
                    2,
                    r as u16,
                    g as u16,
                    b as u16,
                ]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_fg_uses_30_range() {
        assert_eq!(Color::Named(NamedColor::Red).sgr_params(true), vec![31]);
    }

    #[test]
    fn named_bg_offsets_by_ten() {
        assert_eq!(Color::Named(NamedColor::Red).sgr_params(false), vec![41]);
    }

    #[test]
    fn indexed_uses_38_5_n() {
        assert_eq!(Color::Indexed(200).sgr_params(true), vec![38, 5, 200]);
    }

    #[test]
    fn rgb_uses_38_2_r_g_b() {
        assert_eq!(
            Color::Rgb(10, 20, 30).sgr_params(true),
            vec![38, 2, 10, 20, 30]
        );
    }
}
