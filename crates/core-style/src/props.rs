//! `StyleProps` record and cascade merge rule (spec §3, §4.B).

use crate::color::Color;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Attrs: u16 {
        const BOLD        = 1 << 0;
        const ITALIC      = 1 << 1;
        const DIM         = 1 << 2;
        const INVERTED    = 1 << 3;
        const UNDERLINED  = 1 << 4;
    }
}

impl Attrs {
    /// SGR codes this attribute set expands to, in a stable order.
    pub fn sgr_params(self) -> Vec<u16> {
        let mut out = Vec::new();
        if self.contains(Attrs::BOLD) {
            out.push(1);
        }
        if self.contains(Attrs::DIM) {
            out.push(2);
        }
        if self.contains(Attrs::ITALIC) {
            out.push(3);
        }
        if self.contains(Attrs::UNDERLINED) {
            out.push(4);
        }
        if self.contains(Attrs::INVERTED) {
            out.push(7);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// Resolved or cascade-relative width. `0` means "unspecified, use terminal
/// column count"; values in `(0,1)` are fractions of the parent's resolved
/// width; integers `>=1` are literal codepoint counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Width {
    Cells(u32),
    Fraction(f32),
}

impl Default for Width {
    fn default() -> Self {
        Width::Cells(0)
    }
}

impl Width {
    /// Resolve against a parent width (already resolved to a concrete cell
    /// count) and the terminal column count used as the ultimate fallback.
    pub fn resolve(self, parent_width: u32, terminal_cols: u32) -> u32 {
        match self {
            Width::Cells(0) => terminal_cols,
            Width::Cells(n) => n,
            Width::Fraction(f) if f > 0.0 && f < 1.0 => {
                let base = if parent_width > 0 {
                    parent_width
                } else {
                    terminal_cols
                };
                ((base as f32) * f).round() as u32
            }
            Width::Fraction(_) => terminal_cols,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub s: Attrs,
    /// When set, this selector's `reset` wipes inherited attrs instead of
    /// unioning with them (spec §3: "`s` is a union ... with literal `reset`
    /// clearing").
    #[serde(default, skip_serializing_if = "is_false")]
    pub reset: bool,
    #[serde(default, skip_serializing_if = "is_none_align")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<Width>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fill: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_none_align(a: &Option<Align>) -> bool {
    a.is_none()
}

impl StyleProps {
    /// Merge `child` on top of `self` per the cascade rule (spec §3): `s` is
    /// unioned (cleared first if `child.reset`), other scalars override when
    /// present.
    pub fn merged_with(&self, child: &StyleProps) -> StyleProps {
        let s = if child.reset {
            child.s
        } else {
            self.s | child.s
        };
        StyleProps {
            fg: child.fg.or(self.fg),
            bg: child.bg.or(self.bg),
            s,
            reset: child.reset,
            align: child.align.or(self.align),
            clip: child.clip.or(self.clip),
            indent: child.indent.or(self.indent),
            w: child.w.or(self.w),
            before: child.before.clone().or_else(|| self.before.clone()),
            after: child.after.clone().or_else(|| self.after.clone()),
            content: child.content.clone().or_else(|| self.content.clone()),
            fill: if child.fill { true } else { self.fill },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_merges_attrs() {
        let parent = StyleProps {
            s: Attrs::BOLD,
            ..Default::default()
        };
        let child = StyleProps {
            s: Attrs::ITALIC,
            ..Default::default()
        };
        let merged = parent.merged_with(&child);
        assert!(merged.s.contains(Attrs::BOLD));
        assert!(merged.s.contains(Attrs::ITALIC));
    }

    #[test]
    fn reset_clears_inherited_attrs() {
        let parent = StyleProps {
            s: Attrs::BOLD,
            ..Default::default()
        };
        let child = StyleProps {
            s: Attrs::ITALIC,
            reset: true,
            ..Default::default()
        };
        let merged = parent.merged_with(&child);
        assert!(!merged.s.contains(Attrs::BOLD));
        assert!(merged.s.contains(Attrs::ITALIC));
    }

    #[test]
    fn scalar_override_prefers_child() {
        let parent = StyleProps {
            align: Some(Align::Left),
            ..Default::default()
        };
        let child = StyleProps::default();
        assert_eq!(parent.merged_with(&child).align, Some(Align::Left));

        let child_override = StyleProps {
            align: Some(Align::Right),
            ..Default::default()
        };
        assert_eq!(
            parent.merged_with(&child_override).align,
            Some(Align::Right)
        );
    }

    #[test]
    fn width_fraction_resolves_against_parent() {
        assert_eq!(Width::Fraction(0.5).resolve(40, 80), 20);
    }

    #[test]
    fn width_zero_resolves_to_terminal_cols() {
        assert_eq!(Width::Cells(0).resolve(40, 80), 80);
    }
}
