//! `apply()`: resolve + lay out + emit one styled string (spec §4.B).

use crate::color::Color;
use crate::props::{Align, StyleProps, Width};
use crate::sheet::StyleSheet;
use crate::width::{codepoint_len, DisplayLenFn};

/// Truncate `s` to `width` codepoints, preserving the last `clip` codepoints
/// of the *original* string as the tail (spec §4.B step 4/5: "an ellipsis
/// region of `clip` codepoints preserved from the tail").
fn truncate_preserving_tail(s: &str, width: usize, clip: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= width || width == 0 {
        return chars.into_iter().take(width).collect();
    }
    let clip = clip.min(width);
    let head_len = width - clip;
    let head: String = chars[..head_len].iter().collect();
    let tail: String = chars[chars.len() - clip..].iter().collect();
    format!("{head}{tail}")
}

fn tile(s: &str, width: usize) -> String {
    if s.is_empty() || width == 0 {
        return String::new();
    }
    let reps = width / s.chars().count().max(1) + 1;
    let tiled: String = s.repeat(reps);
    tiled.chars().take(width).collect()
}

fn align(s: &str, width: usize, align: Align) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let pad = width - len;
    match align {
        Align::Left | Align::None => format!("{s}{}", " ".repeat(pad)),
        Align::Right => format!("{}{s}", " ".repeat(pad)),
        Align::Center => {
            let left = pad / 2;
            let right = pad - left;
            format!("{}{s}{}", " ".repeat(left), " ".repeat(right))
        }
    }
}

fn color_sgr(fg: Option<Color>, bg: Option<Color>) -> Vec<u16> {
    let mut out = Vec::new();
    if let Some(c) = fg {
        out.extend(c.sgr_params(true));
    }
    if let Some(c) = bg {
        out.extend(c.sgr_params(false));
    }
    out
}

pub struct ApplyContext<'a> {
    pub sheet: &'a StyleSheet,
    pub terminal_cols: u32,
    /// Resolved width of the cascade parent, for `Width::Fraction` resolution.
    pub parent_width: u32,
    /// Columns already consumed on the current line, for the unspecified-`w`
    /// clip fallback (step 5).
    pub column_hint: u32,
    pub display_len: DisplayLenFn,
}

/// Resolve `selectors` through the cascade and render `content` (or
/// `props.content` if `content` is absent) following spec §4.B steps 1–7.
pub fn apply(ctx: &ApplyContext, selectors: &[&str], content: Option<&str>) -> String {
    let props = ctx.sheet.resolve_many(selectors);
    render(ctx, &props, content)
}

pub fn render(ctx: &ApplyContext, props: &StyleProps, content: Option<&str>) -> String {
    // Step 2: content fallback.
    let mut body = content
        .map(str::to_string)
        .or_else(|| props.content.clone())
        .unwrap_or_default();

    // Step 3: indent.
    if let Some(indent) = props.indent {
        if indent > 0 {
            body = format!("{}{}", " ".repeat(indent as usize), body);
        }
    }

    let raw_w = props.w.unwrap_or(Width::Cells(0));
    let w_specified = !matches!(raw_w, Width::Cells(0));

    if w_specified {
        // Step 4.
        let resolved_w = raw_w.resolve(ctx.parent_width, ctx.terminal_cols) as usize;
        if props.fill {
            body = tile(&body, resolved_w);
        } else if let Some(a) = props.align {
            body = align(&body, resolved_w, a);
        } else if (ctx.display_len)(&body) > resolved_w {
            if let Some(clip) = props.clip {
                if clip > 0 {
                    body = truncate_preserving_tail(&body, resolved_w, clip as usize);
                }
            }
        }
    } else {
        // Step 5: unspecified width, clip against remaining terminal columns.
        let budget = ctx.terminal_cols.saturating_sub(ctx.column_hint) as usize;
        if (ctx.display_len)(&body) > budget {
            if let Some(clip) = props.clip {
                if clip >= 0 {
                    body = truncate_preserving_tail(&body, budget, clip as usize);
                }
            }
        }
    }

    // Step 6.
    if let Some(before) = &props.before {
        body = format!("{before}{body}");
    }
    if let Some(after) = &props.after {
        body = format!("{body}{after}");
    }

    // Step 7.
    let mut out = String::new();
    let attrs = props.s.sgr_params();
    if !attrs.is_empty() {
        out.push_str(&crate::sgr(&attrs));
    }
    let colors = color_sgr(props.fg, props.bg);
    if !colors.is_empty() {
        out.push_str(&crate::sgr(&colors));
    }
    out.push_str(&body);
    out.push_str("\x1b[0m");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Align;

    fn ctx(sheet: &StyleSheet) -> ApplyContext<'_> {
        ApplyContext {
            sheet,
            terminal_cols: 80,
            parent_width: 0,
            column_hint: 0,
            display_len: codepoint_len,
        }
    }

    #[test]
    fn content_falls_back_to_props_content() {
        let mut sheet = StyleSheet::new();
        sheet.set(
            "greeting",
            StyleProps {
                content: Some("hi".into()),
                ..Default::default()
            },
        );
        let c = ctx(&sheet);
        let out = apply(&c, &["greeting"], None);
        assert!(out.contains("hi"));
    }

    #[test]
    fn fixed_width_left_align_pads() {
        let mut sheet = StyleSheet::new();
        sheet.set(
            "cell",
            StyleProps {
                w: Some(Width::Cells(6)),
                align: Some(Align::Left),
                ..Default::default()
            },
        );
        let c = ctx(&sheet);
        let out = apply(&c, &["cell"], Some("ab"));
        assert!(out.contains("ab    "));
    }

    #[test]
    fn clip_preserves_tail() {
        let mut sheet = StyleSheet::new();
        sheet.set(
            "cell",
            StyleProps {
                w: Some(Width::Cells(5)),
                clip: Some(2),
                ..Default::default()
            },
        );
        let c = ctx(&sheet);
        let out = apply(&c, &["cell"], Some("abcdefgh"));
        assert!(out.contains("abcgh"));
    }

    #[test]
    fn unspecified_width_clips_to_remaining_columns() {
        let mut sheet = StyleSheet::new();
        sheet.set(
            "cell",
            StyleProps {
                clip: Some(1),
                ..Default::default()
            },
        );
        let mut c = ctx(&sheet);
        c.terminal_cols = 5;
        c.column_hint = 0;
        let out = apply(&c, &["cell"], Some("abcdefgh"));
        assert!(out.contains("abcdh"));
    }
}
