//! Display-width resolution (spec §4.B): codepoint count by default, with a
//! pluggable hook for East-Asian/emoji-aware consumers. Fails closed to
//! codepoint count if no hook is supplied.

pub type DisplayLenFn = fn(&str) -> usize;

/// Default: codepoint count, not `wcwidth`.
pub fn codepoint_len(s: &str) -> usize {
    s.chars().count()
}

/// `unicode-width`-backed hook for consumers that want East-Asian/emoji
/// aware widths instead of the codepoint-count fallback.
pub fn unicode_width_len(s: &str) -> usize {
    use unicode_width::UnicodeWidthStr;
    s.width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codepoint_len_counts_scalars_not_bytes() {
        assert_eq!(codepoint_len("héllo"), 5);
    }
}
