//! `SessionConfig`: typed surface over the handful of env vars spec §6
//! assigns to the controller/terminal layer. Config *loading* (TOML,
//! theme JSON, etc.) is out of scope (spec §1); this only centralizes the
//! raw `std::env::var` reads so tests can construct a config without
//! touching the process environment.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// `$EDITOR`, default `vi` (spec §6).
    pub editor: String,
    /// `LILUSH_TERM_TITLE_PREFIX`, prepended to the dynamic title text.
    pub term_title_prefix: String,
    /// `LILUSH_TERM_TITLE_STATIC`: when set, the title never changes from
    /// `term_title_prefix` alone.
    pub term_title_static: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            editor: "vi".to_string(),
            term_title_prefix: String::new(),
            term_title_static: false,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        SessionConfig {
            editor: std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string()),
            term_title_prefix: std::env::var("LILUSH_TERM_TITLE_PREFIX").unwrap_or_default(),
            term_title_static: std::env::var("LILUSH_TERM_TITLE_STATIC")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Composes the window title text (spec §6 "title composition"):
    /// the static prefix alone, or the prefix followed by `dynamic`
    /// (typically the active command or cwd).
    pub fn compose_title(&self, dynamic: &str) -> String {
        if self.term_title_static || dynamic.is_empty() {
            self.term_title_prefix.clone()
        } else {
            format!("{}{}", self.term_title_prefix, dynamic)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_title_ignores_dynamic_text() {
        let cfg = SessionConfig {
            editor: "vi".into(),
            term_title_prefix: "lilush".into(),
            term_title_static: true,
        };
        assert_eq!(cfg.compose_title("git status"), "lilush");
    }

    #[test]
    fn dynamic_title_appends_after_prefix() {
        let cfg = SessionConfig {
            editor: "vi".into(),
            term_title_prefix: "lilush: ".into(),
            term_title_static: false,
        };
        assert_eq!(cfg.compose_title("git status"), "lilush: git status");
    }
}
