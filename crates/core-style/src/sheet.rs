//! `StyleSheet`: dotted-selector cascade (spec §3, §4.B).
//!
//! Theme *loading* (JSON layout, user overrides) is out of scope (spec §1);
//! this type only resolves an already-constructed map.

use crate::props::StyleProps;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleSheet {
    entries: HashMap<String, StyleProps>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, selector: impl Into<String>, props: StyleProps) {
        self.entries.insert(selector.into(), props);
    }

    fn ancestors(selector: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut end = 0;
        for (i, c) in selector.char_indices() {
            if c == '.' {
                out.push(&selector[..i]);
            }
            end = i + c.len_utf8();
        }
        let _ = end;
        out.push(selector);
        out
    }

    /// Resolve one selector by cascading `a`, then `a.b`, then `a.b.c`, ...
    pub fn resolve(&self, selector: &str) -> StyleProps {
        let mut acc = StyleProps::default();
        for part in Self::ancestors(selector) {
            if let Some(props) = self.entries.get(part) {
                acc = acc.merged_with(props);
            }
        }
        acc
    }

    /// Resolve multiple selectors in order; later selectors cascade on top
    /// of earlier ones, each itself fully cascaded through its ancestry.
    /// `apply(["a", "a.b"], x) == apply("a.b", x)` when `a.b` has no entry of
    /// its own beyond what `a` already provides (spec §8).
    pub fn resolve_many(&self, selectors: &[&str]) -> StyleProps {
        let mut acc = StyleProps::default();
        for sel in selectors {
            acc = acc.merged_with(&self.resolve(sel));
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::{Align, Attrs};

    #[test]
    fn cascades_parent_into_child() {
        let mut sheet = StyleSheet::new();
        sheet.set(
            "builtin",
            StyleProps {
                s: Attrs::BOLD,
                ..Default::default()
            },
        );
        sheet.set(
            "builtin.ls",
            StyleProps {
                align: Some(Align::Left),
                ..Default::default()
            },
        );
        let resolved = sheet.resolve("builtin.ls.dir");
        assert!(resolved.s.contains(Attrs::BOLD));
        assert_eq!(resolved.align, Some(Align::Left));
    }

    #[test]
    fn cascade_is_order_stable() {
        let mut sheet = StyleSheet::new();
        sheet.set(
            "a",
            StyleProps {
                s: Attrs::BOLD,
                ..Default::default()
            },
        );
        sheet.set(
            "a.b",
            StyleProps {
                s: Attrs::ITALIC,
                ..Default::default()
            },
        );
        assert_eq!(sheet.resolve("a.b"), sheet.resolve_many(&["a", "a.b"]));
    }

    #[test]
    fn unknown_selector_resolves_to_default() {
        let sheet = StyleSheet::new();
        assert_eq!(sheet.resolve("nothing.here"), StyleProps::default());
    }
}
