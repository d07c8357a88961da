//! `Completion`: merged, ranked candidate list with promotion semantics
//! (spec §4.E).

use std::collections::BTreeMap;

use core_history::History;
use core_style::apply::ApplyContext;

use crate::meta::CandidateMeta;
use crate::sources::CompletionSource;

pub struct Completion {
    candidates: Vec<String>,
    meta: Vec<CandidateMeta>,
    /// 1-based; 0 means "none".
    chosen: usize,
    sources: BTreeMap<String, Box<dyn CompletionSource>>,
}

impl Completion {
    pub fn new() -> Self {
        Completion {
            candidates: Vec::new(),
            meta: Vec::new(),
            chosen: 0,
            sources: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, source: Box<dyn CompletionSource>) {
        self.sources.insert(name.into(), source);
    }

    pub fn update_sources(&mut self) {
        for source in self.sources.values_mut() {
            source.update();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Polls every registered source, merges results preserving per-source
    /// ordering, and sets `chosen = 1` iff any candidate was produced
    /// (spec §4.E steps 1–4).
    pub fn search(&mut self, buffer: &str, history: Option<&History>) -> bool {
        self.candidates.clear();
        self.meta.clear();
        for source in self.sources.values() {
            let (candidates, metas) = source.search(buffer, history);
            self.candidates.extend(candidates);
            self.meta.extend(metas);
        }
        if self.candidates.is_empty() {
            self.flush();
            return false;
        }
        self.chosen = 1;
        true
    }

    pub fn flush(&mut self) {
        self.candidates.clear();
        self.meta.clear();
        self.chosen = 0;
    }

    fn current(&self) -> Option<(&str, &CandidateMeta)> {
        if self.chosen == 0 {
            return None;
        }
        self.candidates
            .get(self.chosen - 1)
            .map(|c| (c.as_str(), &self.meta[self.chosen - 1]))
    }

    /// Returns the current candidate, styled via the `completion` TSS
    /// selector unless `promoted` is true (spec §4.E "Presentation").
    pub fn get(&self, promoted: bool, ctx: &ApplyContext) -> String {
        let Some((candidate, _)) = self.current() else {
            return String::new();
        };
        if promoted {
            candidate.to_string()
        } else {
            core_style::apply::apply(ctx, &["completion"], Some(candidate))
        }
    }

    pub fn scroll_up(&mut self) {
        if self.candidates.is_empty() {
            return;
        }
        self.chosen = if self.chosen >= self.candidates.len() {
            1
        } else {
            self.chosen + 1
        };
    }

    pub fn scroll_down(&mut self) {
        if self.candidates.is_empty() {
            return;
        }
        self.chosen = if self.chosen <= 1 {
            self.candidates.len()
        } else {
            self.chosen - 1
        };
    }

    /// Applies a candidate's promotion transforms (spec §4.E "Presentation").
    /// Returns the text to splice into the buffer plus whether the splice
    /// should replace a prefix (and which) or be appended, and whether
    /// promotion should immediately execute.
    pub fn promote(&self) -> Option<Promotion> {
        let (candidate, meta) = self.current()?;
        let mut text = candidate.to_string();
        if meta.trim_promotion {
            text = text.trim_start().to_string();
        }
        if meta.reduce_spaces {
            text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        }
        Some(Promotion {
            text,
            replace_prompt: meta.replace_prompt.clone(),
            exec_on_prom: meta.exec_on_prom,
        })
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Promotion {
    pub text: String,
    pub replace_prompt: Option<String>,
    pub exec_on_prom: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::CandidateMeta;
    use crate::sources::CompletionSource;

    struct FixedSource {
        candidates: Vec<String>,
        meta: CandidateMeta,
    }

    impl CompletionSource for FixedSource {
        fn update(&mut self) {}
        fn search(&self, _buffer: &str, _history: Option<&History>) -> (Vec<String>, Vec<CandidateMeta>) {
            (
                self.candidates.clone(),
                vec![self.meta.clone(); self.candidates.len()],
            )
        }
    }

    #[test]
    fn search_empty_flushes() {
        let mut c = Completion::new();
        c.register(
            "fixed",
            Box::new(FixedSource {
                candidates: vec![],
                meta: CandidateMeta::default(),
            }),
        );
        assert!(!c.search("gi", None));
        assert!(c.is_empty());
    }

    #[test]
    fn promote_appends_candidate_by_default() {
        let mut c = Completion::new();
        c.register(
            "fixed",
            Box::new(FixedSource {
                candidates: vec!["t status".to_string()],
                meta: CandidateMeta::default(),
            }),
        );
        assert!(c.search("gi", None));
        let promotion = c.promote().unwrap();
        assert_eq!(promotion.text, "t status");
        assert!(promotion.replace_prompt.is_none());
        assert!(!promotion.exec_on_prom);
    }

    #[test]
    fn scroll_wraps_around() {
        let mut c = Completion::new();
        c.register(
            "fixed",
            Box::new(FixedSource {
                candidates: vec!["a".to_string(), "b".to_string()],
                meta: CandidateMeta::default(),
            }),
        );
        c.search("", None);
        assert_eq!(c.chosen, 1);
        c.scroll_up();
        assert_eq!(c.chosen, 2);
        c.scroll_up();
        assert_eq!(c.chosen, 1);
        c.scroll_down();
        assert_eq!(c.chosen, 2);
    }
}
