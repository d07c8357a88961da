//! Completion sources: builtins, `$PATH`, environment, filesystem, history,
//! directory history, snippets (spec §4.E step 2).
//!
//! Formalized as a trait rather than the duck-typed module list the spec
//! describes informally (spec §9 design note), bound by name in a
//! `Completion`'s source registry.

use std::collections::HashMap;
use std::env;
use std::path::Path;

use core_history::History;

use crate::meta::CandidateMeta;
use crate::tokenize::tokenize;

pub trait CompletionSource {
    /// Refreshes any cached catalog (e.g. rescans `$PATH`).
    fn update(&mut self);
    fn search(&self, buffer: &str, history: Option<&History>) -> (Vec<String>, Vec<CandidateMeta>);
}

fn meta(source_name: &str) -> CandidateMeta {
    CandidateMeta {
        source_name: source_name.to_string(),
        ..Default::default()
    }
}

/// Completes the static builtin-command list at the command position.
pub struct BuiltinsSource {
    names: Vec<&'static str>,
}

impl BuiltinsSource {
    pub fn new() -> Self {
        BuiltinsSource {
            names: vec![
                "cd", "exit", "jobs", "history", "alias", "unalias", "export", "unset", "attach",
                "kill",
            ],
        }
    }
}

impl Default for BuiltinsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSource for BuiltinsSource {
    fn update(&mut self) {}

    fn search(&self, buffer: &str, _history: Option<&History>) -> (Vec<String>, Vec<CandidateMeta>) {
        let tokens = tokenize(buffer);
        if tokens.len() > 1 {
            return (Vec::new(), Vec::new());
        }
        let prefix = tokens.first().map(String::as_str).unwrap_or("");
        let candidates: Vec<String> = self
            .names
            .iter()
            .filter(|n| n.starts_with(prefix))
            .map(|n| n[prefix.len()..].to_string())
            .collect();
        let metas = vec![meta("builtins"); candidates.len()];
        (candidates, metas)
    }
}

/// Completes Lua's reserved-word list at the command position; the Lua
/// runtime itself is out of scope, but the keyword set is static and costs
/// nothing to offer as a completion source (spec §4.E step 2).
pub struct LuaKeywordsSource {
    keywords: &'static [&'static str],
}

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

impl LuaKeywordsSource {
    pub fn new() -> Self {
        LuaKeywordsSource {
            keywords: LUA_KEYWORDS,
        }
    }
}

impl Default for LuaKeywordsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSource for LuaKeywordsSource {
    fn update(&mut self) {}

    fn search(&self, buffer: &str, _history: Option<&History>) -> (Vec<String>, Vec<CandidateMeta>) {
        let tokens = tokenize(buffer);
        let prefix = tokens.last().map(String::as_str).unwrap_or("");
        let candidates: Vec<String> = self
            .keywords
            .iter()
            .filter(|kw| kw.starts_with(prefix) && **kw != prefix)
            .map(|kw| kw[prefix.len()..].to_string())
            .collect();
        let metas = vec![meta("lua_keywords"); candidates.len()];
        (candidates, metas)
    }
}

/// Completes `$VAR` references against the process environment.
pub struct EnvSource;

impl CompletionSource for EnvSource {
    fn update(&mut self) {}

    fn search(&self, buffer: &str, _history: Option<&History>) -> (Vec<String>, Vec<CandidateMeta>) {
        let last = buffer.rsplit(char::is_whitespace).next().unwrap_or("");
        let Some(prefix) = last.strip_prefix('$') else {
            return (Vec::new(), Vec::new());
        };
        let candidates: Vec<String> = env::vars()
            .map(|(k, _)| k)
            .filter(|k| k.starts_with(prefix))
            .map(|k| k[prefix.len()..].to_string())
            .collect();
        let metas = vec![meta("env"); candidates.len()];
        (candidates, metas)
    }
}

/// Completes executables found on `$PATH`, cached per `update()`.
pub struct PathSource {
    executables: Vec<String>,
}

impl PathSource {
    pub fn new() -> Self {
        PathSource {
            executables: Vec::new(),
        }
    }
}

impl Default for PathSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSource for PathSource {
    fn update(&mut self) {
        let mut names = Vec::new();
        if let Ok(path) = env::var("PATH") {
            for dir in env::split_paths(&path) {
                let Ok(read) = std::fs::read_dir(&dir) else {
                    tracing::debug!(dir = %dir.display(), "PATH entry unreadable, skipping");
                    continue;
                };
                for entry in read.flatten() {
                    if let Ok(name) = entry.file_name().into_string() {
                        names.push(name);
                    }
                }
            }
        }
        names.sort();
        names.dedup();
        self.executables = names;
    }

    fn search(&self, buffer: &str, _history: Option<&History>) -> (Vec<String>, Vec<CandidateMeta>) {
        let tokens = tokenize(buffer);
        if tokens.len() > 1 {
            return (Vec::new(), Vec::new());
        }
        let prefix = tokens.first().map(String::as_str).unwrap_or("");
        let candidates: Vec<String> = self
            .executables
            .iter()
            .filter(|n| n.starts_with(prefix) && n.as_str() != prefix)
            .map(|n| n[prefix.len()..].to_string())
            .collect();
        let metas = vec![meta("path"); candidates.len()];
        (candidates, metas)
    }
}

/// Completes the last token as a filesystem path fragment.
pub struct FilesystemSource;

impl CompletionSource for FilesystemSource {
    fn update(&mut self) {}

    fn search(&self, buffer: &str, _history: Option<&History>) -> (Vec<String>, Vec<CandidateMeta>) {
        let tokens = tokenize(buffer);
        let Some(last) = tokens.last() else {
            return (Vec::new(), Vec::new());
        };
        let (dir, prefix) = match last.rfind('/') {
            Some(idx) => (&last[..=idx], &last[idx + 1..]),
            None => ("", last.as_str()),
        };
        let base = if dir.is_empty() { Path::new(".") } else { Path::new(dir) };
        let Ok(read) = std::fs::read_dir(base) else {
            tracing::debug!(dir = %base.display(), "filesystem completion source unreadable");
            return (Vec::new(), Vec::new());
        };
        let mut candidates = Vec::new();
        for entry in read.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with(prefix) {
                continue;
            }
            let mut suffix = name[prefix.len()..].to_string();
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                suffix.push('/');
            }
            if suffix.contains(' ') {
                suffix = format!("'{suffix}'");
            }
            candidates.push(suffix);
        }
        let metas = vec![meta("filesystem"); candidates.len()];
        (candidates, metas)
    }
}

/// Completes against ranked command history (spec §4.D's `search`).
pub struct HistorySource {
    cwd: String,
}

impl HistorySource {
    pub fn new(cwd: impl Into<String>) -> Self {
        HistorySource { cwd: cwd.into() }
    }
}

impl CompletionSource for HistorySource {
    fn update(&mut self) {}

    fn search(&self, buffer: &str, history: Option<&History>) -> (Vec<String>, Vec<CandidateMeta>) {
        let Some(history) = history else {
            return (Vec::new(), Vec::new());
        };
        let tokens = tokenize(buffer);
        let token_refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        let candidates = history.search(&token_refs, &self.cwd);
        let mut metas = Vec::with_capacity(candidates.len());
        for cmd in &candidates {
            metas.push(CandidateMeta {
                source_name: "history".to_string(),
                replace_prompt: Some(String::new()),
                ..Default::default()
            });
            let _ = cmd;
        }
        (candidates, metas)
    }
}

/// Completes directories from history's `dir_search` (spec §4.D).
pub struct DirHistorySource;

impl CompletionSource for DirHistorySource {
    fn update(&mut self) {}

    fn search(&self, buffer: &str, history: Option<&History>) -> (Vec<String>, Vec<CandidateMeta>) {
        let Some(history) = history else {
            return (Vec::new(), Vec::new());
        };
        let tokens = tokenize(buffer);
        let token_refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        let dirs = history.dir_search(&token_refs);
        let candidates: Vec<String> = dirs.iter().map(|d| format!("cd {d}")).collect();
        let metas = vec![
            CandidateMeta {
                source_name: "dir_history".to_string(),
                replace_prompt: Some(String::new()),
                exec_on_prom: true,
                ..Default::default()
            };
            candidates.len()
        ];
        (candidates, metas)
    }
}

/// Static named-snippet completion; persistence of the snippet catalog is
/// out of scope, so this holds whatever the caller populates in memory.
#[derive(Default)]
pub struct SnippetsSource {
    snippets: HashMap<String, String>,
}

impl SnippetsSource {
    pub fn new(snippets: HashMap<String, String>) -> Self {
        SnippetsSource { snippets }
    }
}

impl CompletionSource for SnippetsSource {
    fn update(&mut self) {}

    fn search(&self, buffer: &str, _history: Option<&History>) -> (Vec<String>, Vec<CandidateMeta>) {
        let tokens = tokenize(buffer);
        let prefix = tokens.first().map(String::as_str).unwrap_or("");
        let mut candidates = Vec::new();
        for (name, body) in &self.snippets {
            if name.starts_with(prefix) {
                candidates.push(body.clone());
            }
        }
        let metas = vec![
            CandidateMeta {
                source_name: "snippets".to_string(),
                trim_promotion: true,
                reduce_spaces: true,
                ..Default::default()
            };
            candidates.len()
        ];
        (candidates, metas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_match_prefix() {
        let src = BuiltinsSource::new();
        let (candidates, _) = src.search("hi", None);
        assert_eq!(candidates, vec!["story".to_string()]);
    }

    #[test]
    fn lua_keywords_match_prefix() {
        let src = LuaKeywordsSource::new();
        let (candidates, _) = src.search("fun", None);
        assert_eq!(candidates, vec!["ction".to_string()]);
    }

    #[test]
    fn env_source_completes_dollar_prefix() {
        std::env::set_var("LILUSH_TEST_VAR", "1");
        let src = EnvSource;
        let (candidates, _) = src.search("echo $LILUSH_TEST", None);
        assert!(candidates.iter().any(|c| c == "_VAR"));
        std::env::remove_var("LILUSH_TEST_VAR");
    }
}
