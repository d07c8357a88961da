//! `History`: in-memory ranked command log with an opaque backing store
//! (spec §4.D).

use std::collections::HashMap;
use std::env;

use regex::Regex;

use crate::entry::{abbreviate_home, HistoryEntry};
use crate::store::{HistoryStore, NullStore};

fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_i32(name: &str, default: i32) -> i32 {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn current_cwd_abbreviated() -> String {
    let cwd = env::current_dir()
        .ok()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let home = env::var("HOME").unwrap_or_default();
    abbreviate_home(&cwd, &home)
}

/// Commands starting with `..` (cd-dots) or `x `/`z ` (jumper shortcuts)
/// are never recorded, by convention (spec §4.D).
fn should_record(cmd: &str) -> bool {
    if cmd.is_empty() || cmd.starts_with(' ') {
        return false;
    }
    if cmd.starts_with("..") {
        return false;
    }
    if cmd.starts_with("x ") || cmd.starts_with("z ") {
        return false;
    }
    true
}

pub struct History {
    entries: Vec<HistoryEntry>,
    /// 0 = browsing the live buffer (not navigating); N = N entries back
    /// from the most recent.
    position: usize,
    stash: Option<String>,
    store: Box<dyn HistoryStore>,
}

impl History {
    pub fn new(store: Box<dyn HistoryStore>) -> Self {
        History {
            entries: Vec::new(),
            position: 0,
            stash: None,
            store,
        }
    }

    pub fn with_null_store() -> Self {
        History::new(Box::new(NullStore))
    }

    /// Loads persisted history for `mode`; failures leave the in-memory
    /// list untouched (spec §7: `HistoryUnavailable` is silent).
    pub fn load(&mut self, mode: &str, max: Option<usize>) {
        if let Ok(mut entries) = self.store.load_history(mode, max) {
            self.entries.append(&mut entries);
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Builds a `HistoryEntry` from the executor's env vars and appends it.
    /// Returns `false` without recording when `cmd` matches a "don't
    /// record" rule.
    pub fn add(&mut self, mode: &str, cmd: &str) -> bool {
        if !should_record(cmd) {
            return false;
        }
        let start = env_i64("LILUSH_EXEC_START", 0);
        let end = env_i64("LILUSH_EXEC_END", start);
        let status = env_i32("LILUSH_EXEC_STATUS", 0);
        let entry = HistoryEntry {
            cmd: cmd.to_string(),
            ts: end,
            duration: (end - start).max(0),
            cwd: current_cwd_abbreviated(),
            exit: status,
            mode: mode.to_string(),
        };
        self.entries.push(entry.clone());
        if let Err(e) = self.store.save_history_entry(mode, &entry) {
            tracing::debug!(error = %e, "history store save failed, keeping in-memory only");
        }
        self.position = 0;
        self.stash = None;
        true
    }

    pub fn stash(&mut self, buffer: &str) {
        self.stash = Some(buffer.to_string());
    }

    /// Moves further back through history, skipping runs of identical
    /// commands; stashes `current_buffer` the first time it is called
    /// from position 0.
    pub fn up(&mut self, current_buffer: &str) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        if self.position == 0 {
            self.stash(current_buffer);
        }
        let len = self.entries.len();
        let prev_cmd = if self.position == 0 {
            None
        } else {
            Some(self.entries[len - self.position].cmd.clone())
        };
        let mut pos = self.position;
        loop {
            if pos >= len {
                pos = len;
                break;
            }
            pos += 1;
            let cmd = &self.entries[len - pos].cmd;
            if Some(cmd.as_str()) == prev_cmd.as_deref() {
                continue;
            }
            break;
        }
        self.position = pos;
        Some(self.entries[len - pos].cmd.clone())
    }

    /// Moves toward the live buffer; returns the stash once `position`
    /// reaches 0.
    pub fn down(&mut self) -> Option<String> {
        if self.position == 0 {
            return None;
        }
        let len = self.entries.len();
        let prev_cmd = self.entries[len - self.position].cmd.clone();
        let mut pos = self.position;
        loop {
            if pos <= 1 {
                pos = 0;
                break;
            }
            pos -= 1;
            let cmd = &self.entries[len - pos].cmd;
            if *cmd == prev_cmd {
                continue;
            }
            break;
        }
        self.position = pos;
        Some(self.get())
    }

    /// Returns the command at the current navigation position; at position
    /// 0 this consumes (and clears) the stash.
    pub fn get(&mut self) -> String {
        if self.position == 0 {
            return self.stash.take().unwrap_or_default();
        }
        let len = self.entries.len();
        self.entries[len - self.position].cmd.clone()
    }

    fn token_pattern(tokens: &[&str]) -> Option<Regex> {
        if tokens.is_empty() {
            return None;
        }
        let pattern = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join(".*?");
        Regex::new(&pattern).ok()
    }

    /// Fuzzy rank-and-dedupe search over commands (spec §4.D, §8 scenario 4).
    pub fn search(&self, tokens: &[&str], cwd: &str) -> Vec<String> {
        let re = match Self::token_pattern(tokens) {
            Some(re) => re,
            None => return Vec::new(),
        };
        let mut scores: HashMap<String, i64> = HashMap::new();
        for entry in &self.entries {
            if !re.is_match(&entry.cmd) {
                continue;
            }
            let mut score = tokens.len() as i64;
            if entry.cwd == cwd {
                score += 2;
            }
            if entry.exit != 0 {
                score -= 1;
            }
            *scores.entry(entry.cmd.clone()).or_insert(0) += score;
        }
        rank(scores)
    }

    /// Fuzzy search over working directories, favoring shorter paths.
    pub fn dir_search(&self, tokens: &[&str]) -> Vec<String> {
        let re = match Self::token_pattern(tokens) {
            Some(re) => re,
            None => return Vec::new(),
        };
        let pattern_len = tokens.iter().map(|t| t.len()).sum::<usize>().max(1) as f64;
        let mut scores: HashMap<String, i64> = HashMap::new();
        for entry in &self.entries {
            if !re.is_match(&entry.cwd) {
                continue;
            }
            let cwd_len = entry.cwd.chars().count().max(1) as f64;
            let bonus = (pattern_len / (cwd_len / 100.0)) as i64;
            *scores.entry(entry.cwd.clone()).or_insert(0) += bonus;
        }
        rank(scores)
    }

    /// Last whitespace-separated token of the most recent entry.
    pub fn last_arg(&self) -> Option<String> {
        self.entries
            .last()
            .and_then(|e| e.cmd.split_whitespace().last().map(str::to_string))
    }
}

fn rank(scores: HashMap<String, i64>) -> Vec<String> {
    let mut ranked: Vec<(String, i64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
    ranked.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cmd: &str, cwd: &str, exit: i32) -> HistoryEntry {
        HistoryEntry {
            cmd: cmd.to_string(),
            ts: 0,
            duration: 0,
            cwd: cwd.to_string(),
            exit,
            mode: "shell".to_string(),
        }
    }

    #[test]
    fn rejects_space_prefixed_and_dot_dot_and_jumpers() {
        assert!(!should_record(" secret"));
        assert!(!should_record(".."));
        assert!(!should_record("../foo"));
        assert!(!should_record("x home"));
        assert!(!should_record("z proj"));
        assert!(should_record("ls -la"));
    }

    #[test]
    fn search_dedupes_and_favors_cwd_match() {
        let mut h = History::with_null_store();
        h.entries.push(entry("ls -la", "~/", 0));
        h.entries.push(entry("ls -l", "~/a", 0));
        h.entries.push(entry("ls -la", "~/", 0));
        let results = h.search(&["ls", "la"], "~/");
        assert_eq!(results, vec!["ls -la".to_string()]);
    }

    #[test]
    fn up_then_down_returns_to_stash() {
        let mut h = History::with_null_store();
        h.entries.push(entry("first", "~", 0));
        h.entries.push(entry("second", "~", 0));
        assert_eq!(h.up("typing"), Some("second".to_string()));
        assert_eq!(h.up("typing"), Some("first".to_string()));
        assert_eq!(h.down(), Some("second".to_string()));
        assert_eq!(h.down(), Some("typing".to_string()));
    }

    #[test]
    fn up_skips_consecutive_duplicates() {
        let mut h = History::with_null_store();
        h.entries.push(entry("a", "~", 0));
        h.entries.push(entry("a", "~", 0));
        h.entries.push(entry("b", "~", 0));
        assert_eq!(h.up(""), Some("b".to_string()));
        assert_eq!(h.up(""), Some("a".to_string()));
    }

    #[test]
    fn last_arg_returns_final_token() {
        let mut h = History::with_null_store();
        h.entries.push(entry("git commit -m msg", "~", 0));
        assert_eq!(h.last_arg(), Some("msg".to_string()));
    }
}
