//! `InputState`: the editable multi-line buffer (spec §3, §4.F).

use std::io::Write;

use core_completion::Completion;
use core_history::History;

use crate::error::{Result, StateError};
use crate::last_op::LastOp;
use crate::tab::TabState;

pub struct InputState {
    lines: Vec<String>,
    /// 1-based active line.
    line: usize,
    /// 1-based column within the visible window of the active line.
    cursor: usize,
    /// Codepoints of the active line hidden to the left of the window.
    offset: usize,
    last_completion_len: usize,
    last_op: LastOp,
    tab_state: TabState,
    history: Option<History>,
    completion: Option<Completion>,
    term_rows: usize,
    term_cols: usize,
    /// Column the input anchor starts at (`set_position`).
    anchor_col: usize,
    /// Width of the rendered prompt on the active line, supplied by the
    /// view each frame.
    prompt_len: usize,
    /// Optional hard cap on `max_width()` narrower than the terminal.
    configured_width: Option<usize>,
}

impl InputState {
    pub fn new(term_rows: usize, term_cols: usize) -> Self {
        InputState {
            lines: vec![String::new()],
            line: 1,
            cursor: 1,
            offset: 0,
            last_completion_len: 0,
            last_op: LastOp::FullChange,
            tab_state: TabState::new(),
            history: None,
            completion: None,
            term_rows,
            term_cols,
            anchor_col: 0,
            prompt_len: 0,
            configured_width: None,
        }
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    pub fn history_mut(&mut self) -> Option<&mut History> {
        self.history.as_mut()
    }

    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }

    pub fn completion_mut(&mut self) -> Option<&mut Completion> {
        self.completion.as_mut()
    }

    /// Re-runs the completion search against the active line (spec §4.G
    /// "rerun completion search" on `Insert`). Disjoint field borrows let
    /// this read `history` while mutating `completion` in one call, which
    /// `completion_mut()`/`history()` can't do together through `&mut self`.
    pub fn refresh_completion(&mut self) -> bool {
        let Some(completion) = self.completion.as_mut() else {
            return false;
        };
        let buffer = self.lines[self.line - 1].clone();
        completion.search(&buffer, self.history.as_ref())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn last_op(&self) -> LastOp {
        self.last_op
    }

    pub fn on_tab_press(&mut self) {
        self.tab_state.on_press();
    }

    /// Returns whether the hold qualified as a long press (spec §4.F: long
    /// Tab scrolls, short Tab promotes).
    pub fn on_tab_release(&mut self) -> bool {
        self.tab_state.on_release()
    }

    pub fn last_completion_len(&self) -> usize {
        self.last_completion_len
    }

    pub fn current_line(&self) -> &str {
        &self.lines[self.line - 1]
    }

    pub fn buffer_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// `min(config.width, term_cols - anchor_col - prompt_len)`; `None`
    /// when there is no room left to render (spec §3).
    pub fn max_width(&self) -> Option<usize> {
        let avail = self
            .term_cols
            .saturating_sub(self.anchor_col)
            .saturating_sub(self.prompt_len);
        let w = match self.configured_width {
            Some(cw) => avail.min(cw),
            None => avail,
        };
        if w == 0 {
            None
        } else {
            Some(w)
        }
    }

    pub fn set_configured_width(&mut self, width: Option<usize>) {
        self.configured_width = width;
    }

    pub fn set_prompt_len(&mut self, len: usize) {
        self.prompt_len = len;
    }

    fn line_chars(&self) -> Vec<char> {
        self.current_line().chars().collect()
    }

    fn set_line_chars(&mut self, chars: Vec<char>) {
        self.lines[self.line - 1] = chars.into_iter().collect();
    }

    /// Clamps `cursor`/`offset` to the window after a change that may have
    /// pushed `cursor` past `max_width()`. Before the first scroll, `cursor`
    /// may sit at `max_width()+1` (the invariant's one-column overhang for a
    /// line that exactly fills the window); once scrolled, `max_width()`
    /// itself is the cap and every further overflow shifts `offset` instead.
    fn clamp_after_grow(&mut self, mw: usize) {
        let cap = if self.offset == 0 { mw + 1 } else { mw };
        if self.cursor > cap {
            self.cursor = mw;
            self.offset += 1;
        }
    }

    /// Inserts `ch` at the buffer position `offset + cursor` (spec §4.F).
    pub fn insert(&mut self, ch: char) -> bool {
        let Some(mw) = self.max_width() else {
            return false;
        };
        let idx = (self.offset + self.cursor - 1).min(self.current_line().chars().count());
        let mut chars = self.line_chars();
        chars.insert(idx, ch);
        self.set_line_chars(chars);
        self.cursor += 1;
        self.clamp_after_grow(mw);
        self.last_op = LastOp::Insert(self.offset + self.cursor);
        true
    }

    /// Deletes the char before the cursor, joining with the previous line
    /// when at column 1 of a non-first line (spec §4.F).
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 1 && self.offset == 0 {
            if self.line == 1 {
                return false;
            }
            let current = self.lines.remove(self.line - 1);
            self.line -= 1;
            let join_pos = self.current_line().chars().count();
            self.lines[self.line - 1].push_str(&current);
            self.cursor = (join_pos + 1).min(self.max_width().unwrap_or(1));
            self.offset = join_pos + 1 - self.cursor;
            self.last_op = LastOp::Delete(self.offset + self.cursor);
            return true;
        }

        let pos = self.offset + self.cursor;
        let idx = pos.saturating_sub(2);
        let mut chars = self.line_chars();
        if idx < chars.len() {
            chars.remove(idx);
            self.set_line_chars(chars);
        }
        if self.cursor > 1 {
            self.cursor -= 1;
        } else if self.offset > 0 {
            self.offset -= 1;
        }
        self.last_op = LastOp::Delete(pos - 1);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor > 1 {
            self.cursor -= 1;
        } else if self.offset > 0 {
            self.offset -= 1;
        } else if self.line > 1 {
            self.line -= 1;
            self.end_of_line();
            self.last_op = LastOp::CursorMove;
            return true;
        } else {
            return false;
        }
        self.last_op = LastOp::CursorMove;
        true
    }

    pub fn move_right(&mut self) -> bool {
        let total = self.current_line().chars().count();
        if self.offset + self.cursor - 1 < total {
            let Some(mw) = self.max_width() else {
                return false;
            };
            self.cursor += 1;
            self.clamp_after_grow(mw);
        } else if self.line < self.lines.len() {
            self.line += 1;
            self.start_of_line();
        } else {
            return false;
        }
        self.last_op = LastOp::CursorMove;
        true
    }

    fn is_boundary(c: char) -> bool {
        c.is_whitespace()
    }

    pub fn move_to_previous_space(&mut self) -> bool {
        let chars = self.line_chars();
        let mut idx = (self.offset + self.cursor).saturating_sub(2);
        while idx > 0 && Self::is_boundary(chars[idx]) {
            idx -= 1;
        }
        while idx > 0 && !Self::is_boundary(chars[idx - 1]) {
            idx -= 1;
        }
        self.set_position_in_line(idx);
        self.last_op = LastOp::CursorMove;
        true
    }

    pub fn move_to_next_space(&mut self) -> bool {
        let chars = self.line_chars();
        let len = chars.len();
        let mut idx = self.offset + self.cursor - 1;
        while idx < len && !Self::is_boundary(chars[idx]) {
            idx += 1;
        }
        while idx < len && Self::is_boundary(chars[idx]) {
            idx += 1;
        }
        self.set_position_in_line(idx);
        self.last_op = LastOp::CursorMove;
        true
    }

    /// Places the 0-based absolute index `idx` under the cursor, clamping
    /// into the visible window.
    fn set_position_in_line(&mut self, idx: usize) {
        let Some(mw) = self.max_width() else { return };
        let abs = idx + 1;
        if abs <= mw {
            self.cursor = abs.max(1);
            self.offset = 0;
        } else {
            self.cursor = mw;
            self.offset = abs - mw;
        }
    }

    pub fn start_of_line(&mut self) -> bool {
        self.cursor = 1;
        self.offset = 0;
        self.last_op = LastOp::CursorMove;
        true
    }

    pub fn end_of_line(&mut self) -> bool {
        let len = self.current_line().chars().count();
        self.set_position_in_line(len);
        self.last_op = LastOp::CursorMove;
        true
    }

    pub fn history_up(&mut self) -> bool {
        let Some(history) = self.history.as_mut() else {
            return false;
        };
        let current = self.current_line().to_string();
        let Some(cmd) = history.up(&current) else {
            return false;
        };
        self.lines = vec![cmd];
        self.line = 1;
        self.end_of_line();
        self.last_op = LastOp::HistoryScroll;
        true
    }

    pub fn history_down(&mut self) -> bool {
        let Some(history) = self.history.as_mut() else {
            return false;
        };
        let Some(cmd) = history.down() else {
            return false;
        };
        self.lines = vec![cmd];
        self.line = 1;
        self.end_of_line();
        self.last_op = LastOp::HistoryScroll;
        true
    }

    /// Splits the active line at the cursor, inserting a new line after it
    /// (spec §4.F).
    pub fn newline(&mut self) -> bool {
        let chars = self.line_chars();
        let idx = (self.offset + self.cursor - 1).min(chars.len());
        let (head, tail): (Vec<char>, Vec<char>) = (chars[..idx].to_vec(), chars[idx..].to_vec());
        self.lines[self.line - 1] = head.into_iter().collect();
        self.lines.insert(self.line, tail.into_iter().collect());
        self.line += 1;
        self.start_of_line();
        self.last_op = LastOp::FullChange;
        true
    }

    pub fn insert_last_arg(&mut self) -> bool {
        let Some(arg) = self.history.as_ref().and_then(History::last_arg) else {
            return false;
        };
        for ch in arg.chars() {
            self.insert(ch);
        }
        self.last_op = LastOp::FullChange;
        true
    }

    /// Opens `$EDITOR` on the current buffer, replacing `lines` with the
    /// edited output (spec §4.F).
    pub fn external_editor(&mut self) -> Result<bool> {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
        tracing::debug!(editor, "spawning external editor");
        let mut file = tempfile::NamedTempFile::new()
            .map_err(|e| StateError::EditorFailed(e.to_string()))?;
        let content = self.lines.join("\n");
        file.write_all(content.as_bytes())
            .map_err(|e| StateError::EditorFailed(e.to_string()))?;
        file.flush().map_err(|e| StateError::EditorFailed(e.to_string()))?;

        let status = std::process::Command::new(&editor)
            .arg(file.path())
            .status()
            .map_err(|e| StateError::EditorFailed(e.to_string()))?;
        if !status.success() {
            return Err(StateError::EditorFailed(format!(
                "{editor} exited with {status}"
            )));
        }

        let edited = std::fs::read_to_string(file.path())
            .map_err(|e| StateError::EditorFailed(e.to_string()))?;
        self.lines = edited.lines().map(str::to_string).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.line = self.lines.len();
        self.end_of_line();
        self.last_op = LastOp::FullChange;
        Ok(true)
    }

    /// Short Tab: promote the current completion into the buffer. Returns
    /// `Ok(true)` on redraw, `Ok(false)` when nothing to promote, and
    /// signals immediate execution via the returned flag pair.
    pub fn promote_completion(&mut self) -> PromoteOutcome {
        let Some(completion) = self.completion.as_ref() else {
            return PromoteOutcome::NoOp;
        };
        let Some(promotion) = completion.promote() else {
            return PromoteOutcome::NoOp;
        };

        let full = promotion.replace_prompt.is_some();
        if let Some(prefix) = &promotion.replace_prompt {
            let trimmed = self.current_line().strip_prefix(prefix.as_str());
            let base = trimmed.unwrap_or(self.current_line());
            self.lines[self.line - 1] = format!("{base}{}", promotion.text);
        } else {
            self.lines[self.line - 1] = format!("{}{}", self.current_line(), promotion.text);
        }
        self.end_of_line();
        if let Some(completion) = self.completion.as_mut() {
            completion.flush();
        }
        self.last_op = LastOp::CompletionPromote(full);

        if promotion.exec_on_prom {
            PromoteOutcome::Execute
        } else {
            PromoteOutcome::Redraw
        }
    }

    pub fn scroll_completion(&mut self, up: bool) -> bool {
        let Some(completion) = self.completion.as_mut() else {
            return false;
        };
        if completion.is_empty() {
            return false;
        }
        let previous_len = self.last_completion_len;
        if up {
            completion.scroll_up();
        } else {
            completion.scroll_down();
        }
        self.last_op = LastOp::CompletionScroll(previous_len);
        true
    }

    pub fn set_last_completion_len(&mut self, len: usize) {
        self.last_completion_len = len;
    }

    pub fn update_window_size(&mut self, rows: usize, cols: usize) {
        self.term_rows = rows;
        self.term_cols = cols;
        if let Some(mw) = self.max_width() {
            if self.cursor > mw {
                let overflow = self.cursor - mw;
                self.offset += overflow;
                self.cursor = mw;
            }
        }
        self.last_op = LastOp::FullChange;
    }

    pub fn term_size(&self) -> (usize, usize) {
        (self.term_rows, self.term_cols)
    }

    pub fn set_position(&mut self, line: usize, col: usize) {
        self.anchor_col = col;
        let _ = line;
        self.last_op = LastOp::PositionChange;
    }

    pub fn flush(&mut self) {
        self.lines = vec![String::new()];
        self.line = 1;
        self.cursor = 1;
        self.offset = 0;
        self.last_completion_len = 0;
        if let Some(completion) = self.completion.as_mut() {
            completion.flush();
        }
        self.last_op = LastOp::FullChange;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoteOutcome {
    Redraw,
    Execute,
    NoOp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_backspace_is_idempotent() {
        let mut s = InputState::new(24, 80);
        s.insert('h');
        s.insert('i');
        s.backspace();
        assert_eq!(s.lines(), &["h".to_string()]);
        assert_eq!(s.cursor(), 2);
        assert_eq!(s.offset(), 0);
        assert_eq!(s.last_op(), LastOp::Delete(2));
    }

    #[test]
    fn horizontal_scroll_keeps_cursor_within_window() {
        let mut s = InputState::new(24, 10);
        s.set_configured_width(Some(10));
        for _ in 0..12 {
            s.insert('x');
        }
        assert_eq!(s.lines()[0].chars().count(), 12);
        assert_eq!(s.cursor(), 10);
        assert!(s.offset() > 0);
        let visible: String = s
            .current_line()
            .chars()
            .skip(s.offset())
            .take(10)
            .collect();
        assert_eq!(visible.chars().count(), 10);
    }

    #[test]
    fn newline_splits_line_at_cursor() {
        let mut s = InputState::new(24, 80);
        s.insert('a');
        s.insert('b');
        s.move_left();
        s.newline();
        assert_eq!(s.lines(), &["a".to_string(), "b".to_string()]);
        assert_eq!(s.line(), 2);
    }

    #[test]
    fn buffer_empty_has_cursor_one_offset_zero() {
        let s = InputState::new(24, 80);
        assert!(s.buffer_empty());
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.offset(), 0);
    }

    #[test]
    fn flush_resets_to_empty_buffer() {
        let mut s = InputState::new(24, 80);
        s.insert('x');
        s.flush();
        assert!(s.buffer_empty());
        assert_eq!(s.last_op(), LastOp::FullChange);
    }
}
