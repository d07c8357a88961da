//! Differential redraw of the input buffer from `InputState::last_op`
//! (spec §4.G).

use core_style::apply::{apply, ApplyContext};
use core_style::StyleSheet;
use core_terminal::ansi;
use input_state::{InputState, LastOp};

use crate::prompt::Prompt;

pub struct ViewContext<'a> {
    pub sheet: &'a StyleSheet,
    pub terminal_cols: u32,
    pub terminal_rows: u32,
}

/// Owns the bookkeeping needed to do a *minimal* redraw: which buffer line
/// is currently the cursor's terminal row, relative to the first rendered
/// row.
pub struct View {
    /// Buffer line (1-based) last rendered as the cursor row; `0` means
    /// nothing has been rendered yet and a full redraw is required.
    rendered_line: usize,
}

impl View {
    pub fn new() -> Self {
        View { rendered_line: 0 }
    }

    fn ghost(&self, state: &InputState, ctx: &ViewContext, max_width: usize) -> String {
        let Some(completion) = state.completion() else {
            return String::new();
        };
        if completion.is_empty() {
            return String::new();
        }
        let apply_ctx = ApplyContext {
            sheet: ctx.sheet,
            terminal_cols: ctx.terminal_cols,
            parent_width: 0,
            column_hint: (ctx.terminal_cols as usize).saturating_sub(max_width) as u32,
            display_len: core_style::width::codepoint_len,
        };
        completion.get(false, &apply_ctx)
    }

    /// Repositions the cursor by moving left from end-of-line-writes back
    /// to the active column; callers always write full lines left-to-right
    /// then call this to park the cursor where `state.cursor()` says.
    fn reposition(&self, state: &InputState, written_cols: usize) -> String {
        let target = state.cursor();
        if written_cols > target {
            ansi::mv(ansi::Direction::Left, (written_cols - target) as u16)
        } else if target > written_cols {
            ansi::mv(ansi::Direction::Right, (target - written_cols) as u16)
        } else {
            String::new()
        }
    }

    fn visible_window(&self, state: &InputState, max_width: usize) -> String {
        state
            .current_line()
            .chars()
            .skip(state.offset())
            .take(max_width)
            .collect()
    }

    fn full_redraw(&mut self, state: &InputState, prompt: &mut dyn Prompt, ctx: &ViewContext) -> String {
        let mut out = String::new();
        out.push_str(&ansi::hide_cursor());
        out.push_str(&ansi::clear_line(ansi::ClearLineMode::Whole));
        out.push('\r');
        let prompt_text = prompt.get();
        out.push_str(&prompt_text);
        let max_width = state.max_width().unwrap_or(0);
        let window = self.visible_window(state, max_width);
        out.push_str(&window);
        out.push_str(&self.ghost(state, ctx, max_width));
        out.push_str(&self.reposition(state, window.chars().count()));
        out.push_str(&ansi::show_cursor());
        self.rendered_line = state.line();
        out
    }

    /// Rewrites from the cursor to the end of the visible window, the fast
    /// path for `Insert`/`Delete`/`CompletionPromote` on the already
    /// rendered line (spec §4.G table).
    fn redraw_tail(&self, state: &InputState, ctx: &ViewContext) -> String {
        let mut out = String::new();
        out.push_str(&ansi::clear_line(ansi::ClearLineMode::ToEnd));
        let max_width = state.max_width().unwrap_or(0);
        let window = self.visible_window(state, max_width);
        let tail: String = window.chars().skip(state.cursor().saturating_sub(1)).collect();
        out.push_str(&tail);
        out.push_str(&self.ghost(state, ctx, max_width));
        out.push_str(&self.reposition(state, state.cursor().saturating_sub(1) + tail.chars().count()));
        out
    }

    /// Renders the next frame given `state.last_op()`; returns the ANSI
    /// text the caller writes to the terminal.
    pub fn display(&mut self, state: &InputState, prompt: &mut dyn Prompt, ctx: &ViewContext) -> String {
        let on_rendered_line = state.line() == self.rendered_line;
        tracing::trace!(last_op = ?state.last_op(), on_rendered_line, "redraw");

        match state.last_op() {
            LastOp::CursorMove if on_rendered_line => {
                let max_width = state.max_width().unwrap_or(0);
                let window_len = self.visible_window(state, max_width).chars().count();
                self.reposition(state, window_len)
            }
            LastOp::Insert(_) | LastOp::Delete(_) if on_rendered_line => self.redraw_tail(state, ctx),
            LastOp::CompletionPromote(full) if on_rendered_line && !full => {
                self.redraw_tail(state, ctx)
            }
            LastOp::CompletionScroll(prev_len) if on_rendered_line => {
                let mut out = String::new();
                if prev_len > 0 {
                    out.push_str(&ansi::mv(ansi::Direction::Left, prev_len as u16));
                    out.push_str(&ansi::clear_line(ansi::ClearLineMode::ToEnd));
                }
                let max_width = state.max_width().unwrap_or(0);
                let ghost = self.ghost(state, ctx, max_width);
                out.push_str(&ghost);
                out.push_str(&ansi::mv(ansi::Direction::Left, ghost.chars().count() as u16));
                out
            }
            LastOp::HistoryScroll => self.full_redraw(state, prompt, ctx),
            _ => self.full_redraw(state, prompt, ctx),
        }
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_completion::Completion;

    struct FixedPrompt(String);
    impl Prompt for FixedPrompt {
        fn get(&self) -> String {
            self.0.clone()
        }
        fn set(&mut self, _options: crate::prompt::PromptOptions) {}
        fn len(&self) -> usize {
            self.0.chars().count()
        }
    }

    fn ctx(sheet: &StyleSheet) -> ViewContext<'_> {
        ViewContext {
            sheet,
            terminal_cols: 80,
            terminal_rows: 24,
        }
    }

    #[test]
    fn full_redraw_includes_prompt_and_content() {
        let sheet = StyleSheet::new();
        let mut state = InputState::new(24, 80).with_completion(Completion::new());
        state.insert('h');
        state.insert('i');
        let mut view = View::new();
        let mut prompt = FixedPrompt("$ ".to_string());
        let out = view.display(&state, &mut prompt, &ctx(&sheet));
        assert!(out.contains("$ "));
        assert!(out.contains("hi"));
    }

    #[test]
    fn second_insert_uses_tail_redraw_not_full_clear() {
        let sheet = StyleSheet::new();
        let mut state = InputState::new(24, 80).with_completion(Completion::new());
        let mut view = View::new();
        let mut prompt = FixedPrompt("$ ".to_string());
        view.display(&state, &mut prompt, &ctx(&sheet));
        state.insert('a');
        let out = view.display(&state, &mut prompt, &ctx(&sheet));
        assert!(!out.contains("$ "));
    }
}
