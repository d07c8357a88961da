//! Event loop: decode one key, mutate `InputState`, refresh `InputView`
//! (spec §4.H).

use std::io::{self, Write};

use core_keys::{Codepoint, DecodedEvent, Decoder, EventType, NamedKey, TerminalSource};
use core_style::StyleSheet;
use core_terminal::Terminal;
use input_state::{InputState, PromoteOutcome};
use input_view::{Prompt, View, ViewContext};

use crate::error::Result;
use crate::mapping::{self, Action};

/// Outcome of `Controller::run`: the terminating event name (e.g.
/// `"execute"`, `"exit"`) and, when the key didn't map to any known
/// shortcut, the raw combo text for a mode switcher to interpret (spec
/// §4.H "Return value").
pub struct RunOutcome {
    pub event: String,
    pub combo: Option<String>,
}

pub struct Controller<'a> {
    pub terminal: &'a mut Terminal,
    pub decoder: Decoder,
    pub view: View,
    pub state: InputState,
    pub prompt: Box<dyn Prompt>,
    pub sheet: StyleSheet,
    last_rows: u16,
    last_cols: u16,
}

impl<'a> Controller<'a> {
    pub fn new(terminal: &'a mut Terminal, state: InputState, prompt: Box<dyn Prompt>, sheet: StyleSheet) -> Self {
        let (rows, cols) = terminal.window_size().unwrap_or((24, 80));
        Controller {
            terminal,
            decoder: Decoder::new(),
            view: View::new(),
            state,
            prompt,
            sheet,
            last_rows: rows,
            last_cols: cols,
        }
    }

    fn redraw(&mut self) -> Result<()> {
        // Built from direct field projections (not a `&self` helper) so the
        // borrow checker sees it as disjoint from the `self.view`/
        // `self.prompt` borrows the `display()` call below also needs.
        let ctx = ViewContext {
            sheet: &self.sheet,
            terminal_cols: self.last_cols as u32,
            terminal_rows: self.last_rows as u32,
        };
        let out = self.view.display(&self.state, self.prompt.as_mut(), &ctx);
        let mut stdout = io::stdout();
        // Any write failure here is fatal to the session (spec §4.A: "any
        // write error is fatal ... surface TerminalLost").
        stdout
            .write_all(out.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(core_terminal::TerminalError::from)?;
        Ok(())
    }

    /// Step 1 of the loop body: pick up a latched SIGWINCH and force a full
    /// redraw if the size actually changed (spec §4.H step 1).
    fn poll_resize(&mut self) {
        if !self.terminal.resized() {
            return;
        }
        if let Ok((rows, cols)) = self.terminal.window_size() {
            if rows != self.last_rows || cols != self.last_cols {
                self.last_rows = rows;
                self.last_cols = cols;
                self.state.update_window_size(rows as usize, cols as usize);
            }
        }
    }

    /// Runs until a terminating action fires or an unmapped combo is seen;
    /// `exit_events` are event names ("execute", "exit", or caller-defined
    /// mode-switch strings) that end the loop (spec §4.H).
    pub fn run(&mut self, exit_events: &[&str]) -> Result<RunOutcome> {
        loop {
            self.poll_resize();

            let mut source = TerminalSource;
            let decoded = match self.decoder.decode_one(&mut source) {
                Ok(decoded) => decoded,
                Err(e) => {
                    // Spec §7: a malformed CSI sequence drops and resyncs to
                    // the next ESC; it never ends the session.
                    tracing::debug!(error = %e, "dropping malformed key sequence");
                    continue;
                }
            };
            let Some(decoded) = decoded else {
                continue;
            };

            let mut redraw_needed = false;
            let mut outcome: Option<RunOutcome> = None;

            match decoded {
                DecodedEvent::Paste(paste) => {
                    for ch in paste.text.chars() {
                        self.state.insert(ch);
                    }
                    self.state.refresh_completion();
                    redraw_needed = true;
                }
                DecodedEvent::Key(ev) => {
                    if ev.codepoint == Codepoint::Named(NamedKey::Tab) {
                        match ev.event {
                            EventType::Press => {
                                self.state.on_tab_press();
                            }
                            EventType::Release => {
                                let long = self.state.on_tab_release();
                                redraw_needed = self.dispatch_completion(long, &mut outcome);
                            }
                            EventType::Repeat => {}
                        }
                    } else if let Some(key) = core_keys::simple_get(&ev) {
                        if let Some(action) = mapping::lookup(&key) {
                            redraw_needed = self.dispatch_action(action, &mut outcome);
                        } else if let Codepoint::Char(ch) = ev.codepoint {
                            if ev.event != EventType::Release && !is_control_only(ev.mods) {
                                self.state.insert(ch);
                                self.state.refresh_completion();
                                redraw_needed = true;
                            } else {
                                outcome = Some(RunOutcome {
                                    event: "combo".to_string(),
                                    combo: Some(key),
                                });
                            }
                        } else {
                            outcome = Some(RunOutcome {
                                event: "combo".to_string(),
                                combo: Some(key),
                            });
                        }
                    }
                }
            }

            if redraw_needed {
                self.redraw()?;
            }

            if let Some(outcome) = outcome {
                if exit_events.contains(&outcome.event.as_str()) || outcome.combo.is_some() {
                    return Ok(outcome);
                }
            }
        }
    }

    fn dispatch_completion(&mut self, long_press: bool, outcome: &mut Option<RunOutcome>) -> bool {
        if long_press {
            self.state.scroll_completion(true)
        } else {
            match self.state.promote_completion() {
                PromoteOutcome::Redraw => true,
                PromoteOutcome::NoOp => false,
                PromoteOutcome::Execute => {
                    *outcome = Some(RunOutcome {
                        event: "execute".to_string(),
                        combo: None,
                    });
                    true
                }
            }
        }
    }

    fn dispatch_action(&mut self, action: Action, outcome: &mut Option<RunOutcome>) -> bool {
        match action {
            Action::Backspace => {
                let r = self.state.backspace();
                self.state.refresh_completion();
                r
            }
            Action::MoveLeft => self.state.move_left(),
            Action::MoveRight => self.state.move_right(),
            Action::MoveUp => self.state.history_up(),
            Action::MoveDown => self.state.history_down(),
            Action::WordLeft => self.state.move_to_previous_space(),
            Action::WordRight => self.state.move_to_next_space(),
            Action::StartOfLine => self.state.start_of_line(),
            Action::EndOfLine => self.state.end_of_line(),
            Action::Newline => self.state.newline(),
            Action::ExternalEditor => match self.state.external_editor() {
                Ok(redraw) => redraw,
                Err(e) => {
                    // Per spec §7 only `TerminalLost`/OOM are fatal; a
                    // misbehaving `$EDITOR` degrades to "nothing happened".
                    tracing::warn!(error = %e, "external editor failed, buffer unchanged");
                    false
                }
            },
            Action::InsertLastArg => self.state.insert_last_arg(),
            Action::Execute => {
                if self.state.buffer_empty() {
                    self.state.newline();
                    true
                } else {
                    let exec_on_prom = self
                        .state
                        .completion()
                        .and_then(|c| c.promote())
                        .map(|p| p.exec_on_prom)
                        .unwrap_or(false);
                    // promote_completion() itself resolves to Execute when
                    // meta.exec_on_prom is set (spec §4.F ENTER with
                    // completion active).
                    if exec_on_prom {
                        self.state.promote_completion();
                    }
                    *outcome = Some(RunOutcome {
                        event: "execute".to_string(),
                        combo: None,
                    });
                    false
                }
            }
            Action::Exit => {
                if self.state.buffer_empty() {
                    *outcome = Some(RunOutcome {
                        event: "exit".to_string(),
                        combo: None,
                    });
                    false
                } else {
                    self.state.scroll_completion(true)
                }
            }
            Action::CompletionAction => false,
        }
    }
}

fn is_control_only(mods: core_keys::ModMask) -> bool {
    mods.intersects(
        core_keys::ModMask::CTRL
            | core_keys::ModMask::ALT
            | core_keys::ModMask::SUPER
            | core_keys::ModMask::HYPER
            | core_keys::ModMask::META,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_keys::ModMask;

    #[test]
    fn plain_and_shift_only_are_not_control_only() {
        assert!(!is_control_only(ModMask::empty()));
        assert!(!is_control_only(ModMask::SHIFT));
    }

    #[test]
    fn ctrl_or_alt_are_control_only() {
        assert!(is_control_only(ModMask::CTRL));
        assert!(is_control_only(ModMask::ALT));
        assert!(is_control_only(ModMask::SHIFT | ModMask::CTRL));
    }
}
