//! Key bindings.

use super::EditorState;
use crate::input::{Key, KeyEvent};

impl EditorState {
    /// Apply a key press. Returns whether the key was bound.
    ///
    /// Everything except Escape is ignored while a pointer interaction is
    /// in progress.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let modifiers = event.modifiers;
        if event.key == Key::Escape {
            self.cancel_interaction();
            self.selection.clear();
            return true;
        }
        if !self.mode.is_idle() {
            return false;
        }

        let placement = &self.config.placement;
        let step = if modifiers.shift {
            placement.nudge_step_large
        } else {
            placement.nudge_step
        };
        match event.key {
            Key::ArrowUp => {
                self.nudge_selection(0.0, -step);
            }
            Key::ArrowDown => {
                self.nudge_selection(0.0, step);
            }
            Key::ArrowLeft => {
                self.nudge_selection(-step, 0.0);
            }
            Key::ArrowRight => {
                self.nudge_selection(step, 0.0);
            }
            Key::Delete | Key::Backspace => {
                self.delete_selection();
            }
            Key::Char(c) if modifiers.is_command() => match (c.to_ascii_lowercase(), modifiers.shift) {
                ('z', false) => {
                    self.undo();
                }
                ('z', true) | ('y', _) => {
                    self.redo();
                }
                ('d', _) => {
                    self.duplicate_selection();
                }
                ('g', false) => {
                    self.group_selection();
                }
                ('g', true) => {
                    self.ungroup_selection();
                }
                (']', _) => {
                    self.bring_selection_to_front();
                }
                ('[', _) => {
                    self.send_selection_to_back();
                }
                _ => return false,
            },
            _ => return false,
        }
        true
    }
}
