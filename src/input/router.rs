//! Keyboard dispatch. First match wins: edit-mode keys while a session is
//! open, otherwise navigation, shortcuts and edit entry.
//!
//! Commits need the live markup of the editing surface, which only the UI
//! can read, so mid-edit keys come back as commands the UI executes with the
//! markup in hand. Everything that is pure state (selection moves, clears,
//! insert shortcuts) happens right here.

use crate::input::keys::{KeyCode, KeyPress};
use crate::state::address::Address;
use crate::state::editor::{GridEditor, Move};

/// Work the UI layer must finish for a routed key.
#[derive(Clone, Debug, PartialEq)]
pub enum UiCommand {
    /// A session was opened; focus the editing surface after the next paint.
    StartEdit,
    /// Read the surface markup, commit, then navigate.
    CommitThenMove(Move),
    /// Read the surface markup and commit in place (blur, outside click).
    CommitOnly,
    /// The session was cancelled; return focus to the grid.
    CancelEdit,
    /// Alt+Enter: insert a soft line break at the caret.
    SoftBreak,
    /// Backspace mid-edit: the surface must collapse a trailing break and its
    /// caret anchor in one keystroke, otherwise delete natively.
    Backspace,
    /// Write this TSV text to the platform clipboard.
    CopyText(String),
    /// Read the platform clipboard and feed it to `GridEditor::paste`.
    RequestPaste,
}

pub fn route(editor: &mut GridEditor, key: &KeyPress) -> Vec<UiCommand> {
    if editor.is_editing() {
        route_editing(editor, key)
    } else {
        route_idle(editor, key)
    }
}

fn route_editing(editor: &mut GridEditor, key: &KeyPress) -> Vec<UiCommand> {
    match &key.code {
        KeyCode::Enter if key.alt => vec![UiCommand::SoftBreak],
        KeyCode::Enter => {
            let mv = if key.shift { Move::Up } else { Move::Down };
            vec![UiCommand::CommitThenMove(mv)]
        }
        KeyCode::Tab => {
            let mv = if key.shift {
                Move::PrevCell
            } else {
                Move::NextCell
            };
            vec![UiCommand::CommitThenMove(mv)]
        }
        KeyCode::Escape => {
            editor.cancel_edit();
            vec![UiCommand::CancelEdit]
        }
        // A trailing break and its invisible anchor must go together, which
        // native deletion gets wrong; the surface handles the distinction.
        KeyCode::Backspace => vec![UiCommand::Backspace],
        // Arrows and everything else stay native inside the contenteditable
        // surface.
        _ => Vec::new(),
    }
}

fn route_idle(editor: &mut GridEditor, key: &KeyPress) -> Vec<UiCommand> {
    // Locale-independent insert shortcuts take precedence over chords.
    if key.ctrl_or_meta() {
        if let KeyCode::Char(ch) = &key.code {
            match (ch.as_str(), key.shift) {
                (";", false) => {
                    editor.insert_date();
                    return Vec::new();
                }
                (";", true) | (":", true) => {
                    editor.insert_time();
                    return Vec::new();
                }
                ("c", _) | ("C", _) => {
                    return match editor.copy_text() {
                        Some(text) => vec![UiCommand::CopyText(text)],
                        None => Vec::new(),
                    };
                }
                ("v", _) | ("V", _) => return vec![UiCommand::RequestPaste],
                _ => return Vec::new(),
            }
        }
        return Vec::new();
    }

    match &key.code {
        KeyCode::F2 => {
            if editor.start_append_edit() {
                vec![UiCommand::StartEdit]
            } else {
                Vec::new()
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            editor.clear_selection();
            Vec::new()
        }
        KeyCode::ArrowUp => {
            editor.move_active(Move::Up, key.shift);
            Vec::new()
        }
        KeyCode::ArrowDown => {
            editor.move_active(Move::Down, key.shift);
            Vec::new()
        }
        KeyCode::ArrowLeft => {
            editor.move_active(Move::Left, key.shift);
            Vec::new()
        }
        KeyCode::ArrowRight => {
            editor.move_active(Move::Right, key.shift);
            Vec::new()
        }
        _ => {
            let Some(ch) = key.printable() else {
                return Vec::new();
            };
            let ch = ch.to_string();
            // Typing over a whole-column selection edits its header.
            let started = match editor.selection.active {
                Address::ColSelector { col } => editor.start_header_replace_edit(col, &ch),
                _ => editor.start_replace_edit(&ch),
            };
            if started {
                vec![UiCommand::StartEdit]
            } else {
                Vec::new()
            }
        }
    }
}
