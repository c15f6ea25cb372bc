use mdsheet::input::keys::{KeyCode, KeyPress};
use mdsheet::input::router::{self, UiCommand};
use mdsheet::state::address::Address;
use mdsheet::state::editor::{GridEditor, Move};
use mdsheet::state::grid::Table;

fn editor() -> GridEditor {
    GridEditor::with_table(Table::new(
        vec!["Name".into(), "Role".into()],
        vec![
            vec!["Alice".into(), "Admin".into()],
            vec!["Bob".into(), "User".into()],
        ],
    ))
}

fn editing_editor() -> GridEditor {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    assert!(editor.start_append_edit());
    editor
}

#[test]
fn test_enter_while_editing_commits_then_moves_down() {
    let mut editor = editing_editor();
    let commands = router::route(&mut editor, &KeyPress::plain(KeyCode::Enter));
    assert_eq!(commands, vec![UiCommand::CommitThenMove(Move::Down)]);
    // The session stays open until the UI supplies the live markup.
    assert!(editor.is_editing());
}

#[test]
fn test_shift_enter_while_editing_moves_up() {
    let mut editor = editing_editor();
    let commands = router::route(&mut editor, &KeyPress::plain(KeyCode::Enter).shifted());
    assert_eq!(commands, vec![UiCommand::CommitThenMove(Move::Up)]);
}

#[test]
fn test_alt_enter_is_soft_break() {
    let mut editor = editing_editor();
    let commands = router::route(&mut editor, &KeyPress::plain(KeyCode::Enter).alted());
    assert_eq!(commands, vec![UiCommand::SoftBreak]);
    assert!(editor.is_editing());
}

#[test]
fn test_tab_family_while_editing() {
    let mut editor = editing_editor();
    assert_eq!(
        router::route(&mut editor, &KeyPress::plain(KeyCode::Tab)),
        vec![UiCommand::CommitThenMove(Move::NextCell)]
    );
    assert_eq!(
        router::route(&mut editor, &KeyPress::plain(KeyCode::Tab).shifted()),
        vec![UiCommand::CommitThenMove(Move::PrevCell)]
    );
}

#[test]
fn test_escape_cancels_in_place() {
    let mut editor = editing_editor();
    let commands = router::route(&mut editor, &KeyPress::plain(KeyCode::Escape));
    assert_eq!(commands, vec![UiCommand::CancelEdit]);
    assert!(!editor.is_editing());
    assert!(editor.take_events().is_empty());
}

#[test]
fn test_other_keys_stay_native_while_editing() {
    let mut editor = editing_editor();
    assert!(router::route(&mut editor, &KeyPress::plain(KeyCode::ArrowLeft)).is_empty());
    assert!(router::route(&mut editor, &KeyPress::char("q")).is_empty());
    assert!(editor.is_editing());
}

#[test]
fn test_backspace_while_editing_routes_to_surface_handler() {
    let mut editor = editing_editor();
    let commands = router::route(&mut editor, &KeyPress::plain(KeyCode::Backspace));
    assert_eq!(commands, vec![UiCommand::Backspace]);
    // Deletion happens on the surface; the session stays open.
    assert!(editor.is_editing());
}

#[test]
fn test_backspace_while_idle_clears_not_surface() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    assert!(router::route(&mut editor, &KeyPress::plain(KeyCode::Backspace)).is_empty());
    assert_eq!(editor.table().cell(0, 0), "");
}

#[test]
fn test_idle_arrows_move_selection() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    assert!(router::route(&mut editor, &KeyPress::plain(KeyCode::ArrowDown)).is_empty());
    assert_eq!(editor.selection.active, Address::Cell { row: 1, col: 0 });
    assert!(router::route(&mut editor, &KeyPress::plain(KeyCode::ArrowRight)).is_empty());
    assert_eq!(editor.selection.active, Address::Cell { row: 1, col: 1 });
}

#[test]
fn test_idle_shift_arrow_extends() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    let _ = router::route(&mut editor, &KeyPress::plain(KeyCode::ArrowDown).shifted());
    assert_eq!(editor.selection.anchor, Address::Cell { row: 0, col: 0 });
    assert_eq!(editor.selection.active, Address::Cell { row: 1, col: 0 });
}

#[test]
fn test_idle_enter_and_tab_are_noops() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    assert!(router::route(&mut editor, &KeyPress::plain(KeyCode::Enter)).is_empty());
    assert!(router::route(&mut editor, &KeyPress::plain(KeyCode::Tab)).is_empty());
    assert_eq!(editor.selection.active, Address::Cell { row: 0, col: 0 });
    assert!(!editor.is_editing());
}

#[test]
fn test_f2_starts_append_edit() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    let commands = router::route(&mut editor, &KeyPress::plain(KeyCode::F2));
    assert_eq!(commands, vec![UiCommand::StartEdit]);
    assert!(editor.is_editing());
}

#[test]
fn test_printable_starts_replace_edit() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    let commands = router::route(&mut editor, &KeyPress::char("x"));
    assert_eq!(commands, vec![UiCommand::StartEdit]);
    let session = editor.edit().unwrap();
    assert_eq!(session.tracked_markup, "x");
}

#[test]
fn test_typing_on_column_selector_edits_header() {
    let mut editor = editor();
    editor.selection.select(Address::ColSelector { col: 1 }, false);
    let commands = router::route(&mut editor, &KeyPress::char("R"));
    assert_eq!(commands, vec![UiCommand::StartEdit]);
    assert_eq!(editor.edit().unwrap().target, Address::Header { col: 1 });
}

#[test]
fn test_delete_clears_selection() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    assert!(router::route(&mut editor, &KeyPress::plain(KeyCode::Delete)).is_empty());
    assert_eq!(editor.table().cell(0, 0), "");
}

#[test]
fn test_ctrl_c_returns_copy_command() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 1, col: 0 }, false);
    let commands = router::route(&mut editor, &KeyPress::char("c").ctrled());
    assert_eq!(commands, vec![UiCommand::CopyText("Bob".into())]);
}

#[test]
fn test_ctrl_c_without_selection_is_noop() {
    let mut editor = editor();
    let commands = router::route(&mut editor, &KeyPress::char("c").ctrled());
    assert!(commands.is_empty());
}

#[test]
fn test_ctrl_v_requests_paste() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    let commands = router::route(&mut editor, &KeyPress::char("v").ctrled());
    assert_eq!(commands, vec![UiCommand::RequestPaste]);
}

#[test]
fn test_meta_chord_works_like_ctrl() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 1, col: 0 }, false);
    let mut key = KeyPress::char("c");
    key.meta = true;
    let commands = router::route(&mut editor, &key);
    assert_eq!(commands, vec![UiCommand::CopyText("Bob".into())]);
}

#[test]
fn test_ctrl_semicolon_inserts_date() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    assert!(router::route(&mut editor, &KeyPress::char(";").ctrled()).is_empty());
    let value = editor.table().cell(0, 0);
    assert_eq!(value.len(), 10);
    assert_eq!(&value[4..5], "-");
}

#[test]
fn test_ctrl_shift_semicolon_inserts_time() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    assert!(router::route(&mut editor, &KeyPress::char(":").ctrled().shifted()).is_empty());
    let value = editor.table().cell(0, 0);
    assert_eq!(value.len(), 5);
    assert_eq!(&value[2..3], ":");
}

#[test]
fn test_printable_rejected_with_chord() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    let commands = router::route(&mut editor, &KeyPress::char("s").ctrled());
    assert!(commands.is_empty());
    assert!(!editor.is_editing());
}
