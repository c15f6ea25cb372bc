use std::collections::BTreeSet;

use mdsheet::state::address::Address;
use mdsheet::state::editor::{GridEditor, Move};
use mdsheet::state::events::ChangeEvent;
use mdsheet::state::grid::Table;

fn two_by_two() -> Table {
    Table::new(
        vec!["Name".into(), "Role".into()],
        vec![
            vec!["Alice".into(), "Admin".into()],
            vec!["Bob".into(), "User".into()],
        ],
    )
}

fn editor() -> GridEditor {
    GridEditor::with_table(two_by_two())
}

#[test]
fn test_type_then_enter_commits_and_moves_down() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 1, col: 1 }, false);
    assert!(editor.start_replace_edit("x"));
    assert!(editor.is_editing());

    editor.commit_and_move("x", Move::Down);

    assert!(!editor.is_editing());
    assert_eq!(editor.table().cell(1, 1), "x");
    // Below the last row sits the append target.
    assert_eq!(editor.selection.active, Address::Ghost { col: 1 });
    assert_eq!(
        editor.take_events(),
        vec![ChangeEvent::CellEdit {
            row: 1,
            col: 1,
            new_value: "x".into(),
        }]
    );
}

#[test]
fn test_shift_enter_commits_and_moves_up() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 1, col: 0 }, false);
    assert!(editor.start_append_edit());
    editor.commit_and_move("Bobby", Move::Up);
    assert_eq!(editor.table().cell(1, 0), "Bobby");
    assert_eq!(editor.selection.active, Address::Cell { row: 0, col: 0 });
}

#[test]
fn test_empty_ghost_commit_is_total_noop() {
    let mut editor = editor();
    editor.selection.select(Address::Ghost { col: 0 }, false);
    assert!(editor.start_append_edit());
    editor.commit("");

    assert_eq!(editor.table().rows.len(), 2);
    assert!(editor.take_events().is_empty());
    assert_eq!(editor.selection.active, Address::Ghost { col: 0 });
}

#[test]
fn test_ghost_commit_appends_row_and_selects_it() {
    let mut editor = editor();
    editor.selection.select(Address::Ghost { col: 1 }, false);
    assert!(editor.start_append_edit());
    editor.commit("Viewer");

    assert_eq!(editor.table().rows.len(), 3);
    assert_eq!(editor.table().cell(2, 1), "Viewer");
    // The selection lands on the concrete cell that now exists.
    assert_eq!(editor.selection.active, Address::Cell { row: 2, col: 1 });
    assert_eq!(
        editor.take_events(),
        vec![ChangeEvent::CellEdit {
            row: 2,
            col: 1,
            new_value: "Viewer".into(),
        }]
    );
}

#[test]
fn test_header_commit_uses_row_minus_one() {
    let mut editor = editor();
    editor.selection.select(Address::Header { col: 0 }, false);
    assert!(editor.start_append_edit());
    editor.commit("Full Name");

    assert_eq!(editor.table().header(0), "Full Name");
    assert_eq!(
        editor.take_events(),
        vec![ChangeEvent::CellEdit {
            row: -1,
            col: 0,
            new_value: "Full Name".into(),
        }]
    );
}

#[test]
fn test_starting_new_session_implicitly_commits_previous() {
    let mut editor = editor();
    assert!(editor.start_edit_at(Address::Cell { row: 0, col: 0 }));
    editor.update_tracked("Alicia".into());

    // Double-click elsewhere before the first session was committed.
    assert!(editor.start_edit_at(Address::Cell { row: 1, col: 1 }));

    assert_eq!(editor.table().cell(0, 0), "Alicia");
    assert_eq!(
        editor.take_events(),
        vec![ChangeEvent::CellEdit {
            row: 0,
            col: 0,
            new_value: "Alicia".into(),
        }]
    );
    assert!(editor.is_editing());
}

#[test]
fn test_cancel_discards_session() {
    let mut editor = editor();
    assert!(editor.start_edit_at(Address::Cell { row: 0, col: 0 }));
    editor.update_tracked("scratch".into());
    editor.cancel_edit();

    assert!(!editor.is_editing());
    assert_eq!(editor.table().cell(0, 0), "Alice");
    assert!(editor.take_events().is_empty());
}

#[test]
fn test_range_selection_never_enters_editing() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    editor.selection.select(Address::Cell { row: 1, col: 1 }, true);
    assert!(!editor.start_append_edit());
    assert!(!editor.start_replace_edit("x"));
}

#[test]
fn test_commit_decodes_markup() {
    let mut editor = editor();
    assert!(editor.start_edit_at(Address::Cell { row: 0, col: 1 }));
    editor.commit("one<br>two");
    assert_eq!(editor.table().cell(0, 1), "one\ntwo");
}

#[test]
fn test_commit_prefers_supplied_markup_over_tracked_buffer() {
    // Input events may report plain text content; the markup read from the
    // surface at commit time keeps the element structure and must win.
    let mut editor = editor();
    assert!(editor.start_edit_at(Address::Cell { row: 0, col: 1 }));
    editor.update_tracked("ab".into());
    editor.commit("a<br>b");
    assert_eq!(editor.table().cell(0, 1), "a\nb");
}

#[test]
fn test_commit_tracked_uses_last_input() {
    let mut editor = editor();
    assert!(editor.start_edit_at(Address::Cell { row: 1, col: 0 }));
    editor.update_tracked("Robert".into());
    assert!(editor.commit_tracked());
    assert_eq!(editor.table().cell(1, 0), "Robert");
}

#[test]
fn test_pending_seed_taken_once() {
    let mut editor = editor();
    assert!(editor.start_edit_at(Address::Cell { row: 0, col: 0 }));
    assert_eq!(editor.take_pending_seed().as_deref(), Some("Alice"));
    assert_eq!(editor.take_pending_seed(), None);
}

#[test]
fn test_navigation_skips_filtered_rows() {
    let mut editor = GridEditor::with_table(Table::new(
        vec!["V".into()],
        vec![
            vec!["a".into()],
            vec!["b".into()],
            vec!["c".into()],
            vec!["d".into()],
        ],
    ));
    editor.set_filter(0, BTreeSet::from(["b".to_string(), "d".to_string()]));
    editor.take_events();

    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    editor.move_active(Move::Down, false);
    assert_eq!(editor.selection.active, Address::Cell { row: 2, col: 0 });
    // Row 3 is hidden, so the next stop is the append row.
    editor.move_active(Move::Down, false);
    assert_eq!(editor.selection.active, Address::Ghost { col: 0 });
    editor.move_active(Move::Up, false);
    assert_eq!(editor.selection.active, Address::Cell { row: 2, col: 0 });
    editor.move_active(Move::Up, false);
    assert_eq!(editor.selection.active, Address::Cell { row: 0, col: 0 });
    editor.move_active(Move::Up, false);
    assert_eq!(editor.selection.active, Address::Header { col: 0 });
}

#[test]
fn test_tab_wraps_to_next_row() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 1 }, false);
    editor.move_active(Move::NextCell, false);
    assert_eq!(editor.selection.active, Address::Cell { row: 1, col: 0 });
}

#[test]
fn test_shift_tab_wraps_but_not_past_first_row() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 1, col: 0 }, false);
    editor.move_active(Move::PrevCell, false);
    assert_eq!(editor.selection.active, Address::Cell { row: 0, col: 1 });

    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    editor.move_active(Move::PrevCell, false);
    assert_eq!(editor.selection.active, Address::Cell { row: 0, col: 0 });
}

#[test]
fn test_arrow_right_clamps_at_last_column() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 1 }, false);
    editor.move_active(Move::Right, false);
    assert_eq!(editor.selection.active, Address::Cell { row: 0, col: 1 });
}

#[test]
fn test_shift_arrow_extends_keeping_anchor() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    editor.move_active(Move::Down, true);
    editor.move_active(Move::Right, true);
    assert_eq!(editor.selection.anchor, Address::Cell { row: 0, col: 0 });
    assert_eq!(editor.selection.active, Address::Cell { row: 1, col: 1 });
}

#[test]
fn test_move_from_unset_lands_on_first_visible_cell() {
    let mut editor = editor();
    editor.move_active(Move::Down, false);
    assert_eq!(editor.selection.active, Address::Cell { row: 1, col: 0 });
}

#[test]
fn test_copy_row_selection() {
    let mut editor = GridEditor::with_table(Table::new(
        vec!["N".into(), "R".into()],
        vec![
            vec!["a1".into(), "a2".into()],
            vec!["b1".into(), "b2".into()],
            vec!["c1".into(), "c2".into()],
        ],
    ));
    editor.selection.select(Address::RowSelector { row: 0 }, false);
    editor.selection.select(Address::RowSelector { row: 2 }, true);
    assert_eq!(
        editor.copy_text().unwrap(),
        "a1\ta2\nb1\tb2\nc1\tc2"
    );
}

#[test]
fn test_paste_multiline_quoted_field() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    editor.paste("\"Line1\nLine2\"\tB\nC\tD");

    assert_eq!(editor.table().cell(0, 0), "Line1\nLine2");
    assert_eq!(editor.table().cell(0, 1), "B");
    assert_eq!(editor.table().cell(1, 0), "C");
    assert_eq!(editor.table().cell(1, 1), "D");
    assert_eq!(
        editor.take_events(),
        vec![ChangeEvent::PasteCells {
            start_row: 0,
            start_col: 0,
            data: vec![
                vec!["Line1\nLine2".into(), "B".into()],
                vec!["C".into(), "D".into()],
            ],
            include_headers: false,
        }]
    );
}

#[test]
fn test_paste_at_ghost_appends() {
    let mut editor = editor();
    editor.selection.select(Address::Ghost { col: 0 }, false);
    editor.paste("Cara\tViewer");

    assert_eq!(editor.table().rows.len(), 3);
    assert_eq!(editor.table().cell(2, 0), "Cara");
    assert_eq!(editor.table().cell(2, 1), "Viewer");
}

#[test]
fn test_paste_on_header_selection_writes_headers_first() {
    let mut editor = editor();
    editor.selection.select(Address::Header { col: 0 }, false);
    editor.paste("First\tSecond\nv1\tv2");

    assert_eq!(editor.table().header(0), "First");
    assert_eq!(editor.table().header(1), "Second");
    assert_eq!(editor.table().cell(0, 0), "v1");
    assert_eq!(editor.table().cell(0, 1), "v2");
}

#[test]
fn test_paste_full_table_selection() {
    let mut editor = editor();
    editor.selection.select(Address::Corner, false);
    editor.paste("H1\tH2\nx\ty");
    assert_eq!(editor.table().header(0), "H1");
    assert_eq!(editor.table().cell(0, 0), "x");
}

#[test]
fn test_paste_wider_than_table_pads_headers() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    editor.paste("a\tb\tc\td");
    assert_eq!(editor.table().column_count(), 4);
    assert_eq!(editor.table().cell(0, 3), "d");
}

#[test]
fn test_paste_empty_clipboard_is_noop() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    editor.paste("");
    assert!(editor.take_events().is_empty());
    assert_eq!(editor.table().cell(0, 0), "Alice");
}

#[test]
fn test_clear_full_table_emits_single_range_edit() {
    let mut editor = editor();
    editor.selection.select(Address::Corner, false);
    editor.clear_selection();

    assert_eq!(editor.table().cell(0, 0), "");
    assert_eq!(editor.table().cell(1, 1), "");
    assert_eq!(editor.table().rows.len(), 2);
    assert_eq!(
        editor.take_events(),
        vec![ChangeEvent::RangeEdit {
            start_row: 0,
            end_row: 1,
            start_col: 0,
            end_col: 1,
            new_value: String::new(),
        }]
    );
}

#[test]
fn test_clear_row_selection_deletes_rows_highest_first() {
    let mut editor = GridEditor::with_table(Table::new(
        vec!["V".into()],
        vec![
            vec!["r0".into()],
            vec!["r1".into()],
            vec!["r2".into()],
        ],
    ));
    editor.selection.select(Address::RowSelector { row: 1 }, false);
    editor.selection.select(Address::RowSelector { row: 2 }, true);
    editor.clear_selection();

    assert_eq!(editor.table().rows.len(), 1);
    assert_eq!(editor.table().cell(0, 0), "r0");
    assert_eq!(
        editor.take_events(),
        vec![
            ChangeEvent::RowDelete { row_index: 2 },
            ChangeEvent::RowDelete { row_index: 1 },
        ]
    );
}

#[test]
fn test_clear_column_selection_blanks_but_keeps_column() {
    let mut editor = editor();
    editor.selection.select(Address::ColSelector { col: 1 }, false);
    editor.clear_selection();

    assert_eq!(editor.table().column_count(), 2);
    assert_eq!(editor.table().cell(0, 1), "");
    assert_eq!(editor.table().header(1), "Role");
    assert_eq!(
        editor.take_events(),
        vec![ChangeEvent::ColumnClear { col_index: 1 }]
    );
}

#[test]
fn test_clear_header_cell() {
    let mut editor = editor();
    editor.selection.select(Address::Header { col: 0 }, false);
    editor.clear_selection();
    assert_eq!(editor.table().header(0), "");
    assert_eq!(
        editor.take_events(),
        vec![ChangeEvent::CellEdit {
            row: -1,
            col: 0,
            new_value: String::new(),
        }]
    );
}

#[test]
fn test_clear_cell_range() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    editor.selection.select(Address::Cell { row: 1, col: 0 }, true);
    editor.clear_selection();

    assert_eq!(editor.table().cell(0, 0), "");
    assert_eq!(editor.table().cell(1, 0), "");
    assert_eq!(editor.table().cell(0, 1), "Admin");
    assert_eq!(
        editor.take_events(),
        vec![ChangeEvent::RangeEdit {
            start_row: 0,
            end_row: 1,
            start_col: 0,
            end_col: 0,
            new_value: String::new(),
        }]
    );
}

#[test]
fn test_sort_direction_string_becomes_boolean() {
    let mut editor = editor();
    editor.set_sort(1, "desc");
    editor.set_sort(1, "asc");
    editor.set_sort(0, "DESC");
    assert_eq!(
        editor.take_events(),
        vec![
            ChangeEvent::Sort { col_index: 1, ascending: false },
            ChangeEvent::Sort { col_index: 1, ascending: true },
            ChangeEvent::Sort { col_index: 0, ascending: false },
        ]
    );
}

#[test]
fn test_insert_date_format() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    editor.insert_date();
    let value = editor.table().cell(0, 0).to_string();
    assert_eq!(value.len(), 10);
    assert_eq!(&value[4..5], "-");
    assert_eq!(&value[7..8], "-");
}

#[test]
fn test_insert_time_format() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 0, col: 0 }, false);
    editor.insert_time();
    let value = editor.table().cell(0, 0).to_string();
    assert_eq!(value.len(), 5);
    assert_eq!(&value[2..3], ":");
}

#[test]
fn test_replace_table_resets_selection_and_bumps_epoch() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 1, col: 1 }, false);
    let before = editor.epoch();
    editor.replace_table(two_by_two());
    assert_eq!(editor.epoch(), before + 1);
    assert_eq!(editor.selection.active, Address::Unset);
    assert!(!editor.is_editing());
}

#[test]
fn test_sync_table_keeps_selection_and_epoch() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 1, col: 1 }, false);
    let before = editor.epoch();
    editor.sync_table(two_by_two());
    assert_eq!(editor.epoch(), before);
    assert_eq!(editor.selection.active, Address::Cell { row: 1, col: 1 });
}

#[test]
fn test_sync_with_shrunk_table_clamps_selection() {
    let mut editor = editor();
    editor.selection.select(Address::Cell { row: 1, col: 1 }, false);
    let mut smaller = two_by_two();
    smaller.rows.truncate(1);
    editor.sync_table(smaller);
    assert_eq!(editor.selection.active, Address::Ghost { col: 1 });
}

#[test]
fn test_structural_edits_emit_events() {
    let mut editor = editor();
    editor.insert_row_at(1);
    editor.insert_column_at(0);
    editor.delete_rows(vec![0, 2]);
    editor.delete_column_at(0);
    editor.clear_columns(vec![0, 1]);
    editor.resize_column(1, 120.0);
    editor.commit_description("People".into());

    assert_eq!(
        editor.take_events(),
        vec![
            ChangeEvent::RowInsert { row_index: 1 },
            ChangeEvent::ColumnInsert { col_index: 0 },
            ChangeEvent::RowsDelete { row_indices: vec![2, 0] },
            ChangeEvent::ColumnDelete { col_index: 0 },
            ChangeEvent::ColumnsClear { col_indices: vec![0, 1] },
            ChangeEvent::ColumnResize { col: 1, width: 120.0 },
            ChangeEvent::MetadataUpdate { description: "People".into() },
        ]
    );
}

#[test]
fn test_filter_event_and_optimistic_visibility() {
    let mut editor = editor();
    editor.set_filter(1, BTreeSet::from(["User".to_string()]));
    assert_eq!(editor.table().visible_rows(), vec![0]);
    assert_eq!(
        editor.take_events(),
        vec![ChangeEvent::Filter {
            col_index: 1,
            hidden_values: vec!["User".into()],
        }]
    );

    editor.set_filter(1, BTreeSet::new());
    assert_eq!(editor.table().visible_rows(), vec![0, 1]);
}

#[test]
fn test_event_wire_format() {
    let event = ChangeEvent::CellEdit {
        row: -1,
        col: 2,
        new_value: "x".into(),
    };
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        serde_json::json!({"type": "cell-edit", "row": -1, "col": 2, "newValue": "x"})
    );

    let event = ChangeEvent::Sort {
        col_index: 0,
        ascending: false,
    };
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        serde_json::json!({"type": "sort", "colIndex": 0, "ascending": false})
    );

    let event = ChangeEvent::PasteCells {
        start_row: 1,
        start_col: 0,
        data: vec![vec!["a".into()]],
        include_headers: true,
    };
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        serde_json::json!({
            "type": "paste-cells",
            "startRow": 1,
            "startCol": 0,
            "data": [["a"]],
            "includeHeaders": true,
        })
    );
}
