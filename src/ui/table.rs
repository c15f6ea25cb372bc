use dioxus::prelude::*;

use crate::input::keys::{KeyCode, KeyPress};
use crate::input::router::{self, UiCommand};
use crate::state::address::Address;
use crate::state::editor::GridEditor;
use crate::state::grid::Table;
use crate::ui::actions;

#[component]
pub fn Grid(editor: Signal<GridEditor>, host_table: Signal<Table>) -> Element {
    let mut editor = editor;
    let snapshot = editor.read().table().clone();
    let selection = editor.read().selection;
    let editing_target = editor.read().edit().map(|session| session.target);
    let columns = snapshot.column_count();
    let visible_rows = snapshot.visible_rows();
    let ghost_ord = snapshot.rows.len() as i64;

    if columns == 0 {
        return rsx! {
            p { class: "empty-message", id: "empty-message", "No table loaded. Click \"Open\" to load a snapshot." }
        };
    }

    rsx! {
        div {
            class: "grid-container",
            id: "grid-container",
            tabindex: "0",
            onkeydown: move |evt| {
                if editor.read().is_editing() {
                    return;
                }
                let key = KeyPress::from_dioxus(&evt.key(), evt.modifiers());
                if key.code != KeyCode::Other {
                    evt.prevent_default();
                }
                let commands = editor.with_mut(|e| router::route(e, &key));
                run_grid_commands(editor, host_table, commands);
                actions::flush_events(editor, host_table);
            },
            onmouseup: move |_| {
                editor.with_mut(|e| e.selection.end_drag());
            },
            table { class: "grid",
                thead {
                    tr {
                        th {
                            class: corner_class(&selection),
                            id: "corner",
                            onmousedown: move |_| {
                                editor.with_mut(|e| e.selection.start_drag(Address::Corner));
                            },
                            ""
                        }
                        for col in 0..columns {
                            th {
                                class: col_selector_class(col, &selection),
                                id: format!("col-selector-{col}"),
                                style: col_style(&snapshot, col),
                                onmousedown: move |evt| {
                                    let extend = evt.modifiers().shift();
                                    editor.with_mut(|e| {
                                        e.selection.select(Address::ColSelector { col }, extend);
                                        e.selection.dragging = true;
                                    });
                                },
                                "{column_label(col)}"
                            }
                        }
                    }
                    tr {
                        th { class: "row-number", "" }
                        for col in 0..columns {
                            HeaderCell {
                                editor,
                                host_table,
                                col,
                                value: snapshot.header(col).to_string(),
                                editing: editing_target == Some(Address::Header { col }),
                            }
                        }
                    }
                }
                tbody {
                    for (display_index, data_index) in visible_rows.iter().enumerate() {
                        tr { id: format!("row-{data_index}"),
                            {
                                let row = *data_index;
                                rsx! {
                                    td {
                                        class: row_selector_class(row, &selection),
                                        onmousedown: move |evt| {
                                            let extend = evt.modifiers().shift();
                                            editor.with_mut(|e| {
                                                e.selection.select(Address::RowSelector { row }, extend);
                                                e.selection.dragging = true;
                                            });
                                        },
                                        "{display_index + 1}"
                                    }
                                }
                            }
                            for col in 0..columns {
                                DataCell {
                                    editor,
                                    host_table,
                                    row: *data_index,
                                    col,
                                    value: snapshot.display_cell(*data_index, col),
                                    editing: editing_target
                                        == Some(Address::Cell { row: *data_index, col }),
                                }
                            }
                        }
                    }
                    // Ghost row: the append target after the last real row.
                    tr { class: "ghost-row", id: "ghost-row",
                        td { class: "row-number ghost", "+" }
                        for col in 0..columns {
                            GhostCell {
                                editor,
                                host_table,
                                col,
                                ghost_ord,
                                editing: editing_target == Some(Address::Ghost { col }),
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn HeaderCell(
    editor: Signal<GridEditor>,
    host_table: Signal<Table>,
    col: usize,
    value: String,
    editing: bool,
) -> Element {
    let mut editor = editor;
    let class = {
        let read = editor.read();
        let class = read.selection.classify(-1, col, read.table());
        cell_classes("header-cell", class)
    };
    rsx! {
        th {
            class: "{class}",
            id: format!("header-{col}"),
            onmousedown: move |evt| {
                if editor.read().edit().map(|s| s.target) == Some(Address::Header { col }) {
                    evt.stop_propagation();
                    return;
                }
                editor.with_mut(|e| e.selection.start_drag(Address::Header { col }));
            },
            onmouseover: move |_| {
                editor.with_mut(|e| e.selection.drag_to(Address::Header { col }));
            },
            ondoubleclick: move |_| {
                editor.with_mut(|e| {
                    e.start_edit_at(Address::Header { col });
                });
                actions::flush_events(editor, host_table);
            },
            if editing {
                EditSurface { key: "edit-header-{col}", editor, host_table }
            } else {
                "{value}"
            }
        }
    }
}

#[component]
fn DataCell(
    editor: Signal<GridEditor>,
    host_table: Signal<Table>,
    row: usize,
    col: usize,
    value: String,
    editing: bool,
) -> Element {
    let mut editor = editor;
    let (class, style) = {
        let read = editor.read();
        let class = read.selection.classify(row as i64, col, read.table());
        (cell_classes("cell", class), read.table().cell_style(col))
    };
    rsx! {
        td {
            class: "{class}",
            style: "{style}",
            id: format!("cell-{row}-{col}"),
            onmousedown: move |evt| {
                if editor.read().edit().map(|s| s.target) == Some(Address::Cell { row, col }) {
                    evt.stop_propagation();
                    return;
                }
                editor.with_mut(|e| e.selection.start_drag(Address::Cell { row, col }));
            },
            onmouseover: move |_| {
                editor.with_mut(|e| e.selection.drag_to(Address::Cell { row, col }));
            },
            ondoubleclick: move |_| {
                editor.with_mut(|e| {
                    e.start_edit_at(Address::Cell { row, col });
                });
                actions::flush_events(editor, host_table);
            },
            if editing {
                EditSurface { key: "edit-{row}-{col}", editor, host_table }
            } else {
                span { class: "cell-text", "{value}" }
            }
        }
    }
}

#[component]
fn GhostCell(
    editor: Signal<GridEditor>,
    host_table: Signal<Table>,
    col: usize,
    ghost_ord: i64,
    editing: bool,
) -> Element {
    let mut editor = editor;
    let (class, style) = {
        let read = editor.read();
        let class = read.selection.classify(ghost_ord, col, read.table());
        (cell_classes("cell ghost", class), read.table().cell_style(col))
    };
    rsx! {
        td {
            class: "{class}",
            style: "{style}",
            id: format!("ghost-{col}"),
            onmousedown: move |evt| {
                if editor.read().edit().map(|s| s.target) == Some(Address::Ghost { col }) {
                    evt.stop_propagation();
                    return;
                }
                editor.with_mut(|e| e.selection.start_drag(Address::Ghost { col }));
            },
            onmouseover: move |_| {
                editor.with_mut(|e| e.selection.drag_to(Address::Ghost { col }));
            },
            ondoubleclick: move |_| {
                editor.with_mut(|e| {
                    e.start_edit_at(Address::Ghost { col });
                });
            },
            if editing {
                EditSurface { key: "edit-ghost-{col}", editor, host_table }
            }
        }
    }
}

/// The contenteditable editing surface. Mounted fresh per session (keyed on
/// the target address), seeded once from the session's encoded markup, then
/// left alone so the caret and native editing behavior survive re-renders.
#[component]
fn EditSurface(editor: Signal<GridEditor>, host_table: Signal<Table>) -> Element {
    let mut editor = editor;
    let seed = use_hook(|| {
        editor
            .write()
            .take_pending_seed()
            .unwrap_or_default()
    });

    rsx! {
        div {
            class: "cell-editor",
            id: "cell-editor",
            contenteditable: "true",
            dangerous_inner_html: "{seed}",
            onmounted: move |evt| async move {
                let _ = evt.set_focus(true).await;
            },
            oninput: move |evt| {
                editor.with_mut(|e| e.update_tracked(evt.value()));
            },
            onkeydown: move |evt| {
                // Do not let the grid-level handler see this key once the
                // session has been committed or cancelled.
                evt.stop_propagation();
                let key = KeyPress::from_dioxus(&evt.key(), evt.modifiers());
                let commands = editor.with_mut(|e| router::route(e, &key));
                if !commands.is_empty() {
                    evt.prevent_default();
                }
                run_edit_commands(editor, host_table, commands);
            },
            onblur: move |_| {
                let fallback = editor
                    .read()
                    .edit()
                    .map(|session| session.tracked_markup.clone());
                spawn(async move {
                    if let Some(markup) = actions::read_editor_markup(fallback).await {
                        editor.with_mut(|e| {
                            e.commit(&markup);
                        });
                        actions::flush_events(editor, host_table);
                    }
                });
            },
        }
    }
}

fn run_edit_commands(
    mut editor: Signal<GridEditor>,
    host_table: Signal<Table>,
    commands: Vec<UiCommand>,
) {
    for command in commands {
        match command {
            UiCommand::CommitThenMove(mv) => {
                let fallback = editor
                    .read()
                    .edit()
                    .map(|session| session.tracked_markup.clone());
                spawn(async move {
                    if let Some(markup) = actions::read_editor_markup(fallback).await {
                        editor.with_mut(|e| e.commit_and_move(&markup, mv));
                        actions::flush_events(editor, host_table);
                        actions::restore_grid_focus(editor);
                    }
                });
            }
            UiCommand::CommitOnly => {
                let fallback = editor
                    .read()
                    .edit()
                    .map(|session| session.tracked_markup.clone());
                spawn(async move {
                    if let Some(markup) = actions::read_editor_markup(fallback).await {
                        editor.with_mut(|e| {
                            e.commit(&markup);
                        });
                        actions::flush_events(editor, host_table);
                    }
                });
            }
            UiCommand::SoftBreak => {
                // Mirrors the line-break structure the commit decoder expects:
                // a <br> at the caret, with a zero-width space holding the
                // caret position when the break lands at the end.
                let _ = document::eval(SOFT_BREAK_JS);
            }
            UiCommand::Backspace => {
                // A caret sitting after the anchor of a trailing break must
                // remove the anchor and the break in one keystroke; native
                // deletion would eat only the invisible anchor.
                let _ = document::eval(BACKSPACE_JS);
            }
            UiCommand::CancelEdit => {
                actions::restore_grid_focus(editor);
            }
            UiCommand::StartEdit | UiCommand::CopyText(_) | UiCommand::RequestPaste => {}
        }
    }
}

fn run_grid_commands(
    mut editor: Signal<GridEditor>,
    host_table: Signal<Table>,
    commands: Vec<UiCommand>,
) {
    for command in commands {
        match command {
            UiCommand::CopyText(text) => actions::write_clipboard(&text),
            UiCommand::RequestPaste => {
                let epoch = editor.read().epoch();
                if let Some(text) = actions::read_clipboard() {
                    editor.with_mut(|e| {
                        if e.epoch() == epoch {
                            e.paste(&text);
                        }
                    });
                    actions::flush_events(editor, host_table);
                }
            }
            UiCommand::StartEdit => {}
            _ => {}
        }
    }
}

const SOFT_BREAK_JS: &str = r#"
    const sel = window.getSelection();
    if (sel.rangeCount) {
        const range = sel.getRangeAt(0);
        range.deleteContents();
        const br = document.createElement("br");
        range.insertNode(br);
        const zws = document.createTextNode("​");
        br.after(zws);
        range.setStart(zws, 0);
        range.collapse(true);
        sel.removeAllRanges();
        sel.addRange(range);
        const editor = document.getElementById("cell-editor");
        if (editor) editor.dispatchEvent(new Event("input", { bubbles: true }));
    }
"#;

const BACKSPACE_JS: &str = r#"
    const sel = window.getSelection();
    if (sel.rangeCount) {
        const node = sel.anchorNode;
        let handled = false;
        if (sel.getRangeAt(0).collapsed
            && node && node.nodeType === Node.TEXT_NODE
            && node.data === "​" && sel.anchorOffset === 1
            && node.previousSibling && node.previousSibling.nodeName === "BR") {
            const editor = document.getElementById("cell-editor");
            node.previousSibling.remove();
            node.remove();
            if (editor) {
                const end = document.createRange();
                end.selectNodeContents(editor);
                end.collapse(false);
                sel.removeAllRanges();
                sel.addRange(end);
                editor.dispatchEvent(new Event("input", { bubbles: true }));
            }
            handled = true;
        }
        if (!handled) {
            document.execCommand("delete");
        }
    }
"#;

fn cell_classes(base: &str, class: crate::state::selection::CellClass) -> String {
    let mut out = base.to_string();
    if class.selected {
        out.push_str(" selected");
    }
    if class.in_range {
        out.push_str(" in-range");
    }
    if class.top {
        out.push_str(" edge-top");
    }
    if class.bottom {
        out.push_str(" edge-bottom");
    }
    if class.left {
        out.push_str(" edge-left");
    }
    if class.right {
        out.push_str(" edge-right");
    }
    out
}

fn corner_class(selection: &crate::state::selection::Selection) -> String {
    if selection.is_full_table() {
        "corner selected".to_string()
    } else {
        "corner".to_string()
    }
}

fn col_selector_class(col: usize, selection: &crate::state::selection::Selection) -> String {
    let selected = selection
        .selected_col_span()
        .map(|(start, end)| col >= start && col <= end)
        .unwrap_or(false)
        || selection.is_full_table();
    if selected {
        "col-selector selected".to_string()
    } else {
        "col-selector".to_string()
    }
}

fn row_selector_class(row: usize, selection: &crate::state::selection::Selection) -> String {
    let selected = selection
        .selected_row_span()
        .map(|(start, end)| row >= start && row <= end)
        .unwrap_or(false)
        || selection.is_full_table();
    if selected {
        "row-number selected".to_string()
    } else {
        "row-number".to_string()
    }
}

fn col_style(table: &Table, col: usize) -> String {
    match table.metadata.column_widths.get(&col) {
        Some(width) => format!("width: {width}px; min-width: {width}px;"),
        None => String::new(),
    }
}

/// Spreadsheet-style column labels: A..Z, AA, AB, ...
fn column_label(col: usize) -> String {
    let mut label = String::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    label
}
