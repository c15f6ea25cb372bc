use dioxus::prelude::*;
use std::path::PathBuf;

use tracing::warn;

use crate::io::table_io;
use crate::state::editor::GridEditor;
use crate::state::events::ChangeEvent;
use crate::state::grid::Table;

/// Apply one change event to the host's copy of the table.
///
/// The host is the source of truth for persistence; the grid core already
/// applied the same mutation optimistically, so replaying the event here and
/// echoing the snapshot back must be idempotent.
pub fn host_apply(table: &mut Table, event: &ChangeEvent) {
    match event {
        ChangeEvent::CellEdit {
            row,
            col,
            new_value,
        } => {
            if *row < 0 {
                table.set_header(*col, new_value.clone());
            } else {
                let row = *row as usize;
                while table.rows.len() <= row {
                    table.append_row();
                }
                table.set_cell(row, *col, new_value.clone());
            }
        }
        ChangeEvent::RangeEdit {
            start_row,
            end_row,
            start_col,
            end_col,
            new_value,
        } => {
            for row in *start_row..=*end_row {
                for col in *start_col..=*end_col {
                    table.set_cell(row, col, new_value.clone());
                }
            }
        }
        ChangeEvent::RowDelete { row_index } => table.delete_row(*row_index),
        ChangeEvent::RowsDelete { row_indices } => {
            // Indices arrive highest first; deleting in order keeps them valid.
            for &row in row_indices {
                table.delete_row(row);
            }
        }
        ChangeEvent::RowInsert { row_index } => table.insert_row(*row_index),
        ChangeEvent::ColumnInsert { col_index } => table.insert_column(*col_index),
        ChangeEvent::ColumnClear { col_index } => table.clear_column(*col_index),
        ChangeEvent::ColumnsClear { col_indices } => {
            for &col in col_indices {
                table.clear_column(col);
            }
        }
        ChangeEvent::ColumnDelete { col_index } => table.delete_column(*col_index),
        ChangeEvent::PasteCells {
            start_row,
            start_col,
            data,
            include_headers,
        } => {
            let mut data = data.clone();
            if *include_headers && !data.is_empty() {
                let header_row = data.remove(0);
                for (offset, value) in header_row.into_iter().enumerate() {
                    table.set_header(start_col + offset, value);
                }
            }
            while table.rows.len() < start_row + data.len() {
                table.append_row();
            }
            for (r, row_data) in data.into_iter().enumerate() {
                for (c, value) in row_data.into_iter().enumerate() {
                    table.set_cell(start_row + r, start_col + c, value);
                }
            }
        }
        ChangeEvent::MetadataUpdate { description } => {
            table.metadata.description = Some(description.clone());
        }
        ChangeEvent::ColumnResize { col, width } => {
            table.metadata.column_widths.insert(*col, *width);
        }
        ChangeEvent::Sort {
            col_index,
            ascending,
        } => {
            let col = *col_index;
            table.rows.sort_by(|a, b| {
                let left = a.get(col).map(String::as_str).unwrap_or("");
                let right = b.get(col).map(String::as_str).unwrap_or("");
                compare_cells(left, right)
            });
            if !ascending {
                table.rows.reverse();
            }
        }
        ChangeEvent::Filter {
            col_index,
            hidden_values,
        } => {
            if hidden_values.is_empty() {
                table.metadata.filters.remove(col_index);
            } else {
                table
                    .metadata
                    .filters
                    .insert(*col_index, hidden_values.iter().cloned().collect());
            }
        }
    }
}

/// Numeric-aware cell comparison used when replaying sort commands: numbers
/// sort numerically, everything else case-insensitively.
fn compare_cells(left: &str, right: &str) -> std::cmp::Ordering {
    match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal),
        _ => left.to_ascii_lowercase().cmp(&right.to_ascii_lowercase()),
    }
}

/// Drain the editor's queued events, replay them on the host snapshot and
/// echo the authoritative table back into the editor.
pub fn flush_events(mut editor: Signal<GridEditor>, mut host_table: Signal<Table>) {
    let events = editor.with_mut(|e| e.take_events());
    if events.is_empty() {
        return;
    }
    host_table.with_mut(|table| {
        for event in &events {
            host_apply(table, event);
        }
    });
    let snapshot = host_table.read().clone();
    editor.with_mut(|e| e.sync_table(snapshot));
}

pub async fn open_file(
    mut editor: Signal<GridEditor>,
    mut host_table: Signal<Table>,
    mut file_path: Signal<Option<PathBuf>>,
    mut error_message: Signal<Option<String>>,
) {
    let task = rfd::AsyncFileDialog::new()
        .add_filter("Table snapshot (JSON)", &["json"])
        .pick_file()
        .await;

    if let Some(handle) = task {
        let path = handle.path().to_path_buf();
        match table_io::load_table(&path) {
            Ok(table) => {
                host_table.set(table.clone());
                editor.with_mut(|e| e.replace_table(table));
                file_path.set(Some(path));
                error_message.set(None);
            }
            Err(e) => {
                error_message.set(Some(e.to_string()));
            }
        }
    }
}

pub async fn save_file_as(
    host_table: Signal<Table>,
    mut file_path: Signal<Option<PathBuf>>,
    mut error_message: Signal<Option<String>>,
) {
    let task = rfd::AsyncFileDialog::new()
        .add_filter("Table snapshot (JSON)", &["json"])
        .save_file()
        .await;

    if let Some(handle) = task {
        let path = handle.path().to_path_buf();
        match table_io::save_table(&path, &host_table.read()) {
            Ok(()) => {
                file_path.set(Some(path));
                error_message.set(None);
            }
            Err(err) => {
                error_message.set(Some(err.to_string()));
            }
        }
    }
}

pub fn save_file(
    host_table: Signal<Table>,
    file_path: Signal<Option<PathBuf>>,
    mut error_message: Signal<Option<String>>,
) -> bool {
    let path = {
        let read = file_path.read();
        let Some(path) = read.as_ref() else {
            return false;
        };
        path.clone()
    };

    if let Err(err) = table_io::save_table(&path, &host_table.read()) {
        error_message.set(Some(err.to_string()));
        return false;
    }
    error_message.set(None);
    true
}

/// Read the live markup of the editing surface. The tracked buffer mirrors
/// input events but is not guaranteed to carry element structure, so commits
/// prefer the node's actual innerHTML and use the buffer only when the node
/// is already gone.
pub async fn read_editor_markup(fallback: Option<String>) -> Option<String> {
    let result = document::eval(
        "const editor = document.getElementById('cell-editor'); \
         return editor ? editor.innerHTML : null;",
    )
    .await;
    match result {
        Ok(value) => match value.as_str() {
            Some(markup) => Some(markup.to_string()),
            None => fallback,
        },
        Err(err) => {
            warn!(?err, "editing surface read failed");
            fallback
        }
    }
}

/// Return keyboard focus to the grid one tick after the editing surface
/// unmounts. The epoch is re-validated so a table swap racing the timer
/// cannot steal focus into unrelated data.
pub fn restore_grid_focus(editor: Signal<GridEditor>) {
    let epoch = editor.read().epoch();
    spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        if editor.read().epoch() != epoch {
            return;
        }
        let _ = document::eval(
            "const grid = document.getElementById('grid-container'); if (grid) grid.focus();",
        );
    });
}

/// Platform clipboard write; failures are logged and the gesture does
/// nothing.
pub fn write_clipboard(text: &str) {
    let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
    if let Err(err) = result {
        warn!(%err, "clipboard write failed");
    }
}

/// Platform clipboard read; `None` on denial or error.
pub fn read_clipboard() -> Option<String> {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(%err, "clipboard read failed");
            None
        }
    }
}
