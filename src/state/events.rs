use serde::{Deserialize, Serialize};

/// Outbound change events consumed by the host, which owns persistence.
///
/// The serialized form is the host protocol and must stay stable: kebab-case
/// `type` tags with camelCase payload fields, e.g.
/// `{"type":"cell-edit","row":1,"col":2,"newValue":"x"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChangeEvent {
    /// Single cell/header/ghost-row commit. `row` is -1 for the header row.
    #[serde(rename_all = "camelCase")]
    CellEdit { row: i64, col: usize, new_value: String },

    /// Delete/Backspace clearing a rectangular range or the full table.
    #[serde(rename_all = "camelCase")]
    RangeEdit {
        start_row: usize,
        end_row: usize,
        start_col: usize,
        end_col: usize,
        new_value: String,
    },

    #[serde(rename_all = "camelCase")]
    RowDelete { row_index: usize },

    #[serde(rename_all = "camelCase")]
    RowsDelete { row_indices: Vec<usize> },

    #[serde(rename_all = "camelCase")]
    RowInsert { row_index: usize },

    #[serde(rename_all = "camelCase")]
    ColumnInsert { col_index: usize },

    /// Values blanked; the column itself stays.
    #[serde(rename_all = "camelCase")]
    ColumnClear { col_index: usize },

    #[serde(rename_all = "camelCase")]
    ColumnsClear { col_indices: Vec<usize> },

    #[serde(rename_all = "camelCase")]
    ColumnDelete { col_index: usize },

    #[serde(rename_all = "camelCase")]
    PasteCells {
        start_row: usize,
        start_col: usize,
        data: Vec<Vec<String>>,
        include_headers: bool,
    },

    /// Commit of the table description editor.
    #[serde(rename_all = "camelCase")]
    MetadataUpdate { description: String },

    #[serde(rename_all = "camelCase")]
    ColumnResize { col: usize, width: f64 },

    /// `ascending` is a real boolean, translated from the UI's direction
    /// string at the emit site. String truthiness must never leak in here.
    #[serde(rename_all = "camelCase")]
    Sort { col_index: usize, ascending: bool },

    #[serde(rename_all = "camelCase")]
    Filter {
        col_index: usize,
        hidden_values: Vec<String>,
    },
}
