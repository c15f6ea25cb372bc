use crate::state::grid::Table;

/// A position in the grid's address space.
///
/// The grid exposes more than data cells: the header row is editable, whole
/// rows and columns can be selected from their headers, the corner selects
/// everything, and a virtual "ghost" row after the last real row is the
/// append target. Each of these is its own variant so that nonsensical
/// combinations cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Address {
    /// No selection yet (component mount, or after a table swap).
    Unset,
    /// A concrete data cell, `row < table.rows.len()`.
    Cell { row: usize, col: usize },
    /// The virtual append row directly after the last real row.
    Ghost { col: usize },
    /// A header cell.
    Header { col: usize },
    /// An entire row, selected via its row header.
    RowSelector { row: usize },
    /// An entire column, selected via its column header.
    ColSelector { col: usize },
    /// The corner header: select-all.
    Corner,
}

impl Address {
    /// Whether an edit session may target this address. Only a single
    /// concrete cell, a ghost-row cell, or a header cell is editable;
    /// row/column/corner selectors never are.
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            Address::Cell { .. } | Address::Ghost { .. } | Address::Header { .. }
        )
    }

    pub fn is_unset(self) -> bool {
        matches!(self, Address::Unset)
    }

    /// Row ordinal used for range normalization: the header row sits at -1,
    /// data rows at their index, and the ghost row directly after the last
    /// real row. Selector variants have no single row and return `None`.
    pub(crate) fn row_ord(self, table: &Table) -> Option<i64> {
        match self {
            Address::Cell { row, .. } => Some(row as i64),
            Address::Ghost { .. } => Some(table.rows.len() as i64),
            Address::Header { .. } => Some(-1),
            Address::RowSelector { row } => Some(row as i64),
            Address::Unset | Address::ColSelector { .. } | Address::Corner => None,
        }
    }

    /// Column ordinal, where selector variants spanning all columns return
    /// `None`.
    pub(crate) fn col_ord(self) -> Option<usize> {
        match self {
            Address::Cell { col, .. }
            | Address::Ghost { col }
            | Address::Header { col }
            | Address::ColSelector { col } => Some(col),
            Address::Unset | Address::RowSelector { .. } | Address::Corner => None,
        }
    }

    /// True when this endpoint forces the range to span every row.
    pub(crate) fn spans_all_rows(self) -> bool {
        matches!(self, Address::ColSelector { .. } | Address::Corner)
    }

    /// True when this endpoint forces the range to span every column.
    pub(crate) fn spans_all_cols(self) -> bool {
        matches!(self, Address::RowSelector { .. } | Address::Corner)
    }

    /// Pull an out-of-bounds address back inside the table. The host may
    /// shrink the table underneath us at any time; selection must never be
    /// left pointing past the end.
    pub fn clamped(self, table: &Table) -> Address {
        let max_col = table.column_count().saturating_sub(1);
        let rows = table.rows.len();
        match self {
            Address::Cell { row, col } => {
                let col = col.min(max_col);
                if row >= rows {
                    Address::Ghost { col }
                } else {
                    Address::Cell { row, col }
                }
            }
            Address::Ghost { col } => Address::Ghost {
                col: col.min(max_col),
            },
            Address::Header { col } => Address::Header {
                col: col.min(max_col),
            },
            Address::RowSelector { row } => Address::RowSelector {
                row: row.min(rows.saturating_sub(1)),
            },
            Address::ColSelector { col } => Address::ColSelector {
                col: col.min(max_col),
            },
            other => other,
        }
    }
}
