use crate::state::address::Address;
use crate::state::grid::Table;

/// Normalized rectangular extent of a selection, rows in ordinal space
/// (-1 header, `rows.len()` ghost). `end_row < start_row` is an empty span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    pub start_row: i64,
    pub end_row: i64,
    pub start_col: usize,
    pub end_col: usize,
}

impl Range {
    pub fn contains(&self, row: i64, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    pub fn is_single_cell(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }
}

// Edge flags are true only on the outer border of the normalized range, so
// painting them yields one unbroken rectangle outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellClass {
    pub selected: bool,
    pub in_range: bool,
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

/// Anchor/active selection over the grid's address space. Extending gestures
/// move only the active end; the anchor stays put.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Address,
    pub active: Address,
    pub dragging: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            anchor: Address::Unset,
            active: Address::Unset,
            dragging: false,
        }
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    // Extending from an unset anchor is a fresh selection regardless of
    // `extend`.
    pub fn select(&mut self, addr: Address, extend: bool) {
        if !extend || self.anchor.is_unset() {
            self.anchor = addr;
            self.active = addr;
        } else {
            self.active = addr;
        }
    }

    pub fn start_drag(&mut self, addr: Address) {
        self.select(addr, false);
        self.dragging = true;
    }

    // A press-release without movement degenerates to a single cell.
    pub fn drag_to(&mut self, addr: Address) {
        if self.dragging {
            self.select(addr, true);
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn reset(&mut self) {
        *self = Selection::default();
    }

    /// The normalized rectangle covered by anchor..active, or `None` while
    /// unselected. Selectors and the corner expand to full spans; only the
    /// corner pulls the ghost row into range.
    pub fn range(&self, table: &Table) -> Option<Range> {
        if self.anchor.is_unset() || self.active.is_unset() {
            return None;
        }

        let row_count = table.rows.len() as i64;
        let (start_row, end_row) = if self.anchor.spans_all_rows() || self.active.spans_all_rows() {
            let include_ghost =
                matches!(self.anchor, Address::Corner) || matches!(self.active, Address::Corner);
            (0, if include_ghost { row_count } else { row_count - 1 })
        } else {
            let a = self.anchor.row_ord(table)?;
            let b = self.active.row_ord(table)?;
            (a.min(b), a.max(b))
        };

        let (start_col, end_col) = if self.anchor.spans_all_cols() || self.active.spans_all_cols() {
            (0, table.column_count().saturating_sub(1))
        } else {
            let a = self.anchor.col_ord()?;
            let b = self.active.col_ord()?;
            (a.min(b), a.max(b))
        };

        Some(Range {
            start_row,
            end_row,
            start_col,
            end_col,
        })
    }

    pub fn classify(&self, row: i64, col: usize, table: &Table) -> CellClass {
        let mut class = CellClass::default();
        let Some(range) = self.range(table) else {
            return class;
        };

        class.selected = match self.active {
            Address::Cell { row: r, col: c } => row == r as i64 && col == c,
            Address::Ghost { col: c } => row == table.rows.len() as i64 && col == c,
            Address::Header { col: c } => row == -1 && col == c,
            _ => false,
        };
        class.in_range = range.contains(row, col);
        if class.in_range {
            class.top = row == range.start_row;
            class.bottom = row == range.end_row;
            class.left = col == range.start_col;
            class.right = col == range.end_col;
        }
        class
    }

    /// The single address an edit session could target, if the selection
    /// resolves to exactly one editable cell.
    pub fn single_editable_target(&self, table: &Table) -> Option<Address> {
        if !self.active.is_editable() {
            return None;
        }
        let range = self.range(table)?;
        range.is_single_cell().then_some(self.active)
    }

    pub fn selected_row_span(&self) -> Option<(usize, usize)> {
        match (self.anchor, self.active) {
            (Address::RowSelector { row: a }, Address::RowSelector { row: b }) => {
                Some((a.min(b), a.max(b)))
            }
            _ => None,
        }
    }

    pub fn selected_col_span(&self) -> Option<(usize, usize)> {
        match (self.anchor, self.active) {
            (Address::ColSelector { col: a }, Address::ColSelector { col: b }) => {
                Some((a.min(b), a.max(b)))
            }
            _ => None,
        }
    }

    pub fn is_full_table(&self) -> bool {
        matches!(self.anchor, Address::Corner) || matches!(self.active, Address::Corner)
    }

    // For when the host shrinks the snapshot underneath the selection.
    pub fn clamp_to(&mut self, table: &Table) {
        self.anchor = self.anchor.clamped(table);
        self.active = self.active.clamped(table);
    }
}
