use std::collections::BTreeSet;

use chrono::Local;
use tracing::{debug, warn};

use crate::codec::{dom_text, tsv};
use crate::state::address::Address;
use crate::state::events::ChangeEvent;
use crate::state::grid::Table;
use crate::state::selection::Selection;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditMode {
    Append,
    Replace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
    NextCell,
    PrevCell,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EditSession {
    pub target: Address,
    pub mode: EditMode,
    /// Markup last reported by the editing surface; commit fallback when the
    /// surface node is no longer readable.
    pub tracked_markup: String,
    /// Consumed once by the renderer to seed the contenteditable surface.
    pub pending_seed: Option<String>,
}

/// Grid editor core: table snapshot, selection, edit-mode state machine and
/// the outbound change-event queue. Mutation is optimistic; the host's echo
/// re-applies the same values idempotently.
#[derive(Clone, Debug, Default)]
pub struct GridEditor {
    table: Table,
    pub selection: Selection,
    edit: Option<EditSession>,
    commit_pending: bool,
    epoch: u64,
    events: Vec<ChangeEvent>,
}

impl GridEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: Table) -> Self {
        GridEditor {
            table,
            ..Self::default()
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Bumped on every table identity change; async continuations capture
    /// this and re-validate before touching state.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    pub fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn take_events(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: ChangeEvent) {
        debug!(?event, "change event");
        self.events.push(event);
    }

    pub fn replace_table(&mut self, table: Table) {
        self.table = table;
        self.selection.reset();
        self.edit = None;
        self.commit_pending = false;
        self.epoch += 1;
    }

    /// Host echo for the same table; selection survives, clamped in case the
    /// table shrank.
    pub fn sync_table(&mut self, table: Table) {
        self.table = table;
        self.selection.clamp_to(&self.table);
    }

    // ------------------------------------------------------------------
    // Edit-mode state machine
    // ------------------------------------------------------------------

    pub fn start_append_edit(&mut self) -> bool {
        let Some(target) = self.selection.single_editable_target(&self.table) else {
            return false;
        };
        self.start_session(target, EditMode::Append)
    }

    pub fn start_edit_at(&mut self, addr: Address) -> bool {
        self.implicit_commit();
        self.selection.select(addr, false);
        match self.selection.single_editable_target(&self.table) {
            Some(target) => self.start_session(target, EditMode::Append),
            None => false,
        }
    }

    pub fn start_replace_edit(&mut self, seed: &str) -> bool {
        let Some(target) = self.selection.single_editable_target(&self.table) else {
            return false;
        };
        self.start_session_with_seed(target, EditMode::Replace, seed.to_string())
    }

    /// Typing while an entire column is selected edits that column's header.
    pub fn start_header_replace_edit(&mut self, col: usize, seed: &str) -> bool {
        self.implicit_commit();
        self.selection.select(Address::Header { col }, false);
        self.start_session_with_seed(Address::Header { col }, EditMode::Replace, seed.to_string())
    }

    fn start_session(&mut self, target: Address, mode: EditMode) -> bool {
        let seed = match target {
            Address::Cell { row, col } => self.table.cell(row, col).to_string(),
            Address::Header { col } => self.table.header(col).to_string(),
            Address::Ghost { .. } => String::new(),
            _ => return false,
        };
        self.start_session_with_seed(target, mode, seed)
    }

    fn start_session_with_seed(&mut self, target: Address, mode: EditMode, seed: String) -> bool {
        self.implicit_commit();
        let markup = dom_text::encode(&seed);
        self.edit = Some(EditSession {
            target,
            mode,
            tracked_markup: markup.clone(),
            pending_seed: Some(markup),
        });
        true
    }

    // Only one session may exist at a time; starting a new one synchronously
    // commits whatever the surface last reported.
    fn implicit_commit(&mut self) {
        if self.edit.is_some() {
            let markup = self
                .edit
                .as_ref()
                .map(|session| session.tracked_markup.clone())
                .unwrap_or_default();
            self.commit(&markup);
        }
    }

    pub fn update_tracked(&mut self, markup: String) {
        if let Some(session) = &mut self.edit {
            session.tracked_markup = markup;
        }
    }

    pub fn take_pending_seed(&mut self) -> Option<String> {
        self.edit.as_mut().and_then(|session| session.pending_seed.take())
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Guarded against re-entry: a keydown commit racing a blur commit for
    /// the same gesture must not double-emit.
    pub fn commit(&mut self, markup: &str) -> bool {
        if self.commit_pending {
            return false;
        }
        let Some(session) = self.edit.take() else {
            return false;
        };
        self.commit_pending = true;
        let value = dom_text::decode(markup);
        if let Some(written) = self.apply_cell_value(session.target, value) {
            self.selection.select(written, false);
        }
        self.commit_pending = false;
        true
    }

    pub fn commit_and_move(&mut self, markup: &str, mv: Move) {
        if self.commit(markup) {
            self.move_active(mv, false);
        }
    }

    pub fn commit_tracked(&mut self) -> bool {
        let markup = self
            .edit
            .as_ref()
            .map(|session| session.tracked_markup.clone());
        match markup {
            Some(markup) => self.commit(&markup),
            None => false,
        }
    }

    // Returns the concrete address written (ghost commits resolve to the
    // appended row) or None when the commit aborted.
    fn apply_cell_value(&mut self, target: Address, value: String) -> Option<Address> {
        match target {
            Address::Header { col } => {
                if col >= self.table.column_count().max(1) {
                    warn!(col, "header commit target out of bounds, aborting");
                    return None;
                }
                self.table.set_header(col, value.clone());
                self.emit(ChangeEvent::CellEdit {
                    row: -1,
                    col,
                    new_value: value,
                });
                Some(Address::Header { col })
            }
            Address::Cell { row, col } => {
                if row >= self.table.rows.len() {
                    warn!(row, col, "cell commit target vanished, aborting");
                    return None;
                }
                self.table.set_cell(row, col, value.clone());
                self.emit(ChangeEvent::CellEdit {
                    row: row as i64,
                    col,
                    new_value: value,
                });
                Some(Address::Cell { row, col })
            }
            Address::Ghost { col } => {
                // Committing an empty ghost-row edit creates nothing.
                if value.is_empty() {
                    return None;
                }
                let row = self.table.append_row();
                self.table.set_cell(row, col, value.clone());
                self.emit(ChangeEvent::CellEdit {
                    row: row as i64,
                    col,
                    new_value: value,
                });
                Some(Address::Cell { row, col })
            }
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Insert shortcuts
    // ------------------------------------------------------------------

    pub fn insert_date(&mut self) {
        self.insert_value(Local::now().format("%Y-%m-%d").to_string());
    }

    pub fn insert_time(&mut self) {
        self.insert_value(Local::now().format("%H:%M").to_string());
    }

    fn insert_value(&mut self, value: String) {
        let Some(target) = self.selection.single_editable_target(&self.table) else {
            return;
        };
        if let Some(written) = self.apply_cell_value(target, value) {
            self.selection.select(written, false);
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// One step, clamped at the grid edges, landing only on rows that pass
    /// the active filters. The ghost row is a valid downward target.
    pub fn move_active(&mut self, mv: Move, extend: bool) {
        let from = self.collapse(self.selection.active);
        let next = self.step(from, mv);
        self.selection.select(next, extend);
    }

    fn collapse(&self, addr: Address) -> Address {
        let clamped = addr.clamped(&self.table);
        match clamped {
            Address::Unset => match self.table.first_visible_row() {
                Some(row) => Address::Cell { row, col: 0 },
                None => Address::Ghost { col: 0 },
            },
            Address::RowSelector { row } => Address::Cell { row, col: 0 },
            Address::ColSelector { col } => Address::Header { col },
            Address::Corner => Address::Cell { row: 0, col: 0 }.clamped(&self.table),
            other => other,
        }
    }

    fn max_col(&self) -> usize {
        self.table.column_count().saturating_sub(1)
    }

    fn step(&self, from: Address, mv: Move) -> Address {
        match mv {
            Move::Down => self.step_down(from),
            Move::Up => self.step_up(from),
            Move::Left => with_col(from, |col| col.saturating_sub(1)),
            Move::Right => {
                let max = self.max_col();
                with_col(from, |col| (col + 1).min(max))
            }
            Move::NextCell => self.step_next(from),
            Move::PrevCell => self.step_prev(from),
        }
    }

    fn step_down(&self, from: Address) -> Address {
        match from {
            Address::Header { col } => match self.table.first_visible_row() {
                Some(row) => Address::Cell { row, col },
                None => Address::Ghost { col },
            },
            Address::Cell { row, col } => match self.table.next_visible_row(row) {
                Some(row) => Address::Cell { row, col },
                None => Address::Ghost { col },
            },
            other => other,
        }
    }

    fn step_up(&self, from: Address) -> Address {
        match from {
            Address::Ghost { col } => match self.table.last_visible_row() {
                Some(row) => Address::Cell { row, col },
                None => Address::Header { col },
            },
            Address::Cell { row, col } => match self.table.prev_visible_row(row) {
                Some(row) => Address::Cell { row, col },
                None => Address::Header { col },
            },
            other => other,
        }
    }

    fn step_next(&self, from: Address) -> Address {
        let max = self.max_col();
        match from {
            Address::Header { col } if col < max => Address::Header { col: col + 1 },
            Address::Header { .. } => match self.table.first_visible_row() {
                Some(row) => Address::Cell { row, col: 0 },
                None => Address::Ghost { col: 0 },
            },
            Address::Cell { row, col } if col < max => Address::Cell { row, col: col + 1 },
            Address::Cell { row, .. } => match self.table.next_visible_row(row) {
                Some(row) => Address::Cell { row, col: 0 },
                None => Address::Ghost { col: 0 },
            },
            Address::Ghost { col } if col < max => Address::Ghost { col: col + 1 },
            other => other,
        }
    }

    fn step_prev(&self, from: Address) -> Address {
        let max = self.max_col();
        match from {
            Address::Header { col } if col > 0 => Address::Header { col: col - 1 },
            Address::Cell { row, col } if col > 0 => Address::Cell { row, col: col - 1 },
            // Shift+Tab does not wrap past row 0 going up.
            Address::Cell { row, col: 0 } => match self.table.prev_visible_row(row) {
                Some(row) => Address::Cell { row, col: max },
                None => Address::Cell { row, col: 0 },
            },
            Address::Ghost { col } if col > 0 => Address::Ghost { col: col - 1 },
            Address::Ghost { .. } => match self.table.last_visible_row() {
                Some(row) => Address::Cell { row, col: max },
                None => Address::Ghost { col: 0 },
            },
            other => other,
        }
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    pub fn copy_text(&self) -> Option<String> {
        tsv::serialize(&self.table, &self.selection).map(|(text, _)| text)
    }

    pub fn paste(&mut self, text: &str) {
        let data = tsv::parse(text);
        if data.is_empty() {
            return;
        }

        let (start_row, start_col, include_headers) = match self.resolve_paste_origin() {
            Some(origin) => origin,
            None => return,
        };

        self.emit(ChangeEvent::PasteCells {
            start_row,
            start_col,
            data: data.clone(),
            include_headers,
        });
        self.apply_paste(start_row, start_col, data, include_headers);
    }

    fn resolve_paste_origin(&self) -> Option<(usize, usize, bool)> {
        let origin = if self.selection.is_full_table() {
            (0, 0, true)
        } else if let Some((start, _)) = self.selection.selected_row_span() {
            (start, 0, false)
        } else if let Some((start, _)) = self.selection.selected_col_span() {
            (0, start, true)
        } else {
            let range = self.selection.range(&self.table)?;
            match self.selection.active {
                // A header-cell selection pastes header data first.
                Address::Header { .. } => (0, range.start_col, true),
                _ => (range.start_row.max(0) as usize, range.start_col, false),
            }
        };

        // Paste-to-append: at or beyond the last real row, retarget the ghost.
        let (row, col, include_headers) = origin;
        let row = if row >= self.table.rows.len() {
            self.table.rows.len()
        } else {
            row
        };
        Some((row, col, include_headers))
    }

    fn apply_paste(
        &mut self,
        start_row: usize,
        start_col: usize,
        mut data: Vec<Vec<String>>,
        include_headers: bool,
    ) {
        if include_headers && !data.is_empty() {
            let header_row = data.remove(0);
            for (offset, value) in header_row.into_iter().enumerate() {
                self.table.set_header(start_col + offset, value);
            }
        }

        let paste_width = data.iter().map(Vec::len).max().unwrap_or(0);
        if data.is_empty() {
            return;
        }

        while self.table.rows.len() < start_row + data.len() {
            self.table.append_row();
        }
        for (r_offset, row_data) in data.into_iter().enumerate() {
            for (c_offset, value) in row_data.into_iter().enumerate() {
                self.table
                    .set_cell(start_row + r_offset, start_col + c_offset, value);
            }
        }

        // Headers at least as wide as the pasted region.
        let needed = start_col + paste_width;
        if self.table.headers.is_some() && self.table.column_count() < needed {
            for col in self.table.column_count()..needed {
                self.table.set_header(col, format!("Col {}", col + 1));
            }
        }
    }

    // ------------------------------------------------------------------
    // Clearing (Delete / Backspace while idle)
    // ------------------------------------------------------------------

    // Shape-dependent: cells blank via a range edit, full rows are deleted
    // (highest index first), full columns are blanked but kept, the full
    // table collapses to one grid-spanning range edit.
    pub fn clear_selection(&mut self) {
        if self.selection.is_full_table() {
            if self.table.rows.is_empty() {
                return;
            }
            let end_row = self.table.rows.len() - 1;
            let end_col = self.max_col();
            for row in 0..=end_row {
                for col in 0..=end_col {
                    self.table.set_cell(row, col, String::new());
                }
            }
            self.emit(ChangeEvent::RangeEdit {
                start_row: 0,
                end_row,
                start_col: 0,
                end_col,
                new_value: String::new(),
            });
            return;
        }

        if let Some((start, end)) = self.selection.selected_row_span() {
            for row in (start..=end.min(self.table.rows.len().saturating_sub(1))).rev() {
                self.table.delete_row(row);
                self.emit(ChangeEvent::RowDelete { row_index: row });
            }
            self.selection.clamp_to(&self.table);
            return;
        }

        if let Some((start, end)) = self.selection.selected_col_span() {
            for col in start..=end.min(self.max_col()) {
                self.table.clear_column(col);
                self.emit(ChangeEvent::ColumnClear { col_index: col });
            }
            return;
        }

        match self.selection.active {
            Address::Header { col } => {
                self.table.set_header(col, String::new());
                self.emit(ChangeEvent::CellEdit {
                    row: -1,
                    col,
                    new_value: String::new(),
                });
            }
            Address::Ghost { .. } | Address::Unset => {}
            _ => {
                let Some(range) = self.selection.range(&self.table) else {
                    return;
                };
                let start_row = range.start_row.max(0) as usize;
                let end_row = range.end_row.min(self.table.rows.len() as i64 - 1);
                if end_row < start_row as i64 {
                    return;
                }
                let end_row = end_row as usize;
                for row in start_row..=end_row {
                    for col in range.start_col..=range.end_col {
                        self.table.set_cell(row, col, String::new());
                    }
                }
                self.emit(ChangeEvent::RangeEdit {
                    start_row,
                    end_row,
                    start_col: range.start_col,
                    end_col: range.end_col,
                    new_value: String::new(),
                });
            }
        }
    }

    // ------------------------------------------------------------------
    // Structural edits (toolbar / context menu)
    // ------------------------------------------------------------------

    pub fn insert_row_at(&mut self, at: usize) {
        self.table.insert_row(at);
        self.emit(ChangeEvent::RowInsert { row_index: at });
    }

    pub fn insert_column_at(&mut self, at: usize) {
        self.table.insert_column(at);
        self.emit(ChangeEvent::ColumnInsert { col_index: at });
    }

    // Indices highest first so they stay valid while the host replays them.
    pub fn delete_rows(&mut self, mut rows: Vec<usize>) {
        rows.sort_unstable();
        rows.dedup();
        rows.reverse();
        if rows.is_empty() {
            return;
        }
        for &row in &rows {
            self.table.delete_row(row);
        }
        self.emit(ChangeEvent::RowsDelete { row_indices: rows });
        self.selection.clamp_to(&self.table);
    }

    pub fn delete_column_at(&mut self, col: usize) {
        if col >= self.table.column_count() {
            return;
        }
        self.table.delete_column(col);
        self.emit(ChangeEvent::ColumnDelete { col_index: col });
        self.selection.clamp_to(&self.table);
    }

    pub fn clear_columns(&mut self, cols: Vec<usize>) {
        let mut cols: Vec<usize> = cols
            .into_iter()
            .filter(|&c| c < self.table.column_count())
            .collect();
        cols.sort_unstable();
        cols.dedup();
        if cols.is_empty() {
            return;
        }
        for &col in &cols {
            self.table.clear_column(col);
        }
        self.emit(ChangeEvent::ColumnsClear { col_indices: cols });
    }

    pub fn resize_column(&mut self, col: usize, width: f64) {
        self.table.metadata.column_widths.insert(col, width);
        self.emit(ChangeEvent::ColumnResize { col, width });
    }

    // The direction arrives as a string from the UI; translated to an
    // explicit boolean here so string truthiness never leaks into the event.
    pub fn set_sort(&mut self, col: usize, direction: &str) {
        let ascending = !direction.eq_ignore_ascii_case("desc");
        self.emit(ChangeEvent::Sort {
            col_index: col,
            ascending,
        });
    }

    // Applied optimistically so navigation skips hidden rows at once.
    pub fn set_filter(&mut self, col: usize, hidden: BTreeSet<String>) {
        if hidden.is_empty() {
            self.table.metadata.filters.remove(&col);
        } else {
            self.table.metadata.filters.insert(col, hidden.clone());
        }
        self.emit(ChangeEvent::Filter {
            col_index: col,
            hidden_values: hidden.into_iter().collect(),
        });
    }

    pub fn commit_description(&mut self, description: String) {
        self.table.metadata.description = Some(description.clone());
        self.emit(ChangeEvent::MetadataUpdate { description });
    }
}

fn with_col(addr: Address, f: impl Fn(usize) -> usize) -> Address {
    match addr {
        Address::Cell { row, col } => Address::Cell { row, col: f(col) },
        Address::Ghost { col } => Address::Ghost { col: f(col) },
        Address::Header { col } => Address::Header { col: f(col) },
        other => other,
    }
}
