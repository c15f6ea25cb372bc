use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Horizontal alignment for a column's cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Display format applied to numeric-looking cell values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    #[default]
    Plain,
    Thousands,
    Percent,
    Currency,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnSettings {
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub number_format: NumberFormat,
    #[serde(default)]
    pub wrap: bool,
}

/// Per-column display metadata and filter state, keyed by column index.
///
/// Mirrors the sidecar format the host persists alongside the table, so the
/// whole struct is serde-serializable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMeta {
    #[serde(default)]
    pub columns: BTreeMap<usize, ColumnSettings>,
    #[serde(default)]
    pub column_widths: BTreeMap<usize, f64>,
    /// Values hidden by the filter menu, per column. A row is hidden when any
    /// filtered column hides that row's value.
    #[serde(default)]
    pub filters: BTreeMap<usize, BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The addressable table. Owned by the host and supplied as a snapshot; this
/// crate mutates it optimistically before the host's authoritative echo
/// arrives.
///
/// Rows are treated as rectangular but never trusted to be: missing cells
/// read as `""` and ragged rows are padded on write.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub headers: Option<Vec<String>>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(default)]
    pub metadata: TableMeta,
}

impl NumberFormat {
    /// Display formatting for numeric-looking values; anything that does not
    /// parse as a number passes through unchanged.
    pub fn apply(self, value: &str) -> String {
        let trimmed = value.trim();
        let Ok(n) = trimmed.parse::<f64>() else {
            return value.to_string();
        };
        match self {
            NumberFormat::Plain => value.to_string(),
            NumberFormat::Thousands => group_thousands(trimmed),
            NumberFormat::Percent => {
                let scaled = n * 100.0;
                if scaled.fract() == 0.0 {
                    format!("{scaled:.0}%")
                } else {
                    format!("{scaled:.2}%")
                }
            }
            NumberFormat::Currency => format!("${}", group_thousands(&format!("{n:.2}"))),
        }
    }
}

fn group_thousands(value: &str) -> String {
    let (sign, rest) = value.strip_prefix('-').map_or(("", value), |r| ("-", r));
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };
    if !int_part.chars().all(|c| c.is_ascii_digit()) || int_part.is_empty() {
        return value.to_string();
    }
    let mut out = String::from(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table {
            headers: Some(headers),
            rows,
            metadata: TableMeta::default(),
        }
    }

    /// Number of addressable columns: the header count when headers exist,
    /// otherwise the widest row.
    pub fn column_count(&self) -> usize {
        match &self.headers {
            Some(headers) => headers.len(),
            None => self.rows.iter().map(Vec::len).max().unwrap_or(0),
        }
    }

    /// Defensive cell read: out-of-range coordinates are an empty string.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn header(&self, col: usize) -> &str {
        self.headers
            .as_ref()
            .and_then(|h| h.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Write a cell, padding the row if it is shorter than the grid is wide.
    /// Out-of-range rows are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, value: String) {
        if let Some(r) = self.rows.get_mut(row) {
            if r.len() <= col {
                r.resize(col + 1, String::new());
            }
            r[col] = value;
        }
    }

    /// Write a header cell, materializing the header row if the table did not
    /// have one.
    pub fn set_header(&mut self, col: usize, value: String) {
        let width = self.column_count().max(col + 1);
        let headers = self.headers.get_or_insert_with(Vec::new);
        if headers.len() < width {
            headers.resize(width, String::new());
        }
        headers[col] = value;
    }

    /// Append a blank row sized to the current column count; returns its index.
    pub fn append_row(&mut self) -> usize {
        let width = self.column_count();
        self.rows.push(vec![String::new(); width]);
        self.rows.len() - 1
    }

    pub fn insert_row(&mut self, at: usize) {
        let width = self.column_count();
        let at = at.min(self.rows.len());
        self.rows.insert(at, vec![String::new(); width]);
    }

    pub fn delete_row(&mut self, at: usize) {
        if at < self.rows.len() {
            self.rows.remove(at);
        }
    }

    pub fn insert_column(&mut self, at: usize) {
        if let Some(headers) = &mut self.headers {
            let at_h = at.min(headers.len());
            headers.insert(at_h, String::new());
        }
        for row in &mut self.rows {
            let at_r = at.min(row.len());
            row.insert(at_r, String::new());
        }
        self.metadata.shift_columns(at, 1);
    }

    pub fn delete_column(&mut self, at: usize) {
        if let Some(headers) = &mut self.headers {
            if at < headers.len() {
                headers.remove(at);
            }
        }
        for row in &mut self.rows {
            if at < row.len() {
                row.remove(at);
            }
        }
        self.metadata.shift_columns(at, -1);
    }

    /// Blank every value in a column without removing the column itself.
    pub fn clear_column(&mut self, col: usize) {
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(col) {
                cell.clear();
            }
        }
    }

    /// Filter predicate: a row is visible unless some filtered column hides
    /// its value in that column.
    pub fn is_row_visible(&self, row: usize) -> bool {
        self.metadata
            .filters
            .iter()
            .all(|(col, hidden)| !hidden.contains(self.cell(row, *col)))
    }

    /// Indices of rows passing the active filters, in order.
    pub fn visible_rows(&self) -> Vec<usize> {
        (0..self.rows.len())
            .filter(|&r| self.is_row_visible(r))
            .collect()
    }

    /// The next visible row strictly below `row`, if any.
    pub fn next_visible_row(&self, row: usize) -> Option<usize> {
        ((row + 1)..self.rows.len()).find(|&r| self.is_row_visible(r))
    }

    /// The nearest visible row strictly above `row`, if any.
    pub fn prev_visible_row(&self, row: usize) -> Option<usize> {
        (0..row.min(self.rows.len())).rev().find(|&r| self.is_row_visible(r))
    }

    /// The first visible row from the top, if any.
    pub fn first_visible_row(&self) -> Option<usize> {
        (0..self.rows.len()).find(|&r| self.is_row_visible(r))
    }

    /// The last visible row, if any.
    pub fn last_visible_row(&self) -> Option<usize> {
        (0..self.rows.len()).rev().find(|&r| self.is_row_visible(r))
    }

    /// Cell value as rendered, with the column's number format applied.
    /// Editing always seeds from the raw value.
    pub fn display_cell(&self, row: usize, col: usize) -> String {
        let value = self.cell(row, col);
        match self.metadata.columns.get(&col) {
            Some(settings) => settings.number_format.apply(value),
            None => value.to_string(),
        }
    }

    /// Inline style for a column's data cells: width, alignment, wrapping.
    pub fn cell_style(&self, col: usize) -> String {
        let mut style = String::new();
        if let Some(width) = self.metadata.column_widths.get(&col) {
            style.push_str(&format!("width: {width}px; max-width: {width}px; "));
        }
        if let Some(settings) = self.metadata.columns.get(&col) {
            match settings.align {
                Align::Left => {}
                Align::Center => style.push_str("text-align: center; "),
                Align::Right => style.push_str("text-align: right; "),
            }
            if !settings.wrap {
                style.push_str("white-space: pre; ");
            }
        }
        style.trim_end().to_string()
    }
}

impl TableMeta {
    /// Shift column-indexed metadata after a column insert (+1) or delete
    /// (-1) at `col`, keeping settings attached to the columns they described.
    fn shift_columns(&mut self, col: usize, direction: i64) {
        self.columns = shift_keys(std::mem::take(&mut self.columns), col, direction);
        self.column_widths = shift_keys(std::mem::take(&mut self.column_widths), col, direction);
        self.filters = shift_keys(std::mem::take(&mut self.filters), col, direction);
    }
}

fn shift_keys<V>(map: BTreeMap<usize, V>, col: usize, direction: i64) -> BTreeMap<usize, V> {
    map.into_iter()
        .filter_map(|(idx, value)| {
            if direction < 0 {
                match idx.cmp(&col) {
                    std::cmp::Ordering::Equal => None,
                    std::cmp::Ordering::Greater => Some((idx - 1, value)),
                    std::cmp::Ordering::Less => Some((idx, value)),
                }
            } else if idx >= col {
                Some((idx + 1, value))
            } else {
                Some((idx, value))
            }
        })
        .collect()
}
