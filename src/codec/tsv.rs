//! TSV clipboard format: tab-separated fields, newline-separated rows, with
//! RFC-4180-style quoting for values containing tabs, line breaks or quotes.
//! This is the wire format shared with external spreadsheet applications, so
//! `parse` must exactly invert `serialize` for any grid value.

use crate::state::grid::Table;
use crate::state::selection::Selection;

fn escape_field(value: &str) -> String {
    if value.contains('\t') || value.contains('\n') || value.contains('\r') || value.contains('"')
    {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('"');
        for ch in value.chars() {
            if ch == '"' {
                out.push('"');
            }
            out.push(ch);
        }
        out.push('"');
        out
    } else {
        value.to_string()
    }
}

fn join_row<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    fields.map(escape_field).collect::<Vec<_>>().join("\t")
}

/// Serialize the current selection as TSV text. Column and full-table
/// selections prepend the header row; the returned flag reports whether that
/// happened. `None` while nothing is selected.
pub fn serialize(table: &Table, selection: &Selection) -> Option<(String, bool)> {
    let range = selection.range(table)?;
    let include_headers = selection.selected_col_span().is_some()
        || selection.is_full_table()
        || range.start_row == -1;

    let mut lines = Vec::new();
    if include_headers {
        lines.push(join_row(
            (range.start_col..=range.end_col).map(|c| table.header(c)),
        ));
    }
    let first_data_row = range.start_row.max(0) as usize;
    let last_data_row = range.end_row.min(table.rows.len() as i64 - 1);
    if last_data_row >= 0 {
        for row in first_data_row..=last_data_row as usize {
            lines.push(join_row(
                (range.start_col..=range.end_col).map(|c| table.cell(row, c)),
            ));
        }
    }
    Some((lines.join("\n"), include_headers))
}

/// Parse TSV text into rows of cells.
///
/// Character-by-character scanner with a single `in_quotes` flag. Inside
/// quotes, a doubled quote is a literal quote and separators are content; an
/// unterminated quoted span simply consumes to end of input and is emitted as
/// the final value. A trailing partial field or row is still emitted.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut had_content = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        had_content = true;
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '\t' => row.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(ch),
        }
    }

    if had_content && (!field.is_empty() || !row.is_empty() || rows.is_empty()) {
        row.push(field);
        rows.push(row);
    }
    rows
}
