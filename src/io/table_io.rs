use std::fs;
use std::io;
use std::path::Path;

use crate::state::grid::Table;

use super::atomic_write_string;

#[derive(Debug)]
pub enum TableIoError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for TableIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableIoError::Io(e) => write!(f, "IO error: {e}"),
            TableIoError::Parse(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for TableIoError {}

impl From<io::Error> for TableIoError {
    fn from(e: io::Error) -> Self {
        TableIoError::Io(e)
    }
}

impl From<serde_json::Error> for TableIoError {
    fn from(e: serde_json::Error) -> Self {
        TableIoError::Parse(e)
    }
}

/// Load a host table snapshot: `{"headers": [...], "rows": [[...]], "metadata": {...}}`.
pub fn load_table(path: &Path) -> Result<Table, TableIoError> {
    let content = fs::read_to_string(path)?;
    let table: Table = serde_json::from_str(&content)?;
    Ok(table)
}

/// Persist a snapshot atomically so a crash mid-write never truncates it.
pub fn save_table(path: &Path, table: &Table) -> Result<(), TableIoError> {
    let json = serde_json::to_string_pretty(table)?;
    atomic_write_string(path, &json)?;
    Ok(())
}
