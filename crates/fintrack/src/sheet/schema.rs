//! `SQLite` schema for the local workbook.
//!
//! Each sheet is an ordered list of rows; `position` is the 1-based
//! spreadsheet row index and `cells` a JSON array of strings.

/// SQL statement to create the sheet rows table.
pub const CREATE_SHEET_ROWS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS sheet_rows (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sheet TEXT NOT NULL,
    position INTEGER NOT NULL,
    cells TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// Rows are always read and addressed per sheet by position.
///
/// Not unique: deleting a row shifts later positions down one at a time.
pub const CREATE_POSITION_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_sheet_rows_position ON sheet_rows(sheet, position)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_SHEET_ROWS_TABLE,
    CREATE_POSITION_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.trim().is_empty());
        }
    }

    #[test]
    fn test_sheet_rows_table_contains_required_columns() {
        assert!(CREATE_SHEET_ROWS_TABLE.contains("sheet TEXT NOT NULL"));
        assert!(CREATE_SHEET_ROWS_TABLE.contains("position INTEGER NOT NULL"));
        assert!(CREATE_SHEET_ROWS_TABLE.contains("cells TEXT NOT NULL"));
    }

    #[test]
    fn test_position_index_is_not_unique() {
        assert!(!CREATE_POSITION_INDEX.contains("UNIQUE"));
    }
}
