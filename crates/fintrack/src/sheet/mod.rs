//! Spreadsheet abstraction.
//!
//! Records are kept in named sheets where the first row holds the column
//! headers and every following row is one record. Rows are addressed by
//! their 1-based spreadsheet index, so the data row at list position `i`
//! lives at row `i + 2`.
//!
//! Two backends implement [`SheetBackend`]:
//!
//! - [`Workbook`]: a local `SQLite` file laid out as sheets of rows.
//! - [`GoogleSheets`]: a Google Sheets spreadsheet over the v4 REST API.

pub mod google;
pub mod local;
pub mod migrations;
pub mod schema;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{BackendKind, Config};
use crate::error::Result;

pub use google::{GoogleSheets, ServiceAccount};
pub use local::{Workbook, WorkbookStats};

/// One spreadsheet row. Missing trailing cells read as empty strings.
pub type Row = Vec<String>;

/// A data row keyed by column header.
pub type Cells = HashMap<String, String>;

/// Offset between a data row's list position and its spreadsheet row:
/// one for the 1-based index plus one for the header row.
pub const HEADER_OFFSET: usize = 2;

/// Storage operations the record store needs from a spreadsheet.
#[async_trait]
pub trait SheetBackend: Send + Sync {
    /// Read every row of a sheet, header row included.
    ///
    /// A sheet that does not exist or has no rows yields an empty list.
    async fn read_rows(&self, sheet: &str) -> Result<Vec<Row>>;

    /// Append a row after the last row of the sheet.
    async fn append_row(&self, sheet: &str, row: Row) -> Result<()>;

    /// Overwrite the row at the 1-based `row_index`.
    async fn update_row(&self, sheet: &str, row_index: usize, row: Row) -> Result<()>;

    /// Remove the row at the 1-based `row_index`; later rows shift up.
    async fn delete_row(&self, sheet: &str, row_index: usize) -> Result<()>;

    /// Create the sheet with `headers` as its first row if it is missing or empty.
    async fn ensure_sheet(&self, sheet: &str, headers: &[&str]) -> Result<()>;

    /// Short description for status output.
    fn describe(&self) -> String;
}

/// Map every data row to a header-keyed record, skipping the header row.
#[must_use]
pub fn rows_to_records(rows: &[Row], headers: &[&str]) -> Vec<Cells> {
    rows.iter()
        .skip(1)
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = row.get(i).cloned().unwrap_or_default();
                    ((*header).to_string(), value)
                })
                .collect()
        })
        .collect()
}

/// Project a header-keyed record onto the header order.
#[must_use]
pub fn record_to_row(cells: &Cells, headers: &[&str]) -> Row {
    headers
        .iter()
        .map(|header| cells.get(*header).cloned().unwrap_or_default())
        .collect()
}

/// Build the backend selected by the configuration.
///
/// # Errors
///
/// Returns an error if the local workbook cannot be opened or the Google
/// credentials are incomplete.
pub fn connect(config: &Config) -> Result<Arc<dyn SheetBackend>> {
    match config.sheets.backend {
        BackendKind::Local => {
            let workbook = Workbook::open(config.database_path())?;
            Ok(Arc::new(workbook))
        }
        BackendKind::Google => {
            let account = ServiceAccount::from_config(&config.sheets)?;
            let sheets = GoogleSheets::new(account)?;
            info!("Using Google spreadsheet {}", sheets.spreadsheet_id());
            Ok(Arc::new(sheets))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: &[&str] = &["id", "name", "type"];

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_rows_to_records_skips_header() {
        let rows = vec![
            row(&["id", "name", "type"]),
            row(&["1", "Household", "Home"]),
            row(&["2", "Office", "Work"]),
        ];

        let records = rows_to_records(&rows, HEADERS);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "Household");
        assert_eq!(records[1]["type"], "Work");
    }

    #[test]
    fn test_rows_to_records_pads_short_rows() {
        let rows = vec![row(&["id", "name", "type"]), row(&["3"])];

        let records = rows_to_records(&rows, HEADERS);
        assert_eq!(records[0]["id"], "3");
        assert_eq!(records[0]["name"], "");
        assert_eq!(records[0]["type"], "");
    }

    #[test]
    fn test_rows_to_records_empty_sheet() {
        assert!(rows_to_records(&[], HEADERS).is_empty());
        assert!(rows_to_records(&[row(&["id"])], HEADERS).is_empty());
    }

    #[test]
    fn test_record_to_row_follows_header_order() {
        let mut cells = Cells::new();
        cells.insert("type".to_string(), "Business".to_string());
        cells.insert("id".to_string(), "9".to_string());
        cells.insert("ignored".to_string(), "x".to_string());

        assert_eq!(record_to_row(&cells, HEADERS), row(&["9", "", "Business"]));
    }

    #[test]
    fn test_connect_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.sheets.database_path = Some(dir.path().join("books.db"));

        let backend = connect(&config).unwrap();
        assert!(backend.describe().contains("books.db"));
    }

    #[test]
    fn test_connect_google_requires_credentials() {
        let mut config = Config::default();
        config.sheets.backend = BackendKind::Google;

        assert!(connect(&config).is_err());
    }
}
