//! Local workbook backed by `SQLite`.
//!
//! Behaves like a spreadsheet: every sheet is an ordered list of rows, row 1
//! is the header, and deleting a row moves every later row up by one.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::{migrations, Row, SheetBackend};
use crate::error::{Error, Result};

/// A workbook of named sheets stored in a single `SQLite` file.
#[derive(Debug)]
pub struct Workbook {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection. `rusqlite` connections are not `Sync`.
    conn: Mutex<Connection>,
}

impl Workbook {
    /// Open or create a workbook at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening workbook at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Workbook opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory workbook for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("workbook connection lock poisoned"))
    }

    /// All rows of a sheet in order, header included.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn rows(&self, sheet: &str) -> Result<Vec<Row>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT cells FROM sheet_rows WHERE sheet = ?1 ORDER BY position ASC")?;

        let raw = stmt
            .query_map([sheet], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        raw.iter()
            .map(|cells| serde_json::from_str::<Row>(cells).map_err(Error::from))
            .collect()
    }

    /// Number of rows in a sheet, header included.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn row_count(&self, sheet: &str) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sheet_rows WHERE sheet = ?1",
            [sheet],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Append a row and return its 1-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn append(&self, sheet: &str, row: &[String]) -> Result<usize> {
        let cells = serde_json::to_string(row)?;
        let conn = self.conn()?;

        let last: Option<i64> = conn
            .query_row(
                "SELECT MAX(position) FROM sheet_rows WHERE sheet = ?1",
                [sheet],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        let position = last.unwrap_or(0) + 1;

        conn.execute(
            "INSERT INTO sheet_rows (sheet, position, cells) VALUES (?1, ?2, ?3)",
            params![sheet, position, cells],
        )?;

        debug!("Appended row {} to sheet {}", position, sheet);
        Ok(usize::try_from(position).unwrap_or_default())
    }

    /// Overwrite the row at the 1-based `row_index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowOutOfRange`] if the row does not exist, or an
    /// error if the database operation fails.
    pub fn update(&self, sheet: &str, row_index: usize, row: &[String]) -> Result<()> {
        let cells = serde_json::to_string(row)?;
        let position = Self::position(sheet, row_index)?;
        let conn = self.conn()?;

        let affected = conn.execute(
            r"
            UPDATE sheet_rows SET cells = ?1, updated_at = datetime('now')
            WHERE sheet = ?2 AND position = ?3
            ",
            params![cells, sheet, position],
        )?;

        if affected == 0 {
            return Err(Error::RowOutOfRange {
                sheet: sheet.to_string(),
                row: row_index,
            });
        }
        debug!("Updated row {} of sheet {}", row_index, sheet);
        Ok(())
    }

    /// Remove the row at the 1-based `row_index`, shifting later rows up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowOutOfRange`] if the row does not exist, or an
    /// error if the database operation fails.
    pub fn delete(&self, sheet: &str, row_index: usize) -> Result<()> {
        let position = Self::position(sheet, row_index)?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let affected = tx.execute(
            "DELETE FROM sheet_rows WHERE sheet = ?1 AND position = ?2",
            params![sheet, position],
        )?;
        if affected == 0 {
            return Err(Error::RowOutOfRange {
                sheet: sheet.to_string(),
                row: row_index,
            });
        }

        tx.execute(
            "UPDATE sheet_rows SET position = position - 1 WHERE sheet = ?1 AND position > ?2",
            params![sheet, position],
        )?;
        tx.commit()?;

        debug!("Deleted row {} of sheet {}", row_index, sheet);
        Ok(())
    }

    /// Write `headers` as row 1 if the sheet has no rows yet.
    ///
    /// Returns `true` if the header row was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn ensure(&self, sheet: &str, headers: &[&str]) -> Result<bool> {
        if self.row_count(sheet)? > 0 {
            return Ok(false);
        }
        let header_row: Row = headers.iter().map(|h| (*h).to_string()).collect();
        self.append(sheet, &header_row)?;
        info!("Created sheet {} with {} columns", sheet, headers.len());
        Ok(true)
    }

    /// Get workbook statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<WorkbookStats> {
        let sheets = {
            let conn = self.conn()?;
            let mut stmt = conn.prepare(
                "SELECT sheet, COUNT(*) FROM sheet_rows GROUP BY sheet ORDER BY sheet ASC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    let name: String = row.get(0)?;
                    let count: i64 = row.get(1)?;
                    Ok((name, usize::try_from(count).unwrap_or_default()))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };

        let total_rows = sheets.iter().map(|(_, count)| count).sum();

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(WorkbookStats {
            sheets,
            total_rows,
            db_size_bytes,
        })
    }

    fn position(sheet: &str, row_index: usize) -> Result<i64> {
        match i64::try_from(row_index) {
            Ok(position) if position >= 1 => Ok(position),
            _ => Err(Error::RowOutOfRange {
                sheet: sheet.to_string(),
                row: row_index,
            }),
        }
    }
}

#[async_trait]
impl SheetBackend for Workbook {
    async fn read_rows(&self, sheet: &str) -> Result<Vec<Row>> {
        self.rows(sheet)
    }

    async fn append_row(&self, sheet: &str, row: Row) -> Result<()> {
        self.append(sheet, &row).map(|_| ())
    }

    async fn update_row(&self, sheet: &str, row_index: usize, row: Row) -> Result<()> {
        self.update(sheet, row_index, &row)
    }

    async fn delete_row(&self, sheet: &str, row_index: usize) -> Result<()> {
        self.delete(sheet, row_index)
    }

    async fn ensure_sheet(&self, sheet: &str, headers: &[&str]) -> Result<()> {
        self.ensure(sheet, headers).map(|_| ())
    }

    fn describe(&self) -> String {
        format!("local workbook at {}", self.path.display())
    }
}

/// Statistics about the local workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookStats {
    /// Row count per sheet, header rows included.
    pub sheets: Vec<(String, usize)>,
    /// Total number of rows across all sheets.
    pub total_rows: usize,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
