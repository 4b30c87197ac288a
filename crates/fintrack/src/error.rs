//! Error types for fintrack.
//!
//! This module defines the error type shared by the spreadsheet backends,
//! the record store, and configuration loading. The HTTP layer maps these
//! onto status codes in [`crate::api::ApiError`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for fintrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Local Workbook Errors ===
    /// Failed to open or create the workbook database.
    #[error("failed to open workbook at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Spreadsheet Errors ===
    /// A row index does not exist in the sheet.
    #[error("row {row} is out of range for sheet '{sheet}'")]
    RowOutOfRange {
        /// Sheet name.
        sheet: String,
        /// The 1-based row index that was requested.
        row: usize,
    },

    /// The named sheet does not exist in the spreadsheet.
    #[error("sheet '{0}' not found")]
    SheetNotFound(String),

    /// The Google Sheets API answered with a non-success status.
    #[error("sheets API returned {status}: {message}")]
    SheetsApi {
        /// HTTP status code.
        status: u16,
        /// Response body or error description.
        message: String,
    },

    /// The HTTP request to Google could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Signing the service-account assertion failed.
    #[error("failed to sign service account token: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),

    // === Record Errors ===
    /// A request payload failed validation.
    #[error("{message}")]
    Validation {
        /// Message returned to the client.
        message: String,
    },

    /// No record with the requested id exists.
    #[error("{label} not found")]
    NotFound {
        /// Human-readable record label, e.g. "Transaction".
        label: &'static str,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for fintrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error carrying a client-facing message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is a payload validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error means the requested record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = Error::validation("Required fields missing");
        assert_eq!(err.to_string(), "Required fields missing");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound {
            label: "Savings record",
        };
        assert_eq!(err.to_string(), "Savings record not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_row_out_of_range_display() {
        let err = Error::RowOutOfRange {
            sheet: "Budgets".to_string(),
            row: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("Budgets"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_sheets_api_display() {
        let err = Error::SheetsApi {
            status: 403,
            message: "The caller does not have permission".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("permission"));
    }

    #[test]
    fn test_sheet_not_found_display() {
        let err = Error::SheetNotFound("Investments".to_string());
        assert_eq!(err.to_string(), "sheet 'Investments' not found");
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("lock poisoned");
        assert_eq!(err.to_string(), "internal error: lock poisoned");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "port must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
