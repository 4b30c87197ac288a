//! `fintrack` - Multi-context finance tracking on top of a spreadsheet
//!
//! Contexts (home, work, business) own transactions, subscriptions, savings,
//! budgets and investments. Each record type lives in its own sheet, either
//! in a Google Sheets spreadsheet or in a local `SQLite` workbook, and is
//! exposed through a JSON API with dashboard aggregates and theming.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod records;
pub mod server;
pub mod sheet;
pub mod store;
pub mod summary;
pub mod theme;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use sheet::SheetBackend;
pub use store::Store;
