//! Financial records and their spreadsheet layout.
//!
//! Every record type lives in its own sheet. Cells are kept as text exactly
//! as they were entered; numeric interpretation happens at the edges
//! ([`parse_amount`]) so a malformed cell never makes a sheet unreadable.

mod budget;
mod context;
mod investment;
mod savings;
mod subscription;
mod transaction;

pub use budget::Budget;
pub use context::Context;
pub use investment::Investment;
pub use savings::Savings;
pub use subscription::Subscription;
pub use transaction::Transaction;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::sheet::{Cells, Row};

/// Validation message for a record missing one of its required fields.
pub const REQUIRED_FIELDS_MISSING: &str = "Required fields missing";

/// Every sheet and its header row, in creation order.
pub const SHEETS: &[(&str, &[&str])] = &[
    (Context::SHEET, Context::HEADERS),
    (Transaction::SHEET, Transaction::HEADERS),
    (Subscription::SHEET, Subscription::HEADERS),
    (Savings::SHEET, Savings::HEADERS),
    (Budget::SHEET, Budget::HEADERS),
    (Investment::SHEET, Investment::HEADERS),
];

/// A record stored as one spreadsheet row.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the sheet holding these records.
    const SHEET: &'static str;
    /// Column headers, in row order. The first column is always `id`.
    const HEADERS: &'static [&'static str];
    /// Singular label used in messages, e.g. "Savings record".
    const LABEL: &'static str;
    /// Plural name used in messages and routes, e.g. "savings".
    const COLLECTION: &'static str;

    /// Record identifier.
    fn id(&self) -> &str;

    /// Replace the record identifier.
    fn set_id(&mut self, id: String);

    /// Owning context, if the record belongs to one.
    fn context_id(&self) -> Option<&str>;

    /// Budget month (`YYYY-MM`) for records scoped to one.
    fn month(&self) -> Option<&str> {
        None
    }

    /// Build a record from a header-keyed row.
    fn from_cells(cells: &Cells) -> Self;

    /// Lay the record out in header order.
    fn to_row(&self) -> Row;

    /// Validate a request body and build a record with an empty id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the payload is unacceptable.
    fn from_payload(payload: &Payload) -> Result<Self>;

    /// Whether the record passes a list filter.
    ///
    /// Records without a context or month ignore that part of the filter.
    fn matches(&self, filter: &Filter) -> bool {
        let context_ok = match filter.context() {
            Some(wanted) => self.context_id().map_or(true, |c| c == wanted),
            None => true,
        };
        let month_ok = match filter.month() {
            Some(wanted) => self.month().map_or(true, |m| m == wanted),
            None => true,
        };
        context_ok && month_ok
    }
}

/// List filter taken from the query string.
///
/// Empty values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Only records of this context.
    pub context_id: Option<String>,
    /// Only budgets of this month (`YYYY-MM`).
    pub month: Option<String>,
}

impl Filter {
    /// Filter on a single context.
    #[must_use]
    pub fn for_context(context_id: impl Into<String>) -> Self {
        Self {
            context_id: Some(context_id.into()),
            month: None,
        }
    }

    /// Requested context, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context_id.as_deref().filter(|c| !c.is_empty())
    }

    /// Requested month, if any.
    #[must_use]
    pub fn month(&self) -> Option<&str> {
        self.month.as_deref().filter(|m| !m.is_empty())
    }
}

/// JSON body of a create or update request.
///
/// Fields may arrive as strings or numbers; both are stored as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Wrap a JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Whether a field holds a usable value.
    ///
    /// Absent, `null`, `false`, `""` and the number `0` all count as missing.
    #[must_use]
    pub fn is_present(&self, key: &str) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::Array(_) | Value::Object(_)) => true,
        }
    }

    /// Text of a present field, or `default` when the field is missing.
    #[must_use]
    pub fn text_or(&self, key: &str, default: &str) -> String {
        if !self.is_present(key) {
            return default.to_string();
        }
        match self.0.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => number_text(n),
            Some(other) => other.to_string(),
            None => default.to_string(),
        }
    }

    /// Text of a field, empty when missing.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.text_or(key, "")
    }

    /// Fail with `message` unless every key is present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming nothing but `message`.
    pub fn require(&self, keys: &[&str], message: &str) -> Result<()> {
        if keys.iter().all(|key| self.is_present(key)) {
            Ok(())
        } else {
            Err(Error::validation(message))
        }
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Interpret a cell as a number.
///
/// Surrounding whitespace, a leading currency sign and thousands separators
/// are ignored, so `"$1,250.00"` reads as `1250.0`.
#[must_use]
pub fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let (negative, digits) = match unsigned.strip_prefix('-') {
        Some(rest) => (true, rest.strip_prefix('$').unwrap_or(rest)),
        None => (false, unsigned),
    };
    let cleaned: String = digits.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    let value = cleaned.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if negative { -value } else { value })
}

/// Leading number of `text`, ignoring anything after it.
///
/// `"100abc"` reads as `100.0`, while `"$100"` and `"abc"` have no leading
/// number. Used to check numbers sent by clients before they are stored.
#[must_use]
pub fn leading_number(text: &str) -> Option<f64> {
    fn digits(bytes: &[u8], from: usize) -> usize {
        bytes
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    }

    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let whole = digits(bytes, end);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits(bytes, end + 1);
        if whole > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole == 0 && fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let count = digits(bytes, exponent);
        if count > 0 {
            end = exponent + count;
        }
    }

    s[..end].parse().ok()
}

/// Text form of a JSON number. Whole floats drop their fraction, so
/// `100.0` is stored as `"100"`.
fn number_text(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(value)
            if !number.is_i64() && !number.is_u64() && value.fract() == 0.0 && value.abs() < 1e21 =>
        {
            format!("{value:.0}")
        }
        _ => number.to_string(),
    }
}

/// Numeric value of a cell, zero when it is empty or malformed.
#[must_use]
pub fn amount_or_zero(text: &str) -> f64 {
    parse_amount(text).unwrap_or(0.0)
}

/// Read one column of a header-keyed row.
pub(crate) fn cell(cells: &Cells, key: &str) -> String {
    cells.get(key).cloned().unwrap_or_default()
}
