use serde::{Deserialize, Serialize};

use super::{amount_or_zero, cell, Payload, Record, REQUIRED_FIELDS_MISSING};
use crate::error::Result;
use crate::sheet::{Cells, Row};

/// Money coming in or going out of a context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub context_id: String,
    pub date: String,
    pub category: String,
    /// `Income` or `Expense`.
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub account: String,
    pub notes: String,
}

impl Transaction {
    pub const INCOME: &'static str = "Income";
    pub const EXPENSE: &'static str = "Expense";

    #[must_use]
    pub fn is_income(&self) -> bool {
        self.kind == Self::INCOME
    }

    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.kind == Self::EXPENSE
    }

    /// Amount as a number, zero if the cell is malformed.
    #[must_use]
    pub fn value(&self) -> f64 {
        amount_or_zero(&self.amount)
    }
}

impl Record for Transaction {
    const SHEET: &'static str = "Transactions";
    const HEADERS: &'static [&'static str] = &[
        "id",
        "context_id",
        "date",
        "category",
        "type",
        "amount",
        "account",
        "notes",
    ];
    const LABEL: &'static str = "Transaction";
    const COLLECTION: &'static str = "transactions";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn context_id(&self) -> Option<&str> {
        Some(&self.context_id)
    }

    fn from_cells(cells: &Cells) -> Self {
        Self {
            id: cell(cells, "id"),
            context_id: cell(cells, "context_id"),
            date: cell(cells, "date"),
            category: cell(cells, "category"),
            kind: cell(cells, "type"),
            amount: cell(cells, "amount"),
            account: cell(cells, "account"),
            notes: cell(cells, "notes"),
        }
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.clone(),
            self.context_id.clone(),
            self.date.clone(),
            self.category.clone(),
            self.kind.clone(),
            self.amount.clone(),
            self.account.clone(),
            self.notes.clone(),
        ]
    }

    fn from_payload(payload: &Payload) -> Result<Self> {
        payload.require(
            &["context_id", "date", "category", "type", "amount"],
            REQUIRED_FIELDS_MISSING,
        )?;
        Ok(Self {
            id: String::new(),
            context_id: payload.text("context_id"),
            date: payload.text("date"),
            category: payload.text("category"),
            kind: payload.text("type"),
            amount: payload.text("amount"),
            account: payload.text("account"),
            notes: payload.text("notes"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Filter;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> Payload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_payload_fills_optional_fields() {
        let transaction = Transaction::from_payload(&payload(json!({
            "context_id": "1",
            "date": "2024-03-05",
            "category": "Food",
            "type": "Expense",
            "amount": 42.5
        })))
        .unwrap();

        assert_eq!(transaction.amount, "42.5");
        assert_eq!(transaction.account, "");
        assert_eq!(transaction.notes, "");
        assert!(transaction.is_expense());
    }

    #[test]
    fn test_zero_amount_counts_as_missing() {
        let err = Transaction::from_payload(&payload(json!({
            "context_id": "1",
            "date": "2024-03-05",
            "category": "Salary",
            "type": "Income",
            "amount": 0
        })))
        .unwrap_err();

        assert_eq!(err.to_string(), REQUIRED_FIELDS_MISSING);
    }

    #[test]
    fn test_row_layout_matches_headers() {
        let transaction = Transaction {
            id: "4".to_string(),
            context_id: "1".to_string(),
            kind: "Income".to_string(),
            amount: "1000".to_string(),
            ..Transaction::default()
        };
        let row = transaction.to_row();

        assert_eq!(row.len(), Transaction::HEADERS.len());
        assert_eq!(row[4], "Income");
        assert_eq!(row[5], "1000");
    }

    #[test]
    fn test_matches_context() {
        let transaction = Transaction {
            context_id: "2".to_string(),
            ..Transaction::default()
        };

        assert!(transaction.matches(&Filter::for_context("2")));
        assert!(!transaction.matches(&Filter::for_context("3")));
    }

    #[test]
    fn test_value_of_malformed_amount() {
        let transaction = Transaction {
            amount: "lots".to_string(),
            ..Transaction::default()
        };
        assert!(transaction.value().abs() < f64::EPSILON);
    }
}
