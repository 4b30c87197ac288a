use serde::{Deserialize, Serialize};

use super::{amount_or_zero, cell, Payload, Record, REQUIRED_FIELDS_MISSING};
use crate::error::Result;
use crate::sheet::{Cells, Row};

/// A deposit into a savings account, optionally carrying the account goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Savings {
    pub id: String,
    pub context_id: String,
    pub account: String,
    pub date: String,
    pub amount: String,
    pub goal: String,
}

impl Savings {
    #[must_use]
    pub fn value(&self) -> f64 {
        amount_or_zero(&self.amount)
    }

    #[must_use]
    pub fn goal_value(&self) -> f64 {
        amount_or_zero(&self.goal)
    }
}

impl Record for Savings {
    const SHEET: &'static str = "Savings";
    const HEADERS: &'static [&'static str] =
        &["id", "context_id", "account", "date", "amount", "goal"];
    const LABEL: &'static str = "Savings record";
    const COLLECTION: &'static str = "savings";

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
            account: cell(cells, "account"),
            date: cell(cells, "date"),
            amount: cell(cells, "amount"),
            goal: cell(cells, "goal"),
        }
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.clone(),
            self.context_id.clone(),
            self.account.clone(),
            self.date.clone(),
            self.amount.clone(),
            self.goal.clone(),
        ]
    }

    fn from_payload(payload: &Payload) -> Result<Self> {
        payload.require(
            &["context_id", "account", "date", "amount"],
            REQUIRED_FIELDS_MISSING,
        )?;
        Ok(Self {
            id: String::new(),
            context_id: payload.text("context_id"),
            account: payload.text("account"),
            date: payload.text("date"),
            amount: payload.text("amount"),
            goal: payload.text("goal"),
        })
    }
}
