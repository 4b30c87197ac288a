use serde::{Deserialize, Serialize};

use super::{amount_or_zero, cell, Payload, Record, REQUIRED_FIELDS_MISSING};
use crate::error::Result;
use crate::sheet::{Cells, Row};

/// A monthly spending limit for one category.
///
/// `spent` is whatever the client last stored; the dashboard recomputes the
/// real figure from transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub context_id: String,
    pub category: String,
    pub monthly_limit: String,
    /// `YYYY-MM`.
    pub month: String,
    pub spent: String,
}

impl Budget {
    /// Spent figure given to budgets created without one.
    pub const NOTHING_SPENT: &'static str = "0";

    #[must_use]
    pub fn limit(&self) -> f64 {
        amount_or_zero(&self.monthly_limit)
    }
}

impl Record for Budget {
    const SHEET: &'static str = "Budgets";
    const HEADERS: &'static [&'static str] = &[
        "id",
        "context_id",
        "category",
        "monthly_limit",
        "month",
        "spent",
    ];
    const LABEL: &'static str = "Budget";
    const COLLECTION: &'static str = "budgets";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn context_id(&self) -> Option<&str> {
        Some(&self.context_id)
    }

    fn month(&self) -> Option<&str> {
        Some(&self.month)
    }

    fn from_cells(cells: &Cells) -> Self {
        Self {
            id: cell(cells, "id"),
            context_id: cell(cells, "context_id"),
            category: cell(cells, "category"),
            monthly_limit: cell(cells, "monthly_limit"),
            month: cell(cells, "month"),
            spent: cell(cells, "spent"),
        }
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.clone(),
            self.context_id.clone(),
            self.category.clone(),
            self.monthly_limit.clone(),
            self.month.clone(),
            self.spent.clone(),
        ]
    }

    fn from_payload(payload: &Payload) -> Result<Self> {
        payload.require(
            &["context_id", "category", "monthly_limit", "month"],
            REQUIRED_FIELDS_MISSING,
        )?;
        Ok(Self {
            id: String::new(),
            context_id: payload.text("context_id"),
            category: payload.text("category"),
            monthly_limit: payload.text("monthly_limit"),
            month: payload.text("month"),
            spent: payload.text_or("spent", Self::NOTHING_SPENT),
        })
    }
}
