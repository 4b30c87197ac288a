use serde::{Deserialize, Serialize};

use super::{amount_or_zero, cell, Payload, Record, REQUIRED_FIELDS_MISSING};
use crate::error::Result;
use crate::sheet::{Cells, Row};

/// A recurring charge such as a streaming service or software licence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub context_id: String,
    pub service: String,
    pub amount: String,
    pub frequency: String,
    pub next_billing_date: String,
    pub status: String,
}

impl Subscription {
    /// Status given to subscriptions created without one.
    pub const ACTIVE: &'static str = "Active";

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Self::ACTIVE
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        amount_or_zero(&self.amount)
    }
}

impl Record for Subscription {
    const SHEET: &'static str = "Subscriptions";
    const HEADERS: &'static [&'static str] = &[
        "id",
        "context_id",
        "service",
        "amount",
        "frequency",
        "next_billing_date",
        "status",
    ];
    const LABEL: &'static str = "Subscription";
    const COLLECTION: &'static str = "subscriptions";

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
            service: cell(cells, "service"),
            amount: cell(cells, "amount"),
            frequency: cell(cells, "frequency"),
            next_billing_date: cell(cells, "next_billing_date"),
            status: cell(cells, "status"),
        }
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.clone(),
            self.context_id.clone(),
            self.service.clone(),
            self.amount.clone(),
            self.frequency.clone(),
            self.next_billing_date.clone(),
            self.status.clone(),
        ]
    }

    fn from_payload(payload: &Payload) -> Result<Self> {
        payload.require(
            &["context_id", "service", "amount", "frequency"],
            REQUIRED_FIELDS_MISSING,
        )?;
        Ok(Self {
            id: String::new(),
            context_id: payload.text("context_id"),
            service: payload.text("service"),
            amount: payload.text("amount"),
            frequency: payload.text("frequency"),
            next_billing_date: payload.text("next_billing_date"),
            status: payload.text_or("status", Self::ACTIVE),
        })
    }
}
