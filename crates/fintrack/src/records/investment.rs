use serde::{Deserialize, Serialize};

use super::{amount_or_zero, cell, leading_number, Payload, Record, REQUIRED_FIELDS_MISSING};
use crate::error::{Error, Result};
use crate::sheet::{Cells, Row};

/// A holding: what was put in and what it is worth now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub id: String,
    pub context_id: String,
    pub asset_name: String,
    /// Asset class, e.g. `Stocks` or `Crypto`.
    #[serde(rename = "type")]
    pub kind: String,
    pub amount_invested: String,
    pub current_value: String,
    pub date_invested: String,
    pub notes: String,
}

impl Investment {
    #[must_use]
    pub fn invested(&self) -> f64 {
        amount_or_zero(&self.amount_invested)
    }

    #[must_use]
    pub fn worth(&self) -> f64 {
        amount_or_zero(&self.current_value)
    }
}

impl Record for Investment {
    const SHEET: &'static str = "Investments";
    const HEADERS: &'static [&'static str] = &[
        "id",
        "context_id",
        "asset_name",
        "type",
        "amount_invested",
        "current_value",
        "date_invested",
        "notes",
    ];
    const LABEL: &'static str = "Investment";
    const COLLECTION: &'static str = "investments";

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
            asset_name: cell(cells, "asset_name"),
            kind: cell(cells, "type"),
            amount_invested: cell(cells, "amount_invested"),
            current_value: cell(cells, "current_value"),
            date_invested: cell(cells, "date_invested"),
            notes: cell(cells, "notes"),
        }
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.clone(),
            self.context_id.clone(),
            self.asset_name.clone(),
            self.kind.clone(),
            self.amount_invested.clone(),
            self.current_value.clone(),
            self.date_invested.clone(),
            self.notes.clone(),
        ]
    }

    fn from_payload(payload: &Payload) -> Result<Self> {
        payload.require(
            &[
                "context_id",
                "asset_name",
                "type",
                "amount_invested",
                "date_invested",
            ],
            REQUIRED_FIELDS_MISSING,
        )?;

        let amount_invested = payload.text("amount_invested");
        if !leading_number(&amount_invested).is_some_and(|v| v > 0.0) {
            return Err(Error::validation(
                "Amount invested must be a positive number",
            ));
        }

        if payload.is_present("current_value")
            && !leading_number(&payload.text("current_value")).is_some_and(|v| v >= 0.0)
        {
            return Err(Error::validation(
                "Current value must be a non-negative number",
            ));
        }

        Ok(Self {
            id: String::new(),
            context_id: payload.text("context_id"),
            asset_name: payload.text("asset_name"),
            kind: payload.text("type"),
            current_value: payload.text_or("current_value", &amount_invested),
            amount_invested,
            date_invested: payload.text("date_invested"),
            notes: payload.text("notes"),
        })
    }
}
