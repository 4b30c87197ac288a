//! Financial contexts: the top-level grouping every other record belongs to.

use serde::{Deserialize, Serialize};

use super::{cell, Payload, Record};
use crate::error::Result;
use crate::sheet::{Cells, Row};

/// A named financial context such as a household or a company.
///
/// `kind` is one of `Home`, `Work` or `Business` and selects the theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Record for Context {
    const SHEET: &'static str = "Contexts";
    const HEADERS: &'static [&'static str] = &["id", "name", "type"];
    const LABEL: &'static str = "Context";
    const COLLECTION: &'static str = "contexts";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn context_id(&self) -> Option<&str> {
        None
    }

    fn from_cells(cells: &Cells) -> Self {
        Self {
            id: cell(cells, "id"),
            name: cell(cells, "name"),
            kind: cell(cells, "type"),
        }
    }

    fn to_row(&self) -> Row {
        vec![self.id.clone(), self.name.clone(), self.kind.clone()]
    }

    fn from_payload(payload: &Payload) -> Result<Self> {
        payload.require(&["name", "type"], "Name and type are required")?;
        Ok(Self {
            id: String::new(),
            name: payload.text("name"),
            kind: payload.text("type"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Filter;
    use serde_json::json;

    #[test]
    fn test_from_payload() {
        let payload: Payload =
            serde_json::from_value(json!({ "name": "Family", "type": "Home" })).unwrap();
        let context = Context::from_payload(&payload).unwrap();

        assert_eq!(context.name, "Family");
        assert_eq!(context.kind, "Home");
        assert!(context.id.is_empty());
    }

    #[test]
    fn test_missing_type_rejected() {
        let payload: Payload = serde_json::from_value(json!({ "name": "Family" })).unwrap();
        let err = Context::from_payload(&payload).unwrap_err();

        assert_eq!(err.to_string(), "Name and type are required");
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let context = Context {
            id: "1".to_string(),
            name: "Studio".to_string(),
            kind: "Business".to_string(),
        };
        let value = serde_json::to_value(&context).unwrap();

        assert_eq!(value, json!({ "id": "1", "name": "Studio", "type": "Business" }));
    }

    #[test]
    fn test_context_filter_is_ignored() {
        let context = Context::default();
        assert!(context.matches(&Filter::for_context("1")));
        assert!(context.matches(&Filter::default()));
    }
}
