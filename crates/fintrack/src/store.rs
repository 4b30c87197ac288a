//! Record CRUD on top of a [`SheetBackend`].
//!
//! Records are located by scanning the sheet for their id; the data row at
//! list position `i` is spreadsheet row `i + HEADER_OFFSET`.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::records::{Filter, Payload, Record, SHEETS};
use crate::sheet::{rows_to_records, SheetBackend, HEADER_OFFSET};

/// Typed access to the sheet holding records of type `R`.
pub struct Store<R> {
    backend: Arc<dyn SheetBackend>,
    _record: PhantomData<fn() -> R>,
}

impl<R> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend.describe())
            .finish()
    }
}

impl<R> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            _record: PhantomData,
        }
    }
}

impl<R: Record> Store<R> {
    /// Create a store over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn SheetBackend>) -> Self {
        Self {
            backend,
            _record: PhantomData,
        }
    }

    /// Read every record along with the number of rows in the sheet,
    /// header included.
    async fn load(&self) -> Result<(Vec<R>, usize)> {
        let rows = self.backend.read_rows(R::SHEET).await?;
        let records = rows_to_records(&rows, R::HEADERS)
            .iter()
            .map(R::from_cells)
            .collect();
        Ok((records, rows.len()))
    }

    /// All records passing `filter`, in sheet order.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet cannot be read.
    pub async fn list(&self, filter: &Filter) -> Result<Vec<R>> {
        let (records, _) = self.load().await?;
        Ok(records.into_iter().filter(|r| r.matches(filter)).collect())
    }

    /// The first record with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has that id.
    pub async fn get(&self, id: &str) -> Result<R> {
        let (records, _) = self.load().await?;
        records
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or(Error::NotFound { label: R::LABEL })
    }

    /// Validate `payload`, give it a fresh id and append it to the sheet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a bad payload, or a backend error.
    pub async fn create(&self, payload: &Payload) -> Result<R> {
        let mut record = R::from_payload(payload)?;
        let (records, row_count) = self.load().await?;
        record.set_id(next_id(&records, row_count));

        self.backend.append_row(R::SHEET, record.to_row()).await?;
        info!("Created {} {}", R::LABEL.to_lowercase(), record.id());
        Ok(record)
    }

    /// Replace the record with the given id, keeping the id.
    ///
    /// The payload is validated before the record is looked up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`], [`Error::NotFound`], or a backend error.
    pub async fn update(&self, id: &str, payload: &Payload) -> Result<R> {
        let mut record = R::from_payload(payload)?;
        let index = self.position(id).await?;
        record.set_id(id.to_string());

        self.backend
            .update_row(R::SHEET, index + HEADER_OFFSET, record.to_row())
            .await?;
        debug!("Updated {} {}", R::LABEL.to_lowercase(), id);
        Ok(record)
    }

    /// Remove the record with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has that id, or a backend error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let index = self.position(id).await?;
        self.backend
            .delete_row(R::SHEET, index + HEADER_OFFSET)
            .await?;
        info!("Deleted {} {}", R::LABEL.to_lowercase(), id);
        Ok(())
    }

    async fn position(&self, id: &str) -> Result<usize> {
        let (records, _) = self.load().await?;
        records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(Error::NotFound { label: R::LABEL })
    }
}

/// Id for a new record: one past the largest numeric id, or the sheet's row
/// count when that is larger.
fn next_id<R: Record>(records: &[R], row_count: usize) -> String {
    let after_max = records
        .iter()
        .filter_map(|r| r.id().trim().parse::<u64>().ok())
        .max()
        .map_or(0, |max| max.saturating_add(1));
    let rows = u64::try_from(row_count).unwrap_or(u64::MAX);
    after_max.max(rows).to_string()
}

/// Make sure every record sheet exists with its header row.
///
/// # Errors
///
/// Returns the first backend error encountered.
pub async fn ensure_sheets(backend: &dyn SheetBackend) -> Result<()> {
    for (sheet, headers) in SHEETS {
        backend.ensure_sheet(sheet, headers).await?;
    }
    debug!("Verified {} sheets", SHEETS.len());
    Ok(())
}

/// Number of records in each sheet, header rows excluded.
///
/// # Errors
///
/// Returns the first backend error encountered.
pub async fn record_counts(backend: &dyn SheetBackend) -> Result<Vec<(&'static str, usize)>> {
    let mut counts = Vec::with_capacity(SHEETS.len());
    for (sheet, _) in SHEETS {
        let rows = backend.read_rows(sheet).await?;
        counts.push((*sheet, rows.len().saturating_sub(1)));
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Budget, Context, Transaction};
    use crate::sheet::Workbook;
    use serde_json::{json, Value};

    async fn backend() -> Arc<dyn SheetBackend> {
        let workbook = Workbook::open_in_memory().unwrap();
        ensure_sheets(&workbook).await.unwrap();
        Arc::new(workbook)
    }

    fn payload(value: Value) -> Payload {
        serde_json::from_value(value).unwrap()
    }

    fn expense(context_id: &str, amount: &str) -> Payload {
        payload(json!({
            "context_id": context_id,
            "date": "2024-03-10",
            "category": "Food",
            "type": "Expense",
            "amount": amount
        }))
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = Store::<Context>::new(backend().await);

        let home = store
            .create(&payload(json!({ "name": "Home", "type": "Home" })))
            .await
            .unwrap();
        let work = store
            .create(&payload(json!({ "name": "Office", "type": "Work" })))
            .await
            .unwrap();

        assert_eq!(home.id, "1");
        assert_eq!(work.id, "2");
        assert_eq!(store.get("2").await.unwrap().name, "Office");
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = Store::<Transaction>::new(backend().await);
        for amount in ["10", "20", "30"] {
            store.create(&expense("1", amount)).await.unwrap();
        }

        store.delete("1").await.unwrap();
        let created = store.create(&expense("1", "40")).await.unwrap();

        assert_eq!(created.id, "4");
        let ids: Vec<String> = store
            .list(&Filter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["2", "3", "4"]);
    }

    #[tokio::test]
    async fn test_list_filters_by_context() {
        let store = Store::<Transaction>::new(backend().await);
        store.create(&expense("1", "10")).await.unwrap();
        store.create(&expense("2", "20")).await.unwrap();
        store.create(&expense("1", "30")).await.unwrap();

        let first = store.list(&Filter::for_context("1")).await.unwrap();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|t| t.context_id == "1"));

        let all = store.list(&Filter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_preserves_id_and_position() {
        let store = Store::<Transaction>::new(backend().await);
        store.create(&expense("1", "10")).await.unwrap();
        store.create(&expense("1", "20")).await.unwrap();

        let updated = store.update("1", &expense("1", "15")).await.unwrap();
        assert_eq!(updated.id, "1");
        assert_eq!(updated.amount, "15");

        let all = store.list(&Filter::default()).await.unwrap();
        assert_eq!(all[0].amount, "15");
        assert_eq!(all[1].amount, "20");
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let store = Store::<Transaction>::new(backend().await);

        let err = store
            .update("99", &payload(json!({ "context_id": "1" })))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = store.update("99", &expense("1", "5")).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Transaction not found");
    }

    #[tokio::test]
    async fn test_delete_missing_record() {
        let store = Store::<Budget>::new(backend().await);
        let err = store.delete("7").await.unwrap_err();
        assert_eq!(err.to_string(), "Budget not found");
    }

    #[tokio::test]
    async fn test_list_budgets_by_month() {
        let store = Store::<Budget>::new(backend().await);
        for month in ["2024-02", "2024-03"] {
            store
                .create(&payload(json!({
                    "context_id": "1",
                    "category": "Food",
                    "monthly_limit": 300,
                    "month": month
                })))
                .await
                .unwrap();
        }

        let filter = Filter {
            context_id: Some("1".to_string()),
            month: Some("2024-03".to_string()),
        };
        let march = store.list(&filter).await.unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].month, "2024-03");
    }

    #[tokio::test]
    async fn test_record_counts_exclude_headers() {
        let backend = backend().await;
        let store = Store::<Transaction>::new(Arc::clone(&backend));
        store.create(&expense("1", "10")).await.unwrap();
        store.create(&expense("1", "20")).await.unwrap();

        let counts = record_counts(backend.as_ref()).await.unwrap();
        assert_eq!(counts.len(), SHEETS.len());
        assert!(counts.contains(&("Transactions", 2)));
        assert!(counts.contains(&("Contexts", 0)));
    }

    #[test]
    fn test_next_id() {
        let records = vec![
            Context {
                id: "5".to_string(),
                ..Context::default()
            },
            Context {
                id: "not-a-number".to_string(),
                ..Context::default()
            },
        ];

        assert_eq!(next_id::<Context>(&[], 0), "0");
        assert_eq!(next_id::<Context>(&[], 1), "1");
        assert_eq!(next_id(&records, 3), "6");
        assert_eq!(next_id(&records, 9), "9");
    }
}
