//! CRUD handlers shared by every record collection.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use super::{ApiError, AppState};
use crate::records::{Filter, Payload, Record};

/// Reply to a successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: String,
}

/// `GET|POST /` and `GET|PUT|DELETE /{id}` for one record type.
pub fn routes<R: Record>() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/{id}", get(show::<R>).put(update::<R>).delete(remove::<R>))
}

/// List records, optionally filtered by `context_id` (and `month`).
pub async fn list<R: Record>(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<Filter>,
) -> Result<Json<Vec<R>>, ApiError> {
    let records = state
        .store::<R>()
        .list(&filter)
        .await
        .map_err(|e| ApiError::from_store(e, &format!("fetch {}", R::COLLECTION)))?;
    Ok(Json(records))
}

pub async fn show<R: Record>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<R>, ApiError> {
    let record = state
        .store::<R>()
        .get(&id)
        .await
        .map_err(|e| ApiError::from_store(e, &action::<R>("fetch")))?;
    Ok(Json(record))
}

pub async fn create<R: Record>(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Payload>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let payload = payload(body)?;
    let record = state
        .store::<R>()
        .create(&payload)
        .await
        .map_err(|e| ApiError::from_store(e, &action::<R>("create")))?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update<R: Record>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    let payload = payload(body)?;
    let record = state
        .store::<R>()
        .update(&id, &payload)
        .await
        .map_err(|e| ApiError::from_store(e, &action::<R>("update")))?;
    Ok(Json(record))
}

pub async fn remove<R: Record>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    state
        .store::<R>()
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_store(e, &action::<R>("delete")))?;
    Ok(Json(Deleted {
        message: format!("{} deleted successfully", R::LABEL),
    }))
}

/// Request body as a payload.
///
/// Bodies that are not a JSON object, or carry no JSON content type, count
/// as an empty payload so the record's own required-field message is
/// returned. Unparseable JSON is rejected outright.
fn payload(body: Result<Json<Payload>, JsonRejection>) -> Result<Payload, ApiError> {
    match body {
        Ok(Json(payload)) => Ok(payload),
        Err(JsonRejection::JsonSyntaxError(e)) => {
            debug!("Rejected request body: {e}");
            Err(ApiError::BadRequest("Invalid JSON body".to_string()))
        }
        Err(e) => {
            debug!("Treating request body as empty: {e}");
            Ok(Payload::default())
        }
    }
}

/// `"<verb> <label>"` for error messages, e.g. `update savings record`.
fn action<R: Record>(verb: &str) -> String {
    format!("{verb} {}", R::LABEL.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Savings, Transaction};

    #[test]
    fn test_action_uses_lowercase_label() {
        assert_eq!(action::<Savings>("update"), "update savings record");
        assert_eq!(action::<Transaction>("delete"), "delete transaction");
    }
}
