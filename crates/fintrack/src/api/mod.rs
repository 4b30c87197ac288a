//! HTTP API.
//!
//! Every record collection is served under `/api/<collection>` with the
//! same five routes; see [`records::routes`]. Errors are returned as
//! `{"error": "<message>"}`.

pub mod dashboard;
pub mod records;
pub mod themes;

use std::path::Path;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::Error;
use crate::records::{Budget, Context, Investment, Record, Savings, Subscription, Transaction};
use crate::sheet::SheetBackend;
use crate::store::Store;

/// Application state shared across handlers.
pub struct AppState {
    pub backend: Arc<dyn SheetBackend>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.backend.describe())
            .finish()
    }
}

impl AppState {
    #[must_use]
    pub fn new(backend: Arc<dyn SheetBackend>) -> Self {
        Self { backend }
    }

    /// Store for one record type over the shared backend.
    #[must_use]
    pub fn store<R: Record>(&self) -> Store<R> {
        Store::new(Arc::clone(&self.backend))
    }
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Map a store error onto a response.
    ///
    /// Validation and not-found errors keep their message. Anything else is
    /// logged and reported as `Failed to <action>`.
    pub fn from_store(err: Error, action: &str) -> Self {
        match err {
            Error::Validation { message } => Self::BadRequest(message),
            Error::NotFound { .. } => Self::NotFound(err.to_string()),
            other => {
                error!("Failed to {action}: {other}");
                Self::Internal(format!("Failed to {action}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Build the application router.
///
/// When `static_dir` is given, paths outside `/api` are served from it and
/// unknown ones fall back to its `index.html`.
pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .nest("/contexts", records::routes::<Context>())
        .nest("/transactions", records::routes::<Transaction>())
        .nest("/subscriptions", records::routes::<Subscription>())
        .nest("/savings", records::routes::<Savings>())
        .nest(
            "/budgets",
            Router::new()
                .route("/progress", get(dashboard::budget_progress))
                .merge(records::routes::<Budget>()),
        )
        .nest("/investments", records::routes::<Investment>())
        .route("/dashboard", get(dashboard::show))
        .nest("/themes", themes::routes())
        .fallback(api_not_found);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api);

    let app = match static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            app.fallback_service(ServeDir::new(dir).not_found_service(index))
        }
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn api_not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request() {
        let err = ApiError::from_store(Error::validation("Required fields missing"), "create budget");
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Required fields missing");
    }

    #[tokio::test]
    async fn test_not_found_keeps_label() {
        let err = ApiError::from_store(
            Error::NotFound {
                label: "Investment",
            },
            "fetch investment",
        );
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Investment not found");
    }

    #[tokio::test]
    async fn test_backend_failure_hides_detail() {
        let err = ApiError::from_store(
            Error::SheetsApi {
                status: 503,
                message: "backend unavailable".to_string(),
            },
            "fetch transactions",
        );
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch transactions");
    }
}
