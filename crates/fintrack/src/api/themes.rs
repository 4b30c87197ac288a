use std::sync::Arc;

use axum::{extract::Path, http::header, response::IntoResponse, routing::get, Json, Router};

use super::AppState;
use crate::theme::{self, Theme, THEMES};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list))
        .route("/{kind}", get(show))
        .route("/{kind}/css", get(css))
}

async fn list() -> Json<&'static [Theme]> {
    Json(THEMES.as_slice())
}

/// Theme for a context type; unknown types get the Home theme.
async fn show(Path(kind): Path<String>) -> Json<&'static Theme> {
    Json(theme::theme_for(&kind))
}

async fn css(Path(kind): Path<String>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        theme::css_variables(theme::theme_for(&kind)),
    )
}
