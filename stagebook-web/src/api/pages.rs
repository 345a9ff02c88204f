//! Home page and fallback

use axum::{
    http::{StatusCode, Uri},
    response::{Html, IntoResponse},
};
use tracing::debug;

use crate::views;

/// GET /
pub async fn home() -> Html<String> {
    Html(views::pages::home(None))
}

/// Any route without a handler
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    debug!("No route for {}", uri);
    (StatusCode::NOT_FOUND, Html(views::errors::not_found_page()))
}
