//! stagebook-web library - booking directory HTTP service
//!
//! Server-rendered pages for browsing, searching and editing venues and
//! artists, and for scheduling shows between them.

use std::sync::Arc;

use axum::Router;
use stagebook_common::BookingStore;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub mod api;
pub mod error;
pub mod forms;
pub mod views;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Repository and mutation layer (SQLite in production)
    pub store: Arc<dyn BookingStore>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(api::home))
        .merge(api::venue_routes())
        .merge(api::artist_routes())
        .merge(api::show_routes())
        .merge(api::health_routes())
        .fallback(api::not_found)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
