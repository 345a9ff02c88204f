//! HTTP handlers for stagebook-web

pub mod artists;
pub mod health;
pub mod pages;
pub mod shows;
pub mod venues;

pub use artists::artist_routes;
pub use health::health_routes;
pub use pages::{home, not_found};
pub use shows::show_routes;
pub use venues::venue_routes;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use stagebook_common::{Error, ErrorKind};
use tracing::{error, warn};

use crate::error::WebError;
use crate::views::{self, Notice};

/// Body of the search forms
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Path ids that are not integers name no record
pub(crate) fn parse_id(raw: &str) -> Result<i64, WebError> {
    raw.parse::<i64>()
        .map_err(|_| WebError::NotFound(format!("invalid id {:?}", raw)))
}

/// Render the home page with the failure message of a rejected write
///
/// Constraint violations answer 409, anything unexpected 500.
pub(crate) fn mutation_failure(err: Error, message: String) -> Response {
    let status = match err.kind() {
        ErrorKind::Constraint => {
            warn!("Write rejected: {}", err);
            StatusCode::CONFLICT
        }
        ErrorKind::Validation => {
            warn!("Write rejected: {}", err);
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorKind::NotFound => {
            warn!("Write target missing: {}", err);
            StatusCode::NOT_FOUND
        }
        ErrorKind::Unexpected => {
            error!("Write failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Html(views::pages::home(Some(&Notice::Error(message))))).into_response()
}

/// JSON result of a delete request
pub(crate) fn delete_result(entity: &str, raw_id: &str, result: Result<(), Error>) -> Json<serde_json::Value> {
    let success = match result {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Delete of missing {} {}", entity, raw_id);
            false
        }
        Err(e) => {
            error!("Delete of {} {} failed: {}", entity, raw_id, e);
            false
        }
    };
    Json(json!({ "success": success }))
}
