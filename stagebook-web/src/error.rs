//! Error types for stagebook-web
//!
//! Handler failures that end the request. Everything except a missing record
//! renders the generic 500 page; the cause is only logged.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use stagebook_common::ErrorKind;
use thiserror::Error;
use tracing::error;

use crate::views;

#[derive(Debug, Error)]
pub enum WebError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// stagebook-common error
    #[error("Common error: {0}")]
    Common(#[from] stagebook_common::Error),
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Common(e) if e.kind() == ErrorKind::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::NOT_FOUND {
            return (status, Html(views::errors::not_found_page())).into_response();
        }

        error!("Request failed: {}", self);
        (status, Html(views::errors::server_error_page())).into_response()
    }
}

/// Render the 500 page for a handler that panicked
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(views::errors::server_error_page()),
    )
        .into_response()
}
