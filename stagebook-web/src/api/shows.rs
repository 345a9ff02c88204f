//! Show listing and scheduling

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use stagebook_common::time;
use tracing::{info, warn};

use super::mutation_failure;
use crate::error::WebError;
use crate::forms::{FieldErrors, ShowForm};
use crate::views::{self, Notice};
use crate::AppState;

/// Build show routes
pub fn show_routes() -> Router<AppState> {
    Router::new()
        .route("/shows", get(list_shows))
        .route("/shows/create", get(new_show_form).post(create_show))
}

/// GET /shows
pub async fn list_shows(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let shows = state.store.shows().await?;
    Ok(Html(views::shows::listing(&shows)))
}

async fn render_show_form(
    state: &AppState,
    form: &ShowForm,
    errors: &FieldErrors,
) -> Result<String, WebError> {
    let artists = state.store.artist_summaries().await?;
    let venues = state.store.venue_summaries().await?;
    Ok(views::forms::show_form(form, errors, &artists, &venues))
}

/// GET /shows/create
pub async fn new_show_form(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let form = ShowForm::starting_at(time::now());
    Ok(Html(
        render_show_form(&state, &form, &FieldErrors::default()).await?,
    ))
}

/// POST /shows/create
pub async fn create_show(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let form = ShowForm::from_pairs(&pairs);
    let show = match form.validate() {
        Ok(show) => show,
        Err(errors) => {
            warn!("Show form rejected: {}", errors);
            let page = render_show_form(&state, &form, &errors).await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        }
    };

    match state.store.create_show(show).await {
        Ok(created) => {
            info!(
                "Show {} listed: artist {} at venue {}",
                created.id, created.artist_id, created.venue_id
            );
            let notice = Notice::Success("Show was successfully listed!".to_string());
            Ok(Html(views::pages::home(Some(&notice))).into_response())
        }
        Err(e) => Ok(mutation_failure(
            e,
            "An error occurred. Show could not be listed.".to_string(),
        )),
    }
}
