//! Venue pages: listing, search, detail, create, edit and delete

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use stagebook_common::{time, ErrorKind};
use tracing::{debug, info, warn};

use super::{delete_result, mutation_failure, parse_id, SearchForm};
use crate::error::WebError;
use crate::forms::{FieldErrors, VenueForm};
use crate::views::{self, forms::FormAction, Notice};
use crate::AppState;

/// Build venue routes
pub fn venue_routes() -> Router<AppState> {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues/search", post(search_venues))
        .route("/venues/create", get(new_venue_form).post(create_venue))
        .route("/venues/:id", get(show_venue).delete(delete_venue))
        .route("/venues/:id/edit", get(edit_venue_form).post(update_venue))
}

/// GET /venues
///
/// Venues grouped by city and state, with upcoming show counts.
pub async fn list_venues(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let areas = state.store.venue_areas(time::now()).await?;
    Ok(Html(views::venues::listing(&areas)))
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<AppState>,
    Form(search): Form<SearchForm>,
) -> Result<Html<String>, WebError> {
    let results = state.store.search_venues(&search.search_term).await?;
    debug!(
        "Venue search {:?} matched {}",
        search.search_term, results.count
    );
    Ok(Html(views::venues::search_results(
        &results,
        &search.search_term,
    )))
}

/// GET /venues/:id
pub async fn show_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let venue = state
        .store
        .venue_detail(id, time::now())
        .await?
        .ok_or_else(|| WebError::NotFound(format!("venue {}", id)))?;
    Ok(Html(views::venues::detail(&venue)))
}

/// GET /venues/create
pub async fn new_venue_form() -> Html<String> {
    Html(views::forms::venue_form(
        &VenueForm::default(),
        &FieldErrors::default(),
        FormAction::Create,
    ))
}

fn invalid_venue_form(form: &VenueForm, errors: &FieldErrors, action: FormAction) -> Response {
    warn!("Venue form rejected: {}", errors);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(views::forms::venue_form(form, errors, action)),
    )
        .into_response()
}

/// POST /venues/create
pub async fn create_venue(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = VenueForm::from_pairs(&pairs);
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return invalid_venue_form(&form, &errors, FormAction::Create),
    };

    match state.store.create_venue(fields).await {
        Ok(venue) => {
            info!("Venue {} listed as id {}", venue.name, venue.id);
            let notice = Notice::Success(format!("Venue {} was successfully listed!", venue.name));
            Html(views::pages::home(Some(&notice))).into_response()
        }
        Err(e) => mutation_failure(
            e,
            format!("An error occurred. Venue {} could not be listed.", form.name),
        ),
    }
}

/// DELETE /venues/:id
pub async fn delete_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    let result = match id.parse::<i64>() {
        Ok(venue_id) => state.store.delete_venue(venue_id).await,
        Err(_) => Err(stagebook_common::Error::NotFound(format!("venue {}", id))),
    };
    if result.is_ok() {
        info!("Venue {} deleted", id);
    }
    delete_result("venue", &id, result)
}

/// GET /venues/:id/edit
pub async fn edit_venue_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let venue = state
        .store
        .venue(id)
        .await?
        .ok_or_else(|| WebError::NotFound(format!("venue {}", id)))?;

    Ok(Html(views::forms::venue_form(
        &VenueForm::from_venue(&venue),
        &FieldErrors::default(),
        FormAction::Edit(id),
    )))
}

/// POST /venues/:id/edit
///
/// Redirects to the venue page on success.
pub async fn update_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;
    if state.store.venue(id).await?.is_none() {
        return Err(WebError::NotFound(format!("venue {}", id)));
    }

    let form = VenueForm::from_pairs(&pairs);
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return Ok(invalid_venue_form(&form, &errors, FormAction::Edit(id))),
    };

    match state.store.update_venue(id, fields).await {
        Ok(venue) => {
            info!("Venue {} updated", venue.id);
            Ok(Redirect::to(&format!("/venues/{}", id)).into_response())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(e.into()),
        Err(e) => Ok(mutation_failure(
            e,
            format!("An error occurred. Venue {} could not be updated.", form.name),
        )),
    }
}
