//! Artist pages: listing, search, detail, create, edit and delete

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
use crate::forms::{ArtistForm, FieldErrors};
use crate::views::{self, forms::FormAction, Notice};
use crate::AppState;

/// Build artist routes
pub fn artist_routes() -> Router<AppState> {
    Router::new()
        .route("/artists", get(list_artists))
        .route("/artists/search", post(search_artists))
        .route("/artists/create", get(new_artist_form).post(create_artist))
        .route("/artists/:id", get(show_artist).delete(delete_artist))
        .route("/artists/:id/edit", get(edit_artist_form).post(update_artist))
}

/// GET /artists
pub async fn list_artists(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let artists = state.store.artist_summaries().await?;
    Ok(Html(views::artists::listing(&artists)))
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<AppState>,
    Form(search): Form<SearchForm>,
) -> Result<Html<String>, WebError> {
    let results = state.store.search_artists(&search.search_term).await?;
    debug!(
        "Artist search {:?} matched {}",
        search.search_term, results.count
    );
    Ok(Html(views::artists::search_results(
        &results,
        &search.search_term,
    )))
}

/// GET /artists/:id
pub async fn show_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let artist = state
        .store
        .artist_detail(id, time::now())
        .await?
        .ok_or_else(|| WebError::NotFound(format!("artist {}", id)))?;
    Ok(Html(views::artists::detail(&artist)))
}

/// GET /artists/create
pub async fn new_artist_form() -> Html<String> {
    Html(views::forms::artist_form(
        &ArtistForm::default(),
        &FieldErrors::default(),
        FormAction::Create,
    ))
}

fn invalid_artist_form(form: &ArtistForm, errors: &FieldErrors, action: FormAction) -> Response {
    warn!("Artist form rejected: {}", errors);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(views::forms::artist_form(form, errors, action)),
    )
        .into_response()
}

/// POST /artists/create
pub async fn create_artist(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = ArtistForm::from_pairs(&pairs);
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return invalid_artist_form(&form, &errors, FormAction::Create),
    };

    match state.store.create_artist(fields).await {
        Ok(artist) => {
            info!("Artist {} listed as id {}", artist.name, artist.id);
            let notice =
                Notice::Success(format!("Artist {} was successfully listed!", artist.name));
            Html(views::pages::home(Some(&notice))).into_response()
        }
        Err(e) => mutation_failure(
            e,
            format!("An error occurred. Artist {} could not be listed.", form.name),
        ),
    }
}

/// DELETE /artists/:id
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    let result = match id.parse::<i64>() {
        Ok(artist_id) => state.store.delete_artist(artist_id).await,
        Err(_) => Err(stagebook_common::Error::NotFound(format!("artist {}", id))),
    };
    if result.is_ok() {
        info!("Artist {} deleted", id);
    }
    delete_result("artist", &id, result)
}

/// GET /artists/:id/edit
pub async fn edit_artist_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let artist = state
        .store
        .artist(id)
        .await?
        .ok_or_else(|| WebError::NotFound(format!("artist {}", id)))?;

    Ok(Html(views::forms::artist_form(
        &ArtistForm::from_artist(&artist),
        &FieldErrors::default(),
        FormAction::Edit(id),
    )))
}

/// POST /artists/:id/edit
pub async fn update_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;
    if state.store.artist(id).await?.is_none() {
        return Err(WebError::NotFound(format!("artist {}", id)));
    }

    let form = ArtistForm::from_pairs(&pairs);
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return Ok(invalid_artist_form(&form, &errors, FormAction::Edit(id))),
    };

    match state.store.update_artist(id, fields).await {
        Ok(artist) => {
            info!("Artist {} updated", artist.id);
            Ok(Redirect::to(&format!("/artists/{}", id)).into_response())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(e.into()),
        Err(e) => Ok(mutation_failure(
            e,
            format!("An error occurred. Artist {} could not be updated.", form.name),
        )),
    }
}
