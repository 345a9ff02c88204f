//! Integration tests for stagebook-web routes
//!
//! Tests cover:
//! - Health endpoint and store reachability
//! - Listing, search and detail pages
//! - Create/edit flows: success, validation failure, missing records
//! - Delete JSON results
//! - Show scheduling with unknown references
//! - Fallback 404 page

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::Duration;
use serde_json::Value;
use stagebook_common::db::init_memory_database;
use stagebook_common::db::models::{ArtistFields, NewShow, VenueFields};
use stagebook_common::{time, BookingStore, GenreList, MemoryStore, SqliteStore};
use tower::util::ServiceExt; // for `oneshot` method
use stagebook_web::{build_router, AppState};

/// Test helper: app backed by the in-memory store, plus a handle for seeding
fn setup_app() -> (axum::Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = build_router(AppState::new(store.clone()));
    (app, store)
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

fn venue(name: &str, city: &str, state: &str) -> VenueFields {
    VenueFields {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: "1015 Folsom Street".to_string(),
        phone: Some("123-123-1234".to_string()),
        genres: GenreList::from_names(&["Jazz"]).unwrap(),
        facebook_link: None,
        image_link: Some("https://example.com/venue.jpg".to_string()),
        website: None,
        seeking_talent: false,
        seeking_description: None,
    }
}

fn artist(name: &str) -> ArtistFields {
    ArtistFields {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        phone: "326-123-5000".to_string(),
        genres: GenreList::from_names(&["Rock n Roll"]).unwrap(),
        facebook_link: None,
        image_link: "https://example.com/artist.jpg".to_string(),
        website_link: None,
        seeking_venue: true,
        seeking_description: Some("Looking for shows to perform at".to_string()),
    }
}

const VENUE_FORM: &str = "name=The+Musical+Hop&city=San+Francisco&state=CA\
&address=1015+Folsom+Street&phone=123-123-1234&genres=Jazz&genres=Reggae\
&website_link=https%3A%2F%2Fwww.themusicalhop.com&seeking_talent=y\
&seeking_description=Looking+for+local+artists";

// =============================================================================
// Health and static pages
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = setup_app();

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "reachable");
    assert_eq!(body["module"], "stagebook-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_closed_database() {
    let pool = init_memory_database().await.unwrap();
    let app = build_router(AppState::new(Arc::new(SqliteStore::new(pool.clone()))));

    let response = app.clone().oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    pool.close().await;

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store"], "unreachable");
}

#[tokio::test]
async fn test_home_page() {
    let (app, _) = setup_app();

    let response = app.oneshot(test_request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_text(response.into_body()).await;
    assert!(body.contains("<h1>Stagebook</h1>"));
}

#[tokio::test]
async fn test_unknown_route_renders_404_page() {
    let (app, _) = setup_app();

    let response = app
        .oneshot(test_request("GET", "/no/such/page"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_text(response.into_body()).await;
    assert!(body.contains("404 Not Found"));
}

// =============================================================================
// Venues
// =============================================================================

#[tokio::test]
async fn test_venue_listing_groups_by_area() {
    let (app, store) = setup_app();
    store.create_venue(venue("The Musical Hop", "San Francisco", "CA")).await.unwrap();
    store.create_venue(venue("Park Square Live Music & Coffee", "San Francisco", "CA")).await.unwrap();
    store.create_venue(venue("The Dueling Pianos Bar", "New York", "NY")).await.unwrap();

    let response = app.oneshot(test_request("GET", "/venues")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_text(response.into_body()).await;
    assert_eq!(body.matches("<h3>San Francisco, CA</h3>").count(), 1);
    assert_eq!(body.matches("<h3>New York, NY</h3>").count(), 1);
    assert!(body.contains("Park Square Live Music &amp; Coffee"));
}

#[tokio::test]
async fn test_venue_search_is_case_insensitive() {
    let (app, store) = setup_app();
    for name in ["The Hall", "Vinyl", "Backstage"] {
        store.create_venue(venue(name, "Austin", "TX")).await.unwrap();
    }

    let response = app
        .oneshot(form_request("/venues/search", "search_term=A"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_text(response.into_body()).await;
    assert!(body.contains("Number of search results for \"A\": 2"));
    assert!(body.contains("The Hall"));
    assert!(body.contains("Backstage"));
    assert!(!body.contains("Vinyl"));
}

#[tokio::test]
async fn test_venue_detail_missing_is_404() {
    let (app, _) = setup_app();

    let response = app
        .clone()
        .oneshot(test_request("GET", "/venues/42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(test_request("GET", "/venues/not-a-number"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_venue_success() {
    let (app, store) = setup_app();

    let response = app
        .oneshot(form_request("/venues/create", VENUE_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_text(response.into_body()).await;
    assert!(body.contains("Venue The Musical Hop was successfully listed!"));

    let created = store.venue(1).await.unwrap().expect("venue stored");
    assert_eq!(created.genres, "Jazz,Reggae");
    assert_eq!(created.website.as_deref(), Some("https://www.themusicalhop.com"));
    assert!(created.seeking_talent);
}

#[tokio::test]
async fn test_create_venue_invalid_rerenders_form() {
    let (app, store) = setup_app();

    let response = app
        .oneshot(form_request(
            "/venues/create",
            "name=The+Musical+Hop&state=XX&genres=Polka",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_text(response.into_body()).await;
    assert!(body.contains("This field is required."));
    assert!(body.contains(r#"value="The Musical Hop""#));
    assert!(store.venue_summaries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_venue_with_long_facebook_link_is_rejected() {
    let pool = init_memory_database().await.unwrap();
    let store = Arc::new(SqliteStore::new(pool));
    let app = build_router(AppState::new(store.clone()));

    let body = format!(
        "{}&facebook_link=https%3A%2F%2Fwww.facebook.com%2F{}",
        VENUE_FORM,
        "x".repeat(96)
    );
    let response = app
        .oneshot(form_request("/venues/create", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let page = extract_text(response.into_body()).await;
    assert!(page.contains("Field cannot be longer than 120 characters."));
    assert!(store.venue_summaries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_venue_form_prefilled() {
    let (app, store) = setup_app();
    store.create_venue(venue("The Musical Hop", "San Francisco", "CA")).await.unwrap();

    let response = app
        .oneshot(test_request("GET", "/venues/1/edit"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_text(response.into_body()).await;
    assert!(body.contains(r#"action="/venues/1/edit""#));
    assert!(body.contains(r#"value="1015 Folsom Street""#));
    assert!(body.contains(r#"<option value="Jazz" selected>Jazz</option>"#));
}

#[tokio::test]
async fn test_edit_venue_redirects_to_detail() {
    let (app, store) = setup_app();
    store.create_venue(venue("Old Name", "Oakland", "CA")).await.unwrap();

    let response = app
        .oneshot(form_request("/venues/1/edit", VENUE_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/venues/1");

    let updated = store.venue(1).await.unwrap().unwrap();
    assert_eq!(updated.name, "The Musical Hop");
    assert_eq!(updated.city, "San Francisco");
}

#[tokio::test]
async fn test_edit_missing_venue_is_404() {
    let (app, store) = setup_app();

    let response = app
        .clone()
        .oneshot(test_request("GET", "/venues/9/edit"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(form_request("/venues/9/edit", VENUE_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(store.venue_summaries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_venue_reports_success() {
    let (app, store) = setup_app();
    store.create_venue(venue("The Musical Hop", "San Francisco", "CA")).await.unwrap();

    let response = app
        .clone()
        .oneshot(test_request("DELETE", "/venues/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(extract_json(response.into_body()).await["success"], true);

    let response = app
        .clone()
        .oneshot(test_request("DELETE", "/venues/1"))
        .await
        .unwrap();
    assert_eq!(extract_json(response.into_body()).await["success"], false);

    let response = app
        .oneshot(test_request("GET", "/venues/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Artists
// =============================================================================

#[tokio::test]
async fn test_artist_listing_sorted() {
    let (app, store) = setup_app();
    store.create_artist(artist("The Wild Sax Band")).await.unwrap();
    store.create_artist(artist("Guns N Petals")).await.unwrap();

    let response = app.oneshot(test_request("GET", "/artists")).await.unwrap();
    let body = extract_text(response.into_body()).await;

    let petals = body.find("Guns N Petals").expect("listed");
    let sax = body.find("The Wild Sax Band").expect("listed");
    assert!(petals < sax);
}

#[tokio::test]
async fn test_artist_search_counts_matches() {
    let (app, store) = setup_app();
    for name in ["Apollo", "bar", "ZAG"] {
        store.create_artist(artist(name)).await.unwrap();
    }

    let response = app
        .oneshot(form_request("/artists/search", "search_term=a"))
        .await
        .unwrap();
    let body = extract_text(response.into_body()).await;
    assert!(body.contains("Number of search results for \"a\": 3"));
}

#[tokio::test]
async fn test_artist_detail_partitions_shows() {
    let pool = init_memory_database().await.unwrap();
    let store = Arc::new(SqliteStore::new(pool));
    let app = build_router(AppState::new(store.clone()));

    let v = store.create_venue(venue("The Musical Hop", "San Francisco", "CA")).await.unwrap();
    let a = store.create_artist(artist("Guns N Petals")).await.unwrap();
    for offset in [Duration::days(-30), Duration::days(30), Duration::days(60)] {
        store
            .create_show(NewShow {
                venue_id: v.id,
                artist_id: a.id,
                start_time: time::now() + offset,
            })
            .await
            .unwrap();
    }

    let response = app
        .oneshot(test_request("GET", &format!("/artists/{}", a.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_text(response.into_body()).await;
    assert!(body.contains("2 Upcoming Shows"));
    assert!(body.contains("1 Past Shows"));
    assert!(body.contains("Looking for shows to perform at"));
}

#[tokio::test]
async fn test_update_missing_artist_is_404() {
    let (app, _) = setup_app();

    let response = app
        .oneshot(form_request(
            "/artists/5/edit",
            "name=Nobody&city=Austin&state=TX&phone=512-555-0100\
&image_link=https%3A%2F%2Fexample.com%2Fa.jpg&genres=Folk",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_artist_with_bad_id() {
    let (app, _) = setup_app();

    let response = app
        .oneshot(test_request("DELETE", "/artists/abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(extract_json(response.into_body()).await["success"], false);
}

// =============================================================================
// Shows
// =============================================================================

#[tokio::test]
async fn test_create_show_with_unknown_artist_is_conflict() {
    let (app, store) = setup_app();
    store.create_venue(venue("The Musical Hop", "San Francisco", "CA")).await.unwrap();

    let response = app
        .oneshot(form_request(
            "/shows/create",
            "artist_id=99&venue_id=1&start_time=2035-04-01+20%3A00%3A00",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = extract_text(response.into_body()).await;
    assert!(body.contains("An error occurred. Show could not be listed."));
    assert!(store.shows().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_show_then_list() {
    let (app, store) = setup_app();
    store.create_venue(venue("The Musical Hop", "San Francisco", "CA")).await.unwrap();
    store.create_artist(artist("Guns N Petals")).await.unwrap();

    let response = app
        .clone()
        .oneshot(form_request(
            "/shows/create",
            "artist_id=1&venue_id=1&start_time=2019-05-21T21%3A30",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_text(response.into_body()).await;
    assert!(body.contains("Show was successfully listed!"));

    let response = app.oneshot(test_request("GET", "/shows")).await.unwrap();
    let body = extract_text(response.into_body()).await;
    assert!(body.contains("Tue 05, 21, 2019 9:30PM"));
    assert!(body.contains("Guns N Petals"));
}

#[tokio::test]
async fn test_create_show_invalid_time_rerenders_form() {
    let (app, store) = setup_app();
    store.create_venue(venue("The Musical Hop", "San Francisco", "CA")).await.unwrap();
    store.create_artist(artist("Guns N Petals")).await.unwrap();

    let response = app
        .oneshot(form_request(
            "/shows/create",
            "artist_id=1&venue_id=1&start_time=next+tuesday",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_text(response.into_body()).await;
    assert!(body.contains("Not a valid datetime value."));
    assert!(body.contains(r#"<option value="1" selected>Guns N Petals</option>"#));
}
