//! Show listing

use stagebook_common::db::models::ShowListing;
use stagebook_common::time::{format_datetime, DateFormat};

use super::{escape, layout};

pub fn listing(shows: &[ShowListing]) -> String {
    let cards: String = shows
        .iter()
        .map(|show| {
            format!(
                r#"<div class="show-card">
        <img src="{image}" alt="{artist}">
        <h4>{when}</h4>
        <h5><a href="/artists/{artist_id}">{artist}</a></h5>
        <p>playing at</p>
        <h5><a href="/venues/{venue_id}">{venue}</a></h5>
    </div>
"#,
                image = escape(&show.artist_image_link),
                artist = escape(&show.artist_name),
                artist_id = show.artist_id,
                venue = escape(&show.venue_name),
                venue_id = show.venue_id,
                when = escape(&format_datetime(show.start_time, DateFormat::Medium)),
            )
        })
        .collect();

    let content = if shows.is_empty() {
        "<h1>Shows</h1>\n<p>No shows scheduled yet.</p>\n".to_string()
    } else {
        format!("<h1>Shows</h1>\n{}", cards)
    };
    layout("Shows", None, &content)
}
