//! Artist pages

use stagebook_common::db::models::{Artist, ArtistShow, EntitySummary, SearchResults};
use stagebook_common::presentation::ArtistDetail;
use stagebook_common::time::{format_datetime, DateFormat};

use super::{escape, escape_opt, genre_tags, layout};

pub fn listing(artists: &[EntitySummary]) -> String {
    let mut content = String::from("<h1>Artists</h1>\n<ul>\n");
    for artist in artists {
        content.push_str(&format!(
            r#"<li><a href="/artists/{}">{}</a></li>"#,
            artist.id,
            escape(&artist.name)
        ));
        content.push('\n');
    }
    content.push_str("</ul>\n");
    if artists.is_empty() {
        content.push_str("<p>No artists listed yet.</p>\n");
    }

    layout("Artists", None, &content)
}

pub fn search_results(results: &SearchResults<Artist>, search_term: &str) -> String {
    let items: String = results
        .data
        .iter()
        .map(|artist| {
            format!(
                "<li><a href=\"/artists/{}\">{}</a></li>\n",
                artist.id,
                escape(&artist.name)
            )
        })
        .collect();

    let content = format!(
        "<h3>Number of search results for \"{}\": {}</h3>\n<ul>\n{}</ul>\n",
        escape(search_term),
        results.count,
        items
    );
    layout("Artist Search", None, &content)
}

fn show_cards(shows: &[ArtistShow]) -> String {
    shows
        .iter()
        .map(|show| {
            let image = show
                .venue_image_link
                .as_deref()
                .map(|link| {
                    format!(r#"<img src="{}" alt="{}">"#, escape(link), escape(&show.venue_name))
                })
                .unwrap_or_default();
            format!(
                r#"<div class="show-card">
        {image}
        <h5><a href="/venues/{id}">{name}</a></h5>
        <h6>{when}</h6>
    </div>"#,
                image = image,
                name = escape(&show.venue_name),
                id = show.venue_id,
                when = escape(&format_datetime(show.start_time, DateFormat::Full)),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn detail(artist: &ArtistDetail) -> String {
    let seeking = if artist.seeking_venue {
        format!(
            "<p><strong>Seeking performance venues:</strong> {}</p>",
            escape_opt(artist.seeking_description.as_deref())
        )
    } else {
        "<p>Not currently seeking performance venues</p>".to_string()
    };

    let content = format!(
        r#"<h1>{name}</h1>
    <p class="subtitle">ID: {id}</p>
    <div>{genres}</div>
    <p>{city}, {state}</p>
    <p>Phone: {phone}</p>
    <p>Website: {website}</p>
    <p>Facebook: {facebook}</p>
    {seeking}
    <img src="{image}" alt="{name}">
    <p>
        <a href="/artists/{id}/edit">Edit</a>
    </p>
    <h2>{upcoming_count} Upcoming Shows</h2>
    {upcoming}
    <h2>{past_count} Past Shows</h2>
    {past}"#,
        name = escape(&artist.name),
        id = artist.id,
        genres = genre_tags(&artist.genres),
        city = escape(&artist.city),
        state = escape(&artist.state),
        phone = escape(&artist.phone),
        website = escape_opt(artist.website.as_deref()),
        facebook = escape_opt(artist.facebook_link.as_deref()),
        seeking = seeking,
        image = escape(&artist.image_link),
        upcoming_count = artist.upcoming_shows_count,
        upcoming = show_cards(&artist.upcoming_shows),
        past_count = artist.past_shows_count,
        past = show_cards(&artist.past_shows),
    );

    layout(&artist.name, None, &content)
}
