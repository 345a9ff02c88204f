//! Venue pages

use stagebook_common::db::models::{SearchResults, Venue, VenueShow};
use stagebook_common::presentation::{VenueArea, VenueDetail};
use stagebook_common::time::{format_datetime, DateFormat};

use super::{escape, escape_opt, genre_tags, layout};

pub fn listing(areas: &[VenueArea]) -> String {
    let mut content = String::from("<h1>Venues</h1>\n");
    if areas.is_empty() {
        content.push_str("<p>No venues listed yet.</p>\n");
    }

    for area in areas {
        content.push_str(&format!(
            "<h3>{}, {}</h3>\n<ul>\n",
            escape(&area.city),
            escape(&area.state)
        ));
        for venue in &area.venues {
            content.push_str(&format!(
                r#"<li><a href="/venues/{}">{}</a> <small>{} upcoming shows</small></li>"#,
                venue.id,
                escape(&venue.name),
                venue.upcoming_show_count
            ));
            content.push('\n');
        }
        content.push_str("</ul>\n");
    }

    layout("Venues", None, &content)
}

pub fn search_results(results: &SearchResults<Venue>, search_term: &str) -> String {
    let mut content = format!(
        "<h3>Number of search results for \"{}\": {}</h3>\n<ul>\n",
        escape(search_term),
        results.count
    );
    for venue in &results.data {
        content.push_str(&format!(
            r#"<li><a href="/venues/{}">{}</a></li>"#,
            venue.id,
            escape(&venue.name)
        ));
        content.push('\n');
    }
    content.push_str("</ul>\n");

    layout("Venue Search", None, &content)
}

fn show_cards(shows: &[VenueShow]) -> String {
    shows
        .iter()
        .map(|show| {
            format!(
                r#"<div class="show-card">
        <img src="{image}" alt="{name}">
        <h5><a href="/artists/{id}">{name}</a></h5>
        <h6>{when}</h6>
    </div>"#,
                image = escape(&show.artist_image_link),
                name = escape(&show.artist_name),
                id = show.artist_id,
                when = escape(&format_datetime(show.start_time, DateFormat::Full)),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn detail(venue: &VenueDetail) -> String {
    let seeking = if venue.seeking_talent {
        format!(
            "<p><strong>Seeking talent:</strong> {}</p>",
            escape_opt(venue.seeking_description.as_deref())
        )
    } else {
        "<p>Not currently seeking talent</p>".to_string()
    };
    let image = venue
        .image_link
        .as_deref()
        .map(|link| format!(r#"<img src="{}" alt="{}">"#, escape(link), escape(&venue.name)))
        .unwrap_or_default();

    let content = format!(
        r#"<h1>{name}</h1>
    <p class="subtitle">ID: {id}</p>
    <div>{genres}</div>
    <p>{address}<br>{city}, {state}</p>
    <p>Phone: {phone}</p>
    <p>Website: {website}</p>
    <p>Facebook: {facebook}</p>
    {seeking}
    {image}
    <p>
        <a href="/venues/{id}/edit">Edit</a>
        <button type="button" data-delete="/venues/{id}">Delete</button>
    </p>
    <h2>{upcoming_count} Upcoming Shows</h2>
    {upcoming}
    <h2>{past_count} Past Shows</h2>
    {past}
    <script>
        document.querySelectorAll('[data-delete]').forEach(function (button) {{
            button.addEventListener('click', function () {{
                fetch(button.dataset.delete, {{ method: 'DELETE' }})
                    .then(function (r) {{ return r.json(); }})
                    .then(function (body) {{ if (body.success) {{ window.location = '/'; }} }});
            }});
        }});
    </script>"#,
        name = escape(&venue.name),
        id = venue.id,
        genres = genre_tags(&venue.genres),
        address = escape(&venue.address),
        city = escape(&venue.city),
        state = escape(&venue.state),
        phone = escape_opt(venue.phone.as_deref()),
        website = escape_opt(venue.website.as_deref()),
        facebook = escape_opt(venue.facebook_link.as_deref()),
        seeking = seeking,
        image = image,
        upcoming_count = venue.upcoming_shows_count,
        upcoming = show_cards(&venue.upcoming_shows),
        past_count = venue.past_shows_count,
        past = show_cards(&venue.past_shows),
    );

    layout(&venue.name, None, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagebook_common::presentation::AreaVenue;

    #[test]
    fn test_listing_groups_and_escapes() {
        let areas = vec![VenueArea {
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            venues: vec![AreaVenue {
                id: 1,
                name: "Park Square Live Music & Coffee".to_string(),
                upcoming_show_count: 2,
            }],
        }];

        let page = listing(&areas);
        assert!(page.contains("<h3>San Francisco, CA</h3>"));
        assert!(page.contains("Park Square Live Music &amp; Coffee"));
        assert!(page.contains("2 upcoming shows"));
    }

    #[test]
    fn test_search_results_header() {
        let page = search_results(&SearchResults::new(Vec::new()), "<hop>");
        assert!(page.contains("Number of search results for \"&lt;hop&gt;\": 0"));
    }
}
