//! Create and edit forms
//!
//! Forms re-render with the submitted values and the per-field messages from
//! [`FieldErrors`] when validation fails.

use stagebook_common::db::models::EntitySummary;
use stagebook_common::genres::Genre;

use super::{escape, layout};
use crate::forms::{ArtistForm, FieldErrors, ShowForm, VenueForm, STATES};

/// Whether a form creates a new record or edits record `id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Create,
    Edit(i64),
}

impl FormAction {
    fn url(self, collection: &str) -> String {
        match self {
            FormAction::Create => format!("/{}/create", collection),
            FormAction::Edit(id) => format!("/{}/{}/edit", collection, id),
        }
    }
}

fn field_error(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|m| format!(r#"<span class="field-error">{}</span>"#, escape(m)))
        .unwrap_or_default()
}

fn text_input(label: &str, name: &str, value: &str, errors: &FieldErrors) -> String {
    format!(
        r#"<p><label for="{name}">{label}</label><br>
        <input type="text" id="{name}" name="{name}" value="{value}"> {error}</p>"#,
        name = name,
        label = escape(label),
        value = escape(value),
        error = field_error(errors, name),
    )
}

fn state_select(selected: &str, errors: &FieldErrors) -> String {
    let options: String = STATES
        .iter()
        .map(|code| {
            let marker = if code.eq_ignore_ascii_case(selected) { " selected" } else { "" };
            format!(r#"<option value="{code}"{marker}>{code}</option>"#)
        })
        .collect();
    format!(
        r#"<p><label for="state">State</label><br>
        <select id="state" name="state"><option value=""></option>{}</select> {}</p>"#,
        options,
        field_error(errors, "state")
    )
}

fn genre_select(selected: &[String], errors: &FieldErrors) -> String {
    let options: String = Genre::ALL
        .iter()
        .map(|genre| {
            let name = genre.name();
            let marker = if selected.iter().any(|s| s.eq_ignore_ascii_case(name)) {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{value}"{marker}>{value}</option>"#,
                value = escape(name)
            )
        })
        .collect();
    format!(
        r#"<p><label for="genres">Genres</label><br>
        <select id="genres" name="genres" multiple>{}</select> {}</p>"#,
        options,
        field_error(errors, "genres")
    )
}

fn seeking_inputs(flag: &str, label: &str, checked: bool, description: &str, errors: &FieldErrors) -> String {
    format!(
        r#"<p><label><input type="checkbox" name="{flag}" value="y"{checked}> {label}</label></p>
        <p><label for="seeking_description">Seeking description</label><br>
        <textarea id="seeking_description" name="seeking_description">{description}</textarea> {error}</p>"#,
        flag = flag,
        label = escape(label),
        checked = if checked { " checked" } else { "" },
        description = escape(description),
        error = field_error(errors, "seeking_description"),
    )
}

fn entity_select(label: &str, name: &str, choices: &[EntitySummary], selected: &str, errors: &FieldErrors) -> String {
    let options: String = choices
        .iter()
        .map(|choice| {
            let id = choice.id.to_string();
            let marker = if id == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                id,
                marker,
                escape(&choice.name)
            )
        })
        .collect();
    format!(
        r#"<p><label for="{name}">{label}</label><br>
        <select id="{name}" name="{name}"><option value=""></option>{options}</select> {error}</p>"#,
        name = name,
        label = escape(label),
        options = options,
        error = field_error(errors, name),
    )
}

pub fn venue_form(form: &VenueForm, errors: &FieldErrors, action: FormAction) -> String {
    let title = match action {
        FormAction::Create => "List a new venue".to_string(),
        FormAction::Edit(_) => format!("Edit venue {}", form.name),
    };

    let content = format!(
        r#"<h1>{title}</h1>
    <form method="post" action="{action}">
        {name}
        {city}
        {state}
        {address}
        {phone}
        {image_link}
        {genres}
        {facebook_link}
        {website_link}
        {seeking}
        <button type="submit">Save venue</button>
    </form>"#,
        title = escape(&title),
        action = action.url("venues"),
        name = text_input("Name", "name", &form.name, errors),
        city = text_input("City", "city", &form.city, errors),
        state = state_select(&form.state, errors),
        address = text_input("Address", "address", &form.address, errors),
        phone = text_input("Phone", "phone", &form.phone, errors),
        image_link = text_input("Image link", "image_link", &form.image_link, errors),
        genres = genre_select(&form.genres, errors),
        facebook_link = text_input("Facebook link", "facebook_link", &form.facebook_link, errors),
        website_link = text_input("Website", "website_link", &form.website_link, errors),
        seeking = seeking_inputs(
            "seeking_talent",
            "Seeking talent",
            form.seeking_talent,
            &form.seeking_description,
            errors
        ),
    );

    layout(&title, None, &content)
}

pub fn artist_form(form: &ArtistForm, errors: &FieldErrors, action: FormAction) -> String {
    let title = match action {
        FormAction::Create => "List a new artist".to_string(),
        FormAction::Edit(_) => format!("Edit artist {}", form.name),
    };

    let content = format!(
        r#"<h1>{title}</h1>
    <form method="post" action="{action}">
        {name}
        {city}
        {state}
        {phone}
        {image_link}
        {genres}
        {facebook_link}
        {website_link}
        {seeking}
        <button type="submit">Save artist</button>
    </form>"#,
        title = escape(&title),
        action = action.url("artists"),
        name = text_input("Name", "name", &form.name, errors),
        city = text_input("City", "city", &form.city, errors),
        state = state_select(&form.state, errors),
        phone = text_input("Phone", "phone", &form.phone, errors),
        image_link = text_input("Image link", "image_link", &form.image_link, errors),
        genres = genre_select(&form.genres, errors),
        facebook_link = text_input("Facebook link", "facebook_link", &form.facebook_link, errors),
        website_link = text_input("Website", "website_link", &form.website_link, errors),
        seeking = seeking_inputs(
            "seeking_venue",
            "Seeking performance venues",
            form.seeking_venue,
            &form.seeking_description,
            errors
        ),
    );

    layout(&title, None, &content)
}

pub fn show_form(
    form: &ShowForm,
    errors: &FieldErrors,
    artists: &[EntitySummary],
    venues: &[EntitySummary],
) -> String {
    let content = format!(
        r#"<h1>Post a show</h1>
    <form method="post" action="/shows/create">
        {artist}
        {venue}
        {start_time}
        <button type="submit">Create show</button>
    </form>"#,
        artist = entity_select("Artist", "artist_id", artists, &form.artist_id, errors),
        venue = entity_select("Venue", "venue_id", venues, &form.venue_id, errors),
        start_time = text_input("Start time (YYYY-MM-DD HH:MM:SS, UTC)", "start_time", &form.start_time, errors),
    );

    layout("Post a show", None, &content)
}
