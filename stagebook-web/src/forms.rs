//! Form parsing and validation
//!
//! Submissions arrive as ordered `(name, value)` pairs so that repeatable
//! fields (`genres`) keep every value. Each form keeps the raw strings for
//! re-rendering and produces the store's field set only when every rule
//! passes.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use stagebook_common::db::models::{Artist, ArtistFields, NewShow, Venue, VenueFields};
use stagebook_common::genres::{parse_genres, GenreList};

/// Two-letter codes accepted in the `state` field
pub const STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Format used to prefill and display the show start time input
pub const START_TIME_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const START_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

const TRUTHY: [&str; 4] = ["y", "on", "true", "1"];

/// Column limits of the text and link columns
const MAX_TEXT_LEN: usize = 120;
const MAX_LINK_LEN: usize = 500;
const MAX_FACEBOOK_LEN: usize = 120;

const REQUIRED: &str = "This field is required.";

/// Per-field validation messages, in the order they were found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    /// First message recorded for `field`
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

fn first(pairs: &[(String, String)], key: &str) -> String {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string())
        .unwrap_or_default()
}

fn all(pairs: &[(String, String)], key: &str) -> Vec<String> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn checked(pairs: &[(String, String)], key: &str) -> bool {
    pairs.iter().any(|(k, v)| {
        k == key && TRUTHY.iter().any(|t| v.trim().eq_ignore_ascii_case(t))
    })
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn require_text(errors: &mut FieldErrors, field: &'static str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else if value.chars().count() > MAX_TEXT_LEN {
        errors.add(
            field,
            format!("Field cannot be longer than {} characters.", MAX_TEXT_LEN),
        );
    }
    value.to_string()
}

fn check_state(errors: &mut FieldErrors, value: &str) -> String {
    let state = value.trim().to_ascii_uppercase();
    if state.is_empty() {
        errors.add("state", REQUIRED);
    } else if !STATES.contains(&state.as_str()) {
        errors.add("state", "Not a valid choice.");
    }
    state
}

/// Normalize a US phone number to `NNN-NNN-NNNN`
///
/// Accepts ten digits separated by any mix of `-`, `.` or spaces.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if !raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '.' | ' '))
    {
        return None;
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 10 {
        return None;
    }
    Some(format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]))
}

fn check_phone(errors: &mut FieldErrors, value: &str, required: bool) -> Option<String> {
    if value.trim().is_empty() {
        if required {
            errors.add("phone", REQUIRED);
        }
        return None;
    }
    let phone = normalize_phone(value);
    if phone.is_none() {
        errors.add("phone", "Phone number must look like 123-456-7890.");
    }
    phone
}

fn check_link(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    required: bool,
    max_len: usize,
) -> Option<String> {
    let Some(link) = optional(value) else {
        if required {
            errors.add(field, REQUIRED);
        }
        return None;
    };

    let lower = link.to_ascii_lowercase();
    let has_scheme = lower.starts_with("http://") || lower.starts_with("https://");
    if !has_scheme || link.chars().any(char::is_whitespace) {
        errors.add(field, "Invalid URL.");
        return None;
    }
    if link.chars().count() > max_len {
        errors.add(
            field,
            format!("Field cannot be longer than {} characters.", max_len),
        );
        return None;
    }
    Some(link)
}

fn check_genres(errors: &mut FieldErrors, names: &[String]) -> Option<GenreList> {
    if names.is_empty() {
        errors.add("genres", REQUIRED);
        return None;
    }
    match GenreList::from_names(names) {
        Ok(list) => Some(list),
        Err(_) => {
            errors.add("genres", "Not a valid choice.");
            None
        }
    }
}

fn check_description(errors: &mut FieldErrors, seeking: bool, value: &str) -> Option<String> {
    if !seeking {
        return None;
    }
    let description = optional(value)?;
    if description.chars().count() > MAX_LINK_LEN {
        errors.add(
            "seeking_description",
            format!("Field cannot be longer than {} characters.", MAX_LINK_LEN),
        );
    }
    Some(description)
}

/// Raw venue form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

impl VenueForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            name: first(pairs, "name"),
            city: first(pairs, "city"),
            state: first(pairs, "state"),
            address: first(pairs, "address"),
            phone: first(pairs, "phone"),
            image_link: first(pairs, "image_link"),
            genres: all(pairs, "genres"),
            facebook_link: first(pairs, "facebook_link"),
            website_link: first(pairs, "website_link"),
            seeking_talent: checked(pairs, "seeking_talent"),
            seeking_description: first(pairs, "seeking_description"),
        }
    }

    /// Prefill from a stored venue
    pub fn from_venue(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone().unwrap_or_default(),
            image_link: venue.image_link.clone().unwrap_or_default(),
            genres: parse_genres(&venue.genres),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            website_link: venue.website.clone().unwrap_or_default(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<VenueFields, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = require_text(&mut errors, "name", &self.name);
        let city = require_text(&mut errors, "city", &self.city);
        let state = check_state(&mut errors, &self.state);
        let address = require_text(&mut errors, "address", &self.address);
        let phone = check_phone(&mut errors, &self.phone, false);
        let image_link =
            check_link(&mut errors, "image_link", &self.image_link, false, MAX_LINK_LEN);
        let genres = check_genres(&mut errors, &self.genres);
        let facebook_link = check_link(
            &mut errors,
            "facebook_link",
            &self.facebook_link,
            false,
            MAX_FACEBOOK_LEN,
        );
        let website = check_link(
            &mut errors,
            "website_link",
            &self.website_link,
            false,
            MAX_LINK_LEN,
        );
        let seeking_description =
            check_description(&mut errors, self.seeking_talent, &self.seeking_description);

        match genres {
            Some(genres) if errors.is_empty() => Ok(VenueFields {
                name,
                city,
                state,
                address,
                phone,
                genres,
                facebook_link,
                image_link,
                website,
                seeking_talent: self.seeking_talent,
                seeking_description,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw artist form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            name: first(pairs, "name"),
            city: first(pairs, "city"),
            state: first(pairs, "state"),
            phone: first(pairs, "phone"),
            image_link: first(pairs, "image_link"),
            genres: all(pairs, "genres"),
            facebook_link: first(pairs, "facebook_link"),
            website_link: first(pairs, "website_link"),
            seeking_venue: checked(pairs, "seeking_venue"),
            seeking_description: first(pairs, "seeking_description"),
        }
    }

    /// Prefill from a stored artist
    pub fn from_artist(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            image_link: artist.image_link.clone(),
            genres: parse_genres(&artist.genres),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            website_link: artist.website_link.clone().unwrap_or_default(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ArtistFields, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = require_text(&mut errors, "name", &self.name);
        let city = require_text(&mut errors, "city", &self.city);
        let state = check_state(&mut errors, &self.state);
        let phone = check_phone(&mut errors, &self.phone, true);
        let image_link =
            check_link(&mut errors, "image_link", &self.image_link, true, MAX_LINK_LEN);
        let genres = check_genres(&mut errors, &self.genres);
        let facebook_link = check_link(
            &mut errors,
            "facebook_link",
            &self.facebook_link,
            false,
            MAX_FACEBOOK_LEN,
        );
        let website_link = check_link(
            &mut errors,
            "website_link",
            &self.website_link,
            false,
            MAX_LINK_LEN,
        );
        let seeking_description =
            check_description(&mut errors, self.seeking_venue, &self.seeking_description);

        // The artist genres column is a bounded string
        if let Some(list) = &genres {
            if list.to_storage().len() > MAX_TEXT_LEN {
                errors.add("genres", "Too many genres selected.");
            }
        }

        match (genres, phone, image_link) {
            (Some(genres), Some(phone), Some(image_link)) if errors.is_empty() => {
                Ok(ArtistFields {
                    name,
                    city,
                    state,
                    phone,
                    genres,
                    facebook_link,
                    image_link,
                    website_link,
                    seeking_venue: self.seeking_venue,
                    seeking_description,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Raw show form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl ShowForm {
    /// Empty form with the start time prefilled to `now`
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            start_time: now.format(START_TIME_INPUT_FORMAT).to_string(),
            ..Default::default()
        }
    }

    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            artist_id: first(pairs, "artist_id"),
            venue_id: first(pairs, "venue_id"),
            start_time: first(pairs, "start_time"),
        }
    }

    pub fn validate(&self) -> Result<NewShow, FieldErrors> {
        let mut errors = FieldErrors::default();

        let artist_id = check_id(&mut errors, "artist_id", &self.artist_id);
        let venue_id = check_id(&mut errors, "venue_id", &self.venue_id);
        let start_time = if self.start_time.trim().is_empty() {
            errors.add("start_time", REQUIRED);
            None
        } else {
            let parsed = parse_start_time(&self.start_time);
            if parsed.is_none() {
                errors.add("start_time", "Not a valid datetime value.");
            }
            parsed
        };

        match (artist_id, venue_id, start_time) {
            (Some(artist_id), Some(venue_id), Some(start_time)) => Ok(NewShow {
                venue_id,
                artist_id,
                start_time,
            }),
            _ => Err(errors),
        }
    }
}

fn check_id(errors: &mut FieldErrors, field: &'static str, value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    let id = value.parse::<i64>().ok().filter(|id| *id > 0);
    if id.is_none() {
        errors.add(field, "Not a valid id.");
    }
    id
}

/// Parse a submitted start time as UTC
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM[:SS]` and RFC 3339.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn venue_pairs() -> Vec<(String, String)> {
        pairs(&[
            ("name", " The Musical Hop "),
            ("city", "San Francisco"),
            ("state", "ca"),
            ("address", "1015 Folsom Street"),
            ("phone", "123.123.1234"),
            ("genres", "Jazz"),
            ("genres", "Reggae"),
            ("website_link", "https://www.themusicalhop.com"),
            ("seeking_talent", "y"),
            ("seeking_description", "Looking for local artists"),
        ])
    }

    #[test]
    fn test_valid_venue_form() {
        let fields = VenueForm::from_pairs(&venue_pairs()).validate().unwrap();
        assert_eq!(fields.name, "The Musical Hop");
        assert_eq!(fields.state, "CA");
        assert_eq!(fields.phone.as_deref(), Some("123-123-1234"));
        assert_eq!(fields.genres.to_storage(), "Jazz,Reggae");
        assert_eq!(fields.website.as_deref(), Some("https://www.themusicalhop.com"));
        assert!(fields.seeking_talent);
        assert_eq!(
            fields.seeking_description.as_deref(),
            Some("Looking for local artists")
        );
        assert_eq!(fields.image_link, None);
    }

    #[test]
    fn test_venue_form_collects_every_error() {
        let form = VenueForm::from_pairs(&pairs(&[
            ("state", "ZZ"),
            ("phone", "12345"),
            ("facebook_link", "facebook.com/hop"),
        ]));
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.get("name"), Some(REQUIRED));
        assert_eq!(errors.get("city"), Some(REQUIRED));
        assert_eq!(errors.get("address"), Some(REQUIRED));
        assert_eq!(errors.get("state"), Some("Not a valid choice."));
        assert!(errors.get("phone").is_some());
        assert_eq!(errors.get("genres"), Some(REQUIRED));
        assert_eq!(errors.get("facebook_link"), Some("Invalid URL."));
        assert_eq!(errors.get("website_link"), None);
    }

    #[test]
    fn test_facebook_link_limited_to_column_width() {
        let long_link = format!("https://www.facebook.com/{}", "x".repeat(96));
        assert_eq!(long_link.chars().count(), 121);

        let mut submitted = venue_pairs();
        submitted.push(("facebook_link".to_string(), long_link.clone()));
        let errors = VenueForm::from_pairs(&submitted).validate().unwrap_err();
        assert_eq!(
            errors.get("facebook_link"),
            Some("Field cannot be longer than 120 characters.")
        );
        assert_eq!(errors.len(), 1);

        // Website links keep the wider limit
        let mut submitted = venue_pairs();
        submitted.retain(|(k, _)| k != "website_link");
        submitted.push(("website_link".to_string(), long_link));
        assert!(VenueForm::from_pairs(&submitted).validate().is_ok());
    }

    #[test]
    fn test_unknown_genre_rejected() {
        let mut submitted = venue_pairs();
        submitted.push(("genres".to_string(), "Polka".to_string()));
        let errors = VenueForm::from_pairs(&submitted).validate().unwrap_err();
        assert_eq!(errors.get("genres"), Some("Not a valid choice."));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_description_dropped_when_not_seeking() {
        let mut submitted = venue_pairs();
        submitted.retain(|(k, _)| k != "seeking_talent");
        let fields = VenueForm::from_pairs(&submitted).validate().unwrap();
        assert!(!fields.seeking_talent);
        assert_eq!(fields.seeking_description, None);
    }

    #[test]
    fn test_checkbox_values() {
        for value in ["y", "on", "TRUE", "1"] {
            assert!(checked(&pairs(&[("seeking_venue", value)]), "seeking_venue"));
        }
        for value in ["", "n", "off", "0"] {
            assert!(!checked(&pairs(&[("seeking_venue", value)]), "seeking_venue"));
        }
    }

    #[test]
    fn test_artist_requires_phone_and_image() {
        let form = ArtistForm::from_pairs(&pairs(&[
            ("name", "Guns N Petals"),
            ("city", "San Francisco"),
            ("state", "CA"),
            ("genres", "Rock n Roll"),
        ]));
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("phone"), Some(REQUIRED));
        assert_eq!(errors.get("image_link"), Some(REQUIRED));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_valid_artist_form() {
        let form = ArtistForm::from_pairs(&pairs(&[
            ("name", "Guns N Petals"),
            ("city", "San Francisco"),
            ("state", "CA"),
            ("phone", "326 123 5000"),
            ("image_link", "https://images.example.com/petals.jpg"),
            ("genres", "Rock n Roll"),
            ("seeking_venue", "on"),
        ]));
        let fields = form.validate().unwrap();
        assert_eq!(fields.phone, "326-123-5000");
        assert!(fields.seeking_venue);
        assert_eq!(fields.seeking_description, None);
    }

    #[test]
    fn test_prefill_round_trips_through_validation() {
        let fields = VenueForm::from_pairs(&venue_pairs()).validate().unwrap();
        let venue = fields.clone().into_venue(4);
        let again = VenueForm::from_venue(&venue).validate().unwrap();
        assert_eq!(again, fields);
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("123-456-7890").as_deref(), Some("123-456-7890"));
        assert_eq!(normalize_phone("1234567890").as_deref(), Some("123-456-7890"));
        assert_eq!(normalize_phone("123-456-789"), None);
        assert_eq!(normalize_phone("(123) 456-7890"), None);
    }

    #[test]
    fn test_parse_start_time_formats() {
        let expected = Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap();
        assert_eq!(parse_start_time("2035-04-01 20:00:00"), Some(expected));
        assert_eq!(parse_start_time("2035-04-01T20:00"), Some(expected));
        assert_eq!(parse_start_time("2035-04-01T20:00:00"), Some(expected));
        assert_eq!(parse_start_time("2035-04-01T22:00:00+02:00"), Some(expected));
        assert_eq!(parse_start_time("April 1st"), None);
    }

    #[test]
    fn test_show_form_validation() {
        let form = ShowForm::from_pairs(&pairs(&[
            ("artist_id", "4"),
            ("venue_id", "1"),
            ("start_time", "2019-05-21 21:30:00"),
        ]));
        let show = form.validate().unwrap();
        assert_eq!(show.artist_id, 4);
        assert_eq!(show.venue_id, 1);

        let errors = ShowForm::from_pairs(&pairs(&[("artist_id", "-3"), ("venue_id", "x")]))
            .validate()
            .unwrap_err();
        assert_eq!(errors.get("artist_id"), Some("Not a valid id."));
        assert_eq!(errors.get("venue_id"), Some("Not a valid id."));
        assert_eq!(errors.get("start_time"), Some(REQUIRED));
    }

    #[test]
    fn test_show_form_prefill() {
        let now = Utc.with_ymd_and_hms(2030, 6, 1, 20, 0, 0).unwrap();
        assert_eq!(ShowForm::starting_at(now).start_time, "2030-06-01 20:00:00");
    }
}
