//! View-model shaping for listing and detail pages
//!
//! Everything here is pure: the caller supplies `now` so that the
//! past/upcoming split is decided once per request.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::models::{Artist, ArtistShow, Scheduled, Venue, VenueAreaRow, VenueShow};
use crate::genres::parse_genres;

/// Venues sharing one city and state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<AreaVenue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaVenue {
    pub id: i64,
    pub name: String,
    pub upcoming_show_count: i64,
}

/// Group rows already sorted so that equal (city, state) pairs are adjacent
pub fn group_venue_areas(rows: Vec<VenueAreaRow>) -> Vec<VenueArea> {
    let mut areas: Vec<VenueArea> = Vec::new();

    for row in rows {
        let venue = AreaVenue {
            id: row.id,
            name: row.name,
            upcoming_show_count: row.upcoming_show_count,
        };

        match areas.last_mut() {
            Some(area) if area.city == row.city && area.state == row.state => {
                area.venues.push(venue);
            }
            _ => areas.push(VenueArea {
                city: row.city,
                state: row.state,
                venues: vec![venue],
            }),
        }
    }

    areas
}

/// Split shows into (past, upcoming): past is `start_time < now`
pub fn partition_shows<T: Scheduled>(shows: Vec<T>, now: DateTime<Utc>) -> (Vec<T>, Vec<T>) {
    shows.into_iter().partition(|s| s.start_time() < now)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenueDetail {
    pub fn assemble(venue: Venue, shows: Vec<VenueShow>, now: DateTime<Utc>) -> Self {
        let (past_shows, upcoming_shows) = partition_shows(shows, now);
        Self {
            id: venue.id,
            genres: parse_genres(&venue.genres),
            name: venue.name,
            address: venue.address,
            city: venue.city,
            state: venue.state,
            phone: venue.phone,
            website: venue.website,
            facebook_link: venue.facebook_link,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
            image_link: venue.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: String,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistDetail {
    pub fn assemble(artist: Artist, shows: Vec<ArtistShow>, now: DateTime<Utc>) -> Self {
        let (past_shows, upcoming_shows) = partition_shows(shows, now);
        Self {
            id: artist.id,
            genres: parse_genres(&artist.genres),
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            website: artist.website_link,
            facebook_link: artist.facebook_link,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
            image_link: artist.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn row(id: i64, city: &str, state: &str) -> VenueAreaRow {
        VenueAreaRow {
            id,
            name: format!("Venue {}", id),
            city: city.to_string(),
            state: state.to_string(),
            upcoming_show_count: id,
        }
    }

    fn venue_show(start_time: DateTime<Utc>) -> VenueShow {
        VenueShow {
            artist_id: 1,
            artist_name: "Guns N Petals".to_string(),
            artist_image_link: "https://example.com/a.jpg".to_string(),
            start_time,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_group_empty_input() {
        assert!(group_venue_areas(Vec::new()).is_empty());
    }

    #[test]
    fn test_group_single_venue() {
        let areas = group_venue_areas(vec![row(1, "San Francisco", "CA")]);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].venues.len(), 1);
    }

    #[test]
    fn test_group_adjacent_pairs() {
        let areas = group_venue_areas(vec![
            row(1, "San Francisco", "CA"),
            row(2, "San Francisco", "CA"),
            row(3, "New York", "NY"),
        ]);

        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].city, "San Francisco");
        assert_eq!(
            areas[0].venues.iter().map(|v| v.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(areas[1].state, "NY");
        assert_eq!(areas[1].venues[0].upcoming_show_count, 3);
    }

    #[test]
    fn test_group_same_city_different_state_is_split() {
        let areas = group_venue_areas(vec![
            row(1, "Portland", "ME"),
            row(2, "Portland", "OR"),
        ]);
        assert_eq!(areas.len(), 2);
    }

    #[test]
    fn test_partition_boundary_is_upcoming() {
        let shows = vec![
            venue_show(now() - Duration::days(1)),
            venue_show(now()),
            venue_show(now() + Duration::days(1)),
        ];

        let (past, upcoming) = partition_shows(shows, now());
        assert_eq!(past.len(), 1);
        assert_eq!(upcoming.len(), 2);
        assert!(past.iter().all(|s| s.start_time < now()));
        assert!(upcoming.iter().all(|s| s.start_time >= now()));
    }

    #[test]
    fn test_venue_detail_counts_and_genres() {
        let venue = Venue {
            id: 1,
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: Some("123-123-1234".to_string()),
            genres: "{Jazz,Reggae,Swing}".to_string(),
            facebook_link: None,
            image_link: None,
            website: None,
            seeking_talent: true,
            seeking_description: Some("Looking for local artists".to_string()),
        };
        let shows = vec![
            venue_show(now() - Duration::hours(3)),
            venue_show(now() + Duration::hours(3)),
            venue_show(now() + Duration::days(30)),
        ];

        let detail = VenueDetail::assemble(venue, shows, now());
        assert_eq!(detail.genres, vec!["Jazz", "Reggae", "Swing"]);
        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 2);
        assert_eq!(detail.past_shows.len(), detail.past_shows_count);
    }
}
