//! Database models
//!
//! Plain records returned by the store, plus the field sets accepted by the
//! mutation operations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::genres::GenreList;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    /// Raw stored genres column; see [`crate::genres::parse_genres`]
    pub genres: String,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    /// Raw stored genres column; see [`crate::genres::parse_genres`]
    pub genres: String,
    pub facebook_link: Option<String>,
    pub image_link: String,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// Field set for creating or replacing a venue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: GenreList,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueFields {
    /// Materialize the record these fields would produce under `id`
    pub fn into_venue(self, id: i64) -> Venue {
        Venue {
            id,
            name: self.name,
            city: self.city,
            state: self.state,
            address: self.address,
            phone: self.phone,
            genres: self.genres.to_storage(),
            facebook_link: self.facebook_link,
            image_link: self.image_link,
            website: self.website,
            seeking_talent: self.seeking_talent,
            seeking_description: self.seeking_description,
        }
    }
}

/// Field set for creating or replacing an artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: GenreList,
    pub facebook_link: Option<String>,
    pub image_link: String,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistFields {
    pub fn into_artist(self, id: i64) -> Artist {
        Artist {
            id,
            name: self.name,
            city: self.city,
            state: self.state,
            phone: self.phone,
            genres: self.genres.to_storage(),
            facebook_link: self.facebook_link,
            image_link: self.image_link,
            website_link: self.website_link,
            seeking_venue: self.seeking_venue,
            seeking_description: self.seeking_description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Show {
    pub id: i64,
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewShow {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

/// Identity and name, used for listings and form choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct EntitySummary {
    pub id: i64,
    pub name: String,
}

/// One venue row of the grouped listing, before grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueAreaRow {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub upcoming_show_count: i64,
}

/// A show on a venue page, resolved to its artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: DateTime<Utc>,
}

/// A show on an artist page, resolved to its venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// A row of the all-shows listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: DateTime<Utc>,
}

/// Search hits and their count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> SearchResults<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Anything with a start time, for past/upcoming partitioning
pub trait Scheduled {
    fn start_time(&self) -> DateTime<Utc>;
}

impl Scheduled for VenueShow {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Scheduled for ArtistShow {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Scheduled for ShowListing {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}
