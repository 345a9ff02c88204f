//! In-memory store
//!
//! Mirrors [`super::SqliteStore`] semantics (ordering, not-found handling,
//! column CHECKs, referential checks, cascades) without a database. Each
//! mutation takes the write lock once, so it is all-or-nothing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{name_matches, BookingStore};
use crate::db::models::{
    Artist, ArtistFields, ArtistShow, EntitySummary, NewShow, SearchResults, Show, ShowListing,
    Venue, VenueAreaRow, VenueFields, VenueShow,
};
use crate::time::from_unix_seconds;
use crate::{Error, Result};

#[derive(Default)]
struct Tables {
    venues: BTreeMap<i64, Venue>,
    artists: BTreeMap<i64, Artist>,
    shows: BTreeMap<i64, Show>,
    next_venue_id: i64,
    next_artist_id: i64,
    next_show_id: i64,
}

impl Tables {
    fn allocate(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Column widths from the schema's CHECK constraints
const TEXT_COLUMN_LEN: usize = 120;
const LINK_COLUMN_LEN: usize = 500;

fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Constraint("name must not be blank".to_string()));
    }
    Ok(())
}

fn check_width(column: &str, value: Option<&str>, max_len: usize) -> Result<()> {
    match value {
        Some(value) if value.chars().count() > max_len => Err(Error::Constraint(format!(
            "{} is longer than {} characters",
            column, max_len
        ))),
        _ => Ok(()),
    }
}

fn check_venue(fields: &VenueFields) -> Result<()> {
    require_name(&fields.name)?;
    check_width("city", Some(fields.city.as_str()), TEXT_COLUMN_LEN)?;
    check_width("state", Some(fields.state.as_str()), TEXT_COLUMN_LEN)?;
    check_width("address", Some(fields.address.as_str()), TEXT_COLUMN_LEN)?;
    check_width("phone", fields.phone.as_deref(), TEXT_COLUMN_LEN)?;
    check_width("facebook_link", fields.facebook_link.as_deref(), TEXT_COLUMN_LEN)?;
    check_width("image_link", fields.image_link.as_deref(), LINK_COLUMN_LEN)?;
    check_width("website", fields.website.as_deref(), LINK_COLUMN_LEN)
}

fn check_artist(fields: &ArtistFields) -> Result<()> {
    require_name(&fields.name)?;
    check_width("city", Some(fields.city.as_str()), TEXT_COLUMN_LEN)?;
    check_width("state", Some(fields.state.as_str()), TEXT_COLUMN_LEN)?;
    check_width("phone", Some(fields.phone.as_str()), TEXT_COLUMN_LEN)?;
    check_width("genres", Some(fields.genres.to_storage().as_str()), TEXT_COLUMN_LEN)?;
    check_width("facebook_link", fields.facebook_link.as_deref(), TEXT_COLUMN_LEN)?;
    check_width("image_link", Some(fields.image_link.as_str()), LINK_COLUMN_LEN)?;
    check_width("website_link", fields.website_link.as_deref(), LINK_COLUMN_LEN)
}

fn by_name(mut summaries: Vec<EntitySummary>) -> Vec<EntitySummary> {
    summaries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    summaries
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn venue_area_rows(&self, now: DateTime<Utc>) -> Result<Vec<VenueAreaRow>> {
        let tables = self.tables.read().await;

        let mut rows: Vec<VenueAreaRow> = tables
            .venues
            .values()
            .map(|v| VenueAreaRow {
                id: v.id,
                name: v.name.clone(),
                city: v.city.clone(),
                state: v.state.clone(),
                upcoming_show_count: tables
                    .shows
                    .values()
                    .filter(|s| s.venue_id == v.id && s.start_time >= now)
                    .count() as i64,
            })
            .collect();

        rows.sort_by(|a, b| {
            (&a.state, &a.city, &a.name, a.id).cmp(&(&b.state, &b.city, &b.name, b.id))
        });
        Ok(rows)
    }

    async fn search_venues(&self, term: &str) -> Result<SearchResults<Venue>> {
        let tables = self.tables.read().await;
        Ok(SearchResults::new(
            tables
                .venues
                .values()
                .filter(|v| name_matches(&v.name, term))
                .cloned()
                .collect(),
        ))
    }

    async fn search_artists(&self, term: &str) -> Result<SearchResults<Artist>> {
        let tables = self.tables.read().await;
        Ok(SearchResults::new(
            tables
                .artists
                .values()
                .filter(|a| name_matches(&a.name, term))
                .cloned()
                .collect(),
        ))
    }

    async fn venue(&self, id: i64) -> Result<Option<Venue>> {
        Ok(self.tables.read().await.venues.get(&id).cloned())
    }

    async fn artist(&self, id: i64) -> Result<Option<Artist>> {
        Ok(self.tables.read().await.artists.get(&id).cloned())
    }

    async fn venue_shows(&self, venue_id: i64) -> Result<Vec<VenueShow>> {
        let tables = self.tables.read().await;
        let mut shows: Vec<(i64, VenueShow)> = tables
            .shows
            .values()
            .filter(|s| s.venue_id == venue_id)
            .filter_map(|s| {
                tables.artists.get(&s.artist_id).map(|a| {
                    (
                        s.id,
                        VenueShow {
                            artist_id: a.id,
                            artist_name: a.name.clone(),
                            artist_image_link: a.image_link.clone(),
                            start_time: s.start_time,
                        },
                    )
                })
            })
            .collect();

        shows.sort_by_key(|(id, s)| (s.start_time, *id));
        Ok(shows.into_iter().map(|(_, s)| s).collect())
    }

    async fn artist_shows(&self, artist_id: i64) -> Result<Vec<ArtistShow>> {
        let tables = self.tables.read().await;
        let mut shows: Vec<(i64, ArtistShow)> = tables
            .shows
            .values()
            .filter(|s| s.artist_id == artist_id)
            .filter_map(|s| {
                tables.venues.get(&s.venue_id).map(|v| {
                    (
                        s.id,
                        ArtistShow {
                            venue_id: v.id,
                            venue_name: v.name.clone(),
                            venue_image_link: v.image_link.clone(),
                            start_time: s.start_time,
                        },
                    )
                })
            })
            .collect();

        shows.sort_by_key(|(id, s)| (s.start_time, *id));
        Ok(shows.into_iter().map(|(_, s)| s).collect())
    }

    async fn artist_summaries(&self) -> Result<Vec<EntitySummary>> {
        let tables = self.tables.read().await;
        Ok(by_name(
            tables
                .artists
                .values()
                .map(|a| EntitySummary {
                    id: a.id,
                    name: a.name.clone(),
                })
                .collect(),
        ))
    }

    async fn venue_summaries(&self) -> Result<Vec<EntitySummary>> {
        let tables = self.tables.read().await;
        Ok(by_name(
            tables
                .venues
                .values()
                .map(|v| EntitySummary {
                    id: v.id,
                    name: v.name.clone(),
                })
                .collect(),
        ))
    }

    async fn shows(&self) -> Result<Vec<ShowListing>> {
        let tables = self.tables.read().await;
        let mut listings: Vec<(i64, ShowListing)> = tables
            .shows
            .values()
            .filter_map(|s| {
                let venue = tables.venues.get(&s.venue_id)?;
                let artist = tables.artists.get(&s.artist_id)?;
                Some((
                    s.id,
                    ShowListing {
                        venue_id: venue.id,
                        venue_name: venue.name.clone(),
                        artist_id: artist.id,
                        artist_name: artist.name.clone(),
                        artist_image_link: artist.image_link.clone(),
                        start_time: s.start_time,
                    },
                ))
            })
            .collect();

        listings.sort_by_key(|(id, s)| (s.start_time, *id));
        Ok(listings.into_iter().map(|(_, s)| s).collect())
    }

    async fn create_venue(&self, fields: VenueFields) -> Result<Venue> {
        check_venue(&fields)?;
        let mut tables = self.tables.write().await;
        let id = Tables::allocate(&mut tables.next_venue_id);
        let venue = fields.into_venue(id);
        tables.venues.insert(id, venue.clone());
        Ok(venue)
    }

    async fn update_venue(&self, id: i64, fields: VenueFields) -> Result<Venue> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .venues
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("venue {}", id)))?;
        check_venue(&fields)?;
        *slot = fields.into_venue(id);
        Ok(slot.clone())
    }

    async fn delete_venue(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.venues.remove(&id).is_none() {
            return Err(Error::NotFound(format!("venues {}", id)));
        }
        tables.shows.retain(|_, s| s.venue_id != id);
        Ok(())
    }

    async fn create_artist(&self, fields: ArtistFields) -> Result<Artist> {
        check_artist(&fields)?;
        let mut tables = self.tables.write().await;
        let id = Tables::allocate(&mut tables.next_artist_id);
        let artist = fields.into_artist(id);
        tables.artists.insert(id, artist.clone());
        Ok(artist)
    }

    async fn update_artist(&self, id: i64, fields: ArtistFields) -> Result<Artist> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .artists
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("artist {}", id)))?;
        check_artist(&fields)?;
        *slot = fields.into_artist(id);
        Ok(slot.clone())
    }

    async fn delete_artist(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.artists.remove(&id).is_none() {
            return Err(Error::NotFound(format!("artists {}", id)));
        }
        tables.shows.retain(|_, s| s.artist_id != id);
        Ok(())
    }

    async fn create_show(&self, show: NewShow) -> Result<Show> {
        let mut tables = self.tables.write().await;
        if !tables.venues.contains_key(&show.venue_id) {
            return Err(Error::Constraint(format!("venue {} does not exist", show.venue_id)));
        }
        if !tables.artists.contains_key(&show.artist_id) {
            return Err(Error::Constraint(format!("artist {} does not exist", show.artist_id)));
        }

        let id = Tables::allocate(&mut tables.next_show_id);
        let created = Show {
            id,
            venue_id: show.venue_id,
            artist_id: show.artist_id,
            // Same second precision as the SQLite column
            start_time: from_unix_seconds(show.start_time.timestamp()),
        };
        tables.shows.insert(id, created);
        Ok(created)
    }
}
