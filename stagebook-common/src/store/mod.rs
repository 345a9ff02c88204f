//! Repository and mutation layer
//!
//! [`BookingStore`] is the only way handlers touch persisted data. The
//! production backend is [`SqliteStore`]; [`MemoryStore`] keeps the same
//! semantics in process memory for tests.
//!
//! Mutation contract:
//! - every write is all-or-nothing
//! - update/delete of a missing id fails with `NotFound` and writes nothing
//! - a show referencing a missing venue or artist fails with `Constraint`
//! - deleting a venue or artist deletes its shows

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::models::{
    Artist, ArtistFields, ArtistShow, EntitySummary, NewShow, SearchResults, Show, ShowListing,
    Venue, VenueAreaRow, VenueFields, VenueShow,
};
use crate::presentation::{group_venue_areas, ArtistDetail, VenueArea, VenueDetail};
use crate::Result;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Cheap round trip proving the backing storage answers
    async fn ping(&self) -> Result<()>;

    // Queries

    /// Every venue with its count of shows starting at or after `now`,
    /// sorted by state, city, name
    async fn venue_area_rows(&self, now: DateTime<Utc>) -> Result<Vec<VenueAreaRow>>;

    /// Case-insensitive substring match on venue name
    async fn search_venues(&self, term: &str) -> Result<SearchResults<Venue>>;

    /// Case-insensitive substring match on artist name
    async fn search_artists(&self, term: &str) -> Result<SearchResults<Artist>>;

    async fn venue(&self, id: i64) -> Result<Option<Venue>>;

    async fn artist(&self, id: i64) -> Result<Option<Artist>>;

    /// Shows at a venue, resolved to artist name and image, by start time
    async fn venue_shows(&self, venue_id: i64) -> Result<Vec<VenueShow>>;

    /// Shows by an artist, resolved to venue name and image, by start time
    async fn artist_shows(&self, artist_id: i64) -> Result<Vec<ArtistShow>>;

    /// All artists, id and name, by name
    async fn artist_summaries(&self) -> Result<Vec<EntitySummary>>;

    /// All venues, id and name, by name
    async fn venue_summaries(&self) -> Result<Vec<EntitySummary>>;

    /// All shows with venue and artist resolved, by start time
    async fn shows(&self) -> Result<Vec<ShowListing>>;

    // Mutations

    async fn create_venue(&self, fields: VenueFields) -> Result<Venue>;

    async fn update_venue(&self, id: i64, fields: VenueFields) -> Result<Venue>;

    async fn delete_venue(&self, id: i64) -> Result<()>;

    async fn create_artist(&self, fields: ArtistFields) -> Result<Artist>;

    async fn update_artist(&self, id: i64, fields: ArtistFields) -> Result<Artist>;

    async fn delete_artist(&self, id: i64) -> Result<()>;

    async fn create_show(&self, show: NewShow) -> Result<Show>;

    // Composed reads

    /// Venue listing grouped by city and state
    async fn venue_areas(&self, now: DateTime<Utc>) -> Result<Vec<VenueArea>> {
        Ok(group_venue_areas(self.venue_area_rows(now).await?))
    }

    async fn venue_detail(&self, id: i64, now: DateTime<Utc>) -> Result<Option<VenueDetail>> {
        let Some(venue) = self.venue(id).await? else {
            return Ok(None);
        };
        let shows = self.venue_shows(id).await?;
        Ok(Some(VenueDetail::assemble(venue, shows, now)))
    }

    async fn artist_detail(&self, id: i64, now: DateTime<Utc>) -> Result<Option<ArtistDetail>> {
        let Some(artist) = self.artist(id).await? else {
            return Ok(None);
        };
        let shows = self.artist_shows(id).await?;
        Ok(Some(ArtistDetail::assemble(artist, shows, now)))
    }
}

/// Escape LIKE wildcards so the search term matches literally (escape char `\`)
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Name match used by the in-memory backend, mirroring SQLite's ASCII-only
/// case folding for LIKE
pub(crate) fn name_matches(name: &str, term: &str) -> bool {
    name.to_ascii_lowercase()
        .contains(&term.to_ascii_lowercase())
}
