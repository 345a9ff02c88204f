//! SQLite-backed store
//!
//! Each mutation runs in its own transaction. Returning early with `?` drops
//! the transaction, which rolls it back and releases the connection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use super::{like_pattern, BookingStore};
use crate::db::models::{
    Artist, ArtistFields, ArtistShow, EntitySummary, NewShow, SearchResults, Show, ShowListing,
    Venue, VenueAreaRow, VenueFields, VenueShow,
};
use crate::time::from_unix_seconds;
use crate::{Error, Result};

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, genres, facebook_link, \
                             image_link, website, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, genres, facebook_link, image_link, \
                              website_link, seeking_venue, seeking_description";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn venue_area_rows(&self, now: DateTime<Utc>) -> Result<Vec<VenueAreaRow>> {
        let rows = sqlx::query(
            r#"
            SELECT v.id, v.name, v.city, v.state, COUNT(s.id) AS upcoming_show_count
            FROM venues v
            LEFT JOIN shows s ON s.venue_id = v.id AND s.start_time >= ?
            GROUP BY v.id
            ORDER BY v.state ASC, v.city ASC, v.name ASC, v.id ASC
            "#,
        )
        .bind(now.timestamp())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| VenueAreaRow {
                id: row.get("id"),
                name: row.get("name"),
                city: row.get("city"),
                state: row.get("state"),
                upcoming_show_count: row.get("upcoming_show_count"),
            })
            .collect())
    }

    async fn search_venues(&self, term: &str) -> Result<SearchResults<Venue>> {
        let sql = format!(
            "SELECT {} FROM venues WHERE name LIKE ? ESCAPE '\\' ORDER BY id",
            VENUE_COLUMNS
        );
        let venues = sqlx::query_as::<_, Venue>(&sql)
            .bind(like_pattern(term))
            .fetch_all(&self.pool)
            .await?;

        debug!("Venue search {:?}: {} hits", term, venues.len());
        Ok(SearchResults::new(venues))
    }

    async fn search_artists(&self, term: &str) -> Result<SearchResults<Artist>> {
        let sql = format!(
            "SELECT {} FROM artists WHERE name LIKE ? ESCAPE '\\' ORDER BY id",
            ARTIST_COLUMNS
        );
        let artists = sqlx::query_as::<_, Artist>(&sql)
            .bind(like_pattern(term))
            .fetch_all(&self.pool)
            .await?;

        debug!("Artist search {:?}: {} hits", term, artists.len());
        Ok(SearchResults::new(artists))
    }

    async fn venue(&self, id: i64) -> Result<Option<Venue>> {
        let sql = format!("SELECT {} FROM venues WHERE id = ?", VENUE_COLUMNS);
        Ok(sqlx::query_as::<_, Venue>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn artist(&self, id: i64) -> Result<Option<Artist>> {
        let sql = format!("SELECT {} FROM artists WHERE id = ?", ARTIST_COLUMNS);
        Ok(sqlx::query_as::<_, Artist>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn venue_shows(&self, venue_id: i64) -> Result<Vec<VenueShow>> {
        let rows = sqlx::query(
            r#"
            SELECT s.artist_id, a.name AS artist_name, a.image_link AS artist_image_link,
                   s.start_time
            FROM shows s
            JOIN artists a ON a.id = s.artist_id
            WHERE s.venue_id = ?
            ORDER BY s.start_time ASC, s.id ASC
            "#,
        )
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| VenueShow {
                artist_id: row.get("artist_id"),
                artist_name: row.get("artist_name"),
                artist_image_link: row.get("artist_image_link"),
                start_time: start_time(row),
            })
            .collect())
    }

    async fn artist_shows(&self, artist_id: i64) -> Result<Vec<ArtistShow>> {
        let rows = sqlx::query(
            r#"
            SELECT s.venue_id, v.name AS venue_name, v.image_link AS venue_image_link,
                   s.start_time
            FROM shows s
            JOIN venues v ON v.id = s.venue_id
            WHERE s.artist_id = ?
            ORDER BY s.start_time ASC, s.id ASC
            "#,
        )
        .bind(artist_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| ArtistShow {
                venue_id: row.get("venue_id"),
                venue_name: row.get("venue_name"),
                venue_image_link: row.get("venue_image_link"),
                start_time: start_time(row),
            })
            .collect())
    }

    async fn artist_summaries(&self) -> Result<Vec<EntitySummary>> {
        Ok(sqlx::query_as::<_, EntitySummary>(
            "SELECT id, name FROM artists ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn venue_summaries(&self) -> Result<Vec<EntitySummary>> {
        Ok(sqlx::query_as::<_, EntitySummary>(
            "SELECT id, name FROM venues ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn shows(&self) -> Result<Vec<ShowListing>> {
        let rows = sqlx::query(
            r#"
            SELECT s.venue_id, v.name AS venue_name,
                   s.artist_id, a.name AS artist_name, a.image_link AS artist_image_link,
                   s.start_time
            FROM shows s
            JOIN venues v ON v.id = s.venue_id
            JOIN artists a ON a.id = s.artist_id
            ORDER BY s.start_time ASC, s.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| ShowListing {
                venue_id: row.get("venue_id"),
                venue_name: row.get("venue_name"),
                artist_id: row.get("artist_id"),
                artist_name: row.get("artist_name"),
                artist_image_link: row.get("artist_image_link"),
                start_time: start_time(row),
            })
            .collect())
    }

    async fn create_venue(&self, fields: VenueFields) -> Result<Venue> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO venues (
                name, city, state, address, phone, genres, facebook_link,
                image_link, website, seeking_talent, seeking_description
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.address)
        .bind(&fields.phone)
        .bind(fields.genres.to_storage())
        .bind(&fields.facebook_link)
        .bind(&fields.image_link)
        .bind(&fields.website)
        .bind(fields.seeking_talent)
        .bind(&fields.seeking_description)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        info!("Created venue {} ({})", id, fields.name);
        Ok(fields.into_venue(id))
    }

    async fn update_venue(&self, id: i64, fields: VenueFields) -> Result<Venue> {
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            r#"
            UPDATE venues SET
                name = ?, city = ?, state = ?, address = ?, phone = ?, genres = ?,
                facebook_link = ?, image_link = ?, website = ?,
                seeking_talent = ?, seeking_description = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.address)
        .bind(&fields.phone)
        .bind(fields.genres.to_storage())
        .bind(&fields.facebook_link)
        .bind(&fields.image_link)
        .bind(&fields.website)
        .bind(fields.seeking_talent)
        .bind(&fields.seeking_description)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(Error::NotFound(format!("venue {}", id)));
        }

        tx.commit().await?;

        info!("Updated venue {} ({})", id, fields.name);
        Ok(fields.into_venue(id))
    }

    async fn delete_venue(&self, id: i64) -> Result<()> {
        delete_by_id(&self.pool, "venues", id).await
    }

    async fn create_artist(&self, fields: ArtistFields) -> Result<Artist> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO artists (
                name, city, state, phone, genres, facebook_link, image_link,
                website_link, seeking_venue, seeking_description
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.phone)
        .bind(fields.genres.to_storage())
        .bind(&fields.facebook_link)
        .bind(&fields.image_link)
        .bind(&fields.website_link)
        .bind(fields.seeking_venue)
        .bind(&fields.seeking_description)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        info!("Created artist {} ({})", id, fields.name);
        Ok(fields.into_artist(id))
    }

    async fn update_artist(&self, id: i64, fields: ArtistFields) -> Result<Artist> {
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            r#"
            UPDATE artists SET
                name = ?, city = ?, state = ?, phone = ?, genres = ?,
                facebook_link = ?, image_link = ?, website_link = ?,
                seeking_venue = ?, seeking_description = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.phone)
        .bind(fields.genres.to_storage())
        .bind(&fields.facebook_link)
        .bind(&fields.image_link)
        .bind(&fields.website_link)
        .bind(fields.seeking_venue)
        .bind(&fields.seeking_description)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(Error::NotFound(format!("artist {}", id)));
        }

        tx.commit().await?;

        info!("Updated artist {} ({})", id, fields.name);
        Ok(fields.into_artist(id))
    }

    async fn delete_artist(&self, id: i64) -> Result<()> {
        delete_by_id(&self.pool, "artists", id).await
    }

    async fn create_show(&self, show: NewShow) -> Result<Show> {
        let mut tx = self.pool.begin().await?;

        if !exists(&mut tx, "venues", show.venue_id).await? {
            return Err(Error::Constraint(format!("venue {} does not exist", show.venue_id)));
        }
        if !exists(&mut tx, "artists", show.artist_id).await? {
            return Err(Error::Constraint(format!("artist {} does not exist", show.artist_id)));
        }

        let id = sqlx::query("INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?, ?, ?)")
            .bind(show.venue_id)
            .bind(show.artist_id)
            .bind(show.start_time.timestamp())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        tx.commit().await?;

        info!(
            "Created show {} (artist {} at venue {})",
            id, show.artist_id, show.venue_id
        );
        Ok(Show {
            id,
            venue_id: show.venue_id,
            artist_id: show.artist_id,
            start_time: from_unix_seconds(show.start_time.timestamp()),
        })
    }
}

fn start_time(row: &SqliteRow) -> DateTime<Utc> {
    from_unix_seconds(row.get::<i64, _>("start_time"))
}

/// `table` is always one of our own table names, never user input
async fn exists(tx: &mut Transaction<'_, Sqlite>, table: &str, id: i64) -> Result<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", table);
    Ok(sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(&mut **tx)
        .await?)
}

async fn delete_by_id(pool: &SqlitePool, table: &str, id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let sql = format!("DELETE FROM {} WHERE id = ?", table);
    let affected = sqlx::query(&sql)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(Error::NotFound(format!("{} {}", table, id)));
    }

    tx.commit().await?;

    info!("Deleted {} {}", table, id);
    Ok(())
}
