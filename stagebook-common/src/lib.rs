//! # Stagebook Common Library
//!
//! Shared code for the stagebook booking directory:
//! - Database schema and models (venues, artists, shows)
//! - The `BookingStore` repository trait with SQLite and in-memory backends
//! - Genre catalog and parsing
//! - Presentation shaping for listing and detail pages
//! - Configuration loading
//! - Timestamp utilities

pub mod config;
pub mod db;
pub mod error;
pub mod genres;
pub mod presentation;
pub mod store;
pub mod time;

pub use error::{Error, ErrorKind, Result};
pub use genres::{Genre, GenreList};
pub use store::{BookingStore, MemoryStore, SqliteStore};
