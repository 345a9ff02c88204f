//! Genre catalog and genre-string handling
//!
//! Writes go through [`GenreList`], which only holds catalog genres and always
//! serializes to the canonical `Jazz,Rock` form. Reads use [`parse_genres`],
//! which tolerates legacy rows stored as `{Jazz,Rock}` or `["Jazz","Rock"]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Separator used in the stored genres column
pub const GENRE_SEPARATOR: char = ',';

/// Characters stripped from legacy genre strings before splitting
const WRAPPING_CHARS: [char; 5] = ['{', '}', '[', ']', '"'];

/// Genres a venue or artist may be tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Alternative,
    Blues,
    Classical,
    Country,
    Electronic,
    Folk,
    Funk,
    HipHop,
    HeavyMetal,
    Instrumental,
    Jazz,
    MusicalTheatre,
    Pop,
    Punk,
    RnB,
    Reggae,
    RockNRoll,
    Soul,
    Other,
}

impl Genre {
    pub const ALL: [Genre; 19] = [
        Genre::Alternative,
        Genre::Blues,
        Genre::Classical,
        Genre::Country,
        Genre::Electronic,
        Genre::Folk,
        Genre::Funk,
        Genre::HipHop,
        Genre::HeavyMetal,
        Genre::Instrumental,
        Genre::Jazz,
        Genre::MusicalTheatre,
        Genre::Pop,
        Genre::Punk,
        Genre::RnB,
        Genre::Reggae,
        Genre::RockNRoll,
        Genre::Soul,
        Genre::Other,
    ];

    /// Display and storage name
    pub fn name(self) -> &'static str {
        match self {
            Genre::Alternative => "Alternative",
            Genre::Blues => "Blues",
            Genre::Classical => "Classical",
            Genre::Country => "Country",
            Genre::Electronic => "Electronic",
            Genre::Folk => "Folk",
            Genre::Funk => "Funk",
            Genre::HipHop => "Hip-Hop",
            Genre::HeavyMetal => "Heavy Metal",
            Genre::Instrumental => "Instrumental",
            Genre::Jazz => "Jazz",
            Genre::MusicalTheatre => "Musical Theatre",
            Genre::Pop => "Pop",
            Genre::Punk => "Punk",
            Genre::RnB => "R&B",
            Genre::Reggae => "Reggae",
            Genre::RockNRoll => "Rock n Roll",
            Genre::Soul => "Soul",
            Genre::Other => "Other",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Genre {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::Validation(format!("Unknown genre: {}", wanted)))
    }
}

/// Non-empty, duplicate-free list of catalog genres in submission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreList(Vec<Genre>);

impl GenreList {
    pub fn new(genres: impl IntoIterator<Item = Genre>) -> Result<Self> {
        let mut list = Vec::new();
        for genre in genres {
            if !list.contains(&genre) {
                list.push(genre);
            }
        }
        if list.is_empty() {
            return Err(Error::Validation("At least one genre is required".to_string()));
        }
        Ok(Self(list))
    }

    /// Build from submitted genre names, rejecting anything outside the catalog
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let genres = names
            .iter()
            .map(|n| n.as_ref().parse::<Genre>())
            .collect::<Result<Vec<_>>>()?;
        Self::new(genres)
    }

    pub fn genres(&self) -> &[Genre] {
        &self.0
    }

    /// Canonical stored representation, e.g. `Jazz,Rock n Roll`
    pub fn to_storage(&self) -> String {
        self.0
            .iter()
            .map(|g| g.name())
            .collect::<Vec<_>>()
            .join(&GENRE_SEPARATOR.to_string())
    }
}

/// Parse a stored genres column into display names
///
/// Strips wrapping bracket and quote characters, splits on commas, trims and
/// drops empty entries. Unknown names are kept as-is.
pub fn parse_genres(raw: &str) -> Vec<String> {
    let stripped: String = raw.chars().filter(|c| !WRAPPING_CHARS.contains(c)).collect();
    stripped
        .split(GENRE_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
