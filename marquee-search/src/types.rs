//! Data types for catalog search.

use serde::{Deserialize, Serialize};

/// Poster value the catalog uses when no artwork exists.
pub const POSTER_UNAVAILABLE: &str = "N/A";

/// One title as listed in search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Catalog identifier, unique per entry (an IMDb id for OMDb)
    pub id: String,
    /// Poster URL, or [`POSTER_UNAVAILABLE`]
    pub poster_url: String,
    /// Display title
    pub title: String,
    /// Release year as reported, may be a range like "2008-2013"
    pub year: String,
    /// Entry kind as classified by the catalog
    pub media_type: MediaType,
}

impl MovieSummary {
    /// Whether the catalog supplied real poster artwork.
    pub fn has_poster(&self) -> bool {
        !self.poster_url.is_empty() && self.poster_url != POSTER_UNAVAILABLE
    }
}

/// A single page of search results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchPage {
    /// Titles on this page in catalog order
    pub movies: Vec<MovieSummary>,
    /// Total matches the catalog claims across all pages
    pub total_results: u64,
}

/// Full record for the details view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    /// Catalog identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Release year or year range
    pub year: String,
    /// Entry kind as classified by the catalog
    pub media_type: MediaType,
    /// Content rating, e.g. "PG-13"
    pub rated: Option<String>,
    /// Release date
    pub released: Option<chrono::NaiveDate>,
    /// Runtime as reported, e.g. "140 min"
    pub runtime: Option<String>,
    /// Genres (comma separated)
    pub genre: Option<String>,
    /// Director name(s)
    pub director: Option<String>,
    /// Writer credits
    pub writer: Option<String>,
    /// Main cast members
    pub actors: Vec<String>,
    /// Plot summary
    pub plot: Option<String>,
    /// Spoken languages
    pub language: Option<String>,
    /// Production countries
    pub country: Option<String>,
    /// Awards summary
    pub awards: Option<String>,
    /// Poster URL when artwork exists
    pub poster_url: Option<String>,
    /// IMDb rating (0.0-10.0)
    pub imdb_rating: Option<f32>,
    /// IMDb vote count as formatted by the catalog
    pub imdb_votes: Option<String>,
    /// Domestic box office gross
    pub box_office: Option<String>,
}

/// Media type classification for catalog entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaType {
    /// Feature film
    Movie,
    /// TV series
    Series,
    /// Single episode of a series
    Episode,
    /// Video game
    Game,
    /// Anything the catalog tags differently
    Other,
}

impl MediaType {
    /// Maps the catalog's lowercase type tag.
    pub fn from_catalog_tag(tag: &str) -> Self {
        match tag {
            "movie" => MediaType::Movie,
            "series" => MediaType::Series,
            "episode" => MediaType::Episode,
            "game" => MediaType::Game,
            _ => MediaType::Other,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Series => write!(f, "series"),
            MediaType::Episode => write!(f, "episode"),
            MediaType::Game => write!(f, "game"),
            MediaType::Other => write!(f, "other"),
        }
    }
}
