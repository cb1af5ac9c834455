//! Demo provider implementation for development.

use async_trait::async_trait;

use super::CatalogProvider;
use crate::errors::FetchError;
use crate::types::{MediaType, MovieDetail, MovieSummary, POSTER_UNAVAILABLE, SearchPage};

const DEFAULT_PAGE_SIZE: usize = 10;
const NOT_FOUND: &str = "Movie not found!";

/// One entry of the built-in catalog.
struct DemoTitle {
    id: &'static str,
    title: &'static str,
    year: &'static str,
    media_type: MediaType,
    director: Option<&'static str>,
    genre: &'static str,
}

const fn title(
    id: &'static str,
    title: &'static str,
    year: &'static str,
    media_type: MediaType,
    director: Option<&'static str>,
    genre: &'static str,
) -> DemoTitle {
    DemoTitle {
        id,
        title,
        year,
        media_type,
        director,
        genre,
    }
}

const DEMO_CATALOG: &[DemoTitle] = &[
    title(
        "tt0372784",
        "Batman Begins",
        "2005",
        MediaType::Movie,
        Some("Christopher Nolan"),
        "Action, Crime, Drama",
    ),
    title(
        "tt0468569",
        "The Dark Knight",
        "2008",
        MediaType::Movie,
        Some("Christopher Nolan"),
        "Action, Crime, Drama",
    ),
    title(
        "tt1345836",
        "The Dark Knight Rises",
        "2012",
        MediaType::Movie,
        Some("Christopher Nolan"),
        "Action, Drama, Thriller",
    ),
    title(
        "tt0096895",
        "Batman",
        "1989",
        MediaType::Movie,
        Some("Tim Burton"),
        "Action, Adventure",
    ),
    title(
        "tt0103776",
        "Batman Returns",
        "1992",
        MediaType::Movie,
        Some("Tim Burton"),
        "Action, Crime, Fantasy",
    ),
    title(
        "tt0112462",
        "Batman Forever",
        "1995",
        MediaType::Movie,
        Some("Joel Schumacher"),
        "Action, Adventure, Fantasy",
    ),
    title(
        "tt0118688",
        "Batman & Robin",
        "1997",
        MediaType::Movie,
        Some("Joel Schumacher"),
        "Action, Sci-Fi",
    ),
    title(
        "tt2975590",
        "Batman v Superman: Dawn of Justice",
        "2016",
        MediaType::Movie,
        Some("Zack Snyder"),
        "Action, Adventure, Sci-Fi",
    ),
    title(
        "tt1877830",
        "The Batman",
        "2022",
        MediaType::Movie,
        Some("Matt Reeves"),
        "Action, Crime, Drama",
    ),
    title(
        "tt4116284",
        "The Lego Batman Movie",
        "2017",
        MediaType::Movie,
        Some("Chris McKay"),
        "Animation, Action, Comedy",
    ),
    title(
        "tt0103359",
        "Batman: The Animated Series",
        "1992-1995",
        MediaType::Series,
        None,
        "Animation, Action, Adventure",
    ),
    title(
        "tt0059968",
        "Batman",
        "1966-1968",
        MediaType::Series,
        None,
        "Action, Adventure, Comedy",
    ),
    title(
        "tt1569923",
        "Batman: Under the Red Hood",
        "2010",
        MediaType::Movie,
        Some("Brandon Vietti"),
        "Animation, Action, Crime",
    ),
    title(
        "tt0147746",
        "Batman Beyond",
        "1999-2001",
        MediaType::Series,
        None,
        "Animation, Action, Crime",
    ),
    title(
        "tt0106364",
        "Batman: Mask of the Phantasm",
        "1993",
        MediaType::Movie,
        Some("Eric Radomski, Bruce Timm"),
        "Animation, Action, Crime",
    ),
    title(
        "tt2313197",
        "Batman: The Dark Knight Returns, Part 1",
        "2012",
        MediaType::Movie,
        Some("Jay Oliva"),
        "Animation, Action, Crime",
    ),
    title(
        "tt1117563",
        "Batman: Arkham Asylum",
        "2009",
        MediaType::Game,
        Some("Sefton Hill"),
        "Action, Adventure, Crime",
    ),
    title(
        "tt0133093",
        "The Matrix",
        "1999",
        MediaType::Movie,
        Some("Lana Wachowski, Lilly Wachowski"),
        "Action, Sci-Fi",
    ),
    title(
        "tt0234215",
        "The Matrix Reloaded",
        "2003",
        MediaType::Movie,
        Some("Lana Wachowski, Lilly Wachowski"),
        "Action, Sci-Fi",
    ),
    title(
        "tt0242653",
        "The Matrix Revolutions",
        "2003",
        MediaType::Movie,
        Some("Lana Wachowski, Lilly Wachowski"),
        "Action, Sci-Fi",
    ),
    title(
        "tt10838180",
        "The Matrix Resurrections",
        "2021",
        MediaType::Movie,
        Some("Lana Wachowski"),
        "Action, Sci-Fi",
    ),
    title(
        "tt1375666",
        "Inception",
        "2010",
        MediaType::Movie,
        Some("Christopher Nolan"),
        "Action, Adventure, Sci-Fi",
    ),
    title(
        "tt0816692",
        "Interstellar",
        "2014",
        MediaType::Movie,
        Some("Christopher Nolan"),
        "Adventure, Drama, Sci-Fi",
    ),
    title(
        "tt0111161",
        "The Shawshank Redemption",
        "1994",
        MediaType::Movie,
        Some("Frank Darabont"),
        "Drama",
    ),
    title(
        "tt0068646",
        "The Godfather",
        "1972",
        MediaType::Movie,
        Some("Francis Ford Coppola"),
        "Crime, Drama",
    ),
    title(
        "tt0903747",
        "Breaking Bad",
        "2008-2013",
        MediaType::Series,
        None,
        "Crime, Drama, Thriller",
    ),
];

/// Demo provider for development without external API calls.
///
/// Serves a fixed catalog with the same paging and failure conventions as
/// OMDb: ten titles per page unless configured otherwise, and
/// "Movie not found!" reported as an error when nothing matches.
#[derive(Debug)]
pub struct DemoProvider {
    page_size: usize,
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoProvider {
    /// Creates the demo provider with OMDb's page size.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Creates the demo provider serving `page_size` titles per page.
    ///
    /// A zero page size is treated as one.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    fn matching(query: &str) -> Vec<&'static DemoTitle> {
        let needle = query.trim().to_lowercase();
        DEMO_CATALOG
            .iter()
            .filter(|entry| entry.title.to_lowercase().contains(&needle))
            .collect()
    }
}

#[async_trait]
impl CatalogProvider for DemoProvider {
    async fn search_catalog(&self, query: &str, page: u32) -> Result<SearchPage, FetchError> {
        let matches = Self::matching(query);
        let start = (page.max(1) as usize - 1).saturating_mul(self.page_size);

        if matches.is_empty() || start >= matches.len() {
            return Err(FetchError::ProviderError {
                reason: NOT_FOUND.to_string(),
            });
        }

        let movies = matches
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|entry| MovieSummary {
                id: entry.id.to_string(),
                poster_url: POSTER_UNAVAILABLE.to_string(),
                title: entry.title.to_string(),
                year: entry.year.to_string(),
                media_type: entry.media_type,
            })
            .collect();

        Ok(SearchPage {
            movies,
            total_results: matches.len() as u64,
        })
    }

    async fn fetch_details(&self, id: &str) -> Result<MovieDetail, FetchError> {
        let entry = DEMO_CATALOG
            .iter()
            .find(|entry| entry.id == id.trim())
            .ok_or_else(|| FetchError::ProviderError {
                reason: "Incorrect IMDb ID.".to_string(),
            })?;

        Ok(MovieDetail {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            year: entry.year.to_string(),
            media_type: entry.media_type,
            rated: None,
            released: None,
            runtime: None,
            genre: Some(entry.genre.to_string()),
            director: entry.director.map(str::to_string),
            writer: None,
            actors: Vec::new(),
            plot: Some(format!("Demo description for {}", entry.title)),
            language: Some("English".to_string()),
            country: None,
            awards: None,
            poster_url: None,
            imdb_rating: None,
            imdb_votes: None,
            box_office: None,
        })
    }
}
