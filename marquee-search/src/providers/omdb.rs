//! OMDb catalog provider for production use.

use async_trait::async_trait;
use marquee_core::CatalogConfig;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::CatalogProvider;
use crate::errors::FetchError;
use crate::types::{MediaType, MovieDetail, MovieSummary, SearchPage};

const NOT_AVAILABLE: &str = "N/A";

/// OMDb search provider.
///
/// Talks to the OMDb HTTP API. Request timeouts come from the transport
/// configuration; nothing here retries.
#[derive(Debug)]
pub struct OmdbProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

/// Response from the OMDb `s=` search endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Single title inside a search response.
#[derive(Debug, Deserialize)]
pub(crate) struct OmdbSearchItem {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type")]
    media_type: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

/// Response from the OMDb `i=` lookup endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct OmdbDetailResponse {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Rated")]
    rated: Option<String>,
    #[serde(rename = "Released")]
    released: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Writer")]
    writer: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Language")]
    language: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Awards")]
    awards: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    imdb_votes: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Type")]
    media_type: Option<String>,
    #[serde(rename = "BoxOffice")]
    box_office: Option<String>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbProvider {
    /// Create an OMDb provider from catalog configuration.
    ///
    /// # Errors
    /// - `FetchError::InvalidRequest` - Base URL does not parse or the HTTP client cannot be built
    pub fn from_config(config: &CatalogConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| FetchError::InvalidRequest {
            reason: format!("invalid catalog URL '{}': {e}", config.base_url),
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| FetchError::InvalidRequest {
                reason: format!("HTTP client setup failed: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Build a request URL with the access key and the given parameters.
    fn endpoint(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(ref api_key) = self.api_key {
                pairs.append_pair("apikey", api_key);
            }
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        tracing::debug!("GET {}", redact_key(&url));

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // OMDb reports key and lookup failures as JSON even on non-2xx statuses
        serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                FetchError::ParseError {
                    reason: format!("JSON parsing failed: {e}"),
                }
            } else {
                FetchError::NetworkError {
                    reason: format!("HTTP {status}"),
                }
            }
        })
    }
}

#[async_trait]
impl CatalogProvider for OmdbProvider {
    async fn search_catalog(&self, query: &str, page: u32) -> Result<SearchPage, FetchError> {
        let page = page.max(1).to_string();
        let url = self.endpoint(&[("s", query), ("page", &page)]);

        let response: OmdbSearchResponse = self.get_json(url).await?;
        parse_search_response(response)
    }

    async fn fetch_details(&self, id: &str) -> Result<MovieDetail, FetchError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(FetchError::InvalidRequest {
                reason: "catalog id is empty".to_string(),
            });
        }

        let url = self.endpoint(&[("i", id), ("plot", "full")]);

        let response: OmdbDetailResponse = self.get_json(url).await?;
        parse_detail_response(response)
    }
}

/// Hide the access key when logging request URLs.
fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == "apikey" {
                (k.into_owned(), "***".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

fn is_success(response: &str) -> bool {
    response.eq_ignore_ascii_case("true")
}

fn available(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}

/// Convert a search response into a page, surfacing catalog failures.
pub(crate) fn parse_search_response(
    response: OmdbSearchResponse,
) -> Result<SearchPage, FetchError> {
    if !is_success(&response.response) {
        return Err(FetchError::ProviderError {
            reason: response
                .error
                .unwrap_or_else(|| "Unknown error".to_string()),
        });
    }

    let total_results = match response.total_results {
        Some(total) => total
            .trim()
            .parse::<u64>()
            .map_err(|e| FetchError::ParseError {
                reason: format!("invalid totalResults '{total}': {e}"),
            })?,
        None => 0,
    };

    let movies = response
        .search
        .into_iter()
        .map(|item| MovieSummary {
            id: item.imdb_id,
            poster_url: item.poster.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            title: item.title,
            year: item.year,
            media_type: item
                .media_type
                .as_deref()
                .map(MediaType::from_catalog_tag)
                .unwrap_or(MediaType::Other),
        })
        .collect();

    Ok(SearchPage {
        movies,
        total_results,
    })
}

/// Convert a lookup response into a detail record.
pub(crate) fn parse_detail_response(
    response: OmdbDetailResponse,
) -> Result<MovieDetail, FetchError> {
    if !is_success(&response.response) {
        return Err(FetchError::ProviderError {
            reason: response
                .error
                .unwrap_or_else(|| "Unknown error".to_string()),
        });
    }

    let id = available(response.imdb_id).ok_or_else(|| FetchError::ParseError {
        reason: "detail response has no imdbID".to_string(),
    })?;

    let released = available(response.released)
        .and_then(|date| chrono::NaiveDate::parse_from_str(&date, "%d %b %Y").ok());

    let imdb_rating = available(response.imdb_rating).and_then(|r| r.parse().ok());

    let actors = available(response.actors)
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(MovieDetail {
        id,
        title: response.title.unwrap_or_else(|| "Unknown".to_string()),
        year: available(response.year).unwrap_or_default(),
        media_type: response
            .media_type
            .as_deref()
            .map(MediaType::from_catalog_tag)
            .unwrap_or(MediaType::Other),
        rated: available(response.rated),
        released,
        runtime: available(response.runtime),
        genre: available(response.genre),
        director: available(response.director),
        writer: available(response.writer),
        actors,
        plot: available(response.plot),
        language: available(response.language),
        country: available(response.country),
        awards: available(response.awards),
        poster_url: available(response.poster),
        imdb_rating,
        imdb_votes: available(response.imdb_votes),
        box_office: available(response.box_office),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_with_key(key: Option<&str>) -> OmdbProvider {
        let config = CatalogConfig {
            api_key: key.map(str::to_string),
            ..CatalogConfig::default()
        };
        OmdbProvider::from_config(&config).unwrap()
    }

    #[test]
    fn test_endpoint_includes_key_and_params() {
        let provider = provider_with_key(Some("k3y"));
        let url = provider.endpoint(&[("s", "star wars"), ("page", "2")]);

        assert_eq!(url.host_str(), Some("www.omdbapi.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("apikey".to_string(), "k3y".to_string()),
                ("s".to_string(), "star wars".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
        assert!(!redact_key(&url).contains("k3y"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = CatalogConfig {
            base_url: "::nope".to_string(),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            OmdbProvider::from_config(&config),
            Err(FetchError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_parse_search_success() {
        let response: OmdbSearchResponse = serde_json::from_str(
            r#"{
                "Search": [
                    {"Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784", "Type": "movie", "Poster": "https://m.media-amazon.com/bb.jpg"},
                    {"Title": "Batman: The Animated Series", "Year": "1992-1995", "imdbID": "tt0103359", "Type": "series", "Poster": "N/A"}
                ],
                "totalResults": "587",
                "Response": "True"
            }"#,
        )
        .unwrap();

        let page = parse_search_response(response).unwrap();
        assert_eq!(page.total_results, 587);
        assert_eq!(page.movies.len(), 2);
        assert_eq!(page.movies[0].id, "tt0372784");
        assert_eq!(page.movies[1].media_type, MediaType::Series);
        assert_eq!(page.movies[1].poster_url, "N/A");
        assert!(!page.movies[1].has_poster());
    }

    #[test]
    fn test_parse_search_failure_keeps_backend_message() {
        let response: OmdbSearchResponse =
            serde_json::from_str(r#"{"Response": "False", "Error": "Movie not found!"}"#).unwrap();

        let error = parse_search_response(response).unwrap_err();
        assert_eq!(
            error,
            FetchError::ProviderError {
                reason: "Movie not found!".to_string()
            }
        );
    }

    #[test]
    fn test_parse_search_rejects_garbled_total() {
        let response: OmdbSearchResponse =
            serde_json::from_str(r#"{"Search": [], "totalResults": "lots", "Response": "True"}"#)
                .unwrap();

        assert!(matches!(
            parse_search_response(response),
            Err(FetchError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_detail() {
        let response: OmdbDetailResponse = serde_json::from_str(
            r#"{
                "Title": "Batman Begins", "Year": "2005", "Rated": "PG-13",
                "Released": "15 Jun 2005", "Runtime": "140 min",
                "Genre": "Action, Crime, Drama", "Director": "Christopher Nolan",
                "Writer": "Bob Kane, David S. Goyer, Christopher Nolan",
                "Actors": "Christian Bale, Michael Caine, Ken Watanabe",
                "Plot": "After witnessing his parents' death, Bruce learns the art of fighting.",
                "Language": "English", "Country": "United States, United Kingdom",
                "Awards": "N/A", "Poster": "https://m.media-amazon.com/bb.jpg",
                "imdbRating": "8.2", "imdbVotes": "1,571,345", "imdbID": "tt0372784",
                "Type": "movie", "BoxOffice": "$206,863,479", "Response": "True"
            }"#,
        )
        .unwrap();

        let detail = parse_detail_response(response).unwrap();
        assert_eq!(detail.id, "tt0372784");
        assert_eq!(detail.released, chrono::NaiveDate::from_ymd_opt(2005, 6, 15));
        assert_eq!(detail.actors.len(), 3);
        assert_eq!(detail.actors[0], "Christian Bale");
        assert_eq!(detail.imdb_rating, Some(8.2));
        assert!(detail.awards.is_none());
        assert_eq!(detail.media_type, MediaType::Movie);
    }

    #[test]
    fn test_parse_detail_unknown_id() {
        let response: OmdbDetailResponse =
            serde_json::from_str(r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#)
                .unwrap();

        assert_eq!(
            parse_detail_response(response).unwrap_err().user_message(),
            "Incorrect IMDb ID."
        );
    }

    #[tokio::test]
    async fn test_blank_id_is_rejected_without_request() {
        let provider = provider_with_key(None);
        let result = provider.fetch_details("   ").await;
        assert!(matches!(result, Err(FetchError::InvalidRequest { .. })));
    }
}
