//! Spotify Web API catalog client
//!
//! Two calls are used:
//! - `GET /search?type=album,artist` for the combined search
//! - `GET /artists/{id}/albums?include_groups=album` for a discography
//!
//! Wire items are lenient: `null` entries and items without an id are
//! dropped while converting to [`Album`].

use async_trait::async_trait;
use serde::Deserialize;
use shelf_common::Album;
use thiserror::Error;

pub const SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_MARKET: &str = "US";
pub const DEFAULT_LIMIT: u32 = 50;

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Token rejected (expired or revoked)
    #[error("Catalog rejected bearer token")]
    Unauthorized,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Artist hit from the combined search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistSummary {
    pub id: String,
    pub name: String,
}

/// Result of the combined album+artist search, in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub albums: Vec<Album>,
    pub artists: Vec<ArtistSummary>,
}

/// Catalog operations used by the search flow
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Combined album+artist search
    async fn search(&self, token: &str, query: &str) -> Result<SearchPage, CatalogError>;

    /// Albums (not singles/compilations) of one artist
    async fn artist_albums(&self, token: &str, artist_id: &str) -> Result<Vec<Album>, CatalogError>;
}

// ----------------------------------------------------------------------------
// Wire format
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<Option<T>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    albums: Option<Paging<WireAlbum>>,
    artists: Option<Paging<WireArtist>>,
}

#[derive(Debug, Deserialize)]
struct WireArtist {
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireImage {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireAlbum {
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    artists: Vec<WireArtist>,
    #[serde(default)]
    images: Vec<WireImage>,
    external_urls: Option<WireExternalUrls>,
}

impl WireAlbum {
    fn into_album(self) -> Option<Album> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(Album {
            id,
            name: self.name.unwrap_or_default(),
            release_date: self.release_date,
            artists: self.artists.into_iter().filter_map(|a| a.name).collect(),
            images: self.images.into_iter().filter_map(|i| i.url).collect(),
            external_url: self.external_urls.and_then(|u| u.spotify),
        })
    }
}

impl WireArtist {
    fn into_summary(self) -> Option<ArtistSummary> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(ArtistSummary {
            id,
            name: self.name.unwrap_or_default(),
        })
    }
}

fn albums_from(paging: Option<Paging<WireAlbum>>) -> Vec<Album> {
    paging
        .map(|p| p.items.into_iter().flatten().filter_map(WireAlbum::into_album).collect())
        .unwrap_or_default()
}

fn parse_search(body: &str) -> Result<SearchPage, CatalogError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::ParseError(e.to_string()))?;

    let artists = response
        .artists
        .map(|p| p.items.into_iter().flatten().filter_map(WireArtist::into_summary).collect())
        .unwrap_or_default();

    Ok(SearchPage {
        albums: albums_from(response.albums),
        artists,
    })
}

fn parse_artist_albums(body: &str) -> Result<Vec<Album>, CatalogError> {
    let paging: Paging<WireAlbum> =
        serde_json::from_str(body).map_err(|e| CatalogError::ParseError(e.to_string()))?;
    Ok(albums_from(Some(paging)))
}

// ----------------------------------------------------------------------------
// HTTP client
// ----------------------------------------------------------------------------

/// Spotify Web API client
///
/// No timeout and no retries: a failed call fails the search that made it.
pub struct SpotifyCatalogClient {
    http_client: reqwest::Client,
    base_url: String,
    market: String,
    limit: u32,
}

impl SpotifyCatalogClient {
    pub fn new(base_url: &str, market: &str, limit: u32) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            market: market.to_string(),
            limit,
        }
    }

    async fn get_body(
        &self,
        token: &str,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, CatalogError> {
        tracing::debug!(url = %url, "Querying catalog");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(params)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status.as_u16() == 401 {
            return Err(CatalogError::Unauthorized);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        response
            .text()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))
    }
}

impl Default for SpotifyCatalogClient {
    fn default() -> Self {
        Self::new(SPOTIFY_API_BASE_URL, DEFAULT_MARKET, DEFAULT_LIMIT)
    }
}

#[async_trait]
impl CatalogApi for SpotifyCatalogClient {
    async fn search(&self, token: &str, query: &str) -> Result<SearchPage, CatalogError> {
        let url = format!("{}/search", self.base_url);
        let limit = self.limit.to_string();
        let params = [
            ("q", query),
            ("type", "album,artist"),
            ("market", self.market.as_str()),
            ("limit", limit.as_str()),
        ];

        let body = self.get_body(token, &url, &params).await?;
        let page = parse_search(&body)?;

        tracing::info!(
            query = %query,
            albums = page.albums.len(),
            artists = page.artists.len(),
            top_artist = %page.artists.first().map(|a| a.name.as_str()).unwrap_or("none"),
            "Catalog search returned"
        );

        Ok(page)
    }

    async fn artist_albums(&self, token: &str, artist_id: &str) -> Result<Vec<Album>, CatalogError> {
        let url = format!("{}/artists/{}/albums", self.base_url, artist_id);
        let limit = self.limit.to_string();
        let params = [
            ("include_groups", "album"),
            ("market", self.market.as_str()),
            ("limit", limit.as_str()),
        ];

        let body = self.get_body(token, &url, &params).await?;
        let albums = parse_artist_albums(&body)?;

        tracing::info!(artist_id = %artist_id, albums = albums.len(), "Fetched artist albums");
        Ok(albums)
    }
}
