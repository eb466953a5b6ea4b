//! Search flow: combined search, optional discography, merge
//!
//! The combined album+artist search runs first. If it found an artist, that
//! artist's albums are fetched as well. Both lists are merged unique by
//! album id, combined-search results first.

use crate::services::{CatalogApi, CatalogError};
use shelf_common::Album;
use std::collections::HashSet;
use tracing::debug;

/// Merge two album lists, keeping the first occurrence of each id
///
/// Albums with an empty id are dropped.
pub fn merge_albums(primary: Vec<Album>, secondary: Vec<Album>) -> Vec<Album> {
    let mut seen = HashSet::new();
    primary
        .into_iter()
        .chain(secondary)
        .filter(|album| !album.id.is_empty() && seen.insert(album.id.clone()))
        .collect()
}

/// Run the full search for one query
///
/// The caller is responsible for rejecting blank queries and for having a
/// token; this function always talks to the catalog.
pub async fn search_albums<C>(catalog: &C, token: &str, query: &str) -> Result<Vec<Album>, CatalogError>
where
    C: CatalogApi + ?Sized,
{
    let page = catalog.search(token, query).await?;

    let from_artist = match page.artists.first() {
        Some(artist) => {
            debug!(artist = %artist.name, artist_id = %artist.id, "Fetching discography of top artist");
            catalog.artist_albums(token, &artist.id).await?
        }
        None => Vec::new(),
    };

    Ok(merge_albums(page.albums, from_artist))
}
