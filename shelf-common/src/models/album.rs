use serde::{Deserialize, Serialize};

/// Album as returned by the catalog
///
/// Read-only value: exists only for the lifetime of a search result set or
/// an open collection form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Catalog identifier
    pub id: String,
    /// Album title
    pub name: String,
    /// Release date as reported by the catalog (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`)
    pub release_date: Option<String>,
    /// Artist names in credit order
    pub artists: Vec<String>,
    /// Cover image URLs, largest first
    pub images: Vec<String>,
    /// Link to the album on the catalog's site
    pub external_url: Option<String>,
}

impl Album {
    /// First (largest) cover image, if any
    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Artist names joined for display ("A, B")
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}
