//! Collection entries and the ordered, id-unique collection

use crate::{Album, Error};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical or digital format of an owned album
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Format {
    #[default]
    Vinyl,
    #[serde(rename = "CD")]
    Cd,
    Digital,
    Cassette,
    Other,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::Vinyl,
        Format::Cd,
        Format::Digital,
        Format::Cassette,
        Format::Other,
    ];

    /// Display label, identical to the persisted value
    pub fn label(self) -> &'static str {
        match self {
            Format::Vinyl => "Vinyl",
            Format::Cd => "CD",
            Format::Digital => "Digital",
            Format::Cassette => "Cassette",
            Format::Other => "Other",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Format::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown format: {}", s)))
    }
}

/// Grading of an owned copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Condition {
    Mint,
    #[serde(rename = "Near Mint")]
    NearMint,
    #[serde(rename = "Very Good")]
    VeryGood,
    #[default]
    Good,
    Fair,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::Mint,
        Condition::NearMint,
        Condition::VeryGood,
        Condition::Good,
        Condition::Fair,
    ];

    /// Display label, identical to the persisted value
    pub fn label(self) -> &'static str {
        match self {
            Condition::Mint => "Mint",
            Condition::NearMint => "Near Mint",
            Condition::VeryGood => "Very Good",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Condition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept "near mint", "Near Mint" and "near-mint"
        let wanted = s.trim().replace(['-', '_'], " ");
        Condition::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown condition: {}", s)))
    }
}

/// One album in the user's collection
///
/// Field names on the wire match the browser storage layout
/// (`spotifyUrl`, `purchaseDate`, `addedAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
    /// Mirrors the catalog album id; unique within a collection
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<String>,
    /// First cover image URL, empty if the album had none
    #[serde(default)]
    pub image: String,
    /// Catalog link, empty if unknown
    #[serde(default)]
    pub spotify_url: String,
    pub owned: bool,
    pub format: Format,
    pub condition: Condition,
    #[serde(default, with = "purchase_date")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    pub added_at: DateTime<Utc>,
}

impl CollectionEntry {
    /// Rebuild an album-shaped value for display in the edit form
    ///
    /// Release date is not kept in the collection, so it comes back empty.
    pub fn to_album(&self) -> Album {
        Album {
            id: self.id.clone(),
            name: self.name.clone(),
            release_date: None,
            artists: self.artists.clone(),
            images: if self.image.is_empty() {
                Vec::new()
            } else {
                vec![self.image.clone()]
            },
            external_url: if self.spotify_url.is_empty() {
                None
            } else {
                Some(self.spotify_url.clone())
            },
        }
    }
}

/// Absent dates are stored as `""`, and `""` reads back as absent.
mod purchase_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// The user's collection: ordered, unique by id, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    entries: Vec<CollectionEntry>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored entries
    ///
    /// Stored order is most-recent-first, so when an id repeats the first
    /// occurrence is kept.
    pub fn from_entries(entries: Vec<CollectionEntry>) -> Self {
        let mut collection = Self::new();
        for entry in entries {
            if !collection.contains(&entry.id) {
                collection.entries.push(entry);
            }
        }
        collection
    }

    /// Insert or replace by id; the entry moves to the front
    ///
    /// Returns the replaced entry, if any.
    pub fn upsert(&mut self, entry: CollectionEntry) -> Option<CollectionEntry> {
        let previous = self.remove(&entry.id);
        self.entries.insert(0, entry);
        previous
    }

    pub fn remove(&mut self, id: &str) -> Option<CollectionEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&CollectionEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CollectionEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionEntry> {
        self.entries.iter()
    }

    /// One-line summary, e.g. "My collection: 1 album"
    pub fn summary(&self) -> String {
        let n = self.len();
        format!("My collection: {} album{}", n, if n == 1 { "" } else { "s" })
    }
}
