//! Add/edit form for collection entries
//!
//! A form holds the album being added (or a pseudo-album rebuilt from an
//! existing entry) plus the user-editable values. Saving turns it into a
//! [`CollectionEntry`].

use chrono::{DateTime, NaiveDate, Utc};
use shelf_common::{Album, CollectionEntry, Condition, Error, Format, Result};

/// Whether the form creates a new entry or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

/// User-editable part of a collection entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub owned: bool,
    pub format: Format,
    pub condition: Condition,
    pub purchase_date: Option<NaiveDate>,
    pub notes: String,
}

impl Default for FormValues {
    /// Seed for a new entry: owned vinyl in good condition
    fn default() -> Self {
        Self {
            owned: true,
            format: Format::Vinyl,
            condition: Condition::Good,
            purchase_date: None,
            notes: String::new(),
        }
    }
}

impl FormValues {
    pub fn from_entry(entry: &CollectionEntry) -> Self {
        Self {
            owned: entry.owned,
            format: entry.format,
            condition: entry.condition,
            purchase_date: entry.purchase_date,
            notes: entry.notes.clone(),
        }
    }
}

/// One field update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Owned(bool),
    Format(Format),
    Condition(Condition),
    PurchaseDate(Option<NaiveDate>),
    Notes(String),
}

impl FormField {
    /// Parse `name value` as typed at the prompt
    ///
    /// Names: `owned`, `format`, `condition`, `date` (or `purchase-date`),
    /// `notes`. An empty date clears it.
    pub fn parse(name: &str, value: &str) -> Result<Self> {
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "owned" => match value.to_ascii_lowercase().as_str() {
                "yes" | "y" | "true" => Ok(FormField::Owned(true)),
                "no" | "n" | "false" => Ok(FormField::Owned(false)),
                _ => Err(Error::InvalidInput(format!("owned must be yes or no, got: {}", value))),
            },
            "format" => Ok(FormField::Format(value.parse()?)),
            "condition" => Ok(FormField::Condition(value.parse()?)),
            "date" | "purchase-date" | "purchase_date" => {
                if value.is_empty() {
                    Ok(FormField::PurchaseDate(None))
                } else {
                    NaiveDate::parse_from_str(value, "%Y-%m-%d")
                        .map(|d| FormField::PurchaseDate(Some(d)))
                        .map_err(|_| Error::InvalidInput(format!("date must be YYYY-MM-DD, got: {}", value)))
                }
            }
            "notes" => Ok(FormField::Notes(value.to_string())),
            other => Err(Error::InvalidInput(format!("Unknown field: {}", other))),
        }
    }
}

/// Open add/edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionForm {
    album: Album,
    values: FormValues,
    mode: FormMode,
}

impl CollectionForm {
    pub fn for_add(album: Album) -> Self {
        Self {
            album,
            values: FormValues::default(),
            mode: FormMode::Add,
        }
    }

    pub fn for_edit(entry: &CollectionEntry) -> Self {
        Self {
            album: entry.to_album(),
            values: FormValues::from_entry(entry),
            mode: FormMode::Edit,
        }
    }

    pub fn album(&self) -> &Album {
        &self.album
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn apply(&mut self, field: FormField) {
        match field {
            FormField::Owned(owned) => self.values.owned = owned,
            FormField::Format(format) => self.values.format = format,
            FormField::Condition(condition) => self.values.condition = condition,
            FormField::PurchaseDate(date) => self.values.purchase_date = date,
            FormField::Notes(notes) => self.values.notes = notes,
        }
    }

    /// Build the entry to store; `added_at` is stamped with `now`
    pub fn to_entry(&self, now: DateTime<Utc>) -> CollectionEntry {
        CollectionEntry {
            id: self.album.id.clone(),
            name: self.album.name.clone(),
            artists: self.album.artists.clone(),
            image: self.album.first_image().unwrap_or_default().to_string(),
            spotify_url: self.album.external_url.clone().unwrap_or_default(),
            owned: self.values.owned,
            format: self.values.format,
            condition: self.values.condition,
            purchase_date: self.values.purchase_date,
            notes: self.values.notes.clone(),
            added_at: now,
        }
    }
}
