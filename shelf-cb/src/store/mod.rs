//! Collection persistence port
//!
//! The controller only sees [`CollectionStore`]. Production uses a JSON file
//! per storage key; tests use [`MemoryStore`].

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use shelf_common::{CollectionEntry, Result};

/// Storage key under which the collection array is kept
pub const COLLECTION_STORAGE_KEY: &str = "myAlbumCollection";

/// Load/save of the full collection sequence
///
/// Implementations store the entries as one JSON array. There is no
/// partial update: every save writes the whole sequence.
pub trait CollectionStore {
    /// Stored entries, most recent first; empty if nothing was stored yet
    fn load(&self) -> Result<Vec<CollectionEntry>>;

    fn save(&self, entries: &[CollectionEntry]) -> Result<()>;
}
