use super::{CollectionStore, COLLECTION_STORAGE_KEY};
use shelf_common::config::write_atomic;
use shelf_common::{CollectionEntry, Result};
use std::path::{Path, PathBuf};

/// Collection stored as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the default storage key inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.json", COLLECTION_STORAGE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CollectionStore for JsonFileStore {
    fn load(&self) -> Result<Vec<CollectionEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, entries: &[CollectionEntry]) -> Result<()> {
        let json = serde_json::to_vec(entries)?;
        write_atomic(&self.path, &json)
    }
}
