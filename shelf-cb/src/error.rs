//! Error types for shelf-cb

use thiserror::Error;

/// Catalog browser error type
#[derive(Debug, Error)]
pub enum Error {
    /// Save attempted with no open form
    #[error("No album selected")]
    NoAlbumSelected,

    /// Edit requested for an id that is not in the collection
    #[error("Not in collection: {0}")]
    NotInCollection(String),

    /// Search result index out of range (1-based)
    #[error("No search result #{0}")]
    NoSuchResult(usize),

    /// Storage, configuration and input errors from shelf-common
    #[error(transparent)]
    Common(#[from] shelf_common::Error),
}

/// Convenience Result type using shelf-cb Error
pub type Result<T> = std::result::Result<T, Error>;
