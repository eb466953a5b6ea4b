//! # Spinshelf Common Library
//!
//! Shared code for the Spinshelf token relay and catalog browser:
//! - Domain model (albums, collection entries, the collection itself)
//! - API request/response types exchanged between relay and browser
//! - Configuration helpers (environment lookup, TOML files, default paths)
//! - Common error type

pub mod api;
pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{Album, Collection, CollectionEntry, Condition, Format};
