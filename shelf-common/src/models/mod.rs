//! Domain model
//!
//! Albums are ephemeral values coming from the catalog. Collection entries
//! are the user's curated records and live in the [`Collection`].

mod album;
mod collection;

pub use album::Album;
pub use collection::{Collection, CollectionEntry, Condition, Format};
