//! Outbound HTTP clients
//!
//! Each client sits behind a trait so the controller can be driven by
//! in-memory fakes in tests.

pub mod catalog_client;
pub mod token_client;

pub use catalog_client::{ArtistSummary, CatalogApi, CatalogError, SearchPage, SpotifyCatalogClient};
pub use token_client::{RelayTokenClient, Token, TokenError, TokenSource};
