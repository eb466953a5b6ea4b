//! API types shared between the token relay and the catalog browser

pub mod types;

pub use types::{ErrorBody, HealthResponse, TokenConfigReport, TokenResponse};
