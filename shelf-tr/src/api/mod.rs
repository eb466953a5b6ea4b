//! HTTP API handlers for shelf-tr

pub mod health;
pub mod token;

pub use health::health_routes;
pub use token::{get_token, get_token_config, token_routes};
