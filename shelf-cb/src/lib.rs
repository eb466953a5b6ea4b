//! shelf-cb library - Catalog Browser
//!
//! Searches the music catalog with a bearer token obtained from the token
//! relay and keeps a personal album collection on local storage.

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod repl;
pub mod search;
pub mod services;
pub mod store;

pub use config::{BrowserConfig, ConfigOrigin, ConfigOverrides};
pub use controller::{AppController, Confirm, RemoveOutcome, SearchOutcome, SearchRefused, SearchTicket};
pub use error::{Error, Result};
pub use form::{CollectionForm, FormField, FormMode, FormValues};
pub use search::{merge_albums, search_albums};
