//! Application state and its transitions
//!
//! [`AppController`] is the single owner of mutable browser state: bearer
//! token, status line, current search results, open form and the
//! collection. Every change goes through one of its methods; collection
//! changes are written to the [`CollectionStore`] immediately.
//!
//! Searches are split in three steps so overlapping searches resolve
//! deterministically:
//! 1. [`AppController::begin_search`] checks the query and token and issues
//!    a ticket carrying a new sequence number
//! 2. the catalog work runs without borrowing the controller
//! 3. [`AppController::finish_search`] applies the outcome only if its
//!    ticket is still the latest one (last request wins)

use chrono::Utc;
use shelf_common::{Album, Collection, CollectionEntry};
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::form::{CollectionForm, FormField};
use crate::search::search_albums;
use crate::services::{CatalogApi, CatalogError, Token, TokenSource};
use crate::store::CollectionStore;

/// Status shown when the relay could not provide a token
pub const STATUS_TOKEN_UNAVAILABLE: &str = "Unable to obtain Spotify token";
/// Status shown when a search is attempted before a token arrived
pub const STATUS_WAITING_FOR_TOKEN: &str = "Waiting for Spotify token...";

/// Interactive yes/no decision for destructive actions
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Permission to run one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
    token: String,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Why [`AppController::begin_search`] declined to start a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchRefused {
    /// Blank query: nothing happens, results stay as they are
    EmptyQuery,
    /// No usable token yet
    NoToken,
}

/// What happened to the displayed results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Refused(SearchRefused),
    /// A newer search was issued meanwhile; this outcome was dropped
    Stale,
    /// Results replaced with this many albums
    Found(usize),
    /// Search succeeded with nothing to show; results cleared
    Empty,
    /// Search failed; results cleared
    Failed,
}

/// Result of a remove request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// User said no; collection untouched
    Declined,
    NotFound,
}

/// Browser application state
pub struct AppController<S: CollectionStore> {
    store: S,
    collection: Collection,
    results: Vec<Album>,
    token: Option<Token>,
    status: String,
    form: Option<CollectionForm>,
    search_seq: u64,
}

impl<S: CollectionStore> AppController<S> {
    /// Create the controller and load the stored collection
    ///
    /// Unreadable storage is logged and treated as an empty collection.
    pub fn new(store: S) -> Self {
        let collection = match store.load() {
            Ok(entries) => {
                info!(entries = entries.len(), "Loaded collection");
                Collection::from_entries(entries)
            }
            Err(e) => {
                warn!("Failed to load collection, starting empty: {}", e);
                Collection::new()
            }
        };

        Self {
            store,
            collection,
            results: Vec::new(),
            token: None,
            status: String::new(),
            form: None,
            search_seq: 0,
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn results(&self) -> &[Album] {
        &self.results
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn form(&self) -> Option<&CollectionForm> {
        self.form.as_ref()
    }

    pub fn in_collection(&self, id: &str) -> bool {
        self.collection.contains(id)
    }

    /// True if a token is held and not expired
    pub fn has_token(&self) -> bool {
        self.usable_token().is_some()
    }

    fn usable_token(&self) -> Option<&Token> {
        self.token.as_ref().filter(|t| !t.is_expired_at(Utc::now()))
    }

    // ------------------------------------------------------------------
    // Token
    // ------------------------------------------------------------------

    /// Fetch a token from `source`, replacing any held token
    ///
    /// On failure the status line reports it and no token is held.
    pub async fn acquire_token<T>(&mut self, source: &T) -> bool
    where
        T: TokenSource + ?Sized,
    {
        match source.fetch_token().await {
            Ok(token) => {
                self.token = Some(token);
                self.status.clear();
                true
            }
            Err(e) => {
                error!("Error fetching token from relay: {}", e);
                self.token = None;
                self.status = STATUS_TOKEN_UNAVAILABLE.to_string();
                false
            }
        }
    }

    /// Fetch a token only if none is held or the held one has expired
    pub async fn ensure_token<T>(&mut self, source: &T) -> bool
    where
        T: TokenSource + ?Sized,
    {
        if self.has_token() {
            return true;
        }
        if self.token.is_some() {
            info!("Bearer token expired, requesting a new one");
        }
        self.acquire_token(source).await
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Validate and issue a ticket for a new search
    ///
    /// Issuing a ticket makes every older ticket stale.
    pub fn begin_search(&mut self, query: &str) -> std::result::Result<SearchTicket, SearchRefused> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchRefused::EmptyQuery);
        }

        let token = self.usable_token().map(|t| t.access_token().to_string());
        let Some(token) = token else {
            warn!("Search requested before an access token was obtained");
            self.status = STATUS_WAITING_FOR_TOKEN.to_string();
            return Err(SearchRefused::NoToken);
        };

        self.search_seq += 1;
        Ok(SearchTicket {
            seq: self.search_seq,
            query: query.to_string(),
            token,
        })
    }

    /// Apply a finished search if its ticket is still the latest
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        result: std::result::Result<Vec<Album>, CatalogError>,
    ) -> SearchOutcome {
        if ticket.seq != self.search_seq {
            info!(
                query = %ticket.query,
                ticket = ticket.seq,
                latest = self.search_seq,
                "Discarding outcome of superseded search"
            );
            return SearchOutcome::Stale;
        }

        match result {
            Ok(albums) if albums.is_empty() => {
                warn!(query = %ticket.query, "No albums or artists found");
                self.results.clear();
                SearchOutcome::Empty
            }
            Ok(albums) => {
                let found = albums.len();
                self.results = albums;
                SearchOutcome::Found(found)
            }
            Err(e) => {
                error!(query = %ticket.query, "Error while searching catalog: {}", e);
                if matches!(e, CatalogError::Unauthorized) {
                    // Next search fetches a fresh token
                    self.token = None;
                }
                self.results.clear();
                SearchOutcome::Failed
            }
        }
    }

    /// Run a complete search
    ///
    /// Blank queries return immediately without any network call. A missing
    /// or expired token is fetched from `tokens` first.
    pub async fn search<C, T>(&mut self, query: &str, catalog: &C, tokens: &T) -> SearchOutcome
    where
        C: CatalogApi + ?Sized,
        T: TokenSource + ?Sized,
    {
        if query.trim().is_empty() {
            return SearchOutcome::Refused(SearchRefused::EmptyQuery);
        }

        self.ensure_token(tokens).await;

        let ticket = match self.begin_search(query) {
            Ok(ticket) => ticket,
            Err(refused) => return SearchOutcome::Refused(refused),
        };

        let result = search_albums(catalog, ticket.token(), ticket.query()).await;
        self.finish_search(&ticket, result)
    }

    // ------------------------------------------------------------------
    // Collection form
    // ------------------------------------------------------------------

    /// Open the add form for `album` with default values
    pub fn open_for_add(&mut self, album: Album) {
        self.form = Some(CollectionForm::for_add(album));
    }

    /// Open the add form for the n-th displayed result (1-based)
    pub fn open_for_add_result(&mut self, n: usize) -> Result<()> {
        let album = n
            .checked_sub(1)
            .and_then(|i| self.results.get(i))
            .cloned()
            .ok_or(Error::NoSuchResult(n))?;
        self.open_for_add(album);
        Ok(())
    }

    /// Open the edit form seeded from an existing entry
    pub fn open_for_edit(&mut self, id: &str) -> Result<()> {
        let entry = self
            .collection
            .get(id)
            .ok_or_else(|| Error::NotInCollection(id.to_string()))?;
        self.form = Some(CollectionForm::for_edit(entry));
        Ok(())
    }

    pub fn update_form(&mut self, field: FormField) -> Result<()> {
        let form = self.form.as_mut().ok_or(Error::NoAlbumSelected)?;
        form.apply(field);
        Ok(())
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Store the form as a collection entry and close the form
    ///
    /// An entry with the same id is replaced and the saved entry moves to
    /// the front.
    pub fn save(&mut self) -> Result<&CollectionEntry> {
        let form = self.form.take().ok_or(Error::NoAlbumSelected)?;
        let entry = form.to_entry(Utc::now());

        info!(id = %entry.id, name = %entry.name, "Saving album to collection");
        if self.collection.upsert(entry).is_some() {
            info!("Replaced existing collection entry");
        }
        self.persist();

        self.collection
            .entries()
            .first()
            .ok_or(Error::NoAlbumSelected)
    }

    /// Remove an entry after asking `confirm`
    pub fn remove<C>(&mut self, id: &str, confirm: &C) -> RemoveOutcome
    where
        C: Confirm + ?Sized,
    {
        let Some(entry) = self.collection.get(id) else {
            return RemoveOutcome::NotFound;
        };

        let prompt = format!("Remove \"{}\" from your collection?", entry.name);
        if !confirm.confirm(&prompt) {
            info!(id = %id, "Removal cancelled");
            return RemoveOutcome::Declined;
        }

        self.collection.remove(id);
        info!(id = %id, "Removed album from collection");
        self.persist();
        RemoveOutcome::Removed
    }

    /// Best-effort write of the whole collection
    fn persist(&self) {
        if let Err(e) = self.store.save(self.collection.entries()) {
            warn!("Failed to save collection: {}", e);
        }
    }
}
