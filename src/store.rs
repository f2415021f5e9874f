//! Client-side copy of the link collection.
//!
//! The in-memory list is what the page renders. It is replaced wholesale by
//! [`LinkStore::load`] and pushed wholesale by [`LinkStore::save`]. A failed
//! save does not undo the mutation that preceded it, so memory and the file
//! can drift apart until the next successful save.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::models::{Link, SaveRequest};
use crate::server::SAVE_PATH;

/// Where the collection is read from and written to.
#[async_trait(?Send)]
pub trait Backend {
    /// Returns the raw text of the store file.
    async fn fetch(&self) -> Result<String, StoreError>;

    /// Overwrites the store with `links`.
    async fn persist(&self, links: &[Link]) -> Result<(), StoreError>;
}

/// Talks to the server in [`crate::server`] over HTTP.
pub struct HttpBackend {
    client: awc::Client,
    file_url: String,
    save_url: String,
}

impl HttpBackend {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:8080`.
    /// Requests have no timeout; a slow store is waited for.
    pub fn new(base_url: &str, store_file_name: &str) -> HttpBackend {
        let base = base_url.trim_end_matches('/');
        HttpBackend {
            client: awc::Client::builder().disable_timeout().finish(),
            file_url: format!("{base}/{store_file_name}"),
            save_url: format!("{base}{SAVE_PATH}"),
        }
    }
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn fetch(&self) -> Result<String, StoreError> {
        let mut response = self
            .client
            .get(&self.file_url)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status()));
        }

        let body = response
            .body()
            .limit(usize::MAX)
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Ok(String::from_utf8(body.to_vec())?)
    }

    async fn persist(&self, links: &[Link]) -> Result<(), StoreError> {
        let response = self
            .client
            .post(&self.save_url)
            .send_json(&SaveRequest {
                links,
                action: "save",
            })
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status()));
        }
        Ok(())
    }
}

pub struct LinkStore<B> {
    backend: B,
    links: Vec<Link>,
}

impl<B: Backend> LinkStore<B> {
    pub fn new(backend: B) -> LinkStore<B> {
        LinkStore {
            backend,
            links: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replaces the list with the persisted one. On any failure the list is
    /// left empty and the error is returned for the caller to surface.
    /// Records with missing fields load with defaults. An entry that is not a
    /// link at all is skipped on its own.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        match self.fetch_links().await {
            Ok(links) => {
                info!("Loaded {} links", links.len());
                self.links = links;
                Ok(())
            }
            Err(e) => {
                warn!("Error loading links: {e}");
                self.links = Vec::new();
                Err(e)
            }
        }
    }

    async fn fetch_links(&self) -> Result<Vec<Link>, StoreError> {
        let text = self.backend.fetch().await?;
        if text.trim().is_empty() {
            return Err(StoreError::Empty);
        }

        let entries: Vec<Value> = serde_json::from_str(&text)?;
        let links = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(link) => Some(link),
                Err(e) => {
                    warn!("Skipping link #{index}: {e}");
                    None
                }
            })
            .collect();
        Ok(links)
    }

    /// Sends the whole list to the backend.
    pub async fn save(&self) -> Result<(), StoreError> {
        self.backend.persist(&self.links).await.map_err(|e| {
            warn!("Error saving links: {e}");
            e
        })
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn get(&self, id: i64) -> Option<&Link> {
        self.links.iter().find(|link| link.id == id)
    }

    pub fn push(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Swaps in `link` at the position of the record with the same id.
    /// Returns false, leaving the list untouched, if there is none.
    pub fn replace(&mut self, link: Link) -> bool {
        match self.links.iter_mut().find(|existing| existing.id == link.id) {
            Some(existing) => {
                *existing = link;
                true
            }
            None => false,
        }
    }

    /// Drops every record with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.links.len();
        self.links.retain(|link| link.id != id);
        self.links.len() != before
    }
}
