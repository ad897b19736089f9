//! Output blob ownership.
//!
//! A [`BlobStore`] plays the role of the browser's object-URL registry: each
//! produced document is published under a unique `blob:` URL and stays
//! resident until revoked. Revocation is tied to [`OutputHandle`]'s `Drop`, so
//! a handle is released exactly once, whichever path discards it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::OutputError;
use crate::io::{Blob, PdfWriter, WriteStatistics};

const URL_PREFIX: &str = "blob:pdfmerge/";

#[derive(Debug, Default)]
struct StoreState {
    blobs: HashMap<String, Blob>,
    next_id: u64,
    published: u64,
    revoked: u64,
}

/// Registry of published output blobs.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    state: Arc<Mutex<StoreState>>,
}

impl BlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish `bytes` and return the owning handle.
    pub fn publish(&self, bytes: impl Into<Blob>) -> OutputHandle {
        let bytes = bytes.into();
        let url = {
            let mut state = self.lock();
            state.next_id += 1;
            state.published += 1;
            let url = format!("{URL_PREFIX}{}", state.next_id);
            state.blobs.insert(url.clone(), bytes.clone());
            url
        };

        tracing::debug!(%url, bytes = bytes.len(), "Published output blob");

        OutputHandle {
            url,
            bytes,
            store: self.clone(),
        }
    }

    /// Look up a live blob by URL.
    pub fn get(&self, url: &str) -> Option<Blob> {
        self.lock().blobs.get(url).cloned()
    }

    /// Number of blobs currently published.
    pub fn live_count(&self) -> usize {
        self.lock().blobs.len()
    }

    /// Total number of blobs ever published.
    pub fn published_count(&self) -> u64 {
        self.lock().published
    }

    /// Total number of revocations performed.
    pub fn revoked_count(&self) -> u64 {
        self.lock().revoked
    }

    fn revoke(&self, url: &str) {
        let mut state = self.lock();
        if state.blobs.remove(url).is_some() {
            state.revoked += 1;
            tracing::debug!(%url, "Revoked output blob");
        }
    }
}

/// Owning reference to a published output blob.
///
/// Not `Clone`: exactly one owner, exactly one revocation.
#[derive(Debug)]
pub struct OutputHandle {
    url: String,
    bytes: Blob,
    store: BlobStore,
}

impl OutputHandle {
    /// URL under which the blob is published.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the document in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Save the document as `dir/name`.
    pub async fn save_to_dir(&self, dir: &Path, name: &str) -> Result<WriteStatistics, OutputError> {
        PdfWriter::new().save(self.bytes.clone(), dir, name).await
    }
}

impl Drop for OutputHandle {
    fn drop(&mut self) {
        self.store.revoke(&self.url);
    }
}
