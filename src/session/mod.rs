//! The ordered file list and its merge/naming lifecycle.
//!
//! A [`MergeSession`] holds the entries the user intends to merge, the outcome
//! of the latest merge, the output name, and the outcome of the latest naming
//! request. All mutation goes through its methods, which keep these
//! invariants:
//!
//! - Entry ids are unique within the list.
//! - Any change to the list's content or order drops a produced output (and
//!   thereby revokes it) and supersedes an in-flight merge.
//! - At most one merge and one naming request are in flight; further requests
//!   are ignored until they finish.
//! - A completion is applied only if its request is still current.
//!
//! Long-running work is split into `begin_*`, an owned ticket that runs
//! without borrowing the session, and `finish_*`. The `request_*` methods
//! chain all three for callers that simply await.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::io::InputFile;
//! use pdfmerge::merge::PdfMerger;
//! use pdfmerge::session::MergeSession;
//!
//! # async fn example(a: InputFile, b: InputFile) {
//! let mut session = MergeSession::new();
//! session.add_files([a, b]);
//! session.request_merge(&PdfMerger::new()).await;
//! if let Some(output) = session.output() {
//!     println!("{} ready at {}", session.output_name(), output.url());
//! }
//! # }
//! ```

pub mod entry;
pub mod outcome;

pub use entry::{EntryId, InputEntry};
pub use outcome::{MergeOutcome, MergePhase, NamingOutcome, NamingPhase, RequestToken};

use crate::config::{Config, DEFAULT_OUTPUT_NAME};
use crate::error::MergeError;
use crate::io::{Blob, InputFile};
use crate::merge::{MergeService, MergedDocument};
use crate::naming::{NameSuggestion, SmartNamer};
use crate::output::{BlobStore, OutputHandle};
use crate::utils::format_file_size;
use outcome::TokenSource;

/// A started merge, detached from the session.
#[derive(Debug)]
pub struct MergeTicket {
    token: RequestToken,
    blobs: Vec<Blob>,
}

impl MergeTicket {
    /// Token of this request.
    pub fn token(&self) -> RequestToken {
        self.token
    }

    /// Input blobs, in list order at the time of the request.
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Run the merge.
    pub async fn run(self, service: &dyn MergeService) -> MergeCompletion {
        let result = service.merge(self.blobs).await;
        MergeCompletion {
            token: self.token,
            result,
        }
    }
}

/// Result of a [`MergeTicket`], to hand back via [`MergeSession::finish_merge`].
#[derive(Debug)]
pub struct MergeCompletion {
    token: RequestToken,
    result: Result<MergedDocument, MergeError>,
}

impl MergeCompletion {
    /// Build a completion from an externally produced result.
    pub fn new(token: RequestToken, result: Result<MergedDocument, MergeError>) -> Self {
        Self { token, result }
    }

    /// Token of the request this completes.
    pub fn token(&self) -> RequestToken {
        self.token
    }
}

/// A started naming request, detached from the session.
#[derive(Debug)]
pub struct NamingTicket {
    token: RequestToken,
    names: Vec<String>,
}

impl NamingTicket {
    /// Token of this request.
    pub fn token(&self) -> RequestToken {
        self.token
    }

    /// Display names, in list order at the time of the request.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Ask `namer` for a name.
    pub async fn run(self, namer: &SmartNamer) -> NamingCompletion {
        let suggestion = namer.suggest_name(&self.names).await;
        NamingCompletion {
            token: self.token,
            suggestion,
        }
    }
}

/// Result of a [`NamingTicket`], to hand back via [`MergeSession::finish_naming`].
#[derive(Debug)]
pub struct NamingCompletion {
    token: RequestToken,
    suggestion: NameSuggestion,
}

impl NamingCompletion {
    /// Build a completion from an externally produced suggestion.
    pub fn new(token: RequestToken, suggestion: NameSuggestion) -> Self {
        Self { token, suggestion }
    }

    /// Token of the request this completes.
    pub fn token(&self) -> RequestToken {
        self.token
    }
}

/// Ordered file list plus merge and naming state.
#[derive(Debug)]
pub struct MergeSession {
    entries: Vec<InputEntry>,
    merge: MergeOutcome,
    naming: NamingOutcome,
    output_name: String,
    default_output_name: String,
    tokens: TokenSource,
    store: BlobStore,
}

impl Default for MergeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeSession {
    /// Create an empty session with the default output name.
    pub fn new() -> Self {
        Self::with_default_name(DEFAULT_OUTPUT_NAME)
    }

    /// Create an empty session configured by `config`.
    pub fn with_config(config: &Config) -> Self {
        Self::with_default_name(&config.default_output_name)
    }

    fn with_default_name(name: &str) -> Self {
        Self {
            entries: Vec::new(),
            merge: MergeOutcome::Idle,
            naming: NamingOutcome::Idle,
            output_name: name.to_string(),
            default_output_name: name.to_string(),
            tokens: TokenSource::default(),
            store: BlobStore::new(),
        }
    }

    /// Publish outputs into `store` instead of a private one.
    pub fn with_store(mut self, store: BlobStore) -> Self {
        self.store = store;
        self
    }

    /// Entries in merge order.
    pub fn entries(&self) -> &[InputEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Combined size of all entries in bytes.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(InputEntry::byte_size).sum()
    }

    /// Combined size formatted for display.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size())
    }

    /// Current merge outcome.
    pub fn merge_outcome(&self) -> &MergeOutcome {
        &self.merge
    }

    /// Current merge phase.
    pub fn merge_phase(&self) -> MergePhase {
        self.merge.phase()
    }

    /// The produced output, if a merge is ready.
    pub fn output(&self) -> Option<&OutputHandle> {
        self.merge.output()
    }

    /// Current naming outcome.
    pub fn naming_outcome(&self) -> &NamingOutcome {
        &self.naming
    }

    /// Current naming phase.
    pub fn naming_phase(&self) -> NamingPhase {
        self.naming.phase()
    }

    /// File name the output will be saved under.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Store outputs are published to.
    pub fn store(&self) -> &BlobStore {
        &self.store
    }

    /// Append `files` in the given order and return their new ids.
    ///
    /// Adding nothing leaves the session untouched.
    pub fn add_files<I>(&mut self, files: I) -> Vec<EntryId>
    where
        I: IntoIterator<Item = InputFile>,
    {
        let mut ids = Vec::new();
        for file in files {
            let id = self.fresh_id();
            tracing::debug!(%id, name = %file.name, size = file.size, "Adding entry");
            self.entries.push(InputEntry::new(id.clone(), file));
            ids.push(id);
        }

        if !ids.is_empty() {
            self.invalidate_merge();
        }
        ids
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn remove_entry(&mut self, id: &EntryId) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry.id() == id) else {
            return false;
        };

        let entry = self.entries.remove(index);
        tracing::debug!(%id, name = entry.display_name(), "Removed entry");
        self.invalidate_merge();
        true
    }

    /// Swap the entry at `index` with its predecessor.
    ///
    /// A no-op at index 0 or out of range. Returns whether the order changed.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.entries.len() {
            return false;
        }
        self.swap(index - 1, index);
        true
    }

    /// Swap the entry at `index` with its successor.
    ///
    /// A no-op at the last index or out of range. Returns whether the order
    /// changed.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.entries.len() {
            return false;
        }
        self.swap(index, index + 1);
        true
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        tracing::debug!(a, b, "Reordered entries");
        self.invalidate_merge();
    }

    /// Set the output name verbatim.
    pub fn set_output_name(&mut self, name: impl Into<String>) {
        self.output_name = name.into();
    }

    /// Start a merge of the current list.
    ///
    /// Returns `None` when the list is empty or a merge is already running.
    /// Starting a merge drops any previous output.
    pub fn begin_merge(&mut self) -> Option<MergeTicket> {
        if self.entries.is_empty() {
            tracing::debug!("Ignoring merge request on empty list");
            return None;
        }
        if let MergeOutcome::Merging { token } = self.merge {
            tracing::debug!(%token, "Ignoring merge request while merging");
            return None;
        }

        let token = self.tokens.next();
        let blobs = self.entries.iter().map(|entry| entry.blob().clone()).collect();
        self.merge = MergeOutcome::Merging { token };
        tracing::info!(%token, files = self.entries.len(), "Merge started");

        Some(MergeTicket { token, blobs })
    }

    /// Apply a merge result. Returns `false` if the request was superseded.
    pub fn finish_merge(&mut self, completion: MergeCompletion) -> bool {
        let MergeCompletion { token, result } = completion;
        if !self.merge.awaits(token) {
            tracing::debug!(%token, "Discarding stale merge result");
            return false;
        }

        self.merge = match result {
            Ok(merged) => {
                let output = self.store.publish(merged.bytes);
                tracing::info!(
                    %token,
                    url = output.url(),
                    pages = merged.report.total_pages,
                    size = %merged.report.format_output_size(),
                    "Merge ready"
                );
                MergeOutcome::Ready {
                    output,
                    report: merged.report,
                }
            }
            Err(err) => {
                tracing::error!(%token, error = %err, cause = ?err.cause(), "Merge failed");
                MergeOutcome::Failed {
                    message: err.to_string(),
                }
            }
        };
        true
    }

    /// Merge the current list with `service` and apply the result.
    ///
    /// Returns whether a merge was started.
    pub async fn request_merge(&mut self, service: &dyn MergeService) -> bool {
        let Some(ticket) = self.begin_merge() else {
            return false;
        };
        let completion = ticket.run(service).await;
        self.finish_merge(completion)
    }

    /// Start a naming request for the current list.
    ///
    /// Returns `None` when the list is empty or a request is already running.
    pub fn begin_naming(&mut self) -> Option<NamingTicket> {
        if self.entries.is_empty() {
            tracing::debug!("Ignoring naming request on empty list");
            return None;
        }
        if let NamingOutcome::Generating { token } = self.naming {
            tracing::debug!(%token, "Ignoring naming request while generating");
            return None;
        }

        let token = self.tokens.next();
        let names = self
            .entries
            .iter()
            .map(|entry| entry.display_name().to_string())
            .collect();
        self.naming = NamingOutcome::Generating { token };

        Some(NamingTicket { token, names })
    }

    /// Apply a naming result. Returns `false` if the request was superseded.
    pub fn finish_naming(&mut self, completion: NamingCompletion) -> bool {
        let NamingCompletion { token, suggestion } = completion;
        if !self.naming.awaits(token) {
            tracing::debug!(%token, "Discarding stale naming result");
            return false;
        }

        self.output_name = suggestion.name;
        self.naming = NamingOutcome::Done {
            error: suggestion.fallback_reason,
        };
        true
    }

    /// Ask `namer` for an output name and apply it.
    ///
    /// Returns whether a request was started.
    pub async fn request_smart_name(&mut self, namer: &SmartNamer) -> bool {
        let Some(ticket) = self.begin_naming() else {
            return false;
        };
        let completion = ticket.run(namer).await;
        self.finish_naming(completion)
    }

    /// Return to the initial state, dropping every entry and any output.
    ///
    /// In-flight requests are superseded.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.merge = MergeOutcome::Idle;
        self.naming = NamingOutcome::Idle;
        self.output_name = self.default_output_name.clone();
        tracing::debug!("Session reset");
    }

    fn fresh_id(&self) -> EntryId {
        loop {
            let id = EntryId::generate();
            if self.entries.iter().all(|entry| entry.id() != &id) {
                return id;
            }
        }
    }

    fn invalidate_merge(&mut self) {
        match &self.merge {
            MergeOutcome::Idle => return,
            MergeOutcome::Merging { token } => {
                tracing::debug!(%token, "List changed, superseding in-flight merge");
            }
            MergeOutcome::Ready { output, .. } => {
                tracing::debug!(url = output.url(), "List changed, releasing output");
            }
            MergeOutcome::Failed { .. } => {}
        }
        self.merge = MergeOutcome::Idle;
    }
}
