//! Core PDF merging implementation.
//!
//! The merge builds a fresh output document and moves every page of every
//! input into it, in input order:
//!
//! 1. Parse all inputs (in parallel, order preserved)
//! 2. Renumber each input's objects past the ids already taken
//! 3. Flatten inherited page attributes, drop the old catalog and page tree
//! 4. Install one flat page tree listing all pages in order
//! 5. Compress and serialize
//!
//! Inputs are never mutated; a failure anywhere yields no output at all.

use async_trait::async_trait;
use lopdf::{Document, ObjectId};
use std::time::{Duration, Instant};
use tokio::task;

use crate::config::{CompressionLevel, MergeOptions};
use crate::error::{MergeError, MergeFailure};
use crate::io::{Blob, LoadedPdf, PdfReader};
use crate::merge::pages::{flatten_inherited_attributes, install_page_tree, page_tree_nodes};
use crate::utils::format_file_size;

/// Statistics about a merge operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of documents merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total size of the inputs in bytes.
    pub input_size: u64,

    /// Size of the serialized output in bytes.
    pub output_size: u64,

    /// Wall time of the whole merge.
    pub merge_time: Duration,
}

impl MergeReport {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// A serialized merged document.
#[derive(Debug, Clone)]
pub struct MergedDocument {
    /// The output PDF bytes.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub report: MergeReport,
}

/// Concatenates the pages of ordered input documents into one document.
#[async_trait]
pub trait MergeService: Send + Sync {
    /// Merge `blobs` in order.
    ///
    /// # Errors
    ///
    /// [`MergeError::EmptyInput`] for an empty list, [`MergeError::Failed`]
    /// for any parse, assembly or serialization failure.
    async fn merge(&self, blobs: Vec<Blob>) -> Result<MergedDocument, MergeError>;
}

/// `lopdf`-backed merge service.
#[derive(Debug, Clone, Default)]
pub struct PdfMerger {
    /// Reader for parsing inputs.
    reader: PdfReader,

    /// Compression and parallelism settings.
    options: MergeOptions,
}

impl PdfMerger {
    /// Create a merger with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merger with the given options.
    pub fn with_options(options: MergeOptions) -> Self {
        Self {
            reader: PdfReader::new(),
            options,
        }
    }
}

#[async_trait]
impl MergeService for PdfMerger {
    async fn merge(&self, blobs: Vec<Blob>) -> Result<MergedDocument, MergeError> {
        let start = Instant::now();

        if blobs.is_empty() {
            return Err(MergeError::EmptyInput);
        }

        tracing::info!(files = blobs.len(), "Merging documents");

        let input_size = blobs.iter().map(|b| b.len() as u64).sum();
        let loaded = self
            .reader
            .load_all(&blobs, self.options.effective_jobs())
            .await
            .inspect_err(|e| log_failure(e))?;

        let files_merged = loaded.len();
        let compression = self.options.compression;

        let (bytes, total_pages) =
            task::spawn_blocking(move || assemble(loaded, compression))
                .await
                .map_err(|e| MergeFailure::Task(e.to_string()))
                .and_then(|assembled| assembled)
                .map_err(MergeError::failed)
                .inspect_err(|e| log_failure(e))?;

        let report = MergeReport {
            files_merged,
            total_pages,
            input_size,
            output_size: bytes.len() as u64,
            merge_time: start.elapsed(),
        };

        tracing::info!(
            files = report.files_merged,
            pages = report.total_pages,
            input_size = %report.format_input_size(),
            output_size = %report.format_output_size(),
            merge_time = ?report.merge_time,
            "Merge completed"
        );

        Ok(MergedDocument { bytes, report })
    }
}

fn log_failure(err: &MergeError) {
    match err.cause() {
        Some(cause) => tracing::error!(%cause, "Merge failed"),
        None => tracing::error!(error = %err, "Merge failed"),
    }
}

/// Build and serialize the merged document. Blocking.
fn assemble(
    loaded: Vec<LoadedPdf>,
    compression: CompressionLevel,
) -> Result<(Vec<u8>, usize), MergeFailure> {
    let version = loaded
        .iter()
        .map(|l| l.document.version.clone())
        .max()
        .unwrap_or_else(|| "1.7".to_string());

    let mut merged = Document::with_version(version);
    let pages_id = merged.new_object_id();
    let mut max_id = merged.max_id;
    let mut page_ids: Vec<ObjectId> = Vec::new();

    for LoadedPdf {
        mut document,
        position,
        page_count,
        ..
    } in loaded
    {
        // Avoid object id collisions by renumbering the incoming document
        document.renumber_objects_with(max_id + 1);
        max_id = max_id.max(document.max_id);

        let doc_pages: Vec<ObjectId> = document.get_pages().into_values().collect();
        for &page_id in &doc_pages {
            flatten_inherited_attributes(&mut document, page_id)?;
        }

        for node_id in page_tree_nodes(&document) {
            document.objects.remove(&node_id);
        }

        tracing::debug!(position, pages = page_count, "Appending document pages");

        merged.objects.extend(document.objects);
        page_ids.extend(doc_pages);
    }

    merged.max_id = max_id;
    install_page_tree(&mut merged, pages_id, &page_ids)?;

    match compression {
        CompressionLevel::None => {}
        CompressionLevel::Standard => {
            merged.compress();
        }
        CompressionLevel::Maximum => {
            merged.compress();
            merged.prune_objects();
        }
    }

    merged.renumber_objects();

    let total_pages = merged.get_pages().len();
    if total_pages != page_ids.len() {
        return Err(MergeFailure::PageTree(format!(
            "expected {} pages in output, found {total_pages}",
            page_ids.len()
        )));
    }

    let mut bytes = Vec::new();
    merged
        .save_to(&mut bytes)
        .map_err(|e| MergeFailure::Serialize(e.to_string()))?;

    Ok((bytes, total_pages))
}
