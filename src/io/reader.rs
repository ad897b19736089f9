//! Input acquisition and PDF parsing.
//!
//! This module covers the two ways bytes enter the system:
//! - Building [`InputFile`]s from explicitly selected paths or dropped items
//! - Parsing input blobs into `lopdf` documents, off the async runtime
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::io::{PdfReader, read_inputs};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inputs = read_inputs(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]).await?;
//! let blobs = inputs.iter().map(|f| f.bytes.clone()).collect::<Vec<_>>();
//! let loaded = PdfReader::new().load_all(&blobs, 4).await?;
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt, TryStreamExt};
use lopdf::Document;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{InputError, MergeError, MergeFailure};

/// Raw bytes of one input document, shared without copying.
pub type Blob = Arc<[u8]>;

/// MIME type accepted by the drop filter.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// One file handed over by the input collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Original file name.
    pub name: String,

    /// Raw document bytes.
    pub bytes: Blob,

    /// Size in bytes as reported by the source.
    pub size: u64,
}

impl InputFile {
    /// Create an input file whose size is the length of `bytes`.
    pub fn new(name: impl Into<String>, bytes: impl Into<Blob>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }
}

/// An item dropped onto the input area: a file plus its declared MIME type.
#[derive(Debug, Clone)]
pub struct DroppedItem {
    /// The dropped file.
    pub file: InputFile,

    /// MIME type declared by the source, if any.
    pub mime_type: Option<String>,
}

/// Keep only dropped items that look like PDFs.
///
/// An item passes when its declared type is `application/pdf` or its name
/// ends in `.pdf`. Order is preserved.
pub fn filter_dropped<I>(items: I) -> Vec<InputFile>
where
    I: IntoIterator<Item = DroppedItem>,
{
    items
        .into_iter()
        .filter(|item| {
            item.mime_type.as_deref() == Some(PDF_MIME_TYPE)
                || item.file.name.to_lowercase().ends_with(".pdf")
        })
        .map(|item| item.file)
        .collect()
}

/// Read explicitly selected files from disk, in order.
///
/// No type filtering happens here.
pub async fn read_inputs(paths: &[PathBuf]) -> Result<Vec<InputFile>, InputError> {
    let mut inputs = Vec::with_capacity(paths.len());

    for path in paths {
        inputs.push(read_input(path).await?);
    }

    Ok(inputs)
}

async fn read_input(path: &Path) -> Result<InputFile, InputError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| InputError::FailedToRead {
            path: path.to_path_buf(),
            source,
        })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!(path = %path.display(), size = bytes.len(), "Read input file");

    Ok(InputFile::new(name, bytes))
}

/// A parsed input document.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Index of the input this document came from.
    pub position: usize,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to parse the document.
    pub load_time: Duration,

    /// Size of the source blob in bytes.
    pub size: u64,
}

/// Parses input blobs into documents.
///
/// A well-formed document without pages is accepted; it contributes nothing
/// to a merge.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }

    /// Parse one blob. Runs on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns a [`MergeFailure`] naming `position` if the bytes are not a
    /// readable PDF or the PDF is encrypted.
    pub fn load(&self, position: usize, bytes: &[u8]) -> Result<LoadedPdf, MergeFailure> {
        let start = Instant::now();

        let document = Document::load_mem(bytes)
            .map_err(|e| MergeFailure::from_load_error(position, &e))?;

        if document.trailer.get(b"Encrypt").is_ok() {
            return Err(MergeFailure::Encrypted { position });
        }

        let page_count = document.get_pages().len();

        let load_time = start.elapsed();
        tracing::debug!(position, page_count, ?load_time, "Parsed input document");

        Ok(LoadedPdf {
            document,
            position,
            page_count,
            load_time,
            size: bytes.len() as u64,
        })
    }

    /// Parse all blobs on blocking worker threads.
    ///
    /// At most `workers` documents are parsed at once. The result keeps the
    /// input order; the first failure (in input order) aborts the batch.
    pub async fn load_all(
        &self,
        blobs: &[Blob],
        workers: usize,
    ) -> Result<Vec<LoadedPdf>, MergeError> {
        if blobs.is_empty() {
            return Err(MergeError::EmptyInput);
        }

        let workers = workers.max(1);

        let tasks = blobs.iter().cloned().enumerate().map(|(position, blob)| {
            let reader = *self;
            async move {
                task::spawn_blocking(move || reader.load(position, &blob))
                    .await
                    .map_err(|e| MergeFailure::Task(e.to_string()))?
            }
        });

        let loaded = stream::iter(tasks)
            .buffered(workers)
            .try_collect::<Vec<_>>()
            .await?;

        Ok(loaded)
    }
}
