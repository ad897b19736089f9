//! Error types for pdfmerge.
//!
//! Errors are split by the collaborator that produces them:
//!
//! - **Merge errors**: the input list was empty, or a document could not be
//!   parsed, assembled, or serialized. Every concrete cause collapses into a
//!   single user-facing message; the cause stays reachable through `source()`.
//! - **Naming errors**: the text-generation call failed. These never leave the
//!   naming service; they are turned into a fallback file name.
//! - **Output errors**: delivering a produced document to disk failed.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfmerge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Merging documents failed.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// Delivering output failed.
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Reading input files failed.
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Error returned by the document merge service.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// No documents were supplied.
    #[error("No PDF files to merge")]
    EmptyInput,

    /// Any parse, copy or serialize failure.
    #[error("Failed to merge the PDF files. Make sure none of them are damaged.")]
    Failed {
        /// The concrete reason, kept for diagnostics.
        #[source]
        cause: MergeFailure,
    },
}

impl MergeError {
    /// Wrap a concrete failure into the user-facing merge error.
    pub fn failed(cause: MergeFailure) -> Self {
        Self::Failed { cause }
    }

    /// The concrete failure, if this is not an empty-input error.
    pub fn cause(&self) -> Option<&MergeFailure> {
        match self {
            Self::EmptyInput => None,
            Self::Failed { cause } => Some(cause),
        }
    }
}

impl From<MergeFailure> for MergeError {
    fn from(cause: MergeFailure) -> Self {
        Self::failed(cause)
    }
}

/// Concrete reason behind a [`MergeError::Failed`].
///
/// Positions are zero-based indices into the ordered input list.
#[derive(Debug, thiserror::Error)]
pub enum MergeFailure {
    /// The document at `position` could not be parsed.
    #[error("document #{position} could not be parsed: {reason}")]
    Load {
        /// Index of the offending input.
        position: usize,
        /// Parser message.
        reason: String,
    },

    /// The document at `position` is encrypted.
    #[error("document #{position} is encrypted")]
    Encrypted {
        /// Index of the offending input.
        position: usize,
    },

    /// The page tree of the merged document could not be assembled.
    #[error("page tree: {0}")]
    PageTree(String),

    /// Serializing the merged document failed.
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// The background merge task panicked or was cancelled.
    #[error("merge task failed: {0}")]
    Task(String),
}

impl MergeFailure {
    /// Classify a parser error for the input at `position`.
    pub fn from_load_error(position: usize, err: &lopdf::Error) -> Self {
        Self::from_load_reason(position, err.to_string())
    }

    fn from_load_reason(position: usize, reason: String) -> Self {
        let lowered = reason.to_lowercase();
        if lowered.contains("encrypt") || lowered.contains("password") {
            Self::Encrypted { position }
        } else {
            Self::Load { position, reason }
        }
    }
}

/// Error produced while talking to the text-generation collaborator.
///
/// Never surfaced to callers of [`SmartNamer`](crate::naming::SmartNamer).
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    /// No API credential was configured.
    #[error("API key not configured")]
    MissingCredential,

    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("text generation API returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The model returned nothing usable.
    #[error("text generation returned an empty response")]
    EmptyResponse,
}

/// Error produced while delivering an output blob.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// The output name cannot be used as a file name.
    #[error("Invalid output name: {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// Writing the output file failed.
    #[error("Failed to write output file: {}", path.display())]
    FailedToWrite {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The background write task panicked or was cancelled.
    #[error("write task failed: {0}")]
    Task(String),
}

/// Error produced while acquiring input files.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("Failed to read input file: {}", path.display())]
    FailedToRead {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A glob pattern could not be parsed.
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A glob entry could not be resolved.
    #[error("Failed to process glob entry: {0}")]
    GlobEntry(#[from] glob::GlobError),
}
