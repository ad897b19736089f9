//! I/O operations for pdfmerge.
//!
//! This module handles the edges of the system:
//! - Acquiring input files from disk or from a drop target
//! - Parsing input blobs into PDF documents in parallel
//! - Writing a produced document to disk

pub mod reader;
pub mod writer;

pub use reader::{
    Blob, DroppedItem, InputFile, LoadedPdf, PDF_MIME_TYPE, PdfReader, filter_dropped,
    read_inputs,
};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics, output_path, sanitize_file_name};
