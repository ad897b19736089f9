//! PDF merging operations.
//!
//! This module provides the document merge service:
//! - Ordered page concatenation across any number of inputs
//! - Page tree rebuilding with inherited attributes preserved
//! - Optional stream compression of the output
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::io::Blob;
//! use pdfmerge::merge::{MergeService, PdfMerger};
//!
//! # async fn example(a: Blob, b: Blob) -> Result<(), Box<dyn std::error::Error>> {
//! let merger = PdfMerger::new();
//! let merged = merger.merge(vec![a, b]).await?;
//! println!("Merged {} pages", merged.report.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod merger;
pub mod pages;

pub use merger::{MergeReport, MergeService, MergedDocument, PdfMerger};
