//! pdfmerge - combine PDF documents into one.
//!
//! The crate is organised around a [`session::MergeSession`]: an ordered list
//! of input documents with a merge lifecycle and an output name. Two services
//! plug into it:
//!
//! - [`merge::MergeService`], implemented by [`merge::PdfMerger`], which
//!   concatenates the pages of the inputs in order.
//! - [`naming::SmartNamer`], which asks a language model for an output file
//!   name and falls back to a dated name when that is not possible.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::io::read_inputs;
//! use pdfmerge::merge::PdfMerger;
//! use pdfmerge::session::MergeSession;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = read_inputs(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]).await?;
//!
//! let mut session = MergeSession::new();
//! session.add_files(files);
//! session.request_merge(&PdfMerger::new()).await;
//!
//! if let Some(output) = session.output() {
//!     output.save_to_dir(Path::new("."), session.output_name()).await?;
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod merge;
pub mod naming;
pub mod output;
pub mod session;
pub mod utils;

pub use config::Config;
pub use error::{
    Error, InputError, MergeError, MergeFailure, NamingError, OutputError, Result,
};
pub use merge::{MergeService, PdfMerger};
pub use naming::SmartNamer;
pub use session::MergeSession;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
