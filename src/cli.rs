//! CLI argument parsing for pdfmerge.
//!
//! The binary drives a [`MergeSession`](crate::session::MergeSession) the same
//! way an interactive front end would: add files, optionally ask for a smart
//! name, merge, then save the output.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! println!("Merging {} inputs", cli.inputs.len());
//! ```

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{CompressionLevel, Config, MergeOptions, NamingConfig};

/// Merge PDF files into a single document.
#[derive(Parser, Debug)]
#[command(name = "pdfmerge")]
#[command(version)]
#[command(about = "Merge PDF files into a single document", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files to merge (in order)
    ///
    /// Glob patterns are expanded; matches of one pattern are merged in
    /// lexical order.
    ///
    /// Examples:
    ///   pdfmerge a.pdf b.pdf
    ///   pdfmerge "chapters/*.pdf" -o book.pdf
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output file name
    ///
    /// Defaults to merged_document.pdf, or to the generated name when
    /// --smart-name is given.
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Directory to write the output into
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Ask the language model for an output name
    ///
    /// Falls back to merged_<date>.pdf when no API key is configured or the
    /// request fails. Ignored when --output is given.
    #[arg(short, long)]
    pub smart_name: bool,

    /// API key for the naming service
    #[arg(long, value_name = "KEY", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used for naming
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Compression level for the output PDF
    ///
    /// - none: keep streams as they are
    /// - standard: compress uncompressed streams (default)
    /// - maximum: compress and drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Number of inputs parsed concurrently
    ///
    /// Default is the number of CPU cores.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Convert CLI arguments into a [`Config`].
    ///
    /// # Errors
    ///
    /// Returns a message if the compression level is unknown or `--jobs` is 0.
    pub fn to_config(&self) -> Result<Config, String> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        if self.jobs == Some(0) {
            return Err("Number of jobs must be at least 1".to_string());
        }

        let mut naming = NamingConfig::from_env();
        if let Some(key) = &self.api_key {
            naming.api_key = Some(key.clone());
        }
        if let Some(model) = &self.model {
            naming.model = model.clone();
        }

        Ok(Config {
            naming,
            merge: MergeOptions {
                compression,
                jobs: self.jobs,
            },
            ..Config::default()
        })
    }
}
