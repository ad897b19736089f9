//! Configuration for pdfmerge.
//!
//! Configuration is an explicit value handed to the services at construction.
//! Nothing in the library reads the process environment while serving a
//! request; [`NamingConfig::from_env`] exists for the binary to call once at
//! startup.

use std::str::FromStr;
use std::time::Duration;

/// Output name used until the user or the naming service picks another one.
pub const DEFAULT_OUTPUT_NAME: &str = "merged_document.pdf";

/// Model asked for file name suggestions.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL of the Gemini REST API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Environment variables consulted for the API credential, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Compression level for the merged PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Streams are written as they were read.
    None,
    /// Flate-compress uncompressed streams.
    #[default]
    Standard,
    /// Compress and drop objects no page refers to.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = String;

    /// Parse "none", "standard" or "maximum" (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            )),
        }
    }
}

/// Settings for the document merge service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Compression applied to the merged document.
    pub compression: CompressionLevel,

    /// Number of inputs parsed concurrently. `None` means one per core.
    pub jobs: Option<usize>,
}

impl MergeOptions {
    /// Number of parse workers to use, at least one.
    pub fn effective_jobs(&self) -> usize {
        self.jobs
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }
}

/// Settings for the smart naming service.
#[derive(Clone, PartialEq, Eq)]
pub struct NamingConfig {
    /// API credential. `None` makes every request fall back.
    pub api_key: Option<String>,

    /// Model identifier passed to the text-generation API.
    pub model: String,

    /// API base URL, without a trailing slash.
    pub endpoint: String,

    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl NamingConfig {
    /// Build a config with the given credential and defaults elsewhere.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Read the credential from `GEMINI_API_KEY`, then `API_KEY`.
    ///
    /// Empty values are treated as absent.
    pub fn from_env() -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty());

        Self {
            api_key,
            ..Self::default()
        }
    }

    /// Whether a non-empty credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

// Keeps the credential out of logs.
impl std::fmt::Debug for NamingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamingConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Naming service settings.
    pub naming: NamingConfig,

    /// Merge service settings.
    pub merge: MergeOptions,

    /// Initial output name of a fresh session.
    pub default_output_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            naming: NamingConfig::default(),
            merge: MergeOptions::default(),
            default_output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}
