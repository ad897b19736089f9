//! Smart naming service.
//!
//! Asks a text-generation model for an output file name derived from the
//! input file names. The service fails soft: any error (missing credential,
//! network failure, unusable response) produces a date-based fallback name
//! instead, so callers always receive a usable name.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::config::NamingConfig;
//! use pdfmerge::naming::SmartNamer;
//!
//! # async fn example() {
//! let namer = SmartNamer::new(&NamingConfig::from_env());
//! let suggestion = namer.suggest_name(&["q1.pdf", "q2.pdf"]).await;
//! println!("{}", suggestion.name);
//! # }
//! ```

pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiClient, TextGenerator};
pub use prompt::{build_prompt, clean_response, fallback_name, fallback_name_for};

use std::sync::Arc;

use crate::config::{DEFAULT_MODEL, NamingConfig};
use crate::error::NamingError;

/// Outcome of a naming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSuggestion {
    /// The name to use.
    pub name: String,

    /// Why the fallback was used, if it was. Diagnostic only.
    pub fallback_reason: Option<String>,
}

impl NameSuggestion {
    /// Whether this is the date-based fallback rather than a model answer.
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Suggests output file names using a [`TextGenerator`].
#[derive(Clone)]
pub struct SmartNamer {
    generator: Arc<dyn TextGenerator>,
    model: String,
}

impl SmartNamer {
    /// Create a namer backed by the Gemini API.
    pub fn new(config: &NamingConfig) -> Self {
        Self {
            generator: Arc::new(GeminiClient::new(config)),
            model: config.model.clone(),
        }
    }

    /// Create a namer backed by an arbitrary generator, using the default model.
    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Suggest a name for merging `filenames`, in order.
    ///
    /// Never fails; see [`NameSuggestion::fallback_reason`].
    pub async fn suggest_name<S: AsRef<str>>(&self, filenames: &[S]) -> NameSuggestion {
        match self.try_suggest(filenames).await {
            Ok(name) => {
                tracing::info!(%name, "Generated output name");
                NameSuggestion {
                    name,
                    fallback_reason: None,
                }
            }
            Err(err) => {
                let name = fallback_name();
                tracing::warn!(error = %err, %name, "Name generation failed, using fallback");
                NameSuggestion {
                    name,
                    fallback_reason: Some(err.to_string()),
                }
            }
        }
    }

    async fn try_suggest<S: AsRef<str>>(&self, filenames: &[S]) -> Result<String, NamingError> {
        let prompt = build_prompt(filenames);
        let raw = self.generator.generate(&self.model, &prompt).await?;
        clean_response(&raw).ok_or(NamingError::EmptyResponse)
    }
}
