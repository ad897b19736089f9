//! Merge and naming outcomes, and the tokens that guard their completion.

use std::fmt;

use crate::merge::MergeReport;
use crate::output::OutputHandle;

/// Identifies one issued merge or naming request.
///
/// Tokens only grow; a completion may write its result only while its token
/// is still the one the outcome is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// The numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues increasing request tokens.
#[derive(Debug, Default)]
pub(crate) struct TokenSource(u64);

impl TokenSource {
    pub(crate) fn next(&mut self) -> RequestToken {
        self.0 += 1;
        RequestToken(self.0)
    }
}

/// Phase of the merge lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePhase {
    /// Nothing produced, nothing running.
    Idle,
    /// A merge is in flight.
    Merging,
    /// An output document is available.
    Ready,
    /// The last merge failed.
    Failed,
}

/// State of the most recent merge attempt.
///
/// The output handle lives inside `Ready`, so leaving `Ready` drops and
/// thereby revokes it.
#[derive(Debug, Default)]
pub enum MergeOutcome {
    /// Nothing produced, nothing running.
    #[default]
    Idle,

    /// Waiting for the request identified by `token`.
    Merging {
        /// Token of the in-flight request.
        token: RequestToken,
    },

    /// The merged document.
    Ready {
        /// Owning handle to the output blob.
        output: OutputHandle,
        /// Statistics of the merge.
        report: MergeReport,
    },

    /// The merge failed with a user-facing message.
    Failed {
        /// Message to show.
        message: String,
    },
}

impl MergeOutcome {
    /// The current phase.
    pub fn phase(&self) -> MergePhase {
        match self {
            Self::Idle => MergePhase::Idle,
            Self::Merging { .. } => MergePhase::Merging,
            Self::Ready { .. } => MergePhase::Ready,
            Self::Failed { .. } => MergePhase::Failed,
        }
    }

    /// The output handle, when ready.
    pub fn output(&self) -> Option<&OutputHandle> {
        match self {
            Self::Ready { output, .. } => Some(output),
            _ => None,
        }
    }

    /// The merge statistics, when ready.
    pub fn report(&self) -> Option<&MergeReport> {
        match self {
            Self::Ready { report, .. } => Some(report),
            _ => None,
        }
    }

    /// The error message, when failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub(crate) fn awaits(&self, token: RequestToken) -> bool {
        matches!(self, Self::Merging { token: current } if *current == token)
    }
}

/// Phase of the naming lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingPhase {
    /// No request issued yet.
    Idle,
    /// A request is in flight.
    Generating,
    /// The last request finished, successfully or with a fallback.
    Done,
}

/// State of the most recent naming attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NamingOutcome {
    /// No request issued yet.
    #[default]
    Idle,

    /// Waiting for the request identified by `token`.
    Generating {
        /// Token of the in-flight request.
        token: RequestToken,
    },

    /// The last request finished.
    Done {
        /// Diagnostic note when the name came from the fallback.
        error: Option<String>,
    },
}

impl NamingOutcome {
    /// The current phase.
    pub fn phase(&self) -> NamingPhase {
        match self {
            Self::Idle => NamingPhase::Idle,
            Self::Generating { .. } => NamingPhase::Generating,
            Self::Done { .. } => NamingPhase::Done,
        }
    }

    /// The diagnostic note of the last request, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Done { error } => error.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn awaits(&self, token: RequestToken) -> bool {
        matches!(self, Self::Generating { token: current } if *current == token)
    }
}
