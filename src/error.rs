// Error types for the analysis pipeline.
//
// Caller-shaped failures (unknown terms, bad parameters, an empty corpus)
// are recoverable and carry the offending term or parameter. Broken internal
// invariants are asserted instead of being reported here.

use thiserror::Error;

/// A specialized Result type for this library.
pub type Result<T, E = TermscapeError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TermscapeError {
    /// A query named a term that is not in the term index.
    #[error("unknown term: {term:?}")]
    UnknownTerm { term: String },

    /// No tokens survived stopword filtering.
    #[error("empty corpus: no tokens remain after stopword filtering")]
    EmptyCorpus,

    /// A parameter was out of range or inconsistent with the current run.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TermscapeError {
    pub(crate) fn unknown_term(term: impl Into<String>) -> Self {
        Self::UnknownTerm { term: term.into() }
    }

    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
