//! Error types for the analysis pipeline.
//!
//! Network, parse and oracle failures never show up here: they are
//! absorbed by the degraded path, the regex extractor, and an absent
//! oracle report respectively.

/// Errors that can escape the analysis pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// Input is not a well-formed http(s) URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A produced score breakdown broke a structural invariant.
    #[error("score invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, AuditError>;
