//! Error types for description and genome operations.
//!
//! Every operation in this crate either completes or leaves its input
//! untouched and reports one of these kinds. Nothing is retried.

use thiserror::Error;

/// Main error type for protoplast_core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescriptionError {
    /// The caller broke an operation contract (capacity, self-link, bounds).
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// An id lookup failed; points to a dangling reference in the snapshot.
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// A genome buffer is truncated or inconsistent.
    #[error("Malformed genome at byte {offset}: {reason}")]
    MalformedGenome { offset: usize, reason: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<DescriptionError>,
    },
}

/// Result type alias for protoplast_core operations.
pub type Result<T> = std::result::Result<T, DescriptionError>;

impl DescriptionError {
    #[must_use]
    pub fn precondition<S: Into<String>>(msg: S) -> Self {
        Self::PreconditionViolation(msg.into())
    }

    #[must_use]
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound(what.into())
    }

    #[must_use]
    pub fn cell_not_found(id: u64) -> Self {
        Self::NotFound(format!("cell {id}"))
    }

    #[must_use]
    pub fn malformed<S: Into<String>>(offset: usize, reason: S) -> Self {
        Self::MalformedGenome {
            offset,
            reason: reason.into(),
        }
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping context wrappers.
    #[must_use]
    pub fn root(&self) -> &DescriptionError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    #[must_use]
    pub fn is_malformed_genome(&self) -> bool {
        matches!(self.root(), Self::MalformedGenome { .. })
    }
}
