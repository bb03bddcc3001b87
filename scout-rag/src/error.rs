//! Error types for the `scout-rag` crate.

use std::time::Duration;

use thiserror::Error;

/// Broad category of a failure, used by callers to decide how to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source data was absent at startup.
    NotLoaded,
    /// A lookup found nothing.
    NotFound,
    /// The caller supplied invalid input or configuration.
    Validation,
    /// An embedding, index or generation backend failed or timed out.
    Upstream,
}

/// Errors that can occur in RAG operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The generative model failed to produce an answer.
    #[error("Generation error ({model}): {message}")]
    Generation {
        /// The model that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// An upstream call did not complete within the configured timeout.
    #[error("{operation} timed out after {}s", .after.as_secs_f32())]
    Timeout {
        /// The operation that timed out (e.g. `"query embedding"`).
        operation: String,
        /// The timeout that elapsed.
        after: Duration,
    },

    /// The corpus could not be read.
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// The report index could not be built at startup, so nothing can be retrieved.
    #[error("Retrieval unavailable: {0}")]
    Unavailable(String),

    /// The question was empty or otherwise unusable.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RagError {
    /// Return the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Embedding { .. }
            | Self::VectorStore { .. }
            | Self::Generation { .. }
            | Self::Timeout { .. } => ErrorKind::Upstream,
            Self::Ingestion(_) | Self::Unavailable(_) => ErrorKind::NotLoaded,
            Self::InvalidQuery(_) | Self::Config(_) => ErrorKind::Validation,
        }
    }

    /// Whether the failure came from an external backend rather than the caller.
    pub fn is_upstream(&self) -> bool {
        self.kind() == ErrorKind::Upstream
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
