//! Error types for answer-sheet extraction and grading.
//!
//! Most of these never reach the caller of [`crate::extractor::AnswerSheetExtractor::extract`]:
//! the extractor logs them and degrades to an empty set of detected answers.
//! They surface through the `try_*` entry points and batch-level operations.

/// Result type alias for answer-sheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting or grading answer sheets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The byte stream could not be opened as a document
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Rendering a page to a bitmap failed
    #[error("Failed to rasterize page {page}: {reason}")]
    Rasterization {
        /// Zero-based page index
        page: usize,
        /// Reason reported by the backend
        reason: String,
    },

    /// Extracting the text layer of a page failed
    #[error("Failed to extract text from page {page}: {reason}")]
    PageText {
        /// Zero-based page index
        page: usize,
        /// Reason reported by the backend
        reason: String,
    },

    /// The document backend could not be initialised (e.g. missing shared library)
    #[error("Document backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Answer key token that could not be parsed (strict parsing only)
    #[error("Invalid answer key token '{0}'")]
    InvalidAnswerKey(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A batch was submitted without any documents
    #[error("No documents to grade")]
    EmptyBatch,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
