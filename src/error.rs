//! Pipeline error types.
//!
//! Any stage that fails aborts its record; the batch driver logs the record as
//! failed and moves on to the next file. Empty input is deliberately not a
//! failure: it flows through the pipeline as an empty layer and produces an
//! empty report, except for the zero-byte file case surfaced as
//! [`PipelineError::EmptyInput`] so the driver can log it distinctly.

use thiserror::Error;

/// Errors a pipeline stage or the batch driver can raise.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage received a document missing the layer it consumes.
    #[error("{stage}: unsupported input: {reason}")]
    UnsupportedInput {
        /// Name of the stage that rejected the document.
        stage: &'static str,
        /// What was wrong with the document shape.
        reason: String,
    },

    /// The parser could not reconcile the record with the input grammar.
    #[error("malformed record: {reason}")]
    MalformedRecord {
        /// What the parser expected and what it found.
        reason: String,
    },

    /// A word produced by whitespace splitting could not be located in the
    /// raw text forward of the tokenizer cursor.
    #[error("tokenization mismatch: word {word:?} not found at or after byte {cursor}")]
    TokenizationMismatch {
        /// The word that could not be located.
        word: String,
        /// Cursor position the forward search started from.
        cursor: usize,
    },

    /// A record file held no data at all.
    #[error("empty or missing input")]
    EmptyInput,

    /// Filesystem failure while reading records or writing reports.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
