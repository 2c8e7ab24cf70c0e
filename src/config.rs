//! Global configuration constants for qa-rank.
//!
//! Tuning parameters and naming conventions are defined here as compile-time
//! constants; runtime configuration is handled via CLI arguments in `main.rs`.

/// Highest n-gram order extracted. Windows of 1..=MAX_NGRAM_ORDER consecutive
/// tokens are emitted per QA span.
pub const MAX_NGRAM_ORDER: usize = 3;

/// Score assigned to the question span by the scorer.
///
/// Sits below any real overlap score (which lies in `[0, 1]`), so the question
/// is guaranteed to sort last when answers are ranked by score.
pub const SENTINEL_SCORE: f64 = -1.0;

/// Span id of the question within the QA layer. Answers are `a1`, `a2`, ...
pub const QUESTION_ID: &str = "q";

/// Placeholder correctness flag carried by the question span. Never counted
/// as a correct answer.
pub const PLACEHOLDER_FLAG: &str = "-1";

/// Fixed confidence value attached to every produced annotation.
pub const CONFIDENCE: &str = "1";

/// Record files must match `q<NNN>.txt`; the capture group is the record
/// number reused in the output filename.
pub const INPUT_FILE_PATTERN: &str = r"^q(\d{3})\.txt$";

/// Reports are written as `a<NNN>.txt`, keyed by the input record number.
pub const OUTPUT_FILE_PREFIX: &str = "a";
