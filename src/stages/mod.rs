//! The five annotation stages, in pipeline order.

/// Ranking and precision@N evaluation.
pub mod evaluator;
/// 1-, 2-, 3-token window extraction.
pub mod ngram;
/// Record grammar scanning into QA spans.
pub mod parser;
/// Jaccard overlap scoring of answers against the question.
pub mod scorer;
/// Whitespace word splitting with offset recovery.
pub mod tokenizer;

pub use evaluator::Evaluator;
pub use ngram::NGramExtractor;
pub use parser::SpanParser;
pub use scorer::OverlapScorer;
pub use tokenizer::WordTokenizer;
