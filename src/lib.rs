//! # qa-rank
//!
//! Scores candidate answers to a question by lexical n-gram overlap with the
//! question text and reports precision@N. One record (a question plus its
//! candidate answers) arrives as a single line of structured raw text and
//! leaves as a ranked, scored report.
//!
//! ## Architecture
//!
//! ```text
//! raw line → Span Parser → Word Tokenizer → N-gram Extractor
//!          → Overlap Scorer → Ranker/Evaluator → Report
//! ```
//!
//! Every stage consumes an immutable [`document::Document`] and returns a new
//! one with exactly one annotation layer appended. QA spans and tokens carry
//! byte offsets into the raw text; n-grams carry token-index windows — the
//! two extent kinds are separate types and cannot be mixed. The batch driver
//! walks a directory of `q<NNN>.txt` record files and writes one `a<NNN>.txt`
//! report per record.

/// Directory batch driver: one report file per record file.
pub mod batch;
/// Global configuration constants: n-gram order, sentinels, and naming conventions.
pub mod config;
/// Document model: raw text, append-only layers, dual-typed span extents.
pub mod document;
/// Pipeline error types.
pub mod error;
/// Stage trait and the five-stage orchestrator.
pub mod pipeline;
/// Per-record report: precision@N plus per-answer scores.
pub mod report;
/// The five annotation stages.
pub mod stages;
