//! Pipeline orchestration: chains the five annotation stages over one record.
//!
//! Each stage is a pure function of its input document; the orchestrator
//! threads the document through the chain and short-circuits on the first
//! failure, so a failed record surfaces exactly one error and no stage ever
//! sees a half-processed document. Records are independent: one `Pipeline`
//! processes one record start-to-finish with no state carried across runs.

use crate::config::MAX_NGRAM_ORDER;
use crate::document::Document;
use crate::error::PipelineError;
use crate::report::Report;
use crate::stages::{Evaluator, NGramExtractor, OverlapScorer, SpanParser, WordTokenizer};

/// One annotation stage: consumes a document and returns a new document with
/// exactly one layer appended.
pub trait Stage {
    /// Stage name, recorded as layer provenance and in error context.
    fn name(&self) -> &'static str;

    /// Processes one document. Failure aborts the whole record.
    fn process(&self, doc: Document) -> Result<Document, PipelineError>;
}

/// The five-stage annotation pipeline for one record.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Builds the standard parser → tokenizer → n-gram → scorer → evaluator
    /// chain, extracting n-grams up to `max_ngram_order` tokens.
    pub fn new(max_ngram_order: usize) -> Self {
        Self {
            stages: vec![
                Box::new(SpanParser::new()),
                Box::new(WordTokenizer::new()),
                Box::new(NGramExtractor::new(max_ngram_order)),
                Box::new(OverlapScorer::new()),
                Box::new(Evaluator::new()),
            ],
        }
    }

    /// Runs every stage over one raw record line and returns the fully
    /// annotated document.
    pub fn run(&self, line: &str) -> Result<Document, PipelineError> {
        let mut doc = Document::new(line);
        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), "running stage");
            doc = stage.process(doc)?;
        }
        Ok(doc)
    }

    /// Runs the pipeline and renders the per-record report.
    pub fn run_record(&self, line: &str) -> Result<Report, PipelineError> {
        Ok(Report::from_document(&self.run(line)?))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(MAX_NGRAM_ORDER)
    }
}
