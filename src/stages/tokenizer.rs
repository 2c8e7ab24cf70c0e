//! Word tokenizer: second pipeline stage.
//!
//! Splits each QA span's substring on whitespace runs and recovers each
//! word's absolute offsets by searching the raw text forward from a strictly
//! non-decreasing cursor. Offsets stay monotonic and character-exact even
//! when the split discards surrounding whitespace.

use crate::config::{CONFIDENCE, QUESTION_ID};
use crate::document::{feat, CharSpan, Document, Extent, Layer, LayerKind, Span, SpanLabel};
use crate::error::PipelineError;
use crate::pipeline::Stage;

const STAGE: &str = "word-tokenizer";

/// Produces the token layer from the QA layer.
#[derive(Debug, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    /// Creates the tokenizer stage.
    pub fn new() -> Self {
        Self
    }
}

impl Stage for WordTokenizer {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn process(&self, doc: Document) -> Result<Document, PipelineError> {
        let mut layer = Layer::new(LayerKind::Token, STAGE, "whitespace words");

        // A missing QA layer means the record had nothing to annotate;
        // contribute an empty token layer rather than failing.
        if let Some(qa) = doc.layer(LayerKind::Qa) {
            let text = doc.text();
            // Shared across all spans, never moves backwards.
            let mut search_cursor = 0usize;
            let mut next_id = 0usize;

            for qa_span in &qa.spans {
                let extent = qa_span.extent.as_chars().ok_or_else(|| {
                    PipelineError::UnsupportedInput {
                        stage: STAGE,
                        reason: format!("QA span {:?} has no char extent", qa_span.id),
                    }
                })?;
                let owner = qa_span.id.as_str();
                let prefix = if owner == QUESTION_ID { "qtok" } else { "atok" };

                for word in extent.slice(text).split_whitespace() {
                    let found = text[search_cursor..].find(word).ok_or_else(|| {
                        PipelineError::TokenizationMismatch {
                            word: word.to_string(),
                            cursor: search_cursor,
                        }
                    })?;
                    let start = search_cursor + found;
                    let end = start + word.len();
                    search_cursor = end;

                    layer.push(
                        Span::new(
                            format!("{prefix}{next_id}"),
                            SpanLabel::Token,
                            Extent::Chars(CharSpan::new(start, end)),
                        )
                        .with_feature(feat::WORD, word)
                        .with_feature(feat::SOURCE_ID, owner)
                        .with_feature(feat::PRODUCER, STAGE)
                        .with_feature(feat::CONFIDENCE, CONFIDENCE),
                    );
                    next_id += 1;
                }
            }
        }

        tracing::debug!(tokens = layer.len(), "tokenized record");
        Ok(doc.with_layer(layer))
    }
}
