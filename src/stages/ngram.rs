//! N-gram extractor: third pipeline stage.
//!
//! Emits one span per contiguous window of 1..=max_order tokens, skipping any
//! window whose head and tail tokens belong to different QA spans. N-gram
//! extents are token-layer indices, not character offsets; the `TokenWindow`
//! type keeps the two from mixing.

use crate::config::MAX_NGRAM_ORDER;
use crate::document::{feat, Document, Extent, Layer, LayerKind, Span, SpanLabel, TokenWindow};
use crate::error::PipelineError;
use crate::pipeline::Stage;

const STAGE: &str = "ngram-extractor";

/// Produces the n-gram layer from the token layer.
#[derive(Debug)]
pub struct NGramExtractor {
    max_order: usize,
}

impl NGramExtractor {
    /// Creates the extractor for windows of 1..=`max_order` tokens.
    pub fn new(max_order: usize) -> Self {
        Self { max_order }
    }
}

impl Default for NGramExtractor {
    fn default() -> Self {
        Self::new(MAX_NGRAM_ORDER)
    }
}

impl Stage for NGramExtractor {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn process(&self, doc: Document) -> Result<Document, PipelineError> {
        let tokens = doc
            .layer(LayerKind::Token)
            .ok_or_else(|| PipelineError::UnsupportedInput {
                stage: STAGE,
                reason: "document has no token layer".to_string(),
            })?;

        let mut layer = Layer::new(LayerKind::NGram, STAGE, "token n-grams");
        let len = tokens.len();
        let mut next_id = 0usize;

        for order in 1..=self.max_order {
            for head in 0..len {
                let tail = head + order - 1;
                if tail >= len {
                    break;
                }
                let head_owner = tokens.spans[head].feature(feat::SOURCE_ID);
                let tail_owner = tokens.spans[tail].feature(feat::SOURCE_ID);
                // Windows crossing a QA span boundary are silently dropped.
                if head_owner != tail_owner {
                    continue;
                }
                let owner = head_owner.unwrap_or_default().to_string();
                layer.push(
                    Span::new(
                        format!("{order}gram{next_id}"),
                        SpanLabel::NGram,
                        Extent::Tokens(TokenWindow::new(head, tail)),
                    )
                    .with_feature(feat::SOURCE_ID, owner)
                    .with_feature(feat::ORDER, order.to_string()),
                );
                next_id += 1;
            }
        }

        tracing::debug!(ngrams = layer.len(), "extracted n-grams");
        Ok(doc.with_layer(layer))
    }
}
