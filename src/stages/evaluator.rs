//! Ranker/evaluator: final pipeline stage.
//!
//! Ranks QA spans by overlap score (stable, descending) and computes
//! precision@N, where N is the number of ground-truth-correct answers. The
//! question's sentinel score puts it at the bottom of the ranking; the
//! precision value is written onto it there, as the last span of the
//! evaluated layer.

use crate::document::{feat, Document, Layer, LayerKind, Span};
use crate::error::PipelineError;
use crate::pipeline::Stage;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

const STAGE: &str = "evaluator";

/// Rendering of an absent precision value (no ground-truth-correct answers).
pub const UNDEFINED_PRECISION: &str = "NaN";

/// Produces the evaluated layer from the scored-QA layer.
#[derive(Debug, Default)]
pub struct Evaluator;

impl Evaluator {
    /// Creates the evaluator stage.
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Evaluator {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn process(&self, doc: Document) -> Result<Document, PipelineError> {
        let scored = doc
            .layer(LayerKind::ScoredQa)
            .ok_or_else(|| PipelineError::UnsupportedInput {
                stage: STAGE,
                reason: "document has no scored QA layer".to_string(),
            })?;

        let mut ranked: Vec<(OrderedFloat<f64>, Span)> = Vec::with_capacity(scored.len());
        for span in &scored.spans {
            let score: f64 = span
                .feature(feat::SCORE)
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| PipelineError::UnsupportedInput {
                    stage: STAGE,
                    reason: format!("span {:?} has no numeric score", span.id),
                })?;
            ranked.push((OrderedFloat(score), span.clone()));
        }

        // Stable sort: equal scores keep their input order. The question's
        // sentinel score is the minimum, so it lands last.
        ranked.sort_by_key(|(score, _)| Reverse(*score));

        let n_relevant = scored
            .spans
            .iter()
            .filter(|s| s.feature(feat::IS_CORRECT) == Some("1"))
            .count();
        let n_correct = ranked
            .iter()
            .take(n_relevant)
            .filter(|(_, s)| s.feature(feat::IS_CORRECT) == Some("1"))
            .count();
        // Precision@N is undefined when there are no correct answers at all;
        // the report renders that as NaN.
        let precision = if n_relevant == 0 {
            None
        } else {
            Some(n_correct as f64 / n_relevant as f64)
        };

        let mut layer = Layer::new(LayerKind::Evaluated, STAGE, "score-ranked qa spans");
        layer.spans = ranked.into_iter().map(|(_, span)| span).collect();
        if let Some(last) = layer.spans.last_mut() {
            let value = match precision {
                Some(p) => p.to_string(),
                None => UNDEFINED_PRECISION.to_string(),
            };
            last.features.insert(feat::SCORE.to_string(), value);
        }

        tracing::debug!(n = n_relevant, ?precision, "evaluated record");
        Ok(doc.with_layer(layer))
    }
}
