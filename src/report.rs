//! Per-record output report.
//!
//! The text form is the record's output file: the precision@N value on the
//! first line, then one `A<k> <score>` line per answer in original input
//! order. A record with nothing to score renders as a single `NaN` line.

use crate::config::QUESTION_ID;
use crate::document::{feat, Document, LayerKind};
use crate::stages::evaluator::UNDEFINED_PRECISION;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overlap score of one answer, identified as in the input record (`A1`...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerScore {
    /// Answer identifier in report form (`A1`, `A2`, ...).
    pub id: String,
    /// Jaccard overlap with the question's n-gram set, in `[0, 1]`.
    pub score: f64,
}

/// Scored outcome of one record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    /// Precision@N; `None` when the record has no ground-truth-correct
    /// answers (rendered as `NaN`).
    pub precision: Option<f64>,
    /// Answer scores in original input order.
    pub answers: Vec<AnswerScore>,
}

impl Report {
    /// Extracts the report from a fully evaluated document.
    ///
    /// Answers come from the scored-QA layer (which preserves input order);
    /// the precision value comes from the question span at the bottom of the
    /// evaluated layer. A document with empty layers yields an empty report.
    pub fn from_document(doc: &Document) -> Self {
        let answers = doc
            .layer(LayerKind::ScoredQa)
            .map(|scored| {
                scored
                    .spans
                    .iter()
                    .filter(|span| span.id != QUESTION_ID)
                    .filter_map(|span| {
                        let score: f64 = span.feature(feat::SCORE)?.parse().ok()?;
                        // a1 -> A1
                        let id = span.id.to_ascii_uppercase();
                        Some(AnswerScore { id, score })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let precision = doc
            .layer(LayerKind::Evaluated)
            .and_then(|evaluated| evaluated.spans.last())
            .and_then(|question| question.feature(feat::SCORE))
            .filter(|value| *value != UNDEFINED_PRECISION)
            .and_then(|value| value.parse().ok());

        Self { precision, answers }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            Some(p) => writeln!(f, "{p}")?,
            None => writeln!(f, "{UNDEFINED_PRECISION}")?,
        }
        for answer in &self.answers {
            writeln!(f, "{} {}", answer.id, answer.score)?;
        }
        Ok(())
    }
}
