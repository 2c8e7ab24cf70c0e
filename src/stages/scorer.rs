//! Overlap scorer: fourth pipeline stage.
//!
//! Builds the set of distinct n-gram surface strings per QA span and scores
//! each answer by Jaccard overlap with the question's set. The question gets
//! the sentinel score so it always ranks last. Scores land on a fresh
//! scored-QA layer; the parser's layer is never touched.

use crate::config::{CONFIDENCE, QUESTION_ID, SENTINEL_SCORE};
use crate::document::{feat, Document, Layer, LayerKind};
use crate::error::PipelineError;
use crate::pipeline::Stage;
use std::collections::HashSet;

const STAGE: &str = "overlap-scorer";

/// Produces the scored-QA layer from the QA, token, and n-gram layers.
#[derive(Debug, Default)]
pub struct OverlapScorer;

impl OverlapScorer {
    /// Creates the scorer stage.
    pub fn new() -> Self {
        Self
    }
}

impl Stage for OverlapScorer {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn process(&self, doc: Document) -> Result<Document, PipelineError> {
        let qa = require_layer(&doc, LayerKind::Qa)?;
        let tokens = require_layer(&doc, LayerKind::Token)?;
        let ngrams = require_layer(&doc, LayerKind::NGram)?;

        let question_set = surface_set(QUESTION_ID, ngrams, tokens, doc.text());

        let mut layer = Layer::new(LayerKind::ScoredQa, STAGE, "qa spans with overlap scores");
        for qa_span in &qa.spans {
            let score = if qa_span.id == QUESTION_ID {
                SENTINEL_SCORE
            } else {
                let answer_set = surface_set(&qa_span.id, ngrams, tokens, doc.text());
                jaccard(&question_set, &answer_set)
            };
            layer.push(
                qa_span
                    .clone()
                    .with_feature(feat::SCORE, score.to_string())
                    .with_feature(feat::PRODUCER, STAGE)
                    .with_feature(feat::CONFIDENCE, CONFIDENCE),
            );
        }

        tracing::debug!(scored = layer.len(), "scored answers");
        Ok(doc.with_layer(layer))
    }
}

fn require_layer(doc: &Document, kind: LayerKind) -> Result<&Layer, PipelineError> {
    doc.layer(kind).ok_or_else(|| PipelineError::UnsupportedInput {
        stage: STAGE,
        reason: format!("document has no {kind:?} layer"),
    })
}

/// Jaccard overlap `|a ∩ b| / |a ∪ b|`, defined as 0 when both sets are empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Collects the distinct surface strings of one QA span's n-grams, order-
/// agnostic: constituent token texts, each stripped of non-word characters,
/// joined by single spaces.
fn surface_set(source_id: &str, ngrams: &Layer, tokens: &Layer, text: &str) -> HashSet<String> {
    let mut set = HashSet::new();
    for gram in &ngrams.spans {
        if gram.feature(feat::SOURCE_ID) != Some(source_id) {
            continue;
        }
        let Some(window) = gram.extent.as_tokens() else {
            continue;
        };
        let surface = tokens.spans[window.head..=window.tail]
            .iter()
            .map(|token| match token.extent.as_chars() {
                Some(chars) => strip_non_word(chars.slice(text)),
                None => String::new(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        set.insert(surface);
    }
    set
}

/// Drops every character outside `[A-Za-z0-9_]`.
fn strip_non_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;
    use crate::stages::{NGramExtractor, SpanParser, WordTokenizer};

    fn score(text: &str) -> Document {
        let doc = SpanParser::new().process(Document::new(text)).unwrap();
        let doc = WordTokenizer::new().process(doc).unwrap();
        let doc = NGramExtractor::default().process(doc).unwrap();
        OverlapScorer::new().process(doc).unwrap()
    }

    fn span_score(doc: &Document, id: &str) -> f64 {
        doc.layer(LayerKind::ScoredQa)
            .unwrap()
            .spans
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.feature(feat::SCORE))
            .unwrap()
            .parse()
            .unwrap()
    }

    #[test]
    fn test_question_gets_sentinel_score() {
        let doc = score("Q what color is it A1 1 red A2 0 blue");
        assert_eq!(span_score(&doc, "q"), SENTINEL_SCORE);
    }

    #[test]
    fn test_sentinel_is_minimum() {
        let doc = score("Q what color is it A1 1 red A2 0 blue");
        let q = span_score(&doc, "q");
        assert!(span_score(&doc, "a1") > q);
        assert!(span_score(&doc, "a2") > q);
    }

    #[test]
    fn test_overlapping_answer_outscores_disjoint_answer() {
        let doc = score("Q what color is the sky A1 1 the sky is blue A2 0 green grass");
        assert!(span_score(&doc, "a1") > span_score(&doc, "a2"));
    }

    #[test]
    fn test_disjoint_answer_scores_zero() {
        let doc = score("Q what color is it A1 1 red A2 0 blue");
        assert_eq!(span_score(&doc, "a1"), 0.0);
        assert_eq!(span_score(&doc, "a2"), 0.0);
    }

    #[test]
    fn test_identical_answer_scores_one() {
        let doc = score("Q red green blue A1 1 red green blue");
        assert_eq!(span_score(&doc, "a1"), 1.0);
    }

    #[test]
    fn test_punctuation_is_stripped_before_matching() {
        // "sky?" in the question matches "sky" in the answer once stripped.
        let doc = score("Q is it the sky? A1 1 the sky A2 0 a rock");
        assert!(span_score(&doc, "a1") > span_score(&doc, "a2"));
    }

    #[test]
    fn test_jaccard_symmetric_and_bounded() {
        let a: HashSet<String> = ["red", "green", "blue"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let b: HashSet<String> = ["blue", "yellow"].iter().map(|s| s.to_string()).collect();
        let ab = jaccard(&a, &b);
        assert_eq!(ab, jaccard(&b, &a));
        assert!((0.0..=1.0).contains(&ab));
        assert_eq!(ab, 0.25);
    }

    #[test]
    fn test_jaccard_of_empty_sets_is_zero() {
        let empty = HashSet::new();
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }

    #[test]
    fn test_missing_layers_are_unsupported_input() {
        let err = OverlapScorer::new()
            .process(Document::new("Q what A1 1 red"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedInput { .. }));
    }

    #[test]
    fn test_strip_non_word() {
        assert_eq!(strip_non_word("sky?"), "sky");
        assert_eq!(strip_non_word("it's"), "its");
        assert_eq!(strip_non_word("under_score"), "under_score");
    }
}
