//! End-to-end tests over the five-stage pipeline and the batch driver.

use qa_rank::document::{feat, Document, LayerKind};
use qa_rank::pipeline::{Pipeline, Stage};
use qa_rank::stages::{Evaluator, NGramExtractor, OverlapScorer, SpanParser, WordTokenizer};
use std::fs;

const RECORD: &str = "Q what color is it A1 1 red A2 0 blue";

#[test]
fn scenario_a_two_answers_with_flags() {
    let doc = Pipeline::default().run(RECORD).unwrap();

    let qa = doc.layer(LayerKind::Qa).unwrap();
    assert_eq!(qa.len(), 3);
    assert_eq!(qa.spans[0].id, "q");
    assert_eq!(qa.spans[1].feature(feat::IS_CORRECT), Some("1"));
    assert_eq!(qa.spans[2].feature(feat::IS_CORRECT), Some("0"));

    // N = 1: only a1 is flagged correct; the question's -1 placeholder does
    // not count. a1 ranks top (stable order among equal scores), so P@1 = 1.
    let report = Pipeline::default().run_record(RECORD).unwrap();
    assert_eq!(report.precision, Some(1.0));
}

#[test]
fn scenario_b_no_answer_markers() {
    let report = Pipeline::default()
        .run_record("Q a question with no answers at all")
        .unwrap();
    assert!(report.answers.is_empty());
    assert_eq!(report.precision, None);
    assert_eq!(report.to_string(), "NaN\n");
}

#[test]
fn scenario_c_tied_scores_keep_input_order() {
    // Both answers are disjoint from the question: identical zero scores.
    let report = Pipeline::default().run_record(RECORD).unwrap();
    let ids: Vec<&str> = report.answers.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["A1", "A2"]);
    assert_eq!(report.answers[0].score, report.answers[1].score);
}

#[test]
fn parsed_spans_round_trip_through_offsets() {
    let doc = Pipeline::default().run(RECORD).unwrap();
    let qa = doc.layer(LayerKind::Qa).unwrap();
    let slices: Vec<&str> = qa
        .spans
        .iter()
        .map(|s| s.extent.as_chars().unwrap().slice(doc.text()))
        .collect();
    assert_eq!(slices, vec!["what color is it", "red", "blue"]);
}

#[test]
fn token_offsets_are_monotonic() {
    let doc = Pipeline::default().run(RECORD).unwrap();
    let tokens = doc.layer(LayerKind::Token).unwrap();
    let offsets: Vec<(usize, usize)> = tokens
        .spans
        .iter()
        .map(|t| {
            let c = t.extent.as_chars().unwrap();
            (c.start, c.end)
        })
        .collect();
    assert!(offsets.windows(2).all(|w| w[0].1 <= w[1].0));
}

#[test]
fn ngram_windows_never_cross_owners() {
    let doc = Pipeline::default()
        .run("Q one two three A1 1 four five A2 0 six seven eight")
        .unwrap();
    let tokens = doc.layer(LayerKind::Token).unwrap();
    let ngrams = doc.layer(LayerKind::NGram).unwrap();
    assert!(!ngrams.is_empty());
    for gram in &ngrams.spans {
        let w = gram.extent.as_tokens().unwrap();
        assert_eq!(
            tokens.spans[w.head].feature(feat::SOURCE_ID),
            tokens.spans[w.tail].feature(feat::SOURCE_ID),
        );
    }
}

#[test]
fn question_sentinel_is_strictly_minimum() {
    let doc = Pipeline::default()
        .run("Q what color is the sky A1 1 the sky is blue A2 0 green")
        .unwrap();
    let scored = doc.layer(LayerKind::ScoredQa).unwrap();
    let score_of = |id: &str| -> f64 {
        scored
            .spans
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.feature(feat::SCORE))
            .unwrap()
            .parse()
            .unwrap()
    };
    let q = score_of("q");
    assert!(q < score_of("a1"));
    assert!(q < score_of("a2"));
}

#[test]
fn overlap_ranks_the_closer_answer_first() {
    let report = Pipeline::default()
        .run_record("Q what color is the sky A1 0 green grass A2 1 the sky is blue")
        .unwrap();
    // a2 shares words with the question and is flagged correct: P@1 = 1.
    assert!(report.answers[1].score > report.answers[0].score);
    assert_eq!(report.precision, Some(1.0));
}

// The stage boundary is a serialized-document contract: a stage's output can
// be serialized, shipped, deserialized, and fed to the next stage unchanged.
#[test]
fn stages_compose_across_a_serialized_boundary() {
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(SpanParser::new()),
        Box::new(WordTokenizer::new()),
        Box::new(NGramExtractor::default()),
        Box::new(OverlapScorer::new()),
        Box::new(Evaluator::new()),
    ];

    let mut doc = Document::new(RECORD);
    for stage in &stages {
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(doc, parsed);
        doc = stage.process(parsed).unwrap();
    }

    let direct = Pipeline::default().run(RECORD).unwrap();
    assert_eq!(doc, direct);
}

#[test]
fn batch_driver_end_to_end() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("q001.txt"), format!("{RECORD}\n")).unwrap();
    fs::write(
        input.path().join("q002.txt"),
        "Q what color is the sky A1 1 the sky is blue A2 0 green\n",
    )
    .unwrap();
    fs::write(input.path().join("q003.txt"), "broken record\n").unwrap();
    fs::write(input.path().join("readme.md"), "ignored\n").unwrap();

    let summary =
        qa_rank::batch::run_batch(&Pipeline::default(), input.path(), output.path()).unwrap();
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 1);

    let a002 = fs::read_to_string(output.path().join("a002.txt")).unwrap();
    let mut lines = a002.lines();
    assert_eq!(lines.next(), Some("1"));
    let a1_line = lines.next().unwrap();
    assert!(a1_line.starts_with("A1 "));
    let a1_score: f64 = a1_line.split_whitespace().nth(1).unwrap().parse().unwrap();
    assert!(a1_score > 0.0);
}
