//! Span parser: first pipeline stage.
//!
//! Scans one raw record forward over byte positions and emits the question
//! span plus one span per answer marker, each annotated with its correctness
//! flag. The scan works on character positions rather than pre-split words so
//! span boundaries come out as exact offsets into the raw text.
//!
//! Record grammar (one line, single-space separated):
//! `Q <question words...> A<k> <flag> <answer words...> ...`

use crate::config::{PLACEHOLDER_FLAG, QUESTION_ID};
use crate::document::{feat, CharSpan, Document, Extent, Layer, LayerKind, Span, SpanLabel};
use crate::error::PipelineError;
use crate::pipeline::Stage;

const STAGE: &str = "span-parser";

/// Extracts the QA layer from the raw record text.
#[derive(Debug, Default)]
pub struct SpanParser;

impl SpanParser {
    /// Creates the parser stage.
    pub fn new() -> Self {
        Self
    }
}

impl Stage for SpanParser {
    fn name(&self) -> &'static str {
        STAGE
    }

    fn process(&self, doc: Document) -> Result<Document, PipelineError> {
        let mut layer = Layer::new(LayerKind::Qa, STAGE, "question and answer spans");
        layer.spans = parse_spans(doc.text())?;
        tracing::debug!(spans = layer.len(), "parsed record");
        Ok(doc.with_layer(layer))
    }
}

/// Forward cursor yielding `(start, end)` byte ranges of space-delimited
/// tokens. The grammar separates fields with single spaces; runs of spaces
/// are tolerated and skipped.
struct TokenCursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl Iterator for TokenCursor<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] == b' ' {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }
        let start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos] != b' ' {
            self.pos += 1;
        }
        Some((start, self.pos))
    }
}

/// Answer markers are two characters: an uppercase ASCII letter followed by a
/// single digit (`A1`, `A2`, ...).
fn is_answer_marker(token: &str) -> bool {
    let b = token.as_bytes();
    b.len() == 2 && b[0].is_ascii_uppercase() && b[1].is_ascii_digit()
}

fn close_span(spans: &mut Vec<Span>, id: &str, flag: &str, first: Option<usize>, last: usize) {
    // A span with no words collapses to an empty range at its trailing edge.
    let (start, end) = match first {
        Some(s) => (s, last),
        None => (last, last),
    };
    spans.push(
        Span::new(id, SpanLabel::QaSpan, Extent::Chars(CharSpan::new(start, end)))
            .with_feature(feat::IS_CORRECT, flag),
    );
}

/// Scans the record and returns the QA spans in input order: question first,
/// then one span per answer marker.
///
/// Spans are trimmed to word boundaries, so slicing the raw text by a span's
/// offsets reproduces exactly the words the grammar implies. A record with
/// fewer than two spans (question only) is "nothing to score" and yields an
/// empty layer; so does an empty line.
fn parse_spans(text: &str) -> Result<Vec<Span>, PipelineError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut cursor = TokenCursor::new(text);
    let (lead_start, lead_end) = cursor.next().expect("non-blank line has a first token");
    let lead = &text[lead_start..lead_end];
    if lead != "Q" {
        return Err(PipelineError::MalformedRecord {
            reason: format!("expected leading Q marker, found {lead:?}"),
        });
    }

    let mut spans: Vec<Span> = Vec::new();
    let mut id = QUESTION_ID.to_string();
    let mut flag = PLACEHOLDER_FLAG.to_string();
    let mut first: Option<usize> = None;
    let mut last = lead_end;
    let mut answer_no = 0usize;

    while let Some((start, end)) = cursor.next() {
        let token = &text[start..end];
        if is_answer_marker(token) {
            close_span(&mut spans, &id, &flag, first, last);
            answer_no += 1;
            id = format!("a{answer_no}");

            // The token right after the marker is the literal correctness flag.
            let (flag_start, flag_end) = cursor.next().ok_or_else(|| {
                PipelineError::MalformedRecord {
                    reason: format!("marker {token:?} at end of line with no flag"),
                }
            })?;
            let flag_token = &text[flag_start..flag_end];
            let parsed: i64 =
                flag_token
                    .parse()
                    .map_err(|_| PipelineError::MalformedRecord {
                        reason: format!(
                            "flag {flag_token:?} after marker {token:?} is not an integer"
                        ),
                    })?;
            flag = parsed.to_string();
            first = None;
            last = flag_end;
        } else {
            if first.is_none() {
                first = Some(start);
            }
            last = end;
        }
    }
    close_span(&mut spans, &id, &flag, first, last);

    // Question with no answers: nothing to score, not an error.
    if spans.len() < 2 {
        return Ok(Vec::new());
    }
    Ok(spans)
}
