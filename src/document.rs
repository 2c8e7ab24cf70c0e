//! Annotation document model: raw record text plus append-only layers of spans.
//!
//! A `Document` is created once per input record and flows through the pipeline
//! by value. Each stage consumes the document and returns a new one with exactly
//! one layer appended; no stage mutates a layer it did not produce. All types
//! here are serde-serializable so the stage boundary is a serializable contract:
//! any stage can be lifted out of process without changing the types.
//!
//! Spans carry one of two extent kinds: byte offsets into the raw text (QA
//! spans and tokens), or index windows into the token layer (n-grams). The two
//! are distinct types so they cannot be mixed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feature keys shared across stages.
pub mod feat {
    /// Correctness flag on QA spans: `"0"` / `"1"`; the question carries the
    /// placeholder `"-1"`.
    pub const IS_CORRECT: &str = "is_correct";
    /// Overlap score on scored QA spans; precision@N on the evaluated
    /// question span.
    pub const SCORE: &str = "score";
    /// Literal word text on token spans.
    pub const WORD: &str = "word";
    /// Id of the owning QA span, on token and n-gram spans.
    pub const SOURCE_ID: &str = "source_id";
    /// N-gram order (`"1"` / `"2"` / `"3"`).
    pub const ORDER: &str = "order";
    /// Name of the stage that produced the annotation.
    pub const PRODUCER: &str = "producer";
    /// Fixed confidence attached by producing stages.
    pub const CONFIDENCE: &str = "confidence";
}

/// Half-open byte-offset range into the document's raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharSpan {
    /// First byte of the covered region.
    pub start: usize,
    /// One past the last byte of the covered region.
    pub end: usize,
}

impl CharSpan {
    /// Creates a span over `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Slices the raw text covered by this span.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Inclusive window over the token layer's span sequence.
///
/// `head` and `tail` are indices into the token layer, never byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenWindow {
    /// Index of the first token in the window.
    pub head: usize,
    /// Index of the last token in the window (inclusive).
    pub tail: usize,
}

impl TokenWindow {
    /// Creates a window covering tokens `head..=tail`.
    pub fn new(head: usize, tail: usize) -> Self {
        debug_assert!(head <= tail);
        Self { head, tail }
    }

    /// Number of tokens in the window (the n-gram order).
    pub fn len(&self) -> usize {
        self.tail - self.head + 1
    }

    /// Windows always contain at least one token.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// The extent a span covers: either raw-text offsets or token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extent {
    /// Byte offsets into the raw text (QA spans, tokens).
    Chars(CharSpan),
    /// Indices into the token layer (n-grams).
    Tokens(TokenWindow),
}

impl Extent {
    /// Returns the char-offset extent, if that is what this span carries.
    pub fn as_chars(&self) -> Option<CharSpan> {
        match self {
            Extent::Chars(s) => Some(*s),
            Extent::Tokens(_) => None,
        }
    }

    /// Returns the token-window extent, if that is what this span carries.
    pub fn as_tokens(&self) -> Option<TokenWindow> {
        match self {
            Extent::Tokens(w) => Some(*w),
            Extent::Chars(_) => None,
        }
    }
}

/// Annotation category of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanLabel {
    /// Question or answer region of the record.
    QaSpan,
    /// Single whitespace-delimited word.
    Token,
    /// Contiguous window of 1-3 tokens within one QA span.
    NGram,
}

/// One annotated region: id unique within its layer, label, extent, and a
/// string-to-string feature map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Identifier, unique within the owning layer (`q`, `a1`, `qtok0`, ...).
    pub id: String,
    /// Annotation category.
    pub label: SpanLabel,
    /// What region this span covers.
    pub extent: Extent,
    /// Typed features, keyed by the constants in [`feat`]. BTreeMap keeps
    /// serialization order deterministic.
    pub features: BTreeMap<String, String>,
}

impl Span {
    /// Creates a span with an empty feature map.
    pub fn new(id: impl Into<String>, label: SpanLabel, extent: Extent) -> Self {
        Self {
            id: id.into(),
            label,
            extent,
            features: BTreeMap::new(),
        }
    }

    /// Builder-style feature insertion.
    pub fn with_feature(mut self, key: &str, value: impl Into<String>) -> Self {
        self.features.insert(key.to_string(), value.into());
        self
    }

    /// Looks up a feature value.
    pub fn feature(&self, key: &str) -> Option<&str> {
        self.features.get(key).map(String::as_str)
    }
}

/// Identifies which stage's output a layer holds.
///
/// Stages look layers up by kind, never by position, so reordering or
/// inserting stages cannot silently redirect a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Question/answer spans from the parser.
    Qa,
    /// Word tokens from the tokenizer.
    Token,
    /// N-gram windows from the extractor.
    NGram,
    /// QA spans with overlap scores attached.
    ScoredQa,
    /// Score-ranked QA spans with the precision@N result.
    Evaluated,
}

/// An ordered run of spans produced by one pipeline stage, with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Which stage output this layer holds.
    pub kind: LayerKind,
    /// Name of the stage that produced the layer.
    pub producer: String,
    /// Free-text description of the layer's contents.
    pub label: String,
    /// Spans in production order. Order is significant: token order defines
    /// n-gram windows, and QA order defines the report's answer order.
    pub spans: Vec<Span>,
}

impl Layer {
    /// Creates an empty layer with provenance.
    pub fn new(kind: LayerKind, producer: &str, label: &str) -> Self {
        Self {
            kind,
            producer: producer.to_string(),
            label: label.to_string(),
            spans: Vec::new(),
        }
    }

    /// Appends a span.
    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// Number of spans in the layer.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if the layer holds no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Raw record text plus accumulated annotation layers.
///
/// The text is immutable once set; layers accumulate append-only. Fields are
/// private so the only way to grow a document is [`Document::with_layer`],
/// which consumes the old value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    text: String,
    layers: Vec<Layer>,
}

impl Document {
    /// Creates a document over one raw record line, with no layers yet.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            layers: Vec::new(),
        }
    }

    /// The raw record text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Copy-on-append: consumes the document and returns it with one more
    /// layer.
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Finds the layer of the given kind, if any stage has produced it.
    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().rev().find(|l| l.kind == kind)
    }

    /// All layers in production order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}
