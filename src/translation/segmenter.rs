/*!
 * Fenced code segmentation.
 *
 * Splits a document into alternating code and text spans so that only the
 * text spans are ever sent to a provider. A fence opens with three backticks
 * or three tildes and closes at the nearest following occurrence of the same
 * marker. An opening marker without a closing one is left in the text.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Shortest match from an opening fence to the next identical fence
static FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```.*?```|~~~.*?~~~").unwrap()
});

/// Kind of a document span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Fenced code, never translated
    Code,
    /// Prose eligible for translation
    Text,
}

/// A maximal run of either protected code or translatable text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub content: String,
}

impl Segment {
    pub fn code(content: impl Into<String>) -> Self {
        Self { kind: SegmentKind::Code, content: content.into() }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self { kind: SegmentKind::Text, content: content.into() }
    }

    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::Code
    }
}

/// Split raw text into ordered code/text segments.
///
/// Empty text spans are omitted, so concatenating the result reproduces the
/// input exactly.
pub fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for fence in FENCE_REGEX.find_iter(text) {
        if fence.start() > cursor {
            segments.push(Segment::text(&text[cursor..fence.start()]));
        }
        segments.push(Segment::code(fence.as_str()));
        cursor = fence.end();
    }

    if cursor < text.len() {
        segments.push(Segment::text(&text[cursor..]));
    }

    segments
}

/// Concatenate segments back into a single string
pub fn reassemble(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.content.as_str()).collect()
}
