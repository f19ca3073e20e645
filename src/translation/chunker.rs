/*!
 * Paragraph-aware chunking of text segments.
 *
 * Providers cap the size of a single request, so long text spans are cut on
 * blank-line paragraph boundaries. Each paragraph keeps the blank lines that
 * follow it, which makes the chunks concatenate back to the exact input.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Default maximum chunk size in characters
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 4000;

/// One or more blank lines (whitespace-only lines count as blank), LF or CRLF
static PARAGRAPH_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n[ \t]*\r?\n(?:[ \t]*\r?\n)*").unwrap()
});

/// Split text into paragraphs, each carrying its trailing blank lines
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut cursor = 0;

    for brk in PARAGRAPH_BREAK_REGEX.find_iter(text) {
        paragraphs.push(&text[cursor..brk.end()]);
        cursor = brk.end();
    }

    if cursor < text.len() {
        paragraphs.push(&text[cursor..]);
    }

    paragraphs
}

/// Subdivide a text segment into chunks of at most `max_chars` characters.
///
/// A paragraph that is larger than the limit on its own becomes a single
/// oversized chunk; paragraphs are never split internally.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_chars = 0;

    for paragraph in split_paragraphs(text) {
        let paragraph_chars = paragraph.chars().count();

        if !buffer.is_empty() && buffer_chars + paragraph_chars > max_chars {
            chunks.push(std::mem::take(&mut buffer));
            buffer_chars = 0;
        }

        buffer.push_str(paragraph);
        buffer_chars += paragraph_chars;
    }

    if !buffer.is_empty() {
        chunks.push(buffer);
    }

    chunks
}
