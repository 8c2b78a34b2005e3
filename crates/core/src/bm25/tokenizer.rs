//! Lexical tokenizer for BM25.
//!
//! Lowercases the input, treats every character outside `[a-z0-9]` as a
//! separator, and splits on runs of separators. No stop words, no stemming,
//! no minimum token length. Uses a zero-per-token allocation design via byte spans.

/// Tokenized text: owns the lowercased buffer, provides &str slices via byte spans.
/// Only 1 heap allocation (the lowercased String) instead of N per-token Strings.
#[derive(Debug, Clone)]
pub struct Tokens {
    buffer: String,
    spans: Vec<(u32, u32)>, // (start, end) byte offsets into buffer
}

impl Tokens {
    /// Returns an iterator over the token `&str` slices.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans
            .iter()
            .map(|&(s, e)| &self.buffer[s as usize..e as usize])
    }

    /// Returns the number of tokens.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[inline]
fn is_term_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Tokenize text: lowercase, split on anything outside `[a-z0-9]`.
///
/// Lowercasing happens before classification, so uppercase ASCII (and the few
/// non-ASCII characters whose lowercase form is ASCII) survive as terms.
pub fn tokenize(text: &str) -> Tokens {
    let buffer = text.to_lowercase();
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in buffer.char_indices() {
        if is_term_char(c) {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            spans.push((s as u32, i as u32));
        }
    }
    // Handle last token (no trailing separator)
    if let Some(s) = start {
        spans.push((s as u32, buffer.len() as u32));
    }

    Tokens { buffer, spans }
}
