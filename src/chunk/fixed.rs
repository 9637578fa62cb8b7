//! Fixed-size token windows with constant stride.

use crate::chunk::{ChunkConfig, Window};

/// Slide a window of `chunk_size` tokens across the document with stride
/// `chunk_size - overlap`.
///
/// The last window ends at the final token; once a window reaches the end,
/// no further start is emitted (a trailing start would only re-emit text the
/// previous window already covers). `chunk_text` validates the stride; the
/// clamp here keeps direct callers finite.
pub fn windows(text: &str, config: &ChunkConfig) -> Vec<Window> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    let stride = config.chunk_size.saturating_sub(config.overlap).max(1);
    let mut out = Vec::new();
    let mut start = 0usize;

    while start < tokens.len() {
        let end = (start + config.chunk_size).min(tokens.len());
        out.push(Window {
            start,
            end,
            text: tokens[start..end].join(" "),
        });
        if end == tokens.len() {
            break;
        }
        start += stride;
    }

    out
}
