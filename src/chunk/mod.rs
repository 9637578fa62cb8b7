//! Chunking: split document text into overlapping, size-bounded windows.
//!
//! Two strategies share one contract: take the full document text, return
//! ordered candidate windows with token offsets. The adapter in [`chunk_text`]
//! drops windows below the noise threshold and assigns dense 1-based indices
//! to what survives; nothing downstream ever sees strategy-native output.

pub mod fixed;
pub mod sentence;

use crate::error::ChunkError;

/// Which window construction strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkStrategy {
    /// Fixed-size token windows with constant stride.
    Fixed,
    /// Windows accumulated from whole sentences, same size/overlap budget.
    #[default]
    Sentence,
}

impl ChunkStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Sentence => "sentence",
        }
    }
}

impl std::fmt::Display for ChunkStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Window construction settings.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Window size in whitespace tokens.
    pub chunk_size: usize,
    /// Tokens shared between consecutive windows. Must stay below `chunk_size`.
    pub overlap: usize,
    /// Windows whose trimmed text is not longer than this are discarded
    /// (stray headers, page numbers).
    pub min_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 100,
            min_chars: 80,
        }
    }
}

/// One candidate window, positioned by token offsets into the document.
#[derive(Debug, Clone)]
pub struct Window {
    /// Offset of the first token (inclusive).
    pub start: usize,
    /// Offset past the last token (exclusive).
    pub end: usize,
    /// Window text, tokens joined with single spaces.
    pub text: String,
}

/// A retained chunk, ready for classification and embedding.
#[derive(Debug, Clone)]
pub struct TextChunk {
    /// 1-based index, dense over retained chunks in document order.
    pub index: usize,
    pub text: String,
}

/// Run a strategy over the document and filter the result.
///
/// Indices are assigned after filtering, so discarded windows leave no gaps.
/// Fails if the stride would be non-positive or nothing survives the filter.
pub fn chunk_text(
    text: &str,
    strategy: ChunkStrategy,
    config: &ChunkConfig,
) -> Result<Vec<TextChunk>, ChunkError> {
    if config.overlap >= config.chunk_size {
        return Err(ChunkError::InvalidWindow {
            chunk_size: config.chunk_size,
            overlap: config.overlap,
        });
    }

    let windows = match strategy {
        ChunkStrategy::Fixed => fixed::windows(text, config),
        ChunkStrategy::Sentence => sentence::windows(text, config),
    };

    let chunks: Vec<TextChunk> = windows
        .into_iter()
        .map(|w| w.text.trim().to_string())
        .filter(|t| t.chars().count() > config.min_chars)
        .enumerate()
        .map(|(i, text)| TextChunk { index: i + 1, text })
        .collect();

    if chunks.is_empty() {
        return Err(ChunkError::NoChunks {
            min_chars: config.min_chars,
        });
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repeat_tokens(token: &str, count: usize) -> String {
        std::iter::repeat(token).take(count).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn fixed_chunks_get_dense_one_based_indices() {
        let text = repeat_tokens("word", 1200);
        let chunks = chunk_text(&text, ChunkStrategy::Fixed, &ChunkConfig::default()).unwrap();
        assert_eq!(chunks.len(), 3);
        let indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let config = ChunkConfig {
            chunk_size: 100,
            overlap: 100,
            ..Default::default()
        };
        let err = chunk_text("some text", ChunkStrategy::Fixed, &config).unwrap_err();
        assert!(matches!(err, ChunkError::InvalidWindow { .. }));
    }

    #[test]
    fn all_windows_below_threshold_is_an_error() {
        // 25 two-char tokens: every window trims to well under 80 chars.
        let text = repeat_tokens("ab", 25);
        let config = ChunkConfig {
            chunk_size: 10,
            overlap: 2,
            min_chars: 80,
        };
        let err = chunk_text(&text, ChunkStrategy::Fixed, &config).unwrap_err();
        assert!(matches!(err, ChunkError::NoChunks { min_chars: 80 }));
    }

    #[test]
    fn discarded_windows_leave_no_index_gaps() {
        // 10 long tokens, 8 single-char tokens, 10 long tokens. With windows
        // of 10 tokens and stride 8, the second and fourth windows fall under
        // the threshold and the survivors must still be numbered 1, 2.
        let mut tokens = vec!["alphabetic"; 10];
        tokens.extend(vec!["a"; 8]);
        tokens.extend(vec!["alphabetic"; 10]);
        let text = tokens.join(" ");

        let config = ChunkConfig {
            chunk_size: 10,
            overlap: 2,
            min_chars: 50,
        };
        let chunks = chunk_text(&text, ChunkStrategy::Fixed, &config).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].index, 1);
        assert_eq!(chunks[1].index, 2);
        assert!(chunks[1].text.starts_with("a a alphabetic"));
    }

    #[test]
    fn sentence_strategy_is_accepted_by_the_adapter() {
        let sentence = "This sentence carries enough words to pass the filter easily. ";
        let text = sentence.repeat(20);
        let config = ChunkConfig {
            chunk_size: 60,
            overlap: 10,
            min_chars: 40,
        };
        let chunks = chunk_text(&text, ChunkStrategy::Sentence, &config).unwrap();
        assert!(!chunks.is_empty());
        assert_eq!(chunks[0].index, 1);
    }
}
