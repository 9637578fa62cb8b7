//! Sentence-aligned windows.
//!
//! Same size/overlap budget as the fixed strategy, but windows are built from
//! whole sentences so boundaries land on sentence edges. The trailing
//! sentences of each emitted window seed the next one until the overlap
//! budget is covered. A single sentence longer than the window falls back to
//! fixed token windows for that sentence.

use crate::chunk::{ChunkConfig, Window, fixed};

struct Sentence {
    /// Token offset of this sentence within the document.
    start: usize,
    tokens: usize,
    text: String,
}

/// Accumulate sentences into windows of at most `chunk_size` tokens.
pub fn windows(text: &str, config: &ChunkConfig) -> Vec<Window> {
    let sentences = annotate(split_sentences(text));
    if sentences.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    // Indices into `sentences` forming the window under construction.
    let mut buf: Vec<usize> = Vec::new();
    let mut buf_tokens = 0usize;

    for (i, sentence) in sentences.iter().enumerate() {
        if sentence.tokens > config.chunk_size {
            // Oversized sentence: flush, then hard-split on token windows.
            // Hard-split text is not carried into the next window.
            emit(&sentences, &buf, &mut out);
            buf.clear();
            buf_tokens = 0;

            for w in fixed::windows(&sentence.text, config) {
                out.push(Window {
                    start: sentence.start + w.start,
                    end: sentence.start + w.end,
                    text: w.text,
                });
            }
            continue;
        }

        if buf_tokens + sentence.tokens > config.chunk_size && !buf.is_empty() {
            emit(&sentences, &buf, &mut out);

            // Carry trailing sentences until the overlap budget is covered,
            // always leaving at least the first sentence behind.
            let mut carried = Vec::new();
            let mut carried_tokens = 0usize;
            for &j in buf.iter().rev() {
                if carried_tokens >= config.overlap || carried.len() + 1 >= buf.len() {
                    break;
                }
                carried.push(j);
                carried_tokens += sentences[j].tokens;
            }
            carried.reverse();
            buf = carried;
            buf_tokens = carried_tokens;

            // An overshooting carry may not leave room for the incoming
            // sentence; shed from the front until it fits.
            while !buf.is_empty() && buf_tokens + sentence.tokens > config.chunk_size {
                buf_tokens -= sentences[buf.remove(0)].tokens;
            }
        }

        buf.push(i);
        buf_tokens += sentence.tokens;
    }

    emit(&sentences, &buf, &mut out);
    out
}

fn emit(sentences: &[Sentence], buf: &[usize], out: &mut Vec<Window>) {
    let (Some(&first), Some(&last)) = (buf.first(), buf.last()) else {
        return;
    };
    let text = buf
        .iter()
        .map(|&j| sentences[j].text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    out.push(Window {
        start: sentences[first].start,
        end: sentences[last].start + sentences[last].tokens,
        text,
    });
}

fn annotate(raw: Vec<String>) -> Vec<Sentence> {
    let mut sentences = Vec::with_capacity(raw.len());
    let mut offset = 0usize;
    for text in raw {
        let tokens = text.split_whitespace().count();
        if tokens == 0 {
            continue;
        }
        sentences.push(Sentence {
            start: offset,
            tokens,
            text,
        });
        offset += tokens;
    }
    sentences
}

/// Split text at sentence boundaries (`.`, `!`, `?` followed by whitespace).
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    let chars: Vec<char> = text.chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        current.push(ch);
        if (ch == '.' || ch == '!' || ch == '?')
            && i + 1 < chars.len()
            && chars[i + 1].is_whitespace()
        {
            let trimmed = current.trim().to_string();
            if !trimmed.is_empty() {
                sentences.push(trimmed);
            }
            current.clear();
        }
    }
    let trimmed = current.trim().to_string();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
    sentences
}
