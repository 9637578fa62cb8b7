//! PDF text extraction backed by `pdf-extract`.

use crate::error::SourceError;

/// Extract the full document text from PDF bytes.
///
/// Pages that yield no text are skipped; the rest are concatenated with
/// newlines. Extraction that produces no usable text at all is an error:
/// a scanned book without OCR has nothing to chunk.
pub fn extract_text(data: &[u8]) -> Result<String, SourceError> {
    let text = pdf_extract::extract_text_from_mem(data).map_err(|e| SourceError::PdfParse {
        message: e.to_string(),
    })?;

    let joined = join_pages(&text);
    if joined.is_empty() {
        return Err(SourceError::EmptyDocument {
            origin: "(pdf)".into(),
        });
    }
    Ok(joined)
}

/// Join per-page text, dropping blank pages.
///
/// `pdf-extract` inserts form feeds between pages; triple newlines are the
/// fallback page break for text that carries none.
fn join_pages(text: &str) -> String {
    let pages: Vec<&str> = if text.contains('\x0C') {
        text.split('\x0C').collect()
    } else {
        text.split("\n\n\n").collect()
    };

    pages
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_pdf_bytes_fail_to_parse() {
        let result = extract_text(b"This is not a PDF");
        assert!(matches!(result, Err(SourceError::PdfParse { .. })));
    }

    #[test]
    fn pages_split_on_form_feeds() {
        let joined = join_pages("page one\x0C  page two  \x0C\x0C page three");
        assert_eq!(joined, "page one\npage two\npage three");
    }

    #[test]
    fn fallback_page_break_is_triple_newline() {
        let joined = join_pages("first\n\n\nsecond\n\n\n\n\n\nthird");
        assert_eq!(joined, "first\nsecond\nthird");
    }

    #[test]
    fn blank_extraction_joins_to_empty() {
        assert_eq!(join_pages(""), "");
        assert_eq!(join_pages("\x0C \x0C\n\n"), "");
    }
}
