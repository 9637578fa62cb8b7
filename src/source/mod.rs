//! Source reading: raw book PDF or pre-chunked knowledge-base JSON.
//!
//! Format is detected from the file extension unless overridden. The path is
//! checked eagerly so a missing file fails before any chunking or embedding
//! work starts.

pub mod knowledge_base;
pub mod pdf;

use std::path::Path;

use crate::error::SourceError;
use crate::source::knowledge_base::KnowledgeBaseFile;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Raw book text, extracted and chunked by this pipeline.
    Pdf,
    /// Hand-curated records that skip extraction and chunking.
    KnowledgeBase,
}

impl SourceFormat {
    /// Human-readable name for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::KnowledgeBase => "kb",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the input format from a file extension.
pub fn detect_format(path: &str) -> Option<SourceFormat> {
    let lower = path.to_lowercase();
    if lower.ends_with(".pdf") {
        Some(SourceFormat::Pdf)
    } else if lower.ends_with(".json") {
        Some(SourceFormat::KnowledgeBase)
    } else {
        None
    }
}

/// What was read from disk, before chunking.
#[derive(Debug)]
pub enum SourceDocument {
    /// Flat document text extracted from a PDF.
    Text(String),
    /// Pre-chunked records from the curated training data.
    KnowledgeBase(KnowledgeBaseFile),
}

/// Read the source at `path`, dispatching on the detected or explicit format.
pub fn load(path: &Path, format: Option<SourceFormat>) -> Result<SourceDocument, SourceError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(SourceError::NotFound { path: display });
    }

    let format = match format {
        Some(f) => f,
        None => detect_format(&display).ok_or(SourceError::UnknownFormat { path: display.clone() })?,
    };

    match format {
        SourceFormat::Pdf => {
            let data = std::fs::read(path).map_err(|e| SourceError::Io {
                path: display,
                source: e,
            })?;
            Ok(SourceDocument::Text(pdf::extract_text(&data)?))
        }
        SourceFormat::KnowledgeBase => Ok(SourceDocument::KnowledgeBase(knowledge_base::load(path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format("content/book.pdf"), Some(SourceFormat::Pdf));
        assert_eq!(detect_format("BOOK.PDF"), Some(SourceFormat::Pdf));
        assert_eq!(
            detect_format("data/unified-knowledge-base.json"),
            Some(SourceFormat::KnowledgeBase)
        );
        assert_eq!(detect_format("notes.txt"), None);
        assert_eq!(detect_format("book"), None);
    }

    #[test]
    fn load_missing_file_fails_eagerly() {
        let err = load(Path::new("/nonexistent/book.pdf"), None).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[test]
    fn load_unknown_extension_without_override_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("book.docx");
        std::fs::write(&path, b"whatever").unwrap();

        let err = load(&path, None).unwrap_err();
        assert!(matches!(err, SourceError::UnknownFormat { .. }));
    }

    #[test]
    fn explicit_format_overrides_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("records.data");
        std::fs::write(&path, r#"{"chunks": []}"#).unwrap();

        let doc = load(&path, Some(SourceFormat::KnowledgeBase)).unwrap();
        assert!(matches!(doc, SourceDocument::KnowledgeBase(_)));
    }
}
