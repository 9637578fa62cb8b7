//! Curated knowledge-base input (the unified training data JSON).
//!
//! These records were hand-written with authoritative chapter codes, so the
//! pipeline trusts their labels instead of running keyword classification.
//! Every field except `content` is optional; records with blank content are
//! skipped later with a warning.

use std::path::Path;

use serde::Deserialize;

use crate::error::SourceError;

/// Top-level shape of the curated knowledge base.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeBaseFile {
    #[serde(default)]
    pub chunks: Vec<KnowledgeBaseRecord>,
}

/// One curated record.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBaseRecord {
    /// Stable record id (e.g. "ANG001"). Blank ids get a positional fallback.
    #[serde(default, rename = "chunk")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    /// Chapter code ("ANG", "MC", ...), mapped to a block label downstream.
    #[serde(default)]
    pub chapter: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub related: Vec<String>,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default)]
    pub category: String,
}

fn default_audience() -> String {
    "general".into()
}

/// Load and parse a knowledge-base file.
pub fn load(path: &Path) -> Result<KnowledgeBaseFile, SourceError> {
    let display = path.display().to_string();
    let data = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: display.clone(),
        source: e,
    })?;
    serde_json::from_str(&data).map_err(|e| SourceError::KnowledgeBase {
        path: display,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_record_parses() {
        let json = r#"{
            "chapters": ["ANG", "ANX"],
            "chunks": [{
                "chunk": "ANG001",
                "content": "Anger is the first block.",
                "chapter": "ANG",
                "section": "intro",
                "title": "The First Block",
                "tags": ["anger"],
                "keywords": ["block"],
                "related": ["ANG002"],
                "audience": "clinical",
                "category": "anger"
            }]
        }"#;
        let kb: KnowledgeBaseFile = serde_json::from_str(json).unwrap();
        assert_eq!(kb.chunks.len(), 1);

        let record = &kb.chunks[0];
        assert_eq!(record.id, "ANG001");
        assert_eq!(record.chapter, "ANG");
        assert_eq!(record.audience, "clinical");
        assert_eq!(record.tags, vec!["anger"]);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"{"chunks": [{"content": "Just content."}]}"#;
        let kb: KnowledgeBaseFile = serde_json::from_str(json).unwrap();

        let record = &kb.chunks[0];
        assert_eq!(record.id, "");
        assert_eq!(record.chapter, "");
        assert_eq!(record.audience, "general");
        assert!(record.tags.is_empty());
        assert!(record.related.is_empty());
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, SourceError::KnowledgeBase { .. }));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(
            &path,
            r#"{"chunks": [{"chunk": "MC001", "content": "Thoughts arrive uninvited.", "chapter": "MC"}]}"#,
        )
        .unwrap();

        let kb = load(&path).unwrap();
        assert_eq!(kb.chunks.len(), 1);
        assert_eq!(kb.chunks[0].id, "MC001");
    }
}
