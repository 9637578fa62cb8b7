//! The persisted knowledge-base artifact.
//!
//! Downstream retrieval reads this file byte-for-byte, so the serde shapes
//! here are the contract. The writer only ever emits schema 3.0; the reader
//! keeps older generations loadable by defaulting fields (`chapters`,
//! `dimensions`, `additional_topics`) that early files lacked.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WriteError;
use crate::label::{ADDITIONAL_TOPICS, BlockLabel, CORE_BLOCKS};

/// Schema revision this pipeline writes.
pub const SCHEMA_VERSION: &str = "3.0";

/// Per-chunk metadata persisted alongside the vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
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
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub token_count: usize,
}

/// One embedded chunk: text, vector, label, metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    /// Stable id, unique within the file ("chunk_1", "ANG001", ...).
    pub id: String,
    pub text: String,
    /// One f32 per dimension declared in the envelope.
    pub embedding: Vec<f32>,
    pub block_type: BlockLabel,
    pub metadata: ChunkMetadata,
}

/// Chapter summary entry: chunk count per label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterInfo {
    pub code: String,
    pub name: String,
    pub count: usize,
}

/// Envelope-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
    pub source: String,
    pub description: String,
    /// Always the four core block names.
    pub blocks: Vec<String>,
    #[serde(default)]
    pub additional_topics: Vec<String>,
}

/// The versioned output artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseEnvelope {
    pub version: String,
    pub model: String,
    #[serde(default)]
    pub dimensions: usize,
    pub total_chunks: usize,
    #[serde(default)]
    pub chapters: Vec<ChapterInfo>,
    pub chunks: Vec<EmbeddedChunk>,
    pub metadata: EnvelopeMetadata,
}

impl KnowledgeBaseEnvelope {
    /// Assemble the envelope around embedded chunks, deriving the chapter
    /// summary from the final block distribution.
    ///
    /// Deriving from the final set (rather than passing input chapter lists
    /// through) keeps the counts summing to `total_chunks` even when chunks
    /// were skipped along the way.
    pub fn assemble(
        model: &str,
        dimensions: usize,
        source: &str,
        description: &str,
        chunks: Vec<EmbeddedChunk>,
    ) -> Self {
        let chapters = block_distribution(&chunks)
            .into_iter()
            .map(|(label, count)| ChapterInfo {
                code: label.code().into(),
                name: label.as_str().into(),
                count,
            })
            .collect();

        Self {
            version: SCHEMA_VERSION.into(),
            model: model.into(),
            dimensions,
            total_chunks: chunks.len(),
            chapters,
            chunks,
            metadata: EnvelopeMetadata {
                source: source.into(),
                description: description.into(),
                blocks: CORE_BLOCKS.iter().map(|b| b.as_str().into()).collect(),
                additional_topics: ADDITIONAL_TOPICS.iter().map(|t| t.as_str().into()).collect(),
            },
        }
    }

    /// Check the invariants retrieval consumers depend on.
    ///
    /// Runs before every write; [`crate::writer::write_envelope`] refuses to
    /// persist an envelope that fails here.
    pub fn validate(&self) -> Result<(), WriteError> {
        if self.total_chunks != self.chunks.len() {
            return Err(WriteError::InvalidEnvelope {
                message: format!(
                    "total_chunks is {} but {} chunks are present",
                    self.total_chunks,
                    self.chunks.len()
                ),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for chunk in &self.chunks {
            if chunk.embedding.len() != self.dimensions {
                return Err(WriteError::InvalidEnvelope {
                    message: format!(
                        "chunk {} has {} dimensions, envelope declares {}",
                        chunk.id,
                        chunk.embedding.len(),
                        self.dimensions
                    ),
                });
            }
            if !seen.insert(&chunk.id) {
                return Err(WriteError::InvalidEnvelope {
                    message: format!("duplicate chunk id: {}", chunk.id),
                });
            }
        }

        if !self.chapters.is_empty() {
            let sum: usize = self.chapters.iter().map(|c| c.count).sum();
            if sum != self.total_chunks {
                return Err(WriteError::InvalidEnvelope {
                    message: format!(
                        "chapter counts sum to {sum}, expected {}",
                        self.total_chunks
                    ),
                });
            }
        }

        Ok(())
    }

    /// Load an envelope from disk. Accepts any schema generation.
    pub fn load(path: &Path) -> Result<Self, WriteError> {
        let data = std::fs::read_to_string(path).map_err(|e| WriteError::Io {
            message: format!("read {}: {e}", path.display()),
        })?;
        serde_json::from_str(&data).map_err(|e| WriteError::Serialize {
            message: format!("parse {}: {e}", path.display()),
        })
    }
}

/// Chunk count per block label, sorted by display name.
pub fn block_distribution(chunks: &[EmbeddedChunk]) -> Vec<(BlockLabel, usize)> {
    let mut counts: Vec<(BlockLabel, usize)> = Vec::new();
    for chunk in chunks {
        match counts.iter_mut().find(|(label, _)| *label == chunk.block_type) {
            Some((_, count)) => *count += 1,
            None => counts.push((chunk.block_type, 1)),
        }
    }
    counts.sort_by_key(|(label, _)| label.as_str());
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, label: BlockLabel, dims: usize) -> EmbeddedChunk {
        EmbeddedChunk {
            id: id.into(),
            text: format!("text for {id}"),
            embedding: vec![0.25; dims],
            block_type: label,
            metadata: ChunkMetadata::default(),
        }
    }

    #[test]
    fn assemble_derives_sorted_chapter_summary() {
        let chunks = vec![
            chunk("chunk_1", BlockLabel::Guilt, 4),
            chunk("chunk_2", BlockLabel::Anger, 4),
            chunk("chunk_3", BlockLabel::Anger, 4),
            chunk("chunk_4", BlockLabel::General, 4),
        ];
        let envelope =
            KnowledgeBaseEnvelope::assemble("test-model", 4, "test source", "test", chunks);

        assert_eq!(envelope.version, SCHEMA_VERSION);
        assert_eq!(envelope.total_chunks, 4);

        let names: Vec<&str> = envelope.chapters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Anger", "General", "Guilt"]);
        let counts: Vec<usize> = envelope.chapters.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
        assert_eq!(envelope.chapters[0].code, "ANG");

        assert_eq!(
            envelope.metadata.blocks,
            vec!["Anger", "Anxiety", "Depression", "Guilt"]
        );
        assert!(envelope
            .metadata
            .additional_topics
            .contains(&"Zen Meditation".to_string()));

        envelope.validate().unwrap();
    }

    #[test]
    fn validate_rejects_count_mismatch() {
        let mut envelope = KnowledgeBaseEnvelope::assemble(
            "m",
            4,
            "s",
            "d",
            vec![chunk("chunk_1", BlockLabel::Anger, 4)],
        );
        envelope.total_chunks = 7;
        let err = envelope.validate().unwrap_err();
        assert!(matches!(err, WriteError::InvalidEnvelope { .. }));
    }

    #[test]
    fn validate_rejects_wrong_dimension() {
        let chunks = vec![
            chunk("chunk_1", BlockLabel::Anger, 4),
            chunk("chunk_2", BlockLabel::Anger, 3),
        ];
        let envelope = KnowledgeBaseEnvelope::assemble("m", 4, "s", "d", chunks);
        let err = envelope.validate().unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("chunk_2"));
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let chunks = vec![
            chunk("chunk_1", BlockLabel::Anger, 4),
            chunk("chunk_1", BlockLabel::Guilt, 4),
        ];
        let envelope = KnowledgeBaseEnvelope::assemble("m", 4, "s", "d", chunks);
        let err = envelope.validate().unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("duplicate"));
    }

    #[test]
    fn serialization_round_trips_exactly() {
        let chunks = vec![
            chunk("chunk_1", BlockLabel::MentalContamination, 8),
            chunk("chunk_2", BlockLabel::General, 8),
        ];
        let envelope =
            KnowledgeBaseEnvelope::assemble("test-model", 8, "source", "desc", chunks);

        let json = serde_json::to_string_pretty(&envelope).unwrap();
        let back: KnowledgeBaseEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(envelope, back);
    }

    #[test]
    fn block_type_persists_as_display_name() {
        let envelope = KnowledgeBaseEnvelope::assemble(
            "m",
            4,
            "s",
            "d",
            vec![chunk("chunk_1", BlockLabel::MentalContamination, 4)],
        );
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("\"block_type\":\"Mental Contamination\""));
    }

    #[test]
    fn older_generations_remain_loadable() {
        // 1.0-era file: no chapters, no dimensions, no additional_topics.
        let json = r#"{
            "version": "1.0",
            "model": "text-embedding-3-small",
            "total_chunks": 1,
            "chunks": [{
                "id": "chunk_1",
                "text": "some text",
                "embedding": [0.1, 0.2],
                "block_type": "General",
                "metadata": {"chapter": "General", "title": "some text"}
            }],
            "metadata": {
                "source": "early run",
                "description": "fixed-window pipeline",
                "blocks": ["Anger", "Anxiety", "Depression", "Guilt"]
            }
        }"#;

        let envelope: KnowledgeBaseEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.version, "1.0");
        assert_eq!(envelope.dimensions, 0);
        assert!(envelope.chapters.is_empty());
        assert_eq!(envelope.chunks[0].metadata.token_count, 0);
        assert!(envelope.metadata.additional_topics.is_empty());
    }

    #[test]
    fn distribution_counts_and_sorts_by_name() {
        let chunks = vec![
            chunk("a", BlockLabel::ZenMeditation, 2),
            chunk("b", BlockLabel::Abcs, 2),
            chunk("c", BlockLabel::Abcs, 2),
        ];
        let dist = block_distribution(&chunks);
        assert_eq!(
            dist,
            vec![(BlockLabel::Abcs, 2), (BlockLabel::ZenMeditation, 1)]
        );
    }
}
