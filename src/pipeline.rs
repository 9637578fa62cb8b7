//! The ingestion pipeline: source, chunks, labels, embeddings, envelope.
//!
//! One linear pass, synchronous, one chunk at a time. Bad configuration, a
//! missing source, and an empty result abort the run; a failed embedding
//! call only skips its own chunk.

use std::path::PathBuf;

use crate::chunk::{self, TextChunk};
use crate::config::PipelineConfig;
use crate::embed::Embedder;
use crate::envelope::{ChunkMetadata, EmbeddedChunk, KnowledgeBaseEnvelope, block_distribution};
use crate::error::{IngestResult, PipelineError, SourceError};
use crate::label::{self, BlockLabel};
use crate::source::knowledge_base::{KnowledgeBaseFile, KnowledgeBaseRecord};
use crate::source::{self, SourceDocument};
use crate::writer;

/// How often the embedding loop reports progress.
const PROGRESS_EVERY: usize = 20;

/// Title length cap for PDF-derived metadata.
const TITLE_CHARS: usize = 60;

/// A classified chunk waiting for its embedding.
#[derive(Debug, Clone)]
pub struct PendingChunk {
    pub id: String,
    pub text: String,
    pub label: BlockLabel,
    pub metadata: ChunkMetadata,
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct PipelineReport {
    /// Chunks embedded and written.
    pub chunk_count: usize,
    /// Chunks dropped after an embedding failure.
    pub skipped: usize,
    /// Block distribution of the written chunks, sorted by name.
    pub blocks: Vec<(BlockLabel, usize)>,
    /// Canonical output path.
    pub canonical: PathBuf,
    /// Sibling copies that were actually written.
    pub copies_written: Vec<PathBuf>,
}

/// Run the whole pipeline for `config`, embedding with `embedder`.
pub fn run(config: &PipelineConfig, embedder: &dyn Embedder) -> IngestResult<PipelineReport> {
    config.validate()?;

    match source::load(&config.source, config.format)? {
        SourceDocument::Text(text) => run_document_text(config, embedder, &text),
        SourceDocument::KnowledgeBase(kb) => run_knowledge_base(config, embedder, kb),
    }
}

/// PDF-mode pipeline over already-extracted document text.
pub fn run_document_text(
    config: &PipelineConfig,
    embedder: &dyn Embedder,
    text: &str,
) -> IngestResult<PipelineReport> {
    config.validate()?;

    let chunks = chunk::chunk_text(text, config.strategy, &config.chunking)?;
    tracing::info!(
        chunks = chunks.len(),
        strategy = %config.strategy,
        "document chunked"
    );

    let pending: Vec<PendingChunk> = chunks.into_iter().map(classify_chunk).collect();

    let description = format!(
        "Full PDF extraction via {} chunking + OpenAI embeddings",
        config.strategy
    );
    finish(
        config,
        embedder,
        pending,
        "You Only Have Four Problems (full PDF)",
        &description,
    )
}

/// Knowledge-base-mode pipeline over curated records.
pub fn run_knowledge_base(
    config: &PipelineConfig,
    embedder: &dyn Embedder,
    kb: KnowledgeBaseFile,
) -> IngestResult<PipelineReport> {
    config.validate()?;

    let mut pending = Vec::with_capacity(kb.chunks.len());
    for (idx, record) in kb.chunks.into_iter().enumerate() {
        if record.content.trim().is_empty() {
            tracing::warn!(id = %record.id, index = idx, "skipping record with no content");
            continue;
        }
        pending.push(adopt_record(idx, record));
    }

    if pending.is_empty() {
        return Err(SourceError::EmptyDocument {
            origin: config.source.display().to_string(),
        }
        .into());
    }

    finish(
        config,
        embedder,
        pending,
        "My4Blocks Unified Training Data",
        "Semantic embeddings for RAG retrieval",
    )
}

/// Classify a PDF-derived chunk and derive its metadata.
fn classify_chunk(chunk: TextChunk) -> PendingChunk {
    let label = label::classify(&chunk.text);
    let metadata = ChunkMetadata {
        chapter: label.as_str().into(),
        title: derive_title(&chunk.text),
        audience: "general".into(),
        category: label.category_slug(),
        token_count: chunk.text.split_whitespace().count(),
        ..ChunkMetadata::default()
    };
    PendingChunk {
        id: format!("chunk_{}", chunk.index),
        text: chunk.text,
        label,
        metadata,
    }
}

/// Adopt a curated record, trusting its chapter code over keyword matching.
fn adopt_record(idx: usize, record: KnowledgeBaseRecord) -> PendingChunk {
    let id = if record.id.is_empty() {
        format!("chunk_{}", idx + 1)
    } else {
        record.id
    };
    let label = BlockLabel::from_chapter_code(&record.chapter);
    let metadata = ChunkMetadata {
        chapter: record.chapter,
        section: record.section,
        title: record.title,
        tags: record.tags,
        keywords: record.keywords,
        related: record.related,
        audience: record.audience,
        category: record.category,
        token_count: record.content.split_whitespace().count(),
    };
    PendingChunk {
        id,
        text: record.content,
        label,
        metadata,
    }
}

/// First 60 characters of the chunk, right-trimmed, with a trailing ellipsis
/// when the text is longer.
fn derive_title(text: &str) -> String {
    match text.char_indices().nth(TITLE_CHARS) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// Embed the pending chunks, assemble the envelope, and write it out.
fn finish(
    config: &PipelineConfig,
    embedder: &dyn Embedder,
    pending: Vec<PendingChunk>,
    default_source: &str,
    default_description: &str,
) -> IngestResult<PipelineReport> {
    let attempted = pending.len();
    tracing::info!(
        chunks = attempted,
        model = embedder.model(),
        dimensions = embedder.dimensions(),
        "embedding chunks"
    );

    let mut embedded = Vec::with_capacity(attempted);
    let mut skipped = 0usize;
    for (i, chunk) in pending.into_iter().enumerate() {
        let processed = i + 1;
        if processed % PROGRESS_EVERY == 0 {
            tracing::info!(processed, total = attempted, "embedding progress");
        }
        match embedder.embed(&chunk.text) {
            Ok(embedding) => embedded.push(EmbeddedChunk {
                id: chunk.id,
                text: chunk.text,
                embedding,
                block_type: chunk.label,
                metadata: chunk.metadata,
            }),
            Err(e) => {
                skipped += 1;
                tracing::warn!(id = %chunk.id, error = %e, "embedding failed, chunk skipped");
            }
        }
    }

    if embedded.is_empty() {
        return Err(PipelineError::NothingEmbedded { attempted }.into());
    }

    let source_label = config.source_label.as_deref().unwrap_or(default_source);
    let description = config.description.as_deref().unwrap_or(default_description);
    let envelope = KnowledgeBaseEnvelope::assemble(
        embedder.model(),
        embedder.dimensions(),
        source_label,
        description,
        embedded,
    );

    let outcome = writer::write_envelope(&envelope, &config.output, &config.copies)?;

    Ok(PipelineReport {
        chunk_count: envelope.total_chunks,
        skipped,
        blocks: block_distribution(&envelope.chunks),
        canonical: outcome.canonical,
        copies_written: outcome.copies_written,
    })
}
