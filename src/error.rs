//! Rich diagnostic error types for the ingestion pipeline.
//!
//! Each stage defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so a failed run says exactly what went
//! wrong and how to fix it. Per-chunk embedding failures are recoverable and
//! never surface here; everything in this module aborts the run.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the ingestion pipeline.
///
/// Each variant wraps a stage-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum IngestError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Chunk(#[from] ChunkError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pipeline(#[from] PipelineError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set")]
    #[diagnostic(
        code(fourblocks::config::missing_api_key),
        help(
            "The embedding service requires an API key. Export it before running: \
             `export OPENAI_API_KEY=sk-...`. No chunks are processed without it."
        )
    )]
    MissingApiKey,

    #[error("invalid chunking: overlap {overlap} >= chunk size {chunk_size}")]
    #[diagnostic(
        code(fourblocks::config::invalid_chunking),
        help(
            "The window stride is chunk_size - overlap and must be positive, \
             or the chunker would never advance. Lower --overlap or raise \
             --chunk-size."
        )
    )]
    InvalidChunking { chunk_size: usize, overlap: usize },
}

// ---------------------------------------------------------------------------
// Source errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("source file not found: {path}")]
    #[diagnostic(
        code(fourblocks::source::not_found),
        help(
            "The input file does not exist. Check the path, or set PDF_PATH / \
             pass --source to point at the book PDF or knowledge-base JSON."
        )
    )]
    NotFound { path: String },

    #[error("cannot detect source format of \"{path}\"")]
    #[diagnostic(
        code(fourblocks::source::unknown_format),
        help(
            "Supported inputs are .pdf (raw book text) and .json (pre-chunked \
             knowledge base). If your file uses a different extension, specify \
             the format explicitly with --format."
        )
    )]
    UnknownFormat { path: String },

    #[error("PDF parse error: {message}")]
    #[diagnostic(
        code(fourblocks::source::pdf_parse),
        help("The file could not be parsed as PDF. Verify it is valid and not corrupted.")
    )]
    PdfParse { message: String },

    #[error("knowledge base error in {path}: {message}")]
    #[diagnostic(
        code(fourblocks::source::knowledge_base),
        help(
            "The knowledge-base JSON could not be loaded. It must be an object \
             with a `chunks` array of records carrying at least a `content` field."
        )
    )]
    KnowledgeBase { path: String, message: String },

    #[error("empty document: no text extracted from \"{origin}\"")]
    #[diagnostic(
        code(fourblocks::source::empty_document),
        help(
            "Extraction produced no usable text. The PDF may be image-only \
             (scanned without OCR) or the knowledge base may have no records \
             with content."
        )
    )]
    EmptyDocument { origin: String },

    #[error("I/O error reading {path}: {source}")]
    #[diagnostic(
        code(fourblocks::source::io),
        help("A filesystem read failed. Check the path and its permissions.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Chunking errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ChunkError {
    #[error("invalid window: overlap {overlap} >= chunk size {chunk_size}")]
    #[diagnostic(
        code(fourblocks::chunk::invalid_window),
        help("The window stride must be positive. Use overlap < chunk_size.")
    )]
    InvalidWindow { chunk_size: usize, overlap: usize },

    #[error("no chunks survived the minimum-length filter (> {min_chars} chars)")]
    #[diagnostic(
        code(fourblocks::chunk::no_chunks),
        help(
            "Every candidate window was shorter than the noise threshold. \
             Either the document is nearly empty or --min-chars is set too high."
        )
    )]
    NoChunks { min_chars: usize },
}

// ---------------------------------------------------------------------------
// Embedding errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EmbedError {
    #[error("embedding request failed: {message}")]
    #[diagnostic(
        code(fourblocks::embed::request_failed),
        help(
            "The embedding API call did not succeed. Check network access, the \
             API key, and the service status. Failed chunks are skipped, not retried."
        )
    )]
    RequestFailed { message: String },

    #[error("failed to parse embedding response: {message}")]
    #[diagnostic(
        code(fourblocks::embed::parse_error),
        help("The service returned an unexpected response format.")
    )]
    ParseError { message: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    #[diagnostic(
        code(fourblocks::embed::dim_mismatch),
        help(
            "The service returned a vector of the wrong length. Check that the \
             configured model actually produces {expected}-dimensional embeddings."
        )
    )]
    DimensionMismatch { expected: usize, actual: usize },
}

// ---------------------------------------------------------------------------
// Writer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum WriteError {
    #[error("invalid envelope: {message}")]
    #[diagnostic(
        code(fourblocks::write::invalid_envelope),
        help(
            "The assembled output violates an internal consistency rule \
             (chunk counts, vector dimensions, or duplicate ids). This is a \
             pipeline bug; nothing was written."
        )
    )]
    InvalidEnvelope { message: String },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(fourblocks::write::serialize),
        help("Failed to serialize the knowledge base to JSON.")
    )]
    Serialize { message: String },

    #[error("output I/O error: {message}")]
    #[diagnostic(
        code(fourblocks::write::io),
        help(
            "Failed to write the output file. Check that the destination \
             directory can be created and the disk is not full."
        )
    )]
    Io { message: String },
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error("nothing embedded: all {attempted} chunk(s) failed")]
    #[diagnostic(
        code(fourblocks::pipeline::nothing_embedded),
        help(
            "Every embedding call failed, so there is no knowledge base to write. \
             Check the API key and network, then rerun."
        )
    )]
    NothingEmbedded { attempted: usize },
}

/// Convenience alias for pipeline results.
pub type IngestResult<T> = std::result::Result<T, IngestError>;
