// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # fourblocks-ingest
//!
//! Text-to-embedding ingestion for the My4Blocks knowledge base: reads the
//! book PDF (or curated knowledge-base JSON), cuts it into overlapping
//! chunks, labels each chunk with one of the four blocks, embeds every chunk
//! through the OpenAI embeddings API, and writes a versioned JSON envelope
//! for the retrieval-backed chat feature.
//!
//! ## Pipeline stages
//!
//! - **Source reading** (`source`): PDF text extraction or pre-chunked JSON records
//! - **Chunking** (`chunk`): fixed-size or sentence-packed overlapping token windows
//! - **Classification** (`label`): core-block substring match, then topic keyword table
//! - **Embedding** (`embed`): synchronous OpenAI client behind the [`embed::Embedder`] trait
//! - **Output** (`envelope`, `writer`): versioned envelope, atomic write, sibling copies
//!
//! ## Library usage
//!
//! ```no_run
//! use fourblocks_ingest::config::PipelineConfig;
//! use fourblocks_ingest::embed::{OpenAiConfig, OpenAiEmbedder};
//! use fourblocks_ingest::pipeline;
//!
//! let config = PipelineConfig::from_env();
//! let embedder = OpenAiEmbedder::new(OpenAiConfig::from_env()).unwrap();
//! let report = pipeline::run(&config, &embedder).unwrap();
//! println!("wrote {} chunks", report.chunk_count);
//! ```

pub mod chunk;
pub mod config;
pub mod embed;
pub mod envelope;
pub mod error;
pub mod label;
pub mod pipeline;
pub mod source;
pub mod writer;
