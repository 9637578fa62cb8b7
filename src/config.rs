//! Pipeline configuration, constructed once at the process boundary.
//!
//! Flags override environment, environment overrides defaults. The config is
//! passed by reference into every stage; there is no process-wide mutable
//! state.

use std::path::PathBuf;

use crate::chunk::{ChunkConfig, ChunkStrategy};
use crate::error::ConfigError;
use crate::source::SourceFormat;

/// Default input: the book PDF, relative to the project root.
pub const DEFAULT_SOURCE: &str = "content/you-only-have-four-problems-book-text.pdf";

/// Default canonical output path.
pub const DEFAULT_OUTPUT: &str = "shared/data/embeddings.json";

/// Everything one ingestion run needs besides the embedding client.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Input file (PDF or knowledge-base JSON).
    pub source: PathBuf,
    /// Explicit input format; `None` detects from the extension.
    pub format: Option<SourceFormat>,
    /// Canonical output path.
    pub output: PathBuf,
    /// Sibling destinations receiving identical copies of the output.
    pub copies: Vec<PathBuf>,
    /// Window construction strategy.
    pub strategy: ChunkStrategy,
    /// Window size, overlap, and noise threshold.
    pub chunking: ChunkConfig,
    /// Overrides `metadata.source` in the envelope; `None` takes a
    /// per-format default.
    pub source_label: Option<String>,
    /// Overrides `metadata.description`; `None` takes a per-format default.
    pub description: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            format: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            copies: Vec::new(),
            strategy: ChunkStrategy::default(),
            chunking: ChunkConfig::default(),
            source_label: None,
            description: None,
        }
    }
}

impl PipelineConfig {
    /// Default configuration with `PDF_PATH` / `OUTPUT_PATH` overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("PDF_PATH") {
            if !path.is_empty() {
                config.source = PathBuf::from(path);
            }
        }
        if let Ok(path) = std::env::var("OUTPUT_PATH") {
            if !path.is_empty() {
                config.output = PathBuf::from(path);
            }
        }
        config
    }

    /// Fatal precondition checks, run before any chunk is processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunking.overlap >= self.chunking.chunk_size {
            return Err(ConfigError::InvalidChunking {
                chunk_size: self.chunking.chunk_size,
                overlap: self.chunking.overlap,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployed_pipeline() {
        let config = PipelineConfig::default();
        assert_eq!(config.source, PathBuf::from(DEFAULT_SOURCE));
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.overlap, 100);
        assert_eq!(config.chunking.min_chars, 80);
        assert_eq!(config.strategy, ChunkStrategy::Sentence);
        assert!(config.copies.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn zero_stride_is_rejected() {
        let mut config = PipelineConfig::default();
        config.chunking.overlap = config.chunking.chunk_size;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChunking { .. }));
    }

    #[test]
    fn overlap_larger_than_window_is_rejected() {
        let mut config = PipelineConfig::default();
        config.chunking.chunk_size = 100;
        config.chunking.overlap = 150;
        assert!(config.validate().is_err());
    }
}
