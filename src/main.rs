//! fourblocks CLI: knowledge-base ingestion for My4Blocks.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

use fourblocks_ingest::chunk::ChunkStrategy;
use fourblocks_ingest::config::PipelineConfig;
use fourblocks_ingest::embed::{OpenAiConfig, OpenAiEmbedder};
use fourblocks_ingest::envelope::{KnowledgeBaseEnvelope, block_distribution};
use fourblocks_ingest::pipeline;
use fourblocks_ingest::source::SourceFormat;

#[derive(Parser)]
#[command(name = "fourblocks", version, about = "Knowledge-base ingestion for My4Blocks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a source document into the embeddings knowledge base.
    Ingest {
        /// Input file (PDF or knowledge-base JSON). Overrides PDF_PATH.
        #[arg(long)]
        source: Option<PathBuf>,

        /// Input format: "pdf" or "kb". Detected from the extension by default.
        #[arg(long)]
        format: Option<String>,

        /// Canonical output path. Overrides OUTPUT_PATH.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Extra destination for an identical copy (repeatable).
        #[arg(long = "copy-to", value_name = "PATH")]
        copy_to: Vec<PathBuf>,

        /// Chunking strategy: "fixed" or "sentence".
        #[arg(long, default_value = "sentence")]
        strategy: String,

        /// Window size in whitespace tokens.
        #[arg(long, default_value = "500")]
        chunk_size: usize,

        /// Overlap between consecutive windows, in tokens.
        #[arg(long, default_value = "100")]
        overlap: usize,

        /// Minimum chunk length in characters; shorter chunks are dropped.
        #[arg(long, default_value = "80")]
        min_chars: usize,

        /// Embedding model.
        #[arg(long)]
        model: Option<String>,

        /// Expected embedding dimensions (for non-default models).
        #[arg(long)]
        dimensions: Option<usize>,
    },

    /// Print a summary of an existing knowledge-base file.
    Inspect {
        /// Path to an embeddings JSON file.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            source,
            format,
            output,
            copy_to,
            strategy,
            chunk_size,
            overlap,
            min_chars,
            model,
            dimensions,
        } => {
            let mut config = PipelineConfig::from_env();
            if let Some(path) = source {
                config.source = path;
            }
            if let Some(path) = output {
                config.output = path;
            }
            config.copies = copy_to;
            config.format = match format.as_deref() {
                None => None,
                Some("pdf") => Some(SourceFormat::Pdf),
                Some("kb") | Some("json") => Some(SourceFormat::KnowledgeBase),
                Some(other) => miette::bail!("unknown format: {other} (expected pdf or kb)"),
            };
            config.strategy = match strategy.as_str() {
                "fixed" => ChunkStrategy::Fixed,
                "sentence" => ChunkStrategy::Sentence,
                other => miette::bail!("unknown strategy: {other} (expected fixed or sentence)"),
            };
            config.chunking.chunk_size = chunk_size;
            config.chunking.overlap = overlap;
            config.chunking.min_chars = min_chars;

            let mut openai = OpenAiConfig::from_env();
            if let Some(model) = model {
                openai.model = model;
            }
            if let Some(dimensions) = dimensions {
                openai.dimensions = dimensions;
            }
            let embedder = OpenAiEmbedder::new(openai)?;

            let report = pipeline::run(&config, &embedder)?;

            println!("Ingestion complete: {} chunks embedded", report.chunk_count);
            if report.skipped > 0 {
                println!("  skipped {} chunks after embedding failures", report.skipped);
            }

            println!("\nBlock distribution:");
            for (label, count) in &report.blocks {
                println!("  {label}: {count} chunks");
            }

            println!("\nSaved to {}", report.canonical.display());
            for copy in &report.copies_written {
                println!("  copied to {}", copy.display());
            }
        }

        Commands::Inspect { file } => {
            let envelope = KnowledgeBaseEnvelope::load(&file)?;

            println!("Knowledge base: {}", file.display());
            println!("  version:      {}", envelope.version);
            println!("  model:        {}", envelope.model);
            println!("  dimensions:   {}", envelope.dimensions);
            println!("  total chunks: {}", envelope.total_chunks);
            println!("  source:       {}", envelope.metadata.source);

            if !envelope.chapters.is_empty() {
                println!("\nChapters:");
                for chapter in &envelope.chapters {
                    println!("  [{}] {}: {} chunks", chapter.code, chapter.name, chapter.count);
                }
            }

            println!("\nBlock distribution:");
            for (label, count) in block_distribution(&envelope.chunks) {
                println!("  {label}: {count} chunks");
            }

            match envelope.validate() {
                Ok(()) => println!("\nEnvelope invariants hold."),
                Err(e) => println!("\nWARNING: {e}"),
            }
        }
    }

    Ok(())
}
