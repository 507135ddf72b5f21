//! Single-document processing command.

use std::path::PathBuf;

use clap::Args;
use console::style;

use ladex_core::models::config::{ExtractorMode, LadexConfig};
use ladex_core::ocr::{DocumentReader, TextSource};
use ladex_core::output::OutputSink;
use ladex_core::pipeline::{self, Pipeline};
use ladex_core::remote::RemoteExtractor;

use super::DocType;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input document (PDF, PNG, JPG)
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "outputs")]
    output_dir: PathBuf,

    /// Document type to extract
    #[arg(short = 't', long, value_enum, default_value = "bol")]
    doc_type: DocType,

    /// Write raw OCR text and pre-reconciliation JSON for inspection
    #[arg(long)]
    debug_dumps: bool,

    /// OCR language passed to Tesseract
    #[arg(long, default_value = "eng")]
    language: String,
}

pub async fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let config = LadexConfig::from_env()?;

    let reader = DocumentReader::new().with_language(args.language.as_str());
    let text = reader.recognize(&args.input)?;

    let sink = OutputSink::create(&args.output_dir)?;
    let mut extraction = Pipeline::new(args.doc_type.into(), config.mode, sink)
        .with_debug_dumps(args.debug_dumps);
    if config.mode == ExtractorMode::RemoteAssisted {
        extraction = extraction.with_remote(RemoteExtractor::new(config.remote)?);
    }

    let id = pipeline::document_id(&args.input, 1);
    let source_file = args
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    let (record, strategy) = extraction.process_text(&id, source_file, &text).await?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    eprintln!(
        "{} Persisted {} via {} extraction",
        style("✓").green(),
        id,
        strategy
    );

    Ok(())
}
