//! Batch processing command: the sequential driving loop.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use ladex_core::models::config::{ExtractorMode, LadexConfig};
use ladex_core::ocr::{DocumentReader, TextSource};
use ladex_core::output::OutputSink;
use ladex_core::pipeline::{self, Pipeline, Stage};
use ladex_core::remote::RemoteExtractor;

use super::DocType;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Directory containing input documents (PDF, PNG, JPG)
    #[arg(short, long, default_value = "samples")]
    input_dir: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "outputs")]
    output_dir: PathBuf,

    /// Document type to extract
    #[arg(short = 't', long, value_enum, default_value = "bol")]
    doc_type: DocType,

    /// Write raw OCR text and pre-reconciliation JSON for inspection
    #[arg(long)]
    debug_dumps: bool,

    /// Seconds to pause between documents (overrides LADEX_PAUSE_SECS)
    #[arg(long)]
    pause: Option<u64>,

    /// OCR language passed to Tesseract
    #[arg(long, default_value = "eng")]
    language: String,
}

pub async fn run(args: BatchArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = LadexConfig::from_env()?;

    let files = pipeline::discover(&args.input_dir)?;
    if files.is_empty() {
        println!(
            "{} No input documents in {}",
            style("ℹ").blue(),
            args.input_dir.display()
        );
        return Ok(());
    }

    println!(
        "{} Found {} documents to process ({} mode)",
        style("ℹ").blue(),
        files.len(),
        match config.mode {
            ExtractorMode::Pattern => "pattern-only",
            ExtractorMode::RemoteAssisted => "remote-assisted",
        }
    );

    let sink = OutputSink::create(&args.output_dir)?;
    let mut extraction = Pipeline::new(args.doc_type.into(), config.mode, sink)
        .with_debug_dumps(args.debug_dumps);
    if config.mode == ExtractorMode::RemoteAssisted {
        extraction = extraction.with_remote(RemoteExtractor::new(config.remote.clone())?);
    }

    let reader = DocumentReader::new().with_language(args.language.as_str());
    let pause = Duration::from_secs(args.pause.unwrap_or(config.pause_secs));

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut persisted = 0usize;
    let mut failed: Vec<(PathBuf, String)> = Vec::new();

    for (position, path) in files.iter().enumerate() {
        let id = pipeline::document_id(path, position + 1);
        debug!(document = %id, stage = %Stage::Discovered, path = %path.display());

        // OCR failure is isolated to the current document; the batch continues
        match reader.recognize(path) {
            Ok(text) => {
                debug!(document = %id, stage = %Stage::Recognized, chars = text.len());
                let source_file = path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown");

                // Non-quota remote failures abort the whole batch here
                extraction.process_text(&id, source_file, &text).await?;
                persisted += 1;
            }
            Err(e) => {
                warn!(document = %id, error = %e, "OCR failed, skipping document");
                failed.push((path.clone(), e.to_string()));
            }
        }

        progress.inc(1);

        // Rate-limit courtesy toward the remote collaborator
        if position + 1 < files.len() && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    progress.finish_with_message("Complete");

    println!();
    println!(
        "{} {} persisted, {} failed of {} documents in {:?}",
        style("✓").green(),
        style(persisted).green(),
        style(failed.len()).red(),
        files.len(),
        start.elapsed()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed documents:").red());
        for (path, error) in &failed {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}
