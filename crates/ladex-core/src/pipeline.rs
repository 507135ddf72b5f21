//! Per-document extraction pipeline.
//!
//! Each document moves through `Discovered -> Recognized -> Extracted ->
//! Reconciled -> Persisted`. A quota-exhausted remote call is not terminal:
//! it re-enters `Extracted` through the regex fallback. Any other remote
//! failure propagates so the batch aborts with the original error.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{LadexError, Result};
use crate::extract::fallback;
use crate::models::config::ExtractorMode;
use crate::models::record::{DocumentKind, ExtractionRecord};
use crate::output::OutputSink;
use crate::remote::{RemoteOutcome, StructuredExtractor};

/// Lifecycle stage of a document, used for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovered,
    Recognized,
    Extracted,
    Reconciled,
    Persisted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discovered => "discovered",
            Stage::Recognized => "recognized",
            Stage::Extracted => "extracted",
            Stage::Reconciled => "reconciled",
            Stage::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

/// Which extraction path produced a document's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Remote extractor output.
    Remote,
    /// Regex fallback substituted after quota exhaustion.
    PatternFallback,
    /// Regex extraction selected by configuration.
    PatternOnly,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Remote => "remote",
            Strategy::PatternFallback => "pattern-fallback",
            Strategy::PatternOnly => "pattern-only",
        };
        f.write_str(name)
    }
}

/// Discover input documents: lexicographic within each extension group,
/// concatenated PDF, then PNG, then JPG.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for extension in ["pdf", "png", "jpg"] {
        let pattern = format!("{}/*.{extension}", dir.display());
        let mut group: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| LadexError::Config(format!("bad discovery pattern: {e}")))?
            .filter_map(|entry| entry.ok())
            .collect();
        group.sort();
        files.extend(group);
    }
    Ok(files)
}

/// Unique per-run document id: `{file stem}-{4-digit index}`, index starting
/// at 1 in discovery order.
pub fn document_id(path: &Path, index: usize) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    format!("{stem}-{index:04}")
}

/// Sequential extraction pipeline for one document kind.
pub struct Pipeline<S> {
    kind: DocumentKind,
    mode: ExtractorMode,
    remote: Option<S>,
    sink: OutputSink,
    debug_dumps: bool,
}

impl<S: StructuredExtractor> Pipeline<S> {
    pub fn new(kind: DocumentKind, mode: ExtractorMode, sink: OutputSink) -> Self {
        Self {
            kind,
            mode,
            remote: None,
            sink,
            debug_dumps: false,
        }
    }

    pub fn with_remote(mut self, remote: S) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Enable raw-OCR and pre-reconciliation dumps for manual inspection.
    pub fn with_debug_dumps(mut self, enabled: bool) -> Self {
        self.debug_dumps = enabled;
        self
    }

    /// Run extraction, reconciliation, and persistence for one recognized
    /// document.
    pub async fn process_text(
        &self,
        id: &str,
        source_file: &str,
        text: &str,
    ) -> Result<(ExtractionRecord, Strategy)> {
        let (mut record, strategy) = match self.mode {
            ExtractorMode::Pattern => {
                (fallback::extract(self.kind, text), Strategy::PatternOnly)
            }
            ExtractorMode::RemoteAssisted => {
                let remote = self.remote.as_ref().ok_or_else(|| {
                    LadexError::Config(
                        "remote-assisted mode requires a configured extractor".to_string(),
                    )
                })?;
                match remote.extract(text, self.kind).await? {
                    RemoteOutcome::Extracted(record) => (record, Strategy::Remote),
                    RemoteOutcome::QuotaExhausted => {
                        warn!(
                            document = id,
                            "remote quota exhausted, substituting pattern extraction"
                        );
                        (fallback::extract(self.kind, text), Strategy::PatternFallback)
                    }
                }
            }
        };
        debug!(document = id, stage = %Stage::Extracted, %strategy);

        if self.debug_dumps {
            self.sink.write_debug(id, text, &record)?;
        }

        record.reconcile(text);
        debug!(document = id, stage = %Stage::Reconciled);

        self.sink.write_snapshot(id, &record)?;
        match &record {
            ExtractionRecord::Bol(bol) => self.sink.append_bol(id, bol)?,
            ExtractionRecord::Waybill(waybill) => {
                self.sink.append_waybill(source_file, waybill)?
            }
        }
        info!(document = id, stage = %Stage::Persisted, %strategy);

        Ok((record, strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_id_format() {
        assert_eq!(document_id(Path::new("samples/bol_scan.pdf"), 1), "bol_scan-0001");
        assert_eq!(document_id(Path::new("ticket.png"), 12), "ticket-0012");
    }

    #[test]
    fn test_discovery_order_groups_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.png", "c.pdf", "a.jpg", "z.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let names: Vec<String> = discover(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["b.pdf", "c.pdf", "a.png", "a.jpg"]);
    }
}
