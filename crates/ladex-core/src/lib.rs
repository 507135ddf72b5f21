//! Core library for shipping-document extraction.
//!
//! This crate provides:
//! - Document text acquisition (embedded PDF text, Tesseract CLI glue)
//! - Regex fallback extraction for BOL and waybill fields
//! - A remote (LLM) extractor adapter with structured quota classification
//! - Gap-filling, net-weight derivation, and durable JSON/CSV outputs

pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod remote;

pub use error::{DerivationError, LadexError, OcrError, OutputError, RemoteError, Result};
pub use extract::{extract_bol, extract_waybill, reconcile_bol, reconcile_waybill};
pub use models::{
    BolRecord, Carrier, DocumentKind, ExtractionRecord, ExtractorMode, FreightLine, LadexConfig,
    RemoteConfig, TriState, WaybillRecord,
};
pub use ocr::{DocumentReader, TextSource};
pub use output::OutputSink;
pub use pipeline::{Pipeline, Stage, Strategy, discover, document_id};
pub use remote::{RemoteExtractor, RemoteOutcome, StructuredExtractor};
