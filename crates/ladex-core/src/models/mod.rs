//! Data models for shipping-document extraction.

pub mod config;
pub mod record;

pub use config::{ExtractorMode, LadexConfig, RemoteConfig};
pub use record::{
    BolRecord, Carrier, DocumentKind, ExtractionRecord, FreightLine, TriState, WaybillRecord,
};
