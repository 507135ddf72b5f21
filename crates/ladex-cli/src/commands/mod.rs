//! CLI subcommands.

pub mod batch;
pub mod process;

use clap::ValueEnum;
use ladex_core::models::record::DocumentKind;

/// Document type selector shared by the subcommands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DocType {
    /// Bill of Lading
    Bol,
    /// Waybill / scale ticket
    Waybill,
}

impl From<DocType> for DocumentKind {
    fn from(value: DocType) -> Self {
        match value {
            DocType::Bol => DocumentKind::Bol,
            DocType::Waybill => DocumentKind::Waybill,
        }
    }
}
