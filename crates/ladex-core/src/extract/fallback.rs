//! Regex fallback extractor.
//!
//! Total functions: any input, including empty text, yields a record with
//! every schema field present (null where nothing matched).

use crate::models::record::{BolRecord, DocumentKind, ExtractionRecord, FreightLine, WaybillRecord};

use super::dates::first_date;
use super::patterns::{BOL_NUMBER, PRO_NUMBER, SCAC};
use super::weights::max_weight_lb;

/// Run the fallback extractor for the given document kind.
pub fn extract(kind: DocumentKind, text: &str) -> ExtractionRecord {
    match kind {
        DocumentKind::Bol => ExtractionRecord::Bol(extract_bol(text)),
        DocumentKind::Waybill => ExtractionRecord::Waybill(extract_waybill(text)),
    }
}

/// Best-effort BOL extraction from raw OCR text.
pub fn extract_bol(text: &str) -> BolRecord {
    let mut record = BolRecord::default();

    if let Some(caps) = BOL_NUMBER.captures(text) {
        record.bol_number = Some(caps[1].trim().to_string());
    }
    if let Some(caps) = PRO_NUMBER.captures(text) {
        record.pro_number = Some(caps[1].trim().to_string());
    }
    record.ship_date = first_date(text);

    // Crude SCAC guess: first bare uppercase token
    if let Some(m) = SCAC.find(text) {
        record.carrier.scac = Some(m.as_str().to_string());
    }

    if let Some(weight) = max_weight_lb(text) {
        record.total_weight = Some(weight);
        record.freight_lines.push(synthetic_freight_line(weight));
    }

    record
}

/// Waybill fallback populates only the date. The other 13 fields lean on the
/// remote extractor; this path is an availability guarantee, not a quality
/// guarantee.
pub fn extract_waybill(text: &str) -> WaybillRecord {
    WaybillRecord {
        date: first_date(text),
        ..WaybillRecord::default()
    }
}

pub(crate) fn synthetic_freight_line(weight_lb: f64) -> FreightLine {
    FreightLine {
        description: Some("Freight".to_string()),
        quantity: Some(1.0),
        package_type: Some("PKG".to_string()),
        weight: Some(weight_lb),
        weight_unit: Some("lb".to_string()),
    }
}
