//! Gap-filler and derivation engine.
//!
//! Back-fills fields the remote extractor left null using the same
//! single-field patterns as the fallback extractor, then computes derived
//! numeric fields. Non-null values are never overwritten: remote output takes
//! precedence over pattern back-fill.

use tracing::debug;

use crate::error::DerivationError;
use crate::models::record::{BolRecord, WaybillRecord};

use super::dates::first_date;
use super::fallback::synthetic_freight_line;
use super::patterns::{BOL_NUMBER, PRO_NUMBER, SCAC};
use super::weights::max_weight_lb;

/// Back-fill every pattern-backed BOL field that is currently null or empty.
pub fn reconcile_bol(record: &mut BolRecord, raw_text: &str) {
    if is_blank(&record.bol_number) {
        record.bol_number = BOL_NUMBER
            .captures(raw_text)
            .map(|caps| caps[1].trim().to_string());
    }
    if is_blank(&record.pro_number) {
        record.pro_number = PRO_NUMBER
            .captures(raw_text)
            .map(|caps| caps[1].trim().to_string());
    }
    if is_blank(&record.ship_date) {
        record.ship_date = first_date(raw_text);
    }
    if is_blank(&record.carrier.scac) {
        record.carrier.scac = SCAC.find(raw_text).map(|m| m.as_str().to_string());
    }
    if record.total_weight.is_none() {
        if let Some(weight) = max_weight_lb(raw_text) {
            record.total_weight = Some(weight);
            if record.freight_lines.is_empty() {
                record.freight_lines.push(synthetic_freight_line(weight));
            }
        }
    }
}

/// Back-fill the waybill date, then derive the net weight.
pub fn reconcile_waybill(record: &mut WaybillRecord, raw_text: &str) {
    if is_blank(&record.date) {
        record.date = first_date(raw_text);
    }

    if record.net_weight.is_none() {
        match derive_net_weight(record.gross_weight, record.tare_weight) {
            Ok(net) => record.net_weight = Some(net),
            Err(reason) => debug!(%reason, "net weight derivation skipped"),
        }
    }
}

/// Compute `gross - tare`.
///
/// The skip conditions are explicit values rather than a silent catch-all;
/// callers decide whether to swallow them.
pub fn derive_net_weight(
    gross: Option<f64>,
    tare: Option<f64>,
) -> Result<f64, DerivationError> {
    let gross = gross.ok_or(DerivationError::MissingInput("gross_weight"))?;
    let tare = tare.ok_or(DerivationError::MissingInput("tare_weight"))?;
    if !gross.is_finite() {
        return Err(DerivationError::NonFinite("gross_weight"));
    }
    if !tare.is_finite() {
        return Err(DerivationError::NonFinite("tare_weight"));
    }
    Ok(gross - tare)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_derivation_law() {
        let mut record = WaybillRecord {
            gross_weight: Some(42000.0),
            tare_weight: Some(15000.0),
            ..WaybillRecord::default()
        };
        reconcile_waybill(&mut record, "");
        assert_eq!(record.net_weight, Some(27000.0));
    }

    #[test]
    fn test_existing_net_weight_not_altered() {
        let mut record = WaybillRecord {
            gross_weight: Some(42000.0),
            tare_weight: Some(15000.0),
            net_weight: Some(26950.0),
            ..WaybillRecord::default()
        };
        reconcile_waybill(&mut record, "");
        assert_eq!(record.net_weight, Some(26950.0));
    }

    #[test]
    fn test_missing_input_leaves_net_null() {
        let mut record = WaybillRecord {
            gross_weight: Some(42000.0),
            ..WaybillRecord::default()
        };
        reconcile_waybill(&mut record, "");
        assert_eq!(record.net_weight, None);
        assert_eq!(
            derive_net_weight(Some(42000.0), None),
            Err(DerivationError::MissingInput("tare_weight"))
        );
    }

    #[test]
    fn test_waybill_date_back_filled() {
        let mut record = WaybillRecord::default();
        reconcile_waybill(&mut record, "weighed 03/14/2024");
        assert_eq!(record.date.as_deref(), Some("2024-03-14"));
    }

    #[test]
    fn test_bol_back_fill_does_not_overwrite() {
        let mut record = BolRecord {
            bol_number: Some("FROM-REMOTE".to_string()),
            ..BolRecord::default()
        };
        reconcile_bol(&mut record, "BOL# AB123456 1200 lbs");

        // remote value wins, nulls are filled
        assert_eq!(record.bol_number.as_deref(), Some("FROM-REMOTE"));
        assert_eq!(record.total_weight, Some(1200.0));
        assert_eq!(record.freight_lines.len(), 1);
    }

    #[test]
    fn test_bol_empty_string_counts_as_null() {
        let mut record = BolRecord {
            bol_number: Some("  ".to_string()),
            ..BolRecord::default()
        };
        reconcile_bol(&mut record, "Bill of Lading: CD987654");
        assert_eq!(record.bol_number.as_deref(), Some("CD987654"));
    }

    #[test]
    fn test_existing_freight_lines_kept() {
        let mut record = BolRecord::default();
        record.freight_lines.push(synthetic_freight_line(300.0));
        reconcile_bol(&mut record, "900 lbs");

        assert_eq!(record.total_weight, Some(900.0));
        // no second synthetic line appended
        assert_eq!(record.freight_lines.len(), 1);
    }
}
