//! Weight detection and unit conversion.

use crate::models::record::KG_TO_LB;

use super::patterns::WEIGHT;

/// All weights found in `text`, converted to pounds.
pub fn scan_weights_lb(text: &str) -> Vec<f64> {
    WEIGHT
        .captures_iter(text)
        .filter_map(|caps| {
            let value: f64 = caps[1].parse().ok()?;
            let unit = caps[2].to_lowercase();
            if unit.starts_with("kg") {
                Some(value * KG_TO_LB)
            } else {
                Some(value)
            }
        })
        .collect()
}

/// Largest weight printed in `text`, in pounds.
///
/// Gross weight is typically the largest figure on a freight document, so the
/// maximum candidate is taken as the total.
pub fn max_weight_lb(text: &str) -> Option<f64> {
    scan_weights_lb(text)
        .into_iter()
        .fold(None, |max: Option<f64>, w| {
            Some(max.map_or(w, |m| m.max(w)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kg_converted_to_pounds() {
        let weights = scan_weights_lb("net 1000 kg");
        assert_eq!(weights.len(), 1);
        assert!((weights[0] - 2204.62).abs() < 1e-6);
    }

    #[test]
    fn test_pounds_unchanged() {
        assert_eq!(scan_weights_lb("500 lbs"), vec![500.0]);
    }

    #[test]
    fn test_max_picked_as_total() {
        let text = "pallet 1: 300 lbs, pallet 2: 450lbs, tare 120 lb";
        assert_eq!(max_weight_lb(text), Some(450.0));
    }

    #[test]
    fn test_no_weights() {
        assert_eq!(max_weight_lb("nothing to see"), None);
    }
}
