//! Extraction record shapes for Bills of Lading and Waybills.
//!
//! Every schema field is always serialized, null when absent. Downstream
//! consumers rely on key presence, so none of these fields use
//! `skip_serializing_if`.

use serde::{Deserialize, Serialize};

/// Pounds per kilogram, applied before any weight is stored.
pub const KG_TO_LB: f64 = 2.20462;

/// The document type being extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Bill of Lading: header fields plus repeated freight lines.
    Bol,
    /// Waybill / scale ticket: 14 flat scalar fields.
    Waybill,
}

/// A finalized record of either shape, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionRecord {
    Bol(BolRecord),
    Waybill(WaybillRecord),
}

impl ExtractionRecord {
    pub fn kind(&self) -> DocumentKind {
        match self {
            ExtractionRecord::Bol(_) => DocumentKind::Bol,
            ExtractionRecord::Waybill(_) => DocumentKind::Waybill,
        }
    }

    /// Back-fill null fields from the raw text and compute derived fields.
    /// Never overwrites a non-null value.
    pub fn reconcile(&mut self, raw_text: &str) {
        match self {
            ExtractionRecord::Bol(record) => crate::extract::reconcile_bol(record, raw_text),
            ExtractionRecord::Waybill(record) => {
                crate::extract::reconcile_waybill(record, raw_text)
            }
        }
    }
}

/// Bill of Lading header record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BolRecord {
    pub bol_number: Option<String>,
    pub pro_number: Option<String>,
    /// ISO-8601 calendar date.
    pub ship_date: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub carrier: Carrier,
    #[serde(deserialize_with = "null_default")]
    pub freight_lines: Vec<FreightLine>,
    /// Total weight in pounds.
    #[serde(deserialize_with = "lenient_f64")]
    pub total_weight: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_packages: Option<f64>,
}

/// Carrier identification on a BOL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Carrier {
    pub name: Option<String>,
    /// Standard Carrier Alpha Code (2-4 uppercase letters).
    pub scac: Option<String>,
}

/// One freight line on a BOL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreightLine {
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub quantity: Option<f64>,
    pub package_type: Option<String>,
    /// Weight in the unit given by `weight_unit`; a unit of "lb" means the
    /// value is already in pounds.
    #[serde(deserialize_with = "lenient_f64")]
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
}

/// Waybill / scale-ticket record: 14 flat scalar fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaybillRecord {
    pub ticket_number: Option<String>,
    pub waybill_number: Option<String>,
    /// ISO-8601 calendar date.
    pub date: Option<String>,
    pub carrier: Option<String>,
    pub shipper: Option<String>,
    pub consignee: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub commodity: Option<String>,
    pub vehicle_id: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub gross_weight: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub tare_weight: Option<f64>,
    /// Derived as `gross_weight - tare_weight` when absent.
    #[serde(deserialize_with = "lenient_f64")]
    pub net_weight: Option<f64>,
    pub hazmat: Option<TriState>,
}

/// Yes/No/Not-Indicated answer printed on waybills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriState {
    #[serde(rename = "Yes", alias = "yes", alias = "YES")]
    Yes,
    #[serde(rename = "No", alias = "no", alias = "NO")]
    No,
    #[serde(rename = "Not Indicated", alias = "not indicated", alias = "Not indicated")]
    NotIndicated,
}

impl TriState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriState::Yes => "Yes",
            TriState::No => "No",
            TriState::NotIndicated => "Not Indicated",
        }
    }
}

/// Deserialize a nested value the remote collaborator may answer with an
/// explicit null, falling back to the empty default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize an optional number, tolerating numeric strings from the remote
/// collaborator. Anything else coerces to null rather than failing the whole
/// record.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}
