//! Prompt and JSON schema per document kind.

use serde_json::{Value, json};

use crate::models::record::DocumentKind;

pub fn system_prompt(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Bol => {
            "Extract Bill of Lading fields from OCR text. Return ONLY valid JSON \
             matching the schema. If unsure, use null."
        }
        DocumentKind::Waybill => {
            "Extract waybill / scale ticket fields from OCR text. Return ONLY valid \
             JSON matching the schema. Weights are numbers in pounds. If unsure, use null."
        }
    }
}

pub fn response_schema(kind: DocumentKind) -> Value {
    match kind {
        DocumentKind::Bol => json!({
            "name": "bol_record",
            "schema": {
                "type": "object",
                "properties": {
                    "bol_number": {"type": ["string", "null"]},
                    "pro_number": {"type": ["string", "null"]},
                    "ship_date": {"type": ["string", "null"]},
                    "carrier": {
                        "type": "object",
                        "properties": {
                            "name": {"type": ["string", "null"]},
                            "scac": {"type": ["string", "null"]}
                        }
                    },
                    "freight_lines": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "description": {"type": ["string", "null"]},
                                "quantity": {"type": ["number", "null"]},
                                "package_type": {"type": ["string", "null"]},
                                "weight": {"type": ["number", "null"]},
                                "weight_unit": {"type": ["string", "null"]}
                            }
                        }
                    },
                    "total_weight": {"type": ["number", "null"]},
                    "total_packages": {"type": ["number", "null"]}
                },
                "additionalProperties": true
            }
        }),
        DocumentKind::Waybill => json!({
            "name": "waybill_record",
            "schema": {
                "type": "object",
                "properties": {
                    "ticket_number": {"type": ["string", "null"]},
                    "waybill_number": {"type": ["string", "null"]},
                    "date": {"type": ["string", "null"]},
                    "carrier": {"type": ["string", "null"]},
                    "shipper": {"type": ["string", "null"]},
                    "consignee": {"type": ["string", "null"]},
                    "origin": {"type": ["string", "null"]},
                    "destination": {"type": ["string", "null"]},
                    "commodity": {"type": ["string", "null"]},
                    "vehicle_id": {"type": ["string", "null"]},
                    "gross_weight": {"type": ["number", "null"]},
                    "tare_weight": {"type": ["number", "null"]},
                    "net_weight": {"type": ["number", "null"]},
                    "hazmat": {"enum": ["Yes", "No", "Not Indicated", null]}
                },
                "additionalProperties": true
            }
        }),
    }
}
