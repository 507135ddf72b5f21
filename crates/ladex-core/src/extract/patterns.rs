//! Regex patterns shared by the fallback extractor and the gap-filler.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // BOL number, anchored on common label spellings
    pub static ref BOL_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:BOL|B\.O\.L\.?|Bill of Lading)[:#\s-]*([A-Z0-9-]{6,})"
    ).unwrap();

    // PRO number
    pub static ref PRO_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:PRO|Pro No\.?|Pro#)[:#\s-]*([A-Z0-9-]{5,})"
    ).unwrap();

    // Any date-shaped substring: D/M/Y, D-M-Y, or YYYY-MM-DD
    pub static ref DATE_ANY: Regex = Regex::new(
        r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}-\d{2}-\d{2})\b"
    ).unwrap();

    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})-(\d{2})-(\d{2})\b"
    ).unwrap();

    // Bare 2-4 letter uppercase token. Deliberately loose: the first match is
    // taken as a SCAC guess and carries a high false-positive rate.
    pub static ref SCAC: Regex = Regex::new(
        r"\b[A-Z]{2,4}\b"
    ).unwrap();

    // Weight with unit, e.g. "1200 lbs" or "500kg"
    pub static ref WEIGHT: Regex = Regex::new(
        r"(?i)\b(\d{2,6})\s?(lb|lbs|pounds|kg|kgs)\b"
    ).unwrap();
}
