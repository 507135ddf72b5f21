//! Field extraction: regex fallback, date/weight helpers, gap-filling.

pub mod dates;
pub mod fallback;
pub mod patterns;
pub mod reconcile;
pub mod weights;

pub use dates::{first_date, normalize_date};
pub use fallback::{extract, extract_bol, extract_waybill};
pub use reconcile::{derive_net_weight, reconcile_bol, reconcile_waybill};
pub use weights::{max_weight_lb, scan_weights_lb};
