//! Type definitions for the delay-risk pipeline

pub mod category;
pub mod record;
pub mod value;

pub use category::{CategoryThresholds, RiskCategory};
pub use record::{columns, RecordSet};
pub use value::Value;
