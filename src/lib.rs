//! Delay-Risk Pipeline Library
//!
//! Batch scoring and reporting over tabular order records: prepare features,
//! score each record against a trained binary classifier, bucket the delay
//! probability into a risk category, then filter, aggregate, and export the
//! enriched table.

pub mod config;
pub mod error;
pub mod features;
pub mod filter;
pub mod model;
pub mod report;
pub mod scoring;
pub mod tabular;
pub mod types;

pub use config::AppConfig;
pub use error::{PipelineError, Result};
pub use features::FeatureProjector;
pub use filter::{FilterEngine, FilterSpec};
pub use model::OnnxClassifier;
pub use report::{GroupAggregate, KpiSummary, MetricsAggregator};
pub use scoring::{Classifier, RiskScorer};
pub use types::{columns, CategoryThresholds, RecordSet, RiskCategory, Value};
