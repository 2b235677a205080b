//! KPI summaries and grouped aggregates over scored record sets.

use crate::error::{PipelineError, Result};
use crate::types::{columns, RecordSet, RiskCategory, Value};
use serde::Serialize;
use tracing::debug;

/// Scalar business metrics over one filtered view.
///
/// Derived, recomputed on every filter change, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_count: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    pub mean_probability: f64,
}

/// Mean delay probability for one distinct value of the grouping attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub key: Value,
    pub mean_probability: f64,
    pub count: usize,
}

/// Grouped means, ordered by first appearance of each key in the input.
pub type GroupAggregate = Vec<GroupMean>;

/// Computes KPI summaries and grouped breakdowns.
pub struct MetricsAggregator;

impl MetricsAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Category counts and mean probability for a scored record set.
    ///
    /// An empty set is `EmptyInput`; the caller decides the default rather
    /// than this component guessing a mean for zero records.
    pub fn summarize(&self, records: &RecordSet) -> Result<KpiSummary> {
        if records.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let labels = records.column_values(columns::DELAY_CATEGORY)?;
        let probabilities = Self::probabilities(records)?;

        let count_of = |category: RiskCategory| {
            labels
                .iter()
                .filter(|v| v.as_str() == Some(category.label()))
                .count()
        };

        let summary = KpiSummary {
            total_count: records.len(),
            high_risk_count: count_of(RiskCategory::HighRisk),
            medium_risk_count: count_of(RiskCategory::MediumRisk),
            low_risk_count: count_of(RiskCategory::LowRisk),
            mean_probability: probabilities.iter().sum::<f64>() / probabilities.len() as f64,
        };

        debug!(total = summary.total_count, "KPI summary computed");
        Ok(summary)
    }

    /// Mean delay probability per distinct value of `attribute`.
    ///
    /// Groups appear in first-appearance order of their key, not resorted.
    /// This component assumes the attribute exists; callers check
    /// `has_column` first and skip aggregations over absent attributes.
    pub fn group_mean(&self, records: &RecordSet, attribute: &str) -> Result<GroupAggregate> {
        let keys = records.column_values(attribute)?;
        let probabilities = Self::probabilities(records)?;

        // first-appearance order, so a Vec scan instead of a map
        let mut groups: Vec<(Value, f64, usize)> = Vec::new();
        for (key, p) in keys.iter().zip(&probabilities) {
            match groups.iter_mut().find(|(k, _, _)| k == *key) {
                Some((_, sum, count)) => {
                    *sum += p;
                    *count += 1;
                }
                None => groups.push(((*key).clone(), *p, 1)),
            }
        }

        Ok(groups
            .into_iter()
            .map(|(key, sum, count)| GroupMean {
                key,
                mean_probability: sum / count as f64,
                count,
            })
            .collect())
    }

    fn probabilities(records: &RecordSet) -> Result<Vec<f64>> {
        records
            .column_values(columns::DELAY_PROBABILITY)?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.as_f64().ok_or_else(|| PipelineError::NonNumericValue {
                    column: columns::DELAY_PROBABILITY.to_string(),
                    row,
                })
            })
            .collect()
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
