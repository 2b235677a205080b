//! Delay-risk scoring against an opaque classifier capability.

use crate::error::{PipelineError, Result};
use crate::types::{columns, CategoryThresholds, RecordSet, RiskCategory, Value};
use tracing::info;

/// A previously trained binary classifier.
///
/// The model is an external collaborator: any concrete implementation (tree
/// ensemble, linear model, remote service) works behind this capability. It is
/// shared read-only state and must return exactly one probability per input
/// record or fail the whole batch.
pub trait Classifier {
    /// Probability of delay for every record, in input order.
    fn predict_probability(&self, features: &RecordSet) -> anyhow::Result<Vec<f64>>;
}

/// Scores a projected batch and buckets each probability into a risk category.
pub struct RiskScorer {
    thresholds: CategoryThresholds,
}

impl RiskScorer {
    pub fn new(thresholds: CategoryThresholds) -> Self {
        Self { thresholds }
    }

    /// Produce the enriched record set: every original record plus
    /// `Predicted Delay Probability` and `Predicted Delay Category`.
    ///
    /// The classifier sees only `features` (the projected view); the derived
    /// columns are appended to a copy of `records`, so columns the projection
    /// stripped, like the `is_delayed` label, survive into the enriched
    /// output.
    ///
    /// All-or-nothing: a classifier failure or a probability sequence of the
    /// wrong length rejects the entire batch with no partial results. The
    /// caller decides whether to abort or retry with corrected input.
    pub fn score(
        &self,
        classifier: &dyn Classifier,
        features: &RecordSet,
        records: &RecordSet,
    ) -> Result<RecordSet> {
        let probabilities = classifier
            .predict_probability(features)
            .map_err(PipelineError::Scoring)?;

        if probabilities.len() != records.len() {
            return Err(PipelineError::ProbabilityCount {
                expected: records.len(),
                got: probabilities.len(),
            });
        }

        let categories: Vec<Value> = probabilities
            .iter()
            .map(|&p| {
                Value::Text(
                    RiskCategory::from_probability(p, &self.thresholds)
                        .label()
                        .to_string(),
                )
            })
            .collect();
        let probability_values: Vec<Value> =
            probabilities.iter().map(|&p| Value::Float(p)).collect();

        let scored = records
            .with_column(columns::DELAY_PROBABILITY, probability_values)?
            .with_column(columns::DELAY_CATEGORY, categories)?;

        info!(
            records = scored.len(),
            high_threshold = self.thresholds.high,
            medium_threshold = self.thresholds.medium,
            "Scoring complete"
        );

        Ok(scored)
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(CategoryThresholds::default())
    }
}
