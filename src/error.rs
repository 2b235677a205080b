//! Error surface for the scoring pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors produced by the pipeline core.
///
/// Scoring failures are batch-fatal: no partially enriched records are ever
/// exposed. The projector and filter stages never fail; missing attributes in
/// those stages degrade to no-ops instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The classifier capability failed for any reason (schema mismatch,
    /// unseen categorical value, wrong column count or order).
    #[error("classifier invocation failed: {0}")]
    Scoring(#[source] anyhow::Error),

    /// The classifier returned a probability sequence of the wrong length.
    #[error("classifier returned {got} probabilities for {expected} records")]
    ProbabilityCount { expected: usize, got: usize },

    /// An operation hard-requires an attribute the record set does not carry.
    #[error("record set has no attribute `{attribute}`")]
    MissingAttribute { attribute: String },

    /// A cell holds a value of the wrong type for an operation that needs a
    /// number.
    #[error("column `{column}` holds a non-numeric value at row {row}")]
    NonNumericValue { column: String, row: usize },

    /// Zero records were given to an aggregation that needs at least one.
    #[error("record set is empty")]
    EmptyInput,

    /// A column's value count does not match the record count.
    #[error("column `{column}` has {got} values for {expected} records")]
    ColumnLength {
        column: String,
        expected: usize,
        got: usize,
    },

    /// A column with the same name already exists.
    #[error("duplicate column `{column}`")]
    DuplicateColumn { column: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn missing_attribute(attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            attribute: attribute.into(),
        }
    }
}
