//! Feature preparation for classifier inference.
//!
//! Strips the ground-truth label from uploaded batches so the feature view
//! matches what the model saw at training time. At inference time the label
//! column is usually absent, which is the normal case rather than an error.

use crate::types::{columns, RecordSet};

/// Produces the feature view of a record set that is fed to the classifier.
pub struct FeatureProjector;

impl FeatureProjector {
    pub fn new() -> Self {
        Self
    }

    /// Remove the `is_delayed` label column if present.
    ///
    /// Returns a structural copy either way; mutating the projection later
    /// never affects the original batch. Row order and count are preserved,
    /// and projecting an already-projected set is a no-op copy.
    pub fn project(&self, records: &RecordSet) -> RecordSet {
        records.without_column(columns::IS_DELAYED)
    }
}

impl Default for FeatureProjector {
    fn default() -> Self {
        Self::new()
    }
}
