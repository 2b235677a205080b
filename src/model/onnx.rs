//! ONNX Runtime implementation of the classifier capability.

use crate::model::loader::{load_model, LoadedModel};
use crate::scoring::Classifier;
use crate::types::RecordSet;
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::path::Path;
use std::sync::RwLock;
use tracing::debug;

/// Delay classifier backed by an ONNX Runtime session.
///
/// Encodes a projected record set into a `[n_rows, n_features]` f32 tensor and
/// extracts the positive-class probability per record. Handles both plain
/// tensor outputs (`[n, 2]` / `[n, 1]`) and scikit-learn's
/// `seq(map(int64, float))` probability output.
pub struct OnnxClassifier {
    // Session::run needs &mut; the capability itself is shared read-only.
    model: RwLock<LoadedModel>,
    feature_columns: Vec<String>,
}

impl OnnxClassifier {
    /// Load the classifier from an `.onnx` file.
    ///
    /// `feature_columns` is the ordered list of columns the model was trained
    /// on; when empty, every column of the projected set is used in schema
    /// order.
    pub fn load<P: AsRef<Path>>(
        path: P,
        feature_columns: Vec<String>,
        onnx_threads: usize,
    ) -> Result<Self> {
        let model = load_model(path, onnx_threads)?;
        Ok(Self {
            model: RwLock::new(model),
            feature_columns,
        })
    }

    /// Pull per-record positive-class probabilities out of the session output.
    fn extract_probabilities(
        outputs: &ort::session::SessionOutputs,
        output_name: &str,
        n_rows: usize,
    ) -> Result<Vec<f64>> {
        if let Some(output) = outputs.get(output_name) {
            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                return from_tensor(&shape, data, n_rows);
            }
            if DynSequenceValueType::can_downcast(&output.dtype()) {
                return from_sequence_map(output, n_rows);
            }
        }

        // Fallback: any non-label output that yields probabilities.
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                return from_tensor(&shape, data, n_rows);
            }
            if DynSequenceValueType::can_downcast(&output.dtype()) {
                return from_sequence_map(&output, n_rows);
            }
        }

        anyhow::bail!("model produced no usable probability output")
    }
}

impl Classifier for OnnxClassifier {
    fn predict_probability(&self, features: &RecordSet) -> Result<Vec<f64>> {
        let (n_features, matrix) = encode_features(features, &self.feature_columns)?;
        let n_rows = features.len();

        let shape = vec![n_rows as i64, n_features as i64];
        let input_tensor =
            Tensor::from_array((shape, matrix)).context("Failed to create input tensor")?;

        let mut model = self
            .model
            .write()
            .map_err(|e| anyhow::anyhow!("Lock error: {e}"))?;
        let input_name = model.input_name.clone();
        let output_name = model.output_name.clone();

        let outputs = model.session.run(ort::inputs![&input_name => input_tensor])?;

        Self::extract_probabilities(&outputs, &output_name, n_rows)
    }
}

/// Encode the record set row-major in the model's expected column order.
///
/// A missing feature column or a non-numeric cell is a capability error; the
/// scorer surfaces it as a batch-fatal scoring failure.
fn encode_features(records: &RecordSet, feature_columns: &[String]) -> Result<(usize, Vec<f32>)> {
    let column_order: Vec<&str> = if feature_columns.is_empty() {
        records.columns().iter().map(String::as_str).collect()
    } else {
        feature_columns.iter().map(String::as_str).collect()
    };

    let indices: Vec<usize> = column_order
        .iter()
        .map(|name| {
            records
                .column_index(name)
                .with_context(|| format!("feature column `{name}` missing from input"))
        })
        .collect::<Result<_>>()?;

    let mut matrix = Vec::with_capacity(records.len() * indices.len());
    for (row_idx, row) in records.rows().iter().enumerate() {
        for (&col_idx, name) in indices.iter().zip(&column_order) {
            let v = row[col_idx].as_f64().with_context(|| {
                format!("non-numeric value in feature column `{name}` at row {row_idx}")
            })?;
            matrix.push(v as f32);
        }
    }

    Ok((indices.len(), matrix))
}

/// `[n, 2]` gives the class-1 column, `[n, 1]` and `[n]` are already the
/// positive-class probability.
fn from_tensor(shape: &ort::tensor::Shape, data: &[f32], n_rows: usize) -> Result<Vec<f64>> {
    let dims: Vec<i64> = shape.iter().copied().collect();

    let probabilities: Vec<f64> = match dims.as_slice() {
        [rows, classes] if *classes >= 2 => {
            let classes = *classes as usize;
            (0..*rows as usize)
                .map(|r| data[r * classes + 1] as f64)
                .collect()
        }
        [rows, 1] => (0..*rows as usize).map(|r| data[r] as f64).collect(),
        [rows] => (0..*rows as usize).map(|r| data[r] as f64).collect(),
        _ => anyhow::bail!("unexpected probability tensor shape {dims:?}"),
    };

    if probabilities.len() != n_rows {
        anyhow::bail!(
            "probability tensor has {} rows for {} records",
            probabilities.len(),
            n_rows
        );
    }
    debug!(rows = n_rows, "Extracted probabilities from tensor output");
    Ok(probabilities)
}

/// scikit-learn exports class probabilities as one map per record.
fn from_sequence_map(output: &ort::value::DynValue, n_rows: usize) -> Result<Vec<f64>> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow::anyhow!("failed to downcast probability sequence: {e}"))?;
    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

    if maps.len() != n_rows {
        anyhow::bail!(
            "probability sequence has {} entries for {} records",
            maps.len(),
            n_rows
        );
    }

    let mut probabilities = Vec::with_capacity(n_rows);
    for map_value in &maps {
        let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;
        let positive = kv_pairs
            .iter()
            .find(|(class_id, _)| *class_id == 1)
            .map(|(_, p)| *p as f64)
            .or_else(|| {
                kv_pairs
                    .iter()
                    .find(|(class_id, _)| *class_id == 0)
                    .map(|(_, p)| 1.0 - *p as f64)
            })
            .context("no class probability in output map")?;
        probabilities.push(positive);
    }

    debug!(rows = n_rows, "Extracted probabilities from seq(map) output");
    Ok(probabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::tests::sample_orders;

    #[test]
    fn test_encode_rejects_missing_feature_column() {
        let wanted = vec!["distance_km".to_string(), "weight_kg".to_string()];
        let err = encode_features(&sample_orders(), &wanted).unwrap_err();
        assert!(err.to_string().contains("weight_kg"));
    }

    #[test]
    fn test_encode_rejects_non_numeric_cells() {
        let wanted = vec!["priority".to_string()];
        let err = encode_features(&sample_orders(), &wanted).unwrap_err();
        assert!(err.to_string().contains("priority"));
    }

    #[test]
    fn test_encode_orders_by_feature_columns() {
        let wanted = vec!["distance_km".to_string()];
        let (n_features, matrix) = encode_features(&sample_orders(), &wanted).unwrap();
        assert_eq!(n_features, 1);
        assert_eq!(matrix, vec![120.5, 30.0, 410.0, 12.25]);
    }

    #[test]
    fn test_encode_defaults_to_every_column() {
        // sample orders carry text columns, so the all-columns default fails
        let err = encode_features(&sample_orders(), &[]).unwrap_err();
        assert!(err.to_string().contains("order_id"));
    }
}
