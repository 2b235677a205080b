//! ONNX model loading.

use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loaded ONNX model with resolved input/output names.
pub struct LoadedModel {
    pub name: String,
    pub session: Session,
    pub input_name: String,
    /// Output carrying the class probabilities.
    pub output_name: String,
}

/// Load the trained delay classifier from an `.onnx` file.
///
/// `onnx_threads` bounds intra-op parallelism; the pipeline itself stays
/// single-threaded.
pub fn load_model<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<LoadedModel> {
    let path = path.as_ref();

    ort::init().commit()?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());

    info!(model = %name, path = %path.display(), threads = onnx_threads, "Loading ONNX model");

    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(onnx_threads)?
        .commit_from_file(path)
        .context(format!("Failed to load model from {:?}", path))?;

    let input_name = session
        .inputs
        .first()
        .map(|i| i.name.clone())
        .unwrap_or_else(|| "float_input".to_string());

    // scikit-learn exports name the probability output "output_probability";
    // tree-ensemble exports tend to call it "probabilities".
    let output_name = session
        .outputs
        .iter()
        .find(|o| o.name.contains("prob") || o.name.contains("output"))
        .map(|o| o.name.clone())
        .unwrap_or_else(|| {
            session
                .outputs
                .last()
                .map(|o| o.name.clone())
                .unwrap_or_else(|| "probabilities".to_string())
        });

    info!(
        model = %name,
        input = %input_name,
        output = %output_name,
        "Model loaded"
    );

    Ok(LoadedModel {
        name,
        session,
        input_name,
        output_name,
    })
}
