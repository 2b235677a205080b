//! Classifier implementations behind the capability trait

pub mod loader;
pub mod onnx;

pub use loader::LoadedModel;
pub use onnx::OnnxClassifier;
