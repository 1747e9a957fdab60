//! Downstream boundary: the pre-trained feature scaler and CKD classifier.
//!
//! Artifacts are loaded once at startup and shared read-only. Two model
//! backends exist:
//! - `LogisticClassifier`: `classifier.json` with coefficients and intercept
//! - `OnnxClassifier`: `classifier.onnx`, behind the `onnx-classifier` feature

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::vector::ClassifierInput;
use crate::config;
use crate::models::FeatureField;

// ═══════════════════════════════════════════════════════════
// Trait
// ═══════════════════════════════════════════════════════════

/// Pre-trained CKD classifier. Receives standardized features.
pub trait RiskClassifier: Send + Sync {
    /// Probability of CKD in [0, 1].
    fn predict_probability(&self, scaled: &ClassifierInput) -> Result<f64, ClassifierError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

// ═══════════════════════════════════════════════════════════
// Feature scaler
// ═══════════════════════════════════════════════════════════

/// Standard-score transform: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl FeatureScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, String> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Scaler that leaves features unchanged.
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FeatureField::COUNT],
            scale: vec![1.0; FeatureField::COUNT],
        }
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let scaler: Self = read_json_artifact(path)?;
        scaler
            .validate()
            .map_err(|reason| invalid(path, reason))?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), String> {
        if self.mean.len() != FeatureField::COUNT || self.scale.len() != FeatureField::COUNT {
            return Err(format!(
                "expected {} mean/scale entries, got {}/{}",
                FeatureField::COUNT,
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err("mean/scale entries must be finite".into());
        }
        Ok(())
    }

    /// Zero-variance features (scale 0) are only centered.
    pub fn transform(&self, input: &ClassifierInput) -> ClassifierInput {
        let mut out = input.0;
        for (i, value) in out.iter_mut().enumerate() {
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            *value = (*value - self.mean[i]) / scale;
        }
        ClassifierInput(out)
    }
}

// ═══════════════════════════════════════════════════════════
// Logistic classifier
// ═══════════════════════════════════════════════════════════

/// Linear model with sigmoid output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, String> {
        let model = Self {
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let model: Self = read_json_artifact(path)?;
        model.validate().map_err(|reason| invalid(path, reason))?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), String> {
        if self.coefficients.len() != FeatureField::COUNT {
            return Err(format!(
                "expected {} coefficients, got {}",
                FeatureField::COUNT,
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("coefficients and intercept must be finite".into());
        }
        Ok(())
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl RiskClassifier for LogisticClassifier {
    fn predict_probability(&self, scaled: &ClassifierInput) -> Result<f64, ClassifierError> {
        let z: f64 = self
            .coefficients
            .iter()
            .zip(scaled.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        Ok(sigmoid(z))
    }

    fn name(&self) -> &str {
        "logistic"
    }
}

// ═══════════════════════════════════════════════════════════
// ONNX classifier, behind `onnx-classifier` feature
// ═══════════════════════════════════════════════════════════

#[cfg(feature = "onnx-classifier")]
mod onnx {
    use super::{ClassifierError, ClassifierInput, RiskClassifier};
    use crate::models::FeatureField;
    use ort::session::Session;
    use std::path::Path;
    use std::sync::Mutex;

    /// Classifier exported to ONNX: float32 input `[1, 19]`, the first element of
    /// the first output is the probability.
    ///
    /// `ort::Session::run` takes `&mut self`, hence the Mutex.
    pub struct OnnxClassifier {
        session: Mutex<Session>,
    }

    impl OnnxClassifier {
        pub fn load(model_path: &Path) -> Result<Self, ClassifierError> {
            if !model_path.exists() {
                return Err(ClassifierError::ArtifactMissing(model_path.to_path_buf()));
            }

            let session = Session::builder()
                .map_err(|e: ort::Error| ClassifierError::ModelInit(e.to_string()))?
                .with_intra_threads(1)
                .map_err(|e: ort::Error| ClassifierError::ModelInit(e.to_string()))?
                .commit_from_file(model_path)
                .map_err(|e: ort::Error| ClassifierError::ModelInit(format!("ONNX load failed: {e}")))?;

            tracing::info!("ONNX classifier loaded from {}", model_path.display());

            Ok(Self {
                session: Mutex::new(session),
            })
        }
    }

    impl RiskClassifier for OnnxClassifier {
        fn predict_probability(&self, scaled: &ClassifierInput) -> Result<f64, ClassifierError> {
            use ort::value::TensorRef;

            let array = ndarray::Array2::from_shape_vec((1, FeatureField::COUNT), scaled.to_f32().to_vec())
                .map_err(|e| ClassifierError::Inference(e.to_string()))?;
            let tensor = TensorRef::from_array_view(&array)
                .map_err(|e| ClassifierError::Inference(e.to_string()))?;

            let mut session = self
                .session
                .lock()
                .map_err(|_| ClassifierError::Inference("Session lock poisoned".to_string()))?;

            let outputs = session
                .run(ort::inputs![tensor])
                .map_err(|e| ClassifierError::Inference(format!("ONNX inference failed: {e}")))?;

            let (_shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| ClassifierError::Inference(format!("Output extraction: {e}")))?;

            data.first()
                .map(|p| f64::from(*p))
                .ok_or_else(|| ClassifierError::Inference("empty model output".to_string()))
        }

        fn name(&self) -> &str {
            "onnx"
        }
    }
}

#[cfg(feature = "onnx-classifier")]
pub use onnx::OnnxClassifier;

// ═══════════════════════════════════════════════════════════
// Artifacts
// ═══════════════════════════════════════════════════════════

/// Scaler + model pair, versioned together.
pub struct ClassifierArtifacts {
    scaler: FeatureScaler,
    model: Box<dyn RiskClassifier>,
}

impl ClassifierArtifacts {
    pub fn new(scaler: FeatureScaler, model: Box<dyn RiskClassifier>) -> Self {
        Self { scaler, model }
    }

    /// Load `scaler.json` plus a model from `dir`. With the `onnx-classifier`
    /// feature, `classifier.onnx` is preferred over `classifier.json`.
    pub fn load(dir: &Path) -> Result<Self, ClassifierError> {
        let scaler = FeatureScaler::load(&dir.join(config::SCALER_FILE))?;
        let model = load_model(dir)?;
        tracing::info!(
            dir = %dir.display(),
            backend = model.name(),
            "Classifier artifacts loaded"
        );
        Ok(Self { scaler, model })
    }

    pub fn backend(&self) -> &str {
        self.model.name()
    }

    /// Scale the raw input and run the model. Rejects probabilities outside [0, 1].
    pub fn probability(&self, input: &ClassifierInput) -> Result<f64, ClassifierError> {
        let scaled = self.scaler.transform(input);
        let probability = self.model.predict_probability(&scaled)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ClassifierError::Inference(format!(
                "{} returned probability {probability} outside [0, 1]",
                self.model.name()
            )));
        }
        Ok(probability)
    }
}

impl std::fmt::Debug for ClassifierArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierArtifacts")
            .field("scaler", &self.scaler)
            .field("model", &self.model.name())
            .finish()
    }
}

fn load_model(dir: &Path) -> Result<Box<dyn RiskClassifier>, ClassifierError> {
    #[cfg(feature = "onnx-classifier")]
    {
        let onnx_path = dir.join(config::ONNX_MODEL_FILE);
        if onnx_path.exists() {
            return Ok(Box::new(OnnxClassifier::load(&onnx_path)?));
        }
    }

    let json_path = dir.join(config::LOGISTIC_MODEL_FILE);
    Ok(Box::new(LogisticClassifier::load(&json_path)?))
}

fn read_json_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ClassifierError> {
    if !path.exists() {
        return Err(ClassifierError::ArtifactMissing(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| invalid(path, e.to_string()))
}

fn invalid(path: &Path, reason: impl Into<String>) -> ClassifierError {
    ClassifierError::InvalidArtifact {
        path: PathBuf::from(path),
        reason: reason.into(),
    }
}
