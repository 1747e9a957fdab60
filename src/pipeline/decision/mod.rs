//! Classifier boundary and decision assembly.

pub mod assembler;
pub mod classifier;
pub mod error;
pub mod form;
pub mod vector;

pub use assembler::{DecisionAssembler, ASSUMED_SEX, DETECTION_THRESHOLD};
pub use classifier::{ClassifierArtifacts, FeatureScaler, LogisticClassifier, RiskClassifier};
#[cfg(feature = "onnx-classifier")]
pub use classifier::OnnxClassifier;
pub use error::{ClassifierError, DecisionError};
pub use vector::ClassifierInput;
