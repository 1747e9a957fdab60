//! Error types for classifier artifacts and decision assembly.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::FeatureField;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Classifier artifact not found: {0}")]
    ArtifactMissing(PathBuf),

    #[error("Invalid classifier artifact {path}: {reason}")]
    InvalidArtifact { path: PathBuf, reason: String },

    #[error("Model initialization failed: {0}")]
    ModelInit(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("Malformed feature {field}: {value}")]
    MalformedFeature { field: FeatureField, value: String },

    #[error("Classifier unavailable: predictions are disabled")]
    ClassifierUnavailable,

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}
