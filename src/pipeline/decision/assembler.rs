//! Decision assembly: classifier probability + renal assessment → payload.

use super::classifier::ClassifierArtifacts;
use super::error::DecisionError;
use super::vector::ClassifierInput;
use crate::models::{
    DecisionPayload, FeatureForm, FeatureSet, PredictionLabel, RenalAssessment, Sex,
};
use crate::pipeline::renal::assess_renal_function;

/// Sex used for every eGFR estimate. Reports do not carry it reliably.
pub const ASSUMED_SEX: Sex = Sex::Male;

/// Probability strictly above which CKD is reported.
pub const DETECTION_THRESHOLD: f64 = 0.5;

/// Combines classifier output with the deterministic renal assessment.
///
/// Constructed once with optional artifacts and shared read-only. Without
/// artifacts only `assess` works; prediction calls fail with
/// `ClassifierUnavailable`.
#[derive(Debug)]
pub struct DecisionAssembler {
    artifacts: Option<ClassifierArtifacts>,
}

impl DecisionAssembler {
    pub fn new(artifacts: Option<ClassifierArtifacts>) -> Self {
        Self { artifacts }
    }

    /// Degraded mode: renal assessment only.
    pub fn renal_only() -> Self {
        Self { artifacts: None }
    }

    pub fn is_classifier_available(&self) -> bool {
        self.artifacts.is_some()
    }

    pub fn classifier_backend(&self) -> Option<&str> {
        self.artifacts.as_ref().map(ClassifierArtifacts::backend)
    }

    /// Renal assessment without the classifier.
    pub fn assess(&self, features: &FeatureSet) -> RenalAssessment {
        assess_renal_function(features.age, features.serum_creatinine, ASSUMED_SEX)
    }

    /// Merge a probability with the renal assessment of `features`.
    pub fn assemble(&self, features: &FeatureSet, probability: f64) -> DecisionPayload {
        let prediction = if probability > DETECTION_THRESHOLD {
            PredictionLabel::CkdDetected
        } else {
            PredictionLabel::NoCkdDetected
        };

        DecisionPayload {
            prediction,
            probability,
            confidence: format!("{:.1}%", probability * 100.0),
            renal: self.assess(features),
        }
    }

    /// Scale, classify and assemble a typed feature set.
    pub fn predict_features(&self, features: &FeatureSet) -> Result<DecisionPayload, DecisionError> {
        let artifacts = self
            .artifacts
            .as_ref()
            .ok_or(DecisionError::ClassifierUnavailable)?;

        let input = ClassifierInput::from_features(features);
        let probability = artifacts.probability(&input)?;
        let payload = self.assemble(features, probability);

        tracing::info!(
            backend = artifacts.backend(),
            prediction = payload.prediction.as_str(),
            confidence = %payload.confidence,
            stage = payload.renal.stage.as_str(),
            tdf = payload.renal.tdf_status.as_str(),
            "Decision assembled"
        );

        Ok(payload)
    }

    /// Coerce a loosely typed form, then predict.
    pub fn predict(&self, form: &FeatureForm) -> Result<DecisionPayload, DecisionError> {
        if !self.is_classifier_available() {
            return Err(DecisionError::ClassifierUnavailable);
        }
        let features = FeatureSet::try_from(form)?;
        self.predict_features(&features)
    }
}
