use serde::{Deserialize, Serialize};

use super::enums::{CkdStage, PredictionLabel, RiskColor, TdfStatus};

/// Renal function assessment derived from (age, serum creatinine, sex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenalAssessment {
    pub gfr: f64,
    pub stage: CkdStage,
    pub tdf_status: TdfStatus,
    pub message: String,
    pub color: RiskColor,
}

impl RenalAssessment {
    /// eGFR rounded to one decimal place, as displayed to clinicians.
    pub fn gfr_display(&self) -> String {
        format!("{:.1}", self.gfr)
    }
}

/// Final decision for one prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPayload {
    pub prediction: PredictionLabel,
    pub probability: f64,
    /// Percentage with one decimal place, e.g. `"73.0%"`.
    pub confidence: String,
    pub renal: RenalAssessment,
}

/// TDF block of the wire response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdfVerdict {
    pub status: TdfStatus,
    pub msg: String,
    pub color: RiskColor,
}

/// Wire shape of a decision, as returned to prediction callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub prediction: PredictionLabel,
    pub confidence: String,
    pub gfr: String,
    pub stage: CkdStage,
    pub tdf: TdfVerdict,
}

impl From<&DecisionPayload> for DecisionResponse {
    fn from(payload: &DecisionPayload) -> Self {
        Self {
            prediction: payload.prediction,
            confidence: payload.confidence.clone(),
            gfr: payload.renal.gfr_display(),
            stage: payload.renal.stage,
            tdf: TdfVerdict {
                status: payload.renal.tdf_status,
                msg: payload.renal.message.clone(),
                color: payload.renal.color,
            },
        }
    }
}
