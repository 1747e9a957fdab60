use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assessment::DecisionPayload;
use super::enums::{CkdStage, PredictionLabel, TdfStatus};

/// Persisted summary of one patient decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: Uuid,
    pub name: String,
    pub recorded_at: NaiveDateTime,
    pub age: f64,
    pub gender: Option<String>,
    pub diagnosis: PredictionLabel,
    pub stage: CkdStage,
    pub tdf_status: TdfStatus,
    pub gfr: f64,
    pub created_by: String,
}

impl PatientRecord {
    /// Build a record from a decision. Blank names and authors fall back to
    /// "Unknown" and "system".
    pub fn from_decision(
        name: &str,
        gender: Option<&str>,
        age: f64,
        decision: &DecisionPayload,
        created_by: &str,
        recorded_at: NaiveDateTime,
    ) -> Self {
        let non_blank = |s: &str, fallback: &str| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                fallback.to_string()
            } else {
                trimmed.to_string()
            }
        };

        Self {
            id: Uuid::new_v4(),
            name: non_blank(name, "Unknown"),
            recorded_at,
            age,
            gender: gender.map(str::trim).filter(|g| !g.is_empty()).map(String::from),
            diagnosis: decision.prediction,
            stage: decision.renal.stage,
            tdf_status: decision.renal.tdf_status,
            gfr: decision.renal.gfr,
            created_by: non_blank(created_by, "system"),
        }
    }
}
