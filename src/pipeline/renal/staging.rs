//! CKD staging ladder and TDF prescribing verdict.

use serde::Serialize;

use super::gfr::estimate_gfr;
use crate::models::{CkdStage, RenalAssessment, RiskColor, Sex, TdfStatus};

/// eGFR below which tenofovir is contraindicated.
pub const TDF_GFR_THRESHOLD: f64 = 60.0;

/// Exclusive upper eGFR bound of each stage, most severe first. The first stage
/// whose bound the value falls under wins; 90 and above is Stage 1.
const STAGE_LADDER: [(f64, CkdStage); 5] = [
    (15.0, CkdStage::Stage5),
    (30.0, CkdStage::Stage4),
    (45.0, CkdStage::Stage3b),
    (60.0, CkdStage::Stage3a),
    (90.0, CkdStage::Stage2),
];

/// Stage plus TDF verdict for one eGFR value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StagingOutcome {
    pub stage: CkdStage,
    pub tdf_status: TdfStatus,
    pub message: &'static str,
    pub color: RiskColor,
}

/// Map an eGFR value to its CKD stage.
pub fn classify_stage(gfr: f64) -> CkdStage {
    STAGE_LADDER
        .iter()
        .find(|(upper, _)| gfr < *upper)
        .map(|(_, stage)| *stage)
        .unwrap_or(CkdStage::Stage1)
}

/// TDF verdict: contraindicated below 60, safe otherwise.
pub fn tdf_verdict(gfr: f64) -> TdfStatus {
    if gfr < TDF_GFR_THRESHOLD {
        TdfStatus::Contraindicated
    } else {
        TdfStatus::Safe
    }
}

/// Stage and safety verdict for an eGFR value. Total over all inputs.
pub fn stage_and_safety(gfr: f64) -> StagingOutcome {
    let tdf_status = tdf_verdict(gfr);
    StagingOutcome {
        stage: classify_stage(gfr),
        tdf_status,
        message: tdf_status.message(),
        color: tdf_status.color(),
    }
}

/// Full renal assessment from raw inputs.
pub fn assess_renal_function(age: f64, serum_creatinine: f64, sex: Sex) -> RenalAssessment {
    let gfr = estimate_gfr(age, serum_creatinine, sex);
    let outcome = stage_and_safety(gfr);

    tracing::debug!(
        gfr = gfr,
        stage = outcome.stage.as_str(),
        tdf = outcome.tdf_status.as_str(),
        "Renal function assessed"
    );

    RenalAssessment {
        gfr,
        stage: outcome.stage,
        tdf_status: outcome.tdf_status,
        message: outcome.message.to_string(),
        color: outcome.color,
    }
}
