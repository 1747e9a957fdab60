use serde::Serialize;

use super::rules::{FieldRule, RuleValue, FIELD_RULES};
use crate::models::{CellStatus, FeatureField, FeatureSet, Presence, YesNo};
use crate::pipeline::extraction::RawReport;

/// Which fields were read from the report and which kept their default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub recognized: Vec<FeatureField>,
    pub defaulted: Vec<FeatureField>,
}

impl ExtractionReport {
    pub fn is_recognized(&self, field: FeatureField) -> bool {
        self.recognized.contains(&field)
    }
}

/// Turns free-form report text into a complete `FeatureSet`.
///
/// Never fails: unrecognized fields take their default value.
pub struct FieldExtractor {
    rules: &'static [FieldRule],
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            rules: FIELD_RULES.as_slice(),
        }
    }

    pub fn extract(&self, report: &RawReport) -> FeatureSet {
        self.extract_with_report(report).0
    }

    pub fn extract_with_report(&self, report: &RawReport) -> (FeatureSet, ExtractionReport) {
        let text = report.as_str();
        let mut features = FeatureSet::default();
        let mut recognized = Vec::new();

        for rule in self.rules {
            if let Some(value) = rule.recognize(text) {
                apply(&mut features, rule.field, value);
                recognized.push(rule.field);
            }
        }

        let defaulted: Vec<FeatureField> = FeatureField::ALL
            .into_iter()
            .filter(|f| !recognized.contains(f))
            .collect();

        tracing::debug!(
            text_length = text.len(),
            recognized = recognized.len(),
            defaulted = defaulted.len(),
            "FieldExtractor: extraction complete"
        );

        (
            features,
            ExtractionReport {
                recognized,
                defaulted,
            },
        )
    }
}

/// Extract with the standard rule table.
pub fn extract(report: &RawReport) -> FeatureSet {
    FieldExtractor::new().extract(report)
}

fn apply(features: &mut FeatureSet, field: FeatureField, value: RuleValue) {
    match value {
        RuleValue::Number(n) => match field {
            FeatureField::Age => features.age = n,
            FeatureField::SerumCreatinine => features.serum_creatinine = n,
            FeatureField::Cd4 => features.cd4 = n,
            FeatureField::Albumin => features.albumin = n,
            FeatureField::Sugar => features.sugar = n,
            FeatureField::BloodUrea => features.blood_urea = n,
            FeatureField::Potassium => features.potassium = n,
            FeatureField::BloodGlucoseRandom => features.blood_glucose_random = n,
            FeatureField::WhiteBloodCellCount => features.white_blood_cell_count = n,
            other => tracing::warn!(field = %other, "Numeric rule on non-numeric field ignored"),
        },
        RuleValue::BloodPressure(bp) => features.blood_pressure = bp,
        RuleValue::Positive => match field {
            FeatureField::Hypertension => features.hypertension = YesNo::Yes,
            FeatureField::DiabetesMellitus => features.diabetes_mellitus = YesNo::Yes,
            FeatureField::CoronaryArteryDisease => features.coronary_artery_disease = YesNo::Yes,
            FeatureField::PedalEdema => features.pedal_edema = YesNo::Yes,
            FeatureField::Anaemia => features.anaemia = YesNo::Yes,
            FeatureField::RedBloodCells => features.red_blood_cells = CellStatus::Abnormal,
            FeatureField::PusCell => features.pus_cell = CellStatus::Abnormal,
            FeatureField::PusCellClumps => features.pus_cell_clumps = Presence::Present,
            FeatureField::Bacteria => features.bacteria = Presence::Present,
            other => tracing::warn!(field = %other, "Flag rule on numeric field ignored"),
        },
    }
}
