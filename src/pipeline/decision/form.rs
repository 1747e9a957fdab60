//! Coercion of a loosely typed `FeatureForm` into a `FeatureSet`.
//!
//! Numbers may arrive as JSON numbers or numeric strings. Categorical fields
//! are positive only on an exact, case-sensitive token match (`"yes"`,
//! `"abnormal"`, `"present"`); any other value, including `"Yes"`, is negative.
//! Extraction matches labels case-insensitively but always emits lowercase
//! tokens, so its output survives this step unchanged.

use serde_json::Value;

use super::error::DecisionError;
use crate::models::features::*;
use crate::models::{BloodPressure, CellStatus, FeatureField, FeatureForm, FeatureSet, Presence, YesNo};

impl TryFrom<&FeatureForm> for FeatureSet {
    type Error = DecisionError;

    fn try_from(form: &FeatureForm) -> Result<Self, Self::Error> {
        let number = |field: FeatureField, default: f64| number_field(form, field, default);
        let yes = |field: FeatureField| YesNo::from_flag(token_matches(form, field, "yes"));

        Ok(FeatureSet {
            age: age_field(form)?,
            blood_pressure: blood_pressure_field(form)?,
            albumin: number(FeatureField::Albumin, DEFAULT_ALBUMIN)?,
            sugar: number(FeatureField::Sugar, DEFAULT_SUGAR)?,
            red_blood_cells: CellStatus::from_flag(token_matches(form, FeatureField::RedBloodCells, "abnormal")),
            pus_cell: CellStatus::from_flag(token_matches(form, FeatureField::PusCell, "abnormal")),
            pus_cell_clumps: Presence::from_flag(token_matches(form, FeatureField::PusCellClumps, "present")),
            bacteria: Presence::from_flag(token_matches(form, FeatureField::Bacteria, "present")),
            blood_glucose_random: number(FeatureField::BloodGlucoseRandom, DEFAULT_BLOOD_GLUCOSE_RANDOM)?,
            blood_urea: number(FeatureField::BloodUrea, DEFAULT_BLOOD_UREA)?,
            serum_creatinine: number(FeatureField::SerumCreatinine, DEFAULT_SERUM_CREATININE)?,
            white_blood_cell_count: number(FeatureField::WhiteBloodCellCount, DEFAULT_WHITE_BLOOD_CELL_COUNT)?,
            potassium: number(FeatureField::Potassium, DEFAULT_POTASSIUM)?,
            hypertension: yes(FeatureField::Hypertension),
            diabetes_mellitus: yes(FeatureField::DiabetesMellitus),
            coronary_artery_disease: yes(FeatureField::CoronaryArteryDisease),
            pedal_edema: yes(FeatureField::PedalEdema),
            anaemia: yes(FeatureField::Anaemia),
            cd4: number(FeatureField::Cd4, DEFAULT_CD4)?,
        })
    }
}

fn malformed(field: FeatureField, value: &Value) -> DecisionError {
    DecisionError::MalformedFeature {
        field,
        value: value.to_string(),
    }
}

fn number_field(form: &FeatureForm, field: FeatureField, default: f64) -> Result<f64, DecisionError> {
    let Some(value) = form.get(field) else {
        return Ok(default);
    };
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| malformed(field, value))
}

/// Age in years. Negative ages are rejected; the eGFR age term diverges for them.
fn age_field(form: &FeatureForm) -> Result<f64, DecisionError> {
    let age = number_field(form, FeatureField::Age, FORM_DEFAULT_AGE)?;
    if age < 0.0 {
        return Err(DecisionError::MalformedFeature {
            field: FeatureField::Age,
            value: age.to_string(),
        });
    }
    Ok(age)
}

/// Systolic from `"130/85"`, `"130"` or a bare number. Missing → 120 with no diastolic.
fn blood_pressure_field(form: &FeatureForm) -> Result<BloodPressure, DecisionError> {
    let field = FeatureField::BloodPressure;
    let Some(value) = form.get(field) else {
        return Ok(BloodPressure {
            systolic: DEFAULT_BLOOD_PRESSURE.systolic,
            diastolic: None,
        });
    };
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(|systolic| BloodPressure {
                systolic,
                diastolic: None,
            })
            .ok_or_else(|| malformed(field, value)),
        Value::String(s) => s.parse().map_err(|_| malformed(field, value)),
        _ => Err(malformed(field, value)),
    }
}

fn token_matches(form: &FeatureForm, field: FeatureField, positive: &str) -> bool {
    matches!(form.get(field), Some(Value::String(s)) if s == positive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_form_uses_prediction_defaults() {
        let features = FeatureSet::try_from(&FeatureForm::new()).unwrap();
        assert_eq!(features.age, 40.0);
        assert_eq!(features.blood_pressure.systolic, 120.0);
        assert_eq!(features.serum_creatinine, 1.0);
        assert_eq!(features.cd4, 450.0);
        assert_eq!(features.white_blood_cell_count, 8000.0);
        assert_eq!(features.hypertension, YesNo::No);
        assert_eq!(features.bacteria, Presence::NotPresent);
    }

    #[test]
    fn extracted_features_survive_the_form_round_trip() {
        let extracted = FeatureSet {
            age: 61.0,
            serum_creatinine: 2.2,
            hypertension: YesNo::Yes,
            pus_cell: CellStatus::Abnormal,
            bacteria: Presence::Present,
            ..FeatureSet::default()
        };
        let form = FeatureForm::from(&extracted);
        assert_eq!(FeatureSet::try_from(&form).unwrap(), extracted);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let form = FeatureForm::new()
            .with(FeatureField::Age, " 63 ")
            .with(FeatureField::SerumCreatinine, "1.8")
            .with(FeatureField::Cd4, 200);
        let features = FeatureSet::try_from(&form).unwrap();
        assert_eq!(features.age, 63.0);
        assert_eq!(features.serum_creatinine, 1.8);
        assert_eq!(features.cd4, 200.0);
    }

    #[test]
    fn non_numeric_value_names_the_field() {
        let form = FeatureForm::new().with(FeatureField::SerumCreatinine, "high");
        match FeatureSet::try_from(&form) {
            Err(DecisionError::MalformedFeature { field, value }) => {
                assert_eq!(field, FeatureField::SerumCreatinine);
                assert_eq!(value, "\"high\"");
            }
            other => panic!("expected MalformedFeature, got {other:?}"),
        }
    }

    #[test]
    fn null_and_structured_values_are_malformed() {
        let form = FeatureForm::new().with(FeatureField::Potassium, Value::Null);
        assert!(matches!(
            FeatureSet::try_from(&form),
            Err(DecisionError::MalformedFeature { field: FeatureField::Potassium, .. })
        ));

        let form = FeatureForm::new().with(FeatureField::Age, json!([63]));
        assert!(matches!(
            FeatureSet::try_from(&form),
            Err(DecisionError::MalformedFeature { field: FeatureField::Age, .. })
        ));
    }

    #[test]
    fn non_finite_numbers_are_malformed() {
        let form = FeatureForm::new().with(FeatureField::BloodUrea, "NaN");
        assert!(matches!(
            FeatureSet::try_from(&form),
            Err(DecisionError::MalformedFeature { field: FeatureField::BloodUrea, .. })
        ));
    }

    #[test]
    fn negative_age_is_malformed() {
        let form = FeatureForm::new().with(FeatureField::Age, -200000);
        match FeatureSet::try_from(&form) {
            Err(DecisionError::MalformedFeature { field, value }) => {
                assert_eq!(field, FeatureField::Age);
                assert_eq!(value, "-200000");
            }
            other => panic!("expected MalformedFeature, got {other:?}"),
        }

        let form = FeatureForm::new().with(FeatureField::Age, "-1");
        assert!(FeatureSet::try_from(&form).is_err());

        let newborn = FeatureForm::new().with(FeatureField::Age, 0);
        assert_eq!(FeatureSet::try_from(&newborn).unwrap().age, 0.0);
    }

    #[test]
    fn blood_pressure_forms() {
        let pair = FeatureForm::new().with(FeatureField::BloodPressure, "135/88");
        assert_eq!(FeatureSet::try_from(&pair).unwrap().blood_pressure.systolic, 135.0);

        let bare = FeatureForm::new().with(FeatureField::BloodPressure, 142);
        assert_eq!(FeatureSet::try_from(&bare).unwrap().blood_pressure.systolic, 142.0);

        let broken = FeatureForm::new().with(FeatureField::BloodPressure, "/80");
        assert!(matches!(
            FeatureSet::try_from(&broken),
            Err(DecisionError::MalformedFeature { field: FeatureField::BloodPressure, .. })
        ));
    }

    // Categorical tokens are matched exact-case here while extraction labels are
    // case-insensitive. This pins the current behavior: "Yes" is NOT positive.
    #[test]
    fn categorical_tokens_are_exact_case() {
        let form = FeatureForm::new()
            .with(FeatureField::Hypertension, "Yes")
            .with(FeatureField::DiabetesMellitus, "yes")
            .with(FeatureField::RedBloodCells, "Abnormal")
            .with(FeatureField::PusCell, "abnormal")
            .with(FeatureField::Bacteria, "PRESENT")
            .with(FeatureField::PusCellClumps, "present");
        let features = FeatureSet::try_from(&form).unwrap();
        assert_eq!(features.hypertension, YesNo::No);
        assert_eq!(features.diabetes_mellitus, YesNo::Yes);
        assert_eq!(features.red_blood_cells, CellStatus::Normal);
        assert_eq!(features.pus_cell, CellStatus::Abnormal);
        assert_eq!(features.bacteria, Presence::NotPresent);
        assert_eq!(features.pus_cell_clumps, Presence::Present);
    }

    #[test]
    fn non_string_categorical_is_negative() {
        let form = FeatureForm::new().with(FeatureField::Anaemia, true);
        assert_eq!(FeatureSet::try_from(&form).unwrap().anaemia, YesNo::No);
    }
}
