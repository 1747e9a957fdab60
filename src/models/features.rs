use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::enums::{CellStatus, FeatureField, Presence, YesNo};

// ═══════════════════════════════════════════════════════════
// Default table
// ═══════════════════════════════════════════════════════════

pub const DEFAULT_AGE: f64 = 45.0;
pub const DEFAULT_SERUM_CREATININE: f64 = 1.0;
pub const DEFAULT_CD4: f64 = 450.0;
pub const DEFAULT_ALBUMIN: f64 = 0.0;
pub const DEFAULT_BLOOD_PRESSURE: BloodPressure = BloodPressure {
    systolic: 120.0,
    diastolic: Some(80.0),
};
pub const DEFAULT_SUGAR: f64 = 0.0;
pub const DEFAULT_BLOOD_UREA: f64 = 30.0;
pub const DEFAULT_POTASSIUM: f64 = 4.0;
pub const DEFAULT_BLOOD_GLUCOSE_RANDOM: f64 = 100.0;
pub const DEFAULT_WHITE_BLOOD_CELL_COUNT: f64 = 8000.0;

/// Age used when a prediction form omits `age` entirely.
/// Reports that never mention age default to `DEFAULT_AGE` instead.
pub const FORM_DEFAULT_AGE: f64 = 40.0;

// ═══════════════════════════════════════════════════════════
// Blood pressure
// ═══════════════════════════════════════════════════════════

/// Blood pressure reading. Only the systolic value feeds the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid blood pressure reading: {0:?}")]
pub struct InvalidBloodPressure(pub String);

impl FromStr for BloodPressure {
    type Err = InvalidBloodPressure;

    /// Parses `"130/85"` or a bare systolic `"130"`. The systolic segment must be a
    /// finite number; an unreadable diastolic segment is dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        let systolic = parts
            .next()
            .and_then(|p| p.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| InvalidBloodPressure(s.to_string()))?;
        let diastolic = parts
            .next()
            .and_then(|p| p.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite());
        Ok(Self {
            systolic,
            diastolic,
        })
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diastolic {
            Some(diastolic) => write!(f, "{}/{}", self.systolic, diastolic),
            None => write!(f, "{}", self.systolic),
        }
    }
}

impl Serialize for BloodPressure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BloodPressure {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════
// FeatureSet
// ═══════════════════════════════════════════════════════════

/// Complete set of clinical features for one report or prediction request.
///
/// Always fully populated: fields that could not be recognized carry their
/// documented default (see `FeatureSet::default`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub age: f64,
    pub blood_pressure: BloodPressure,
    pub albumin: f64,
    pub sugar: f64,
    pub red_blood_cells: CellStatus,
    pub pus_cell: CellStatus,
    pub pus_cell_clumps: Presence,
    pub bacteria: Presence,
    pub blood_glucose_random: f64,
    pub blood_urea: f64,
    pub serum_creatinine: f64,
    pub white_blood_cell_count: f64,
    pub potassium: f64,
    pub hypertension: YesNo,
    pub diabetes_mellitus: YesNo,
    pub coronary_artery_disease: YesNo,
    pub pedal_edema: YesNo,
    pub anaemia: YesNo,
    pub cd4: f64,
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            blood_pressure: DEFAULT_BLOOD_PRESSURE,
            albumin: DEFAULT_ALBUMIN,
            sugar: DEFAULT_SUGAR,
            red_blood_cells: CellStatus::Normal,
            pus_cell: CellStatus::Normal,
            pus_cell_clumps: Presence::NotPresent,
            bacteria: Presence::NotPresent,
            blood_glucose_random: DEFAULT_BLOOD_GLUCOSE_RANDOM,
            blood_urea: DEFAULT_BLOOD_UREA,
            serum_creatinine: DEFAULT_SERUM_CREATININE,
            white_blood_cell_count: DEFAULT_WHITE_BLOOD_CELL_COUNT,
            potassium: DEFAULT_POTASSIUM,
            hypertension: YesNo::No,
            diabetes_mellitus: YesNo::No,
            coronary_artery_disease: YesNo::No,
            pedal_edema: YesNo::No,
            anaemia: YesNo::No,
            cd4: DEFAULT_CD4,
        }
    }
}

impl FeatureSet {
    /// Value of one feature as the classifier sees it (categoricals as 1/0).
    pub fn numeric_value(&self, field: FeatureField) -> f64 {
        let flag = |positive: bool| if positive { 1.0 } else { 0.0 };
        match field {
            FeatureField::Age => self.age,
            FeatureField::BloodPressure => self.blood_pressure.systolic,
            FeatureField::Albumin => self.albumin,
            FeatureField::Sugar => self.sugar,
            FeatureField::RedBloodCells => flag(self.red_blood_cells.is_positive()),
            FeatureField::PusCell => flag(self.pus_cell.is_positive()),
            FeatureField::PusCellClumps => flag(self.pus_cell_clumps.is_positive()),
            FeatureField::Bacteria => flag(self.bacteria.is_positive()),
            FeatureField::BloodGlucoseRandom => self.blood_glucose_random,
            FeatureField::BloodUrea => self.blood_urea,
            FeatureField::SerumCreatinine => self.serum_creatinine,
            FeatureField::WhiteBloodCellCount => self.white_blood_cell_count,
            FeatureField::Potassium => self.potassium,
            FeatureField::Hypertension => flag(self.hypertension.is_positive()),
            FeatureField::DiabetesMellitus => flag(self.diabetes_mellitus.is_positive()),
            FeatureField::CoronaryArteryDisease => flag(self.coronary_artery_disease.is_positive()),
            FeatureField::PedalEdema => flag(self.pedal_edema.is_positive()),
            FeatureField::Anaemia => flag(self.anaemia.is_positive()),
            FeatureField::Cd4 => self.cd4,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// FeatureForm
// ═══════════════════════════════════════════════════════════

/// Loosely typed prediction request: field name → JSON number or string.
///
/// Any key may be missing. Coercion into a `FeatureSet` happens in
/// `pipeline::decision::form`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureForm(serde_json::Map<String, serde_json::Value>);

impl FeatureForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FeatureField) -> Option<&serde_json::Value> {
        self.0.get(field.as_str())
    }

    pub fn insert(&mut self, field: FeatureField, value: impl Into<serde_json::Value>) {
        self.0.insert(field.as_str().to_string(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, field: FeatureField, value: impl Into<serde_json::Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&FeatureSet> for FeatureForm {
    fn from(features: &FeatureSet) -> Self {
        FeatureForm::new()
            .with(FeatureField::Age, features.age)
            .with(FeatureField::BloodPressure, features.blood_pressure.to_string())
            .with(FeatureField::Albumin, features.albumin)
            .with(FeatureField::Sugar, features.sugar)
            .with(FeatureField::RedBloodCells, features.red_blood_cells.as_str())
            .with(FeatureField::PusCell, features.pus_cell.as_str())
            .with(FeatureField::PusCellClumps, features.pus_cell_clumps.as_str())
            .with(FeatureField::Bacteria, features.bacteria.as_str())
            .with(FeatureField::BloodGlucoseRandom, features.blood_glucose_random)
            .with(FeatureField::BloodUrea, features.blood_urea)
            .with(FeatureField::SerumCreatinine, features.serum_creatinine)
            .with(FeatureField::WhiteBloodCellCount, features.white_blood_cell_count)
            .with(FeatureField::Potassium, features.potassium)
            .with(FeatureField::Hypertension, features.hypertension.as_str())
            .with(FeatureField::DiabetesMellitus, features.diabetes_mellitus.as_str())
            .with(FeatureField::CoronaryArteryDisease, features.coronary_artery_disease.as_str())
            .with(FeatureField::PedalEdema, features.pedal_edema.as_str())
            .with(FeatureField::Anaemia, features.anaemia.as_str())
            .with(FeatureField::Cd4, features.cd4)
    }
}
