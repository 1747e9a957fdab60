//! Ordered recognition rules for report fields.
//!
//! Each rule names a field, the patterns tried in order (first match wins) and
//! how the captured token is read. Fields without a rule, or whose patterns all
//! miss, keep their `FeatureSet::default()` value.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{BloodPressure, FeatureField};

/// How a rule turns a match into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Capture group 1 parsed as a number.
    Number,
    /// Capture group 1 parsed as `systolic[/diastolic]`.
    BloodPressure,
    /// A match sets the positive token (yes / abnormal / present).
    Flag,
}

/// Value recognized by a rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleValue {
    Number(f64),
    BloodPressure(BloodPressure),
    Positive,
}

pub struct FieldRule {
    pub field: FeatureField,
    pub kind: RuleKind,
    pub patterns: Vec<Regex>,
}

impl FieldRule {
    /// First pattern whose match yields a readable value.
    ///
    /// A captured token that does not parse does not count as a match; the
    /// scan moves on to the next occurrence, then the next pattern.
    pub fn recognize(&self, text: &str) -> Option<RuleValue> {
        self.patterns.iter().find_map(|pattern| match self.kind {
            RuleKind::Flag => pattern.is_match(text).then_some(RuleValue::Positive),
            RuleKind::Number => pattern
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .find_map(|m| m.as_str().parse::<f64>().ok().filter(|v| v.is_finite()))
                .map(RuleValue::Number),
            RuleKind::BloodPressure => pattern
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .find_map(|m| m.as_str().parse::<BloodPressure>().ok())
                .map(RuleValue::BloodPressure),
        })
    }
}

/// `(?i)` label, then `[:\s]+`, then the value group.
fn labeled(label: &str, value: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{label}[:\s]+{value}")).expect("static rule pattern compiles")
}

const INTEGER: &str = r"(\d+)";
const DECIMAL: &str = r"(\d*\.?\d+)";
const PRESSURE: &str = r"(\d+(?:\s*/\s*\d+)?)";

fn number(field: FeatureField, patterns: Vec<Regex>) -> FieldRule {
    FieldRule {
        field,
        kind: RuleKind::Number,
        patterns,
    }
}

fn flag(field: FeatureField, label: &str, positive: &str) -> FieldRule {
    FieldRule {
        field,
        kind: RuleKind::Flag,
        patterns: vec![labeled(label, &format!(r"(?:{positive})\b"))],
    }
}

/// Recognition rules, in evaluation order.
pub static FIELD_RULES: LazyLock<Vec<FieldRule>> = LazyLock::new(|| {
    vec![
        number(
            FeatureField::Age,
            vec![
                labeled("Age", INTEGER),
                Regex::new(r"(?i)\b(\d+)[\s-]*(?:years?|yrs?)[\s-]*old\b")
                    .expect("static rule pattern compiles"),
            ],
        ),
        number(
            FeatureField::SerumCreatinine,
            vec![labeled("Serum Creatinine", DECIMAL)],
        ),
        number(
            FeatureField::Cd4,
            vec![labeled("CD4 Count", INTEGER), labeled("CD4", INTEGER)],
        ),
        number(FeatureField::Albumin, vec![labeled("Urine Albumin", INTEGER)]),
        FieldRule {
            field: FeatureField::BloodPressure,
            kind: RuleKind::BloodPressure,
            patterns: vec![labeled("Blood Pressure", PRESSURE), labeled("BP", PRESSURE)],
        },
        flag(FeatureField::Hypertension, "hypertension", "Yes|Detected"),
        flag(FeatureField::DiabetesMellitus, "diabetes mellitus", "Yes|Detected"),
        flag(FeatureField::CoronaryArteryDisease, "coronary artery disease", "Yes|Detected"),
        flag(FeatureField::PedalEdema, "pedal edema", "Yes|Detected"),
        flag(FeatureField::Anaemia, "anaemia", "Yes|Detected"),
        flag(FeatureField::RedBloodCells, "Red Blood Cells", "Abnormal"),
        flag(FeatureField::PusCell, "Pus Cells", "Abnormal"),
        flag(FeatureField::Bacteria, "Bacteria", "Present"),
    ]
});
