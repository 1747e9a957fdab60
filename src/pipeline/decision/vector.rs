use serde::Serialize;

use crate::models::{FeatureField, FeatureSet};

/// Fixed-order numeric input of the classifier (see `FeatureField::ALL`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifierInput(pub [f64; FeatureField::COUNT]);

impl ClassifierInput {
    pub fn from_features(features: &FeatureSet) -> Self {
        Self(FeatureField::ALL.map(|field| features.numeric_value(field)))
    }

    pub fn get(&self, field: FeatureField) -> f64 {
        self.0[field as usize]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Single-precision copy for runtimes that take f32 tensors.
    pub fn to_f32(&self) -> [f32; FeatureField::COUNT] {
        self.0.map(|v| v as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellStatus, Presence, YesNo};

    #[test]
    fn default_features_vector() {
        let input = ClassifierInput::from_features(&FeatureSet::default());
        assert_eq!(
            input.0,
            [
                45.0, 120.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 100.0, 30.0, 1.0, 8000.0, 4.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 450.0
            ]
        );
    }

    #[test]
    fn positions_follow_field_order() {
        let features = FeatureSet {
            age: 70.0,
            red_blood_cells: CellStatus::Abnormal,
            pus_cell_clumps: Presence::Present,
            anaemia: YesNo::Yes,
            cd4: 120.0,
            ..FeatureSet::default()
        };
        let input = ClassifierInput::from_features(&features);
        assert_eq!(input.0[0], 70.0);
        assert_eq!(input.0[4], 1.0);
        assert_eq!(input.0[6], 1.0);
        assert_eq!(input.0[17], 1.0);
        assert_eq!(input.0[18], 120.0);
        for (index, field) in FeatureField::ALL.iter().enumerate() {
            assert_eq!(input.get(*field), input.0[index]);
        }
    }
}
