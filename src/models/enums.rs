/// A string that is not one of an enum's tokens. Matching is exact-case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} value: {value:?}")]
pub struct InvalidToken {
    pub field: &'static str,
    pub value: String,
}

/// Macro to generate a token enum with as_str + std::str::FromStr, serialized as its token
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidToken {
                        field: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let token = <String as serde::Deserialize>::deserialize(deserializer)?;
                token.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(
    /// Yes/no history flags (hypertension, diabetes, ...).
    YesNo {
        Yes => "yes",
        No => "no",
    }
);

str_enum!(
    /// Microscopy result for red blood cells and pus cells.
    CellStatus {
        Normal => "normal",
        Abnormal => "abnormal",
    }
);

str_enum!(
    /// Presence flag for bacteria and pus-cell clumps.
    Presence {
        Present => "present",
        NotPresent => "notpresent",
    }
);

str_enum!(
    /// CKD stage, ordered from least (Stage 1) to most severe (Stage 5).
    CkdStage {
        Stage1 => "Stage 1",
        Stage2 => "Stage 2",
        Stage3a => "Stage 3a",
        Stage3b => "Stage 3b",
        Stage4 => "Stage 4",
        Stage5 => "Stage 5",
    }
);

str_enum!(
    /// Tenofovir (TDF) prescribing verdict.
    TdfStatus {
        Safe => "SAFE",
        Contraindicated => "CONTRAINDICATED",
    }
);

str_enum!(RiskColor {
    Green => "green",
    Red => "red",
});

str_enum!(PredictionLabel {
    CkdDetected => "CKD DETECTED",
    NoCkdDetected => "NO CKD DETECTED",
});

str_enum!(Sex {
    Male => "male",
    Female => "female",
});

str_enum!(
    /// Every feature the classifier consumes, in classifier input order.
    FeatureField {
        Age => "age",
        BloodPressure => "blood_pressure",
        Albumin => "albumin",
        Sugar => "sugar",
        RedBloodCells => "red_blood_cells",
        PusCell => "pus_cell",
        PusCellClumps => "pus_cell_clumps",
        Bacteria => "bacteria",
        BloodGlucoseRandom => "blood_glucose_random",
        BloodUrea => "blood_urea",
        SerumCreatinine => "serum_creatinine",
        WhiteBloodCellCount => "white_blood_cell_count",
        Potassium => "potassium",
        Hypertension => "hypertension",
        DiabetesMellitus => "diabetes_mellitus",
        CoronaryArteryDisease => "coronary_artery_disease",
        PedalEdema => "pedal_edema",
        Anaemia => "anaemia",
        Cd4 => "cd4",
    }
);

impl YesNo {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Self::Yes
        } else {
            Self::No
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl CellStatus {
    pub fn from_flag(abnormal: bool) -> Self {
        if abnormal {
            Self::Abnormal
        } else {
            Self::Normal
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Abnormal)
    }
}

impl Presence {
    pub fn from_flag(present: bool) -> Self {
        if present {
            Self::Present
        } else {
            Self::NotPresent
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Present)
    }
}

impl CkdStage {
    /// Severity rank: 1 for Stage 1 up to 6 for Stage 5 (3a and 3b are distinct ranks).
    pub fn severity(&self) -> u8 {
        match self {
            Self::Stage1 => 1,
            Self::Stage2 => 2,
            Self::Stage3a => 3,
            Self::Stage3b => 4,
            Self::Stage4 => 5,
            Self::Stage5 => 6,
        }
    }
}

impl TdfStatus {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Safe => "Safe to prescribe",
            Self::Contraindicated => "High toxicity risk",
        }
    }

    pub fn color(&self) -> RiskColor {
        match self {
            Self::Safe => RiskColor::Green,
            Self::Contraindicated => RiskColor::Red,
        }
    }
}

impl FeatureField {
    /// Number of classifier input features.
    pub const COUNT: usize = 19;

    /// Classifier input order.
    pub const ALL: [FeatureField; Self::COUNT] = [
        Self::Age,
        Self::BloodPressure,
        Self::Albumin,
        Self::Sugar,
        Self::RedBloodCells,
        Self::PusCell,
        Self::PusCellClumps,
        Self::Bacteria,
        Self::BloodGlucoseRandom,
        Self::BloodUrea,
        Self::SerumCreatinine,
        Self::WhiteBloodCellCount,
        Self::Potassium,
        Self::Hypertension,
        Self::DiabetesMellitus,
        Self::CoronaryArteryDisease,
        Self::PedalEdema,
        Self::Anaemia,
        Self::Cd4,
    ];
}
