//! CKD-EPI style eGFR estimate from age, serum creatinine and sex.

use crate::models::Sex;

/// Creatinine substituted for non-positive readings (mg/dL).
pub const MIN_SERUM_CREATININE: f64 = 0.1;

/// Sex-specific constants of the formula.
struct SexCoefficients {
    kappa: f64,
    alpha: f64,
    factor: f64,
}

fn coefficients(sex: Sex) -> SexCoefficients {
    match sex {
        Sex::Male => SexCoefficients {
            kappa: 0.9,
            alpha: -0.411,
            factor: 1.0,
        },
        Sex::Female => SexCoefficients {
            kappa: 0.7,
            alpha: -0.329,
            factor: 1.018,
        },
    }
}

/// Estimate glomerular filtration rate (mL/min/1.73m²).
///
/// `gfr = 141 · min(scr/κ, 1)^α · max(scr/κ, 1)^-1.209 · 0.993^age · sex_factor`
///
/// Non-positive creatinine is replaced with [`MIN_SERUM_CREATININE`], so the
/// result is finite and positive for any finite `age >= 0` and finite creatinine.
pub fn estimate_gfr(age: f64, serum_creatinine: f64, sex: Sex) -> f64 {
    let scr = if serum_creatinine <= 0.0 {
        MIN_SERUM_CREATININE
    } else {
        serum_creatinine
    };
    let c = coefficients(sex);
    let ratio = scr / c.kappa;

    141.0
        * ratio.min(1.0).powf(c.alpha)
        * ratio.max(1.0).powf(-1.209)
        * 0.993_f64.powf(age)
        * c.factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn male_at_kappa_is_age_term_only() {
        // scr == kappa → both ratio terms are 1
        let gfr = estimate_gfr(0.0, 0.9, Sex::Male);
        assert!(close(gfr, 141.0));
        let gfr = estimate_gfr(50.0, 0.9, Sex::Male);
        assert!(close(gfr, 141.0 * 0.993_f64.powf(50.0)));
    }

    #[test]
    fn female_branch_uses_own_constants() {
        let gfr = estimate_gfr(0.0, 0.7, Sex::Female);
        assert!(close(gfr, 141.0 * 1.018));
    }

    #[test]
    fn known_male_value() {
        // 60-year-old male, creatinine 1.2
        let expected = 141.0 * (1.2_f64 / 0.9).powf(-1.209) * 0.993_f64.powf(60.0);
        let gfr = estimate_gfr(60.0, 1.2, Sex::Male);
        assert!(close(gfr, expected));
        assert!(gfr > 64.5 && gfr < 66.0, "got {gfr}");
    }

    #[test]
    fn low_creatinine_uses_alpha_term() {
        let expected = 141.0 * (0.5_f64 / 0.9).powf(-0.411) * 0.993_f64.powf(30.0);
        assert!(close(estimate_gfr(30.0, 0.5, Sex::Male), expected));
    }

    #[test]
    fn non_positive_creatinine_is_clamped() {
        let clamped = estimate_gfr(45.0, MIN_SERUM_CREATININE, Sex::Male);
        assert!(close(estimate_gfr(45.0, 0.0, Sex::Male), clamped));
        assert!(close(estimate_gfr(45.0, -3.0, Sex::Male), clamped));
        assert!(clamped.is_finite() && clamped > 0.0);
    }

    #[test]
    fn positive_and_finite_over_a_grid() {
        for age in [0.0, 18.0, 45.0, 80.0, 120.0] {
            for scr in [0.01, 0.1, 0.7, 0.9, 1.0, 2.5, 10.0, 50.0] {
                for sex in [Sex::Male, Sex::Female] {
                    let gfr = estimate_gfr(age, scr, sex);
                    assert!(gfr.is_finite() && gfr > 0.0, "age={age} scr={scr} -> {gfr}");
                }
            }
        }
    }

    #[test]
    fn strictly_decreasing_in_creatinine() {
        let mut previous = f64::INFINITY;
        let mut scr = 0.05;
        while scr < 20.0 {
            let gfr = estimate_gfr(55.0, scr, Sex::Male);
            assert!(gfr < previous, "not decreasing at scr={scr}");
            previous = gfr;
            scr += 0.05;
        }
    }

    #[test]
    fn decreasing_in_age() {
        assert!(estimate_gfr(70.0, 1.0, Sex::Male) < estimate_gfr(30.0, 1.0, Sex::Male));
    }
}
