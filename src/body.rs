//! Body-composition estimation
//!
//! Skinfold-based percent fat (Durnin–Womersley + Siri), simple ratio
//! indices, Hamwi ideal/adjusted weight, and mid-arm muscle area. Every
//! metric is derived independently: a missing measurement nulls that metric
//! and nothing else.

use std::f64::consts::PI;

use crate::intake::Anthropometry;
use crate::types::{BmiClass, BodyComposition, Sex};

/// Durnin–Womersley coefficient pairs (a, b), bracketed by age upper bound.
/// Ages past the final bracket reuse its coefficients.
const DW_FEMALE: [(u32, (f64, f64)); 5] = [
    (17, (1.1549, 0.0678)),
    (29, (1.1599, 0.0717)),
    (39, (1.1423, 0.0632)),
    (49, (1.1333, 0.0612)),
    (120, (1.1339, 0.0645)),
];

const DW_MALE: [(u32, (f64, f64)); 5] = [
    (17, (1.1620, 0.0630)),
    (29, (1.1631, 0.0632)),
    (39, (1.1422, 0.0544)),
    (49, (1.1620, 0.0700)),
    (120, (1.1715, 0.0779)),
];

/// Floor applied to the skinfold sum (mm) before taking log10
const SKINFOLD_SUM_FLOOR_MM: f64 = 0.1;

/// Body-composition estimator
pub struct BodyCompositionEstimator;

impl BodyCompositionEstimator {
    /// Derive every metric the available measurements allow
    pub fn estimate(
        sex: Sex,
        age_years: u32,
        weight_kg: f64,
        height_cm: f64,
        anthropometry: &Anthropometry,
    ) -> BodyComposition {
        let bmi = bmi(weight_kg, height_cm);
        let bmi_class = bmi.map(BmiClass::from_bmi);

        let waist_hip_ratio = ratio(anthropometry.waist_cm, anthropometry.hip_cm);
        let waist_hip_risk = waist_hip_ratio.map(|r| match sex {
            Sex::Female => r > 0.85,
            Sex::Male => r > 0.90,
        });

        let waist_height_ratio = ratio(anthropometry.waist_cm, height_cm);
        let waist_height_risk = waist_height_ratio.map(|r| r >= 0.5);

        let percent_fat_skinfold = skinfold_percent_fat(sex, age_years, anthropometry);
        let percent_fat_bia = if anthropometry.bia_percent_fat > 0.0 {
            Some(anthropometry.bia_percent_fat)
        } else {
            None
        };

        let ideal_weight_kg = hamwi_ideal_weight(sex, height_cm);
        let percent_of_ideal = percent_of_ideal(weight_kg, ideal_weight_kg);

        let obese = bmi.map_or(false, |b| b >= 30.0) || percent_of_ideal >= 120.0;
        let adjusted_weight_kg = if obese {
            Some(adjusted_weight(weight_kg, ideal_weight_kg))
        } else {
            None
        };

        let arm_muscle_area_cm2 =
            arm_muscle_area(anthropometry.muac_cm, anthropometry.triceps_mm);

        BodyComposition {
            bmi,
            bmi_class,
            waist_hip_ratio,
            waist_hip_risk,
            waist_height_ratio,
            waist_height_risk,
            percent_fat_skinfold,
            percent_fat_bia,
            ideal_weight_kg,
            percent_of_ideal,
            adjusted_weight_kg,
            arm_muscle_area_cm2,
        }
    }
}

/// Body-mass index (kg/m²), 2 decimals. None when weight or height is
/// missing; height is floored at 1e-6 m against division by zero.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let h = (height_cm / 100.0).max(1e-6);
    Some(round2(weight_kg / (h * h)))
}

/// Simple ratio index, 2 decimals, None when either side is missing
fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if numerator > 0.0 && denominator > 0.0 {
        Some(round2(numerator / denominator))
    } else {
        None
    }
}

/// Durnin–Womersley body density from the four-site skinfold sum
pub fn skinfold_density(
    sex: Sex,
    age_years: u32,
    biceps_mm: f64,
    triceps_mm: f64,
    subscapular_mm: f64,
    suprailiac_mm: f64,
) -> f64 {
    let sum = (biceps_mm + triceps_mm + subscapular_mm + suprailiac_mm)
        .max(SKINFOLD_SUM_FLOOR_MM);
    let log_sum = sum.log10();

    let table = match sex {
        Sex::Female => &DW_FEMALE,
        Sex::Male => &DW_MALE,
    };
    let (a, b) = table
        .iter()
        .find(|(upper, _)| age_years <= *upper)
        .map(|(_, coeff)| *coeff)
        .unwrap_or(table[table.len() - 1].1);

    a - b * log_sum
}

/// Siri equation: percent body fat from density, 1 decimal
pub fn siri_percent_fat(density: f64) -> f64 {
    round1((4.95 / density - 4.50) * 100.0)
}

/// Skinfold percent fat; requires all four measurements to be present
fn skinfold_percent_fat(sex: Sex, age_years: u32, a: &Anthropometry) -> Option<f64> {
    if a.biceps_mm > 0.0 && a.triceps_mm > 0.0 && a.subscapular_mm > 0.0 && a.suprailiac_mm > 0.0
    {
        let density = skinfold_density(
            sex,
            age_years,
            a.biceps_mm,
            a.triceps_mm,
            a.subscapular_mm,
            a.suprailiac_mm,
        );
        Some(siri_percent_fat(density))
    } else {
        None
    }
}

/// Hamwi ideal body weight (kg) from height
pub fn hamwi_ideal_weight(sex: Sex, height_cm: f64) -> f64 {
    let inches_over_5ft = ((height_cm - 152.4) / 2.54).max(0.0);
    match sex {
        Sex::Male => 48.0 + 2.7 * inches_over_5ft,
        Sex::Female => 45.5 + 2.2 * inches_over_5ft,
    }
}

/// Actual weight as a percentage of ideal, 1 decimal
pub fn percent_of_ideal(actual_kg: f64, ideal_kg: f64) -> f64 {
    let denom = if ideal_kg > 0.0 { ideal_kg } else { 1.0 };
    round1(100.0 * actual_kg / denom)
}

/// Obesity-adjusted body weight: ideal + 25% of the excess
pub fn adjusted_weight(actual_kg: f64, ideal_kg: f64) -> f64 {
    ideal_kg + 0.25 * (actual_kg - ideal_kg)
}

/// Mid-arm muscle area (cm²) from MUAC and triceps skinfold, 2 decimals
pub fn arm_muscle_area(muac_cm: f64, triceps_mm: f64) -> Option<f64> {
    if muac_cm > 0.0 && triceps_mm > 0.0 {
        let tsf_cm = triceps_mm / 10.0;
        let d = muac_cm - PI * tsf_cm;
        Some(round2((d * d) / (4.0 * PI)))
    } else {
        None
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured() -> Anthropometry {
        Anthropometry {
            waist_cm: 80.0,
            hip_cm: 100.0,
            muac_cm: 28.0,
            biceps_mm: 8.0,
            triceps_mm: 14.0,
            subscapular_mm: 12.0,
            suprailiac_mm: 10.0,
            bia_percent_fat: 0.0,
        }
    }

    #[test]
    fn test_bmi_reference_case() {
        // 70 kg / 1.65² = 25.71
        assert_eq!(bmi(70.0, 165.0), Some(25.71));
        assert_eq!(bmi(0.0, 165.0), None);
        assert_eq!(bmi(70.0, 0.0), None);
    }

    #[test]
    fn test_bmi_classification() {
        assert_eq!(BmiClass::from_bmi(17.0), BmiClass::Underweight);
        assert_eq!(BmiClass::from_bmi(25.71), BmiClass::Overweight);
        assert_eq!(BmiClass::from_bmi(32.0), BmiClass::ObesityI);
        assert_eq!(BmiClass::from_bmi(42.0), BmiClass::ObesityIII);
    }

    #[test]
    fn test_skinfold_density_bracket_selection() {
        // Female 30y falls in the 30-39 bracket: a=1.1423, b=0.0632
        let density = skinfold_density(Sex::Female, 30, 8.0, 14.0, 12.0, 10.0);
        let expected = 1.1423 - 0.0632 * 44.0_f64.log10();
        assert!((density - expected).abs() < 1e-12);

        // Ages beyond the last bracket reuse its coefficients
        let old = skinfold_density(Sex::Male, 130, 8.0, 14.0, 12.0, 10.0);
        let last = 1.1715 - 0.0779 * 44.0_f64.log10();
        assert!((old - last).abs() < 1e-12);
    }

    #[test]
    fn test_siri_percent_fat() {
        let density = skinfold_density(Sex::Female, 30, 8.0, 14.0, 12.0, 10.0);
        let pct = siri_percent_fat(density);
        assert!((pct - 26.7).abs() < 0.1);
    }

    #[test]
    fn test_skinfold_sum_floor_avoids_log_of_zero() {
        let density = skinfold_density(Sex::Female, 30, 0.0, 0.0, 0.0, 0.0);
        assert!(density.is_finite());
    }

    #[test]
    fn test_hamwi_ideal_weight() {
        // 165 cm female: 45.5 + 2.2 × (12.6/2.54) = 56.41
        let ideal = hamwi_ideal_weight(Sex::Female, 165.0);
        assert!((ideal - 56.413).abs() < 0.01);

        // At or below 5 ft the base weight applies unmodified
        assert!((hamwi_ideal_weight(Sex::Male, 150.0) - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_arm_muscle_area() {
        // (28 - π×1.4)² / 4π = 44.33
        let ama = arm_muscle_area(28.0, 14.0).unwrap();
        assert!((ama - 44.33).abs() < 0.01);

        assert_eq!(arm_muscle_area(0.0, 14.0), None);
        assert_eq!(arm_muscle_area(28.0, 0.0), None);
    }

    #[test]
    fn test_estimate_full_record() {
        let body =
            BodyCompositionEstimator::estimate(Sex::Female, 30, 70.0, 165.0, &measured());

        assert_eq!(body.bmi, Some(25.71));
        assert_eq!(body.bmi_class, Some(BmiClass::Overweight));
        assert_eq!(body.waist_hip_ratio, Some(0.8));
        assert_eq!(body.waist_hip_risk, Some(false));
        assert_eq!(body.waist_height_ratio, Some(0.48));
        assert_eq!(body.waist_height_risk, Some(false));
        assert!(body.percent_fat_skinfold.is_some());
        assert!(body.percent_fat_bia.is_none());

        // 70 kg vs 56.41 ideal = 124.1% of ideal, so the adjusted weight
        // activates on the percent-of-ideal branch even though BMI < 30
        assert!((body.percent_of_ideal - 124.1).abs() < 0.05);
        let adjusted = body.adjusted_weight_kg.unwrap();
        assert!((adjusted - (body.ideal_weight_kg + 0.25 * (70.0 - body.ideal_weight_kg)))
            .abs()
            < 1e-9);
    }

    #[test]
    fn test_null_safety_is_per_metric() {
        // Zero skinfolds null the skinfold estimate but nothing else
        let mut a = measured();
        a.triceps_mm = 0.0;
        let body = BodyCompositionEstimator::estimate(Sex::Female, 30, 70.0, 165.0, &a);

        assert!(body.percent_fat_skinfold.is_none());
        // Triceps also participates in arm muscle area
        assert!(body.arm_muscle_area_cm2.is_none());
        // Unrelated metrics are untouched
        assert_eq!(body.bmi, Some(25.71));
        assert_eq!(body.waist_hip_ratio, Some(0.8));

        // Missing hip nulls only the waist-hip ratio
        let mut a = measured();
        a.hip_cm = 0.0;
        let body = BodyCompositionEstimator::estimate(Sex::Female, 30, 70.0, 165.0, &a);
        assert!(body.waist_hip_ratio.is_none());
        assert!(body.waist_hip_risk.is_none());
        assert!(body.waist_height_ratio.is_some());
    }

    #[test]
    fn test_bia_pass_through() {
        let mut a = measured();
        a.bia_percent_fat = 31.5;
        let body = BodyCompositionEstimator::estimate(Sex::Female, 30, 70.0, 165.0, &a);
        assert_eq!(body.percent_fat_bia, Some(31.5));
    }
}
