//! Assessment input schema
//!
//! The raw input record supplied by the data-entry collaborator. Only the
//! anthropometric triple (age, height, weight) is mandatory; every other
//! field defaults to absent (numeric fields use 0 for "not provided", the
//! original capture convention) and degrades gracefully downstream.

use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::types::{EnergyMode, Goal, RmrEquation, Sex};

/// Default daily sodium target (mg)
pub const DEFAULT_SODIUM_TARGET_MG: i64 = 2300;

/// Fat sub-split targets, expressed relative to each other.
///
/// The triple need not sum to 100; the allocator rescales it proportionally
/// against the parent fat percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatSplit {
    pub saturated: i64,
    pub poly: i64,
    pub mono: i64,
}

impl Default for FatSplit {
    fn default() -> Self {
        Self {
            saturated: 10,
            poly: 35,
            mono: 55,
        }
    }
}

/// Dietary percentage targets. Defaults are the quick preset:
/// protein 20 / fat 30 / carb 50, 85% complex carbohydrate.
///
/// The triple need not sum to 100 either; the allocator renormalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroTargets {
    pub protein_pct: i64,
    pub fat_pct: i64,
    pub carb_pct: i64,
    /// Share of carbohydrate grams allocated to complex sources
    pub complex_carb_pct: i64,
    pub fat_split: FatSplit,
}

impl Default for MacroTargets {
    fn default() -> Self {
        Self {
            protein_pct: 20,
            fat_pct: 30,
            carb_pct: 50,
            complex_carb_pct: 85,
            fat_split: FatSplit::default(),
        }
    }
}

/// Optional anthropometric measurements (cm / mm; 0 = not measured)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Anthropometry {
    pub waist_cm: f64,
    pub hip_cm: f64,
    /// Mid-upper-arm circumference
    pub muac_cm: f64,
    pub biceps_mm: f64,
    pub triceps_mm: f64,
    pub subscapular_mm: f64,
    pub suprailiac_mm: f64,
    /// Percent body fat reported by bioimpedance, passed through
    pub bia_percent_fat: f64,
}

/// Optional laboratory values (0 = not submitted).
///
/// Units are fixed: mg/dL for glucose and lipids, µUI/mL insulin, % HbA1c,
/// g/dL hemoglobin, ng/mL ferritin and vitamin D, pg/mL B12, µUI/mL TSH,
/// mg/dL urea, mg/L CRP.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabValues {
    pub glucose: f64,
    pub insulin: f64,
    pub hba1c: f64,
    pub total_cholesterol: f64,
    pub hdl: f64,
    pub ldl: f64,
    pub triglycerides: f64,
    pub creatinine: f64,
    pub alt: f64,
    pub ast: f64,
    pub hemoglobin: f64,
    pub ferritin: f64,
    pub vitamin_d: f64,
    pub b12: f64,
    pub tsh: f64,
    pub urea: f64,
    pub crp: f64,
}

/// Sodium intake targets (mg)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SodiumIntake {
    pub target_mg: i64,
    pub consumed_mg: i64,
}

impl Default for SodiumIntake {
    fn default() -> Self {
        Self {
            target_mg: DEFAULT_SODIUM_TARGET_MG,
            consumed_mg: 0,
        }
    }
}

/// Complete raw input record for one calculation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sex: Sex,
    pub age_years: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub equation: RmrEquation,
    #[serde(default)]
    pub mode: EnergyMode,
    /// Add the ~10% thermic-effect-of-feeding allowance
    #[serde(default)]
    pub thermic_effect: bool,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub targets: MacroTargets,
    #[serde(default)]
    pub anthropometry: Anthropometry,
    #[serde(default)]
    pub labs: LabValues,
    #[serde(default)]
    pub sodium: SodiumIntake,
}

impl AssessmentInput {
    /// Parse an input record from JSON
    pub fn from_json(json: &str) -> Result<Self, CalcError> {
        serde_json::from_str(json).map_err(|e| CalcError::ParseError(e.to_string()))
    }

    /// Check the mandatory anthropometric triple.
    ///
    /// This is the only precondition the engine enforces; the data-entry
    /// collaborator is expected to block submission before this point.
    pub fn validate(&self) -> Result<(), CalcError> {
        if self.age_years < 1 {
            return Err(CalcError::InvalidInput(
                "age_years must be at least 1".to_string(),
            ));
        }
        if !(self.height_cm > 0.0) {
            return Err(CalcError::InvalidInput(
                "height_cm must be positive".to_string(),
            ));
        }
        if !(self.weight_kg > 0.0) {
            return Err(CalcError::InvalidInput(
                "weight_kg must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// A fully populated example record (CLI `schema` command and tests)
    pub fn example() -> Self {
        Self {
            name: Some("Ejemplo Paciente".to_string()),
            sex: Sex::Female,
            age_years: 30,
            height_cm: 165.0,
            weight_kg: 70.0,
            equation: RmrEquation::MifflinStJeor,
            mode: EnergyMode::Ambulatory {
                pal: crate::types::ActivityLevel::Moderate,
            },
            thermic_effect: false,
            goal: Goal::Maintenance,
            targets: MacroTargets::default(),
            anthropometry: Anthropometry {
                waist_cm: 80.0,
                hip_cm: 100.0,
                muac_cm: 28.0,
                biceps_mm: 8.0,
                triceps_mm: 14.0,
                subscapular_mm: 12.0,
                suprailiac_mm: 10.0,
                bia_percent_fat: 0.0,
            },
            labs: LabValues {
                glucose: 92.0,
                insulin: 8.0,
                hba1c: 5.4,
                total_cholesterol: 185.0,
                hdl: 55.0,
                ldl: 110.0,
                triglycerides: 120.0,
                ..Default::default()
            },
            sodium: SodiumIntake {
                target_mg: DEFAULT_SODIUM_TARGET_MG,
                consumed_mg: 900,
            },
        }
    }
}
