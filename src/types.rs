//! Core types for the nutricalc pipeline
//!
//! This module defines the data structures that flow through each stage of
//! the calculation: patient and mode selections, energy results, macro
//! allocations, body-composition estimates, lab readings, exchange plans,
//! and the merged assessment report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Biological sex, consumed by every sex-branched formula.
///
/// Exactly two branches are computed anywhere in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

/// Resting-energy predictive equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RmrEquation {
    MifflinStJeor,
    HarrisBenedict,
}

impl Default for RmrEquation {
    fn default() -> Self {
        RmrEquation::MifflinStJeor
    }
}

/// Calorie-target goal applied on top of total expenditure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    Maintenance,
    LeanGain,
}

impl Default for Goal {
    fn default() -> Self {
        Goal::Maintenance
    }
}

impl Goal {
    pub fn label(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "Pérdida de peso",
            Goal::Maintenance => "Mantenimiento",
            Goal::LeanGain => "Ganancia (magro)",
        }
    }
}

/// Ambulatory physical activity level (PAL multiplier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    VeryLow,
    Light,
    Moderate,
    High,
    VeryHigh,
}

impl ActivityLevel {
    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::VeryLow => 1.2,
            ActivityLevel::Light => 1.4,
            ActivityLevel::Moderate => 1.6,
            ActivityLevel::High => 1.75,
            ActivityLevel::VeryHigh => 2.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::VeryLow => "Muy bajo (sedentario)",
            ActivityLevel::Light => "Ligero",
            ActivityLevel::Moderate => "Moderado",
            ActivityLevel::High => "Alto",
            ActivityLevel::VeryHigh => "Muy alto",
        }
    }
}

/// Facility-based activity factor (FA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityActivity {
    Ventilated,
    Bedridden,
    Ambulating,
}

impl FacilityActivity {
    pub fn factor(&self) -> f64 {
        match self {
            FacilityActivity::Ventilated => 1.1,
            FacilityActivity::Bedridden => 1.2,
            FacilityActivity::Ambulating => 1.3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FacilityActivity::Ventilated => "VM/Conectado",
            FacilityActivity::Bedridden => "Reposo en cama",
            FacilityActivity::Ambulating => "Deambula (ligera)",
        }
    }
}

/// Stress/injury factor (FE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressFactor {
    None,
    MinorSurgery,
    MajorSurgery,
    ModerateInfection,
    LongBoneTrauma,
    Polytrauma,
    HeadInjury,
    SevereBurns,
}

impl StressFactor {
    pub fn factor(&self) -> f64 {
        match self {
            StressFactor::None => 1.0,
            StressFactor::MinorSurgery => 1.1,
            StressFactor::MajorSurgery => 1.2,
            StressFactor::ModerateInfection => 1.3,
            StressFactor::LongBoneTrauma => 1.25,
            StressFactor::Polytrauma => 1.45,
            StressFactor::HeadInjury => 1.6,
            StressFactor::SevereBurns => 1.8,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StressFactor::None => "Ninguno",
            StressFactor::MinorSurgery => "Cirugía menor",
            StressFactor::MajorSurgery => "Cirugía mayor",
            StressFactor::ModerateInfection => "Infección moderada",
            StressFactor::LongBoneTrauma => "Trauma huesos largos",
            StressFactor::Polytrauma => "Politrauma",
            StressFactor::HeadInjury => "TCE",
            StressFactor::SevereBurns => "Quemados (≥40% SCQ)",
        }
    }
}

/// Malnutrition/depletion factor (FD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepletionFactor {
    None,
    ModerateSevere,
}

impl DepletionFactor {
    pub fn factor(&self) -> f64 {
        match self {
            DepletionFactor::None => 1.0,
            DepletionFactor::ModerateSevere => 0.7,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DepletionFactor::None => "Sin FD",
            DepletionFactor::ModerateSevere => "Desnutrición moderada/grave",
        }
    }
}

/// Energy computation mode.
///
/// The two factor families are mutually exclusive: ambulatory patients get a
/// single PAL multiplier, facility patients get the activity × stress ×
/// depletion chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnergyMode {
    Ambulatory {
        pal: ActivityLevel,
    },
    Facility {
        activity: FacilityActivity,
        stress: StressFactor,
        depletion: DepletionFactor,
    },
}

impl Default for EnergyMode {
    fn default() -> Self {
        EnergyMode::Ambulatory {
            pal: ActivityLevel::Light,
        }
    }
}

impl EnergyMode {
    pub fn is_facility(&self) -> bool {
        matches!(self, EnergyMode::Facility { .. })
    }
}

/// Resolved energy values (kcal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyResult {
    /// Resting energy from the predictive equation. Not clamped: extreme
    /// inputs can yield negative values, which flow through unchanged.
    pub resting_kcal: f64,
    /// Total expenditure after mode factors, rounded to the nearest kcal
    pub expenditure_kcal: i64,
    /// Goal-adjusted calorie target. ≥ 1000 on the weight-loss branch.
    pub target_kcal: i64,
}

/// Top-level macronutrient percentages, normalized to sum exactly to 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroPercentages {
    pub protein: i64,
    pub fat: i64,
    /// Absorbs the rounding remainder of the normalization
    pub carb: i64,
}

/// Gram breakdown of the macro allocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroGrams {
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
    pub carb_complex: f64,
    pub carb_simple: f64,
    pub saturated: f64,
    pub poly: f64,
    pub mono: f64,
}

/// Per-kilogram normalization (0 when body weight is missing)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroPerKg {
    pub protein: f64,
    pub carb: f64,
}

/// Fully resolved macronutrient plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacronutrientPlan {
    pub pct: MacroPercentages,
    pub grams: MacroGrams,
    pub per_kg: MacroPerKg,
}

/// WHO body-mass-index classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiClass {
    Underweight,
    Normal,
    Overweight,
    ObesityI,
    ObesityII,
    ObesityIII,
}

impl BmiClass {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiClass::Underweight
        } else if bmi < 25.0 {
            BmiClass::Normal
        } else if bmi < 30.0 {
            BmiClass::Overweight
        } else if bmi < 35.0 {
            BmiClass::ObesityI
        } else if bmi < 40.0 {
            BmiClass::ObesityII
        } else {
            BmiClass::ObesityIII
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiClass::Underweight => "Bajo peso",
            BmiClass::Normal => "Normopeso",
            BmiClass::Overweight => "Sobrepeso",
            BmiClass::ObesityI => "Obesidad I",
            BmiClass::ObesityII => "Obesidad II",
            BmiClass::ObesityIII => "Obesidad III",
        }
    }
}

/// Body-composition estimates. Every metric is independently nullable:
/// absence of one input never blocks the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyComposition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi_class: Option<BmiClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_hip_ratio: Option<f64>,
    /// Central-adiposity risk: WHR > 0.85 (female) / > 0.90 (male)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_hip_risk: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_height_ratio: Option<f64>,
    /// Central-adiposity risk: WHtR ≥ 0.5
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_height_risk: Option<bool>,
    /// Durnin–Womersley + Siri, requires all four skinfolds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_fat_skinfold: Option<f64>,
    /// Bioimpedance percent fat, passed through from the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_fat_bia: Option<f64>,
    /// Hamwi ideal body weight (kg)
    pub ideal_weight_kg: f64,
    /// Actual weight as a percentage of ideal
    pub percent_of_ideal: f64,
    /// Present only when BMI ≥ 30 or percent-of-ideal ≥ 120
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_weight_kg: Option<f64>,
    /// Mid-arm muscle area (cm²), requires MUAC and triceps skinfold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arm_muscle_area_cm2: Option<f64>,
}

/// Recognized laboratory analytes, in canonical report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lab {
    Glucose,
    HbA1c,
    HomaIr,
    Ldl,
    Hdl,
    Triglycerides,
    TotalCholesterol,
    Creatinine,
    Alt,
    Ast,
    Hemoglobin,
    Ferritin,
    VitaminD,
    B12,
    Tsh,
    Urea,
    Crp,
}

impl Lab {
    pub const CANONICAL_ORDER: [Lab; 17] = [
        Lab::Glucose,
        Lab::HbA1c,
        Lab::HomaIr,
        Lab::Ldl,
        Lab::Hdl,
        Lab::Triglycerides,
        Lab::TotalCholesterol,
        Lab::Creatinine,
        Lab::Alt,
        Lab::Ast,
        Lab::Hemoglobin,
        Lab::Ferritin,
        Lab::VitaminD,
        Lab::B12,
        Lab::Tsh,
        Lab::Urea,
        Lab::Crp,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Lab::Glucose => "Glucosa",
            Lab::HbA1c => "HbA1c",
            Lab::HomaIr => "HOMA-IR",
            Lab::Ldl => "LDL",
            Lab::Hdl => "HDL",
            Lab::Triglycerides => "TG",
            Lab::TotalCholesterol => "CT",
            Lab::Creatinine => "Creatinina",
            Lab::Alt => "ALT",
            Lab::Ast => "AST",
            Lab::Hemoglobin => "Hemoglobina",
            Lab::Ferritin => "Ferritina",
            Lab::VitaminD => "Vit D",
            Lab::B12 => "B12",
            Lab::Tsh => "TSH",
            Lab::Urea => "Urea",
            Lab::Crp => "PCR",
        }
    }
}

/// Qualitative classification of a lab value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabFlag {
    Ok,
    Warning,
    AbnormalLow,
    AbnormalHigh,
    Info,
}

/// One interpreted lab value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReading {
    pub lab: Lab,
    pub value: f64,
    pub flag: LabFlag,
    /// Clinical interpretation label shown on the report
    pub label: String,
}

/// Food-exchange groups, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodGroup {
    Vegetables,
    Fruits,
    Grains,
    Legumes,
    Dairy,
    LeanProtein,
    Fats,
}

impl FoodGroup {
    pub const ALL: [FoodGroup; 7] = [
        FoodGroup::Vegetables,
        FoodGroup::Fruits,
        FoodGroup::Grains,
        FoodGroup::Legumes,
        FoodGroup::Dairy,
        FoodGroup::LeanProtein,
        FoodGroup::Fats,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            FoodGroup::Vegetables => "Vegetales",
            FoodGroup::Fruits => "Frutas",
            FoodGroup::Grains => "Cereales",
            FoodGroup::Legumes => "Leguminosas",
            FoodGroup::Dairy => "Lácteos descremados",
            FoodGroup::LeanProtein => "Proteínas magras",
            FoodGroup::Fats => "Grasas saludables",
        }
    }

    /// Base daily portion count at the 2000 kcal reference
    pub fn base_portions(&self) -> f64 {
        match self {
            FoodGroup::Vegetables => 4.0,
            FoodGroup::Fruits => 2.0,
            FoodGroup::Grains => 5.0,
            FoodGroup::Legumes => 1.0,
            FoodGroup::Dairy => 1.0,
            FoodGroup::LeanProtein => 4.0,
            FoodGroup::Fats => 4.0,
        }
    }
}

/// Per-portion nutrient content of one exchange group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub kcal: f64,
    pub carb_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    /// Reference portion description
    pub portion: String,
    /// Example foods for the group
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Meal slots for the five-way daily distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Meal {
    Breakfast,
    MidMorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
}

impl Meal {
    pub const ALL: [Meal; 5] = [
        Meal::Breakfast,
        Meal::MidMorningSnack,
        Meal::Lunch,
        Meal::AfternoonSnack,
        Meal::Dinner,
    ];

    pub fn fraction(&self) -> f64 {
        match self {
            Meal::Breakfast => 0.25,
            Meal::MidMorningSnack => 0.10,
            Meal::Lunch => 0.30,
            Meal::AfternoonSnack => 0.10,
            Meal::Dinner => 0.25,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Meal::Breakfast => "Desayuno",
            Meal::MidMorningSnack => "Merienda AM",
            Meal::Lunch => "Almuerzo",
            Meal::AfternoonSnack => "Merienda PM",
            Meal::Dinner => "Cena",
        }
    }
}

/// Daily portion allocation for one exchange group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyExchange {
    pub group: FoodGroup,
    /// Scaled daily portion count
    pub portions: i64,
    pub per_portion: GroupSpec,
}

/// Portion sub-allocation of every group for one meal slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealAllocation {
    pub meal: Meal,
    /// Group → portions for this meal, 1-decimal; not forced to re-sum to
    /// an integer
    pub portions: BTreeMap<FoodGroup, f64>,
}

/// Complete exchange plan: daily counts plus the per-meal distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangePlan {
    pub daily: Vec<DailyExchange>,
    pub meals: Vec<MealAllocation>,
}

/// Sodium budget converted to salt mass and household measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SodiumBudget {
    pub target_mg: i64,
    pub consumed_mg: i64,
    pub remaining_mg: i64,
    /// Remaining sodium as salt mass: 400 mg Na ≈ 1 g NaCl
    pub salt_g: f64,
    /// 1 teaspoon ≈ 5 g salt
    pub teaspoons: f64,
}

/// Report producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Echo of the patient inputs the report was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sex: Sex,
    pub age_years: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub equation: RmrEquation,
    pub mode: EnergyMode,
    pub thermic_effect: bool,
    pub goal: Goal,
}

/// The merged output record consumed by rendering/export collaborators.
///
/// Field names and units are the crate's stable contract with downstream
/// consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub producer: ReportProducer,
    pub patient: PatientSummary,
    pub energy: EnergyResult,
    pub macros: MacronutrientPlan,
    pub body: BodyComposition,
    pub labs: Vec<LabReading>,
    pub exchanges: ExchangePlan,
    pub sodium: SodiumBudget,
    /// Target kcal per kg of reference weight (adjusted, else ideal, else
    /// actual)
    pub kcal_per_kg_reference: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_factors() {
        assert_eq!(ActivityLevel::VeryLow.factor(), 1.2);
        assert_eq!(ActivityLevel::Light.factor(), 1.4);
        assert_eq!(ActivityLevel::Moderate.factor(), 1.6);
        assert_eq!(ActivityLevel::High.factor(), 1.75);
        assert_eq!(ActivityLevel::VeryHigh.factor(), 2.0);
    }

    #[test]
    fn test_facility_factors() {
        assert_eq!(FacilityActivity::Ventilated.factor(), 1.1);
        assert_eq!(FacilityActivity::Bedridden.factor(), 1.2);
        assert_eq!(FacilityActivity::Ambulating.factor(), 1.3);
        assert_eq!(StressFactor::SevereBurns.factor(), 1.8);
        assert_eq!(StressFactor::LongBoneTrauma.factor(), 1.25);
        assert_eq!(DepletionFactor::ModerateSevere.factor(), 0.7);
    }

    #[test]
    fn test_meal_fractions_cover_the_day() {
        let total: f64 = Meal::ALL.iter().map(|m| m.fraction()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_base_portion_counts() {
        let counts: Vec<f64> = FoodGroup::ALL.iter().map(|g| g.base_portions()).collect();
        assert_eq!(counts, vec![4.0, 2.0, 5.0, 1.0, 1.0, 4.0, 4.0]);
    }

    #[test]
    fn test_mode_serializes_with_tag() {
        let mode = EnergyMode::Ambulatory {
            pal: ActivityLevel::Moderate,
        };
        let json = serde_json::to_string(&mode).unwrap();
        assert_eq!(json, r#"{"type":"ambulatory","pal":"moderate"}"#);

        let back: EnergyMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mode);
    }

    #[test]
    fn test_goal_labels() {
        assert_eq!(Goal::WeightLoss.label(), "Pérdida de peso");
        assert_eq!(Goal::Maintenance.label(), "Mantenimiento");
    }
}
