//! Energy expenditure calculation
//!
//! Resting energy from a predictive equation, total expenditure from the
//! mode-specific factor chain, and the goal-adjusted calorie target.

use crate::types::{EnergyMode, EnergyResult, Goal, RmrEquation, Sex};

/// Thermic-effect-of-feeding allowance (~10%)
const TEF_MULTIPLIER: f64 = 1.10;

/// Absolute floor for weight-loss calorie targets (kcal)
const WEIGHT_LOSS_FLOOR_KCAL: i64 = 1000;

/// Energy expenditure calculator
pub struct EnergyCalculator;

impl EnergyCalculator {
    /// Run the full chain: resting energy → expenditure → target
    pub fn compute(
        equation: RmrEquation,
        sex: Sex,
        weight_kg: f64,
        height_cm: f64,
        age_years: u32,
        mode: &EnergyMode,
        thermic_effect: bool,
        goal: Goal,
    ) -> EnergyResult {
        let resting = resting_energy(equation, sex, weight_kg, height_cm, age_years);
        let expenditure = total_expenditure(resting, mode, thermic_effect);
        let target = calorie_target(expenditure, goal);

        EnergyResult {
            resting_kcal: resting,
            expenditure_kcal: expenditure,
            target_kcal: target,
        }
    }
}

/// Resting energy (kcal/day) from the selected predictive equation.
///
/// Not clamped: extreme inputs (very low weight, very high age) can yield
/// negative values, which flow through the rest of the chain unchanged.
pub fn resting_energy(
    equation: RmrEquation,
    sex: Sex,
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
) -> f64 {
    let age = f64::from(age_years);
    match equation {
        RmrEquation::MifflinStJeor => {
            let sex_term = match sex {
                Sex::Male => 5.0,
                Sex::Female => -161.0,
            };
            10.0 * weight_kg + 6.25 * height_cm - 5.0 * age + sex_term
        }
        RmrEquation::HarrisBenedict => match sex {
            Sex::Male => 66.47 + 13.75 * weight_kg + 5.003 * height_cm - 6.755 * age,
            Sex::Female => 655.09 + 9.563 * weight_kg + 1.850 * height_cm - 4.676 * age,
        },
    }
}

/// Total energy expenditure (kcal/day), rounded to the nearest integer.
///
/// Ambulatory: resting × PAL, plus the TEF allowance when requested.
/// Facility: resting × TEF × activity × stress × depletion.
pub fn total_expenditure(resting_kcal: f64, mode: &EnergyMode, thermic_effect: bool) -> i64 {
    let tef = if thermic_effect { TEF_MULTIPLIER } else { 1.0 };
    let total = match mode {
        EnergyMode::Ambulatory { pal } => resting_kcal * pal.factor() * tef,
        EnergyMode::Facility {
            activity,
            stress,
            depletion,
        } => resting_kcal * tef * activity.factor() * stress.factor() * depletion.factor(),
    };
    total.round() as i64
}

/// Goal-adjusted calorie target (kcal/day).
///
/// Weight loss subtracts 400 kcal above a 1600 kcal expenditure, 200 below
/// it, floored at 1000. Lean gain adds 200. Maintenance passes through.
pub fn calorie_target(expenditure_kcal: i64, goal: Goal) -> i64 {
    match goal {
        Goal::WeightLoss => {
            let deficit = if expenditure_kcal >= 1600 { 400 } else { 200 };
            (expenditure_kcal - deficit).max(WEIGHT_LOSS_FLOOR_KCAL)
        }
        Goal::LeanGain => expenditure_kcal + 200,
        Goal::Maintenance => expenditure_kcal,
    }
}
