//! Pipeline orchestration
//!
//! This module provides the public API for nutricalc. One calculation pass
//! runs the raw input record through energy expenditure, body composition,
//! macro allocation, lab interpretation, exchange planning, and the sodium
//! budget, then merges everything into a single assessment report.

use uuid::Uuid;

use crate::body::BodyCompositionEstimator;
use crate::catalog::ExchangeCatalog;
use crate::energy::EnergyCalculator;
use crate::error::CalcError;
use crate::exchanges::ExchangePlanner;
use crate::intake::AssessmentInput;
use crate::labs::LabInterpreter;
use crate::macronutrients::MacroAllocator;
use crate::sodium;
use crate::types::{AssessmentReport, PatientSummary, ReportProducer};
use crate::{ENGINE_VERSION, PRODUCER_NAME};

/// Run one calculation pass with the default exchange catalog.
///
/// # Example
/// ```ignore
/// let input = AssessmentInput::from_json(&json)?;
/// let report = assess(&input)?;
/// ```
pub fn assess(input: &AssessmentInput) -> Result<AssessmentReport, CalcError> {
    NutritionEngine::new().assess(input)
}

/// Calculation engine holding the active exchange catalog.
///
/// The catalog is an immutable per-call snapshot: an upload replaces the
/// whole value, it is never patched in place, so a report computed while an
/// upload happens elsewhere can never observe a half-updated catalog.
pub struct NutritionEngine {
    catalog: ExchangeCatalog,
    instance_id: String,
}

impl Default for NutritionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NutritionEngine {
    /// Create an engine with the default catalog and a fresh instance id
    pub fn new() -> Self {
        Self::with_catalog(ExchangeCatalog::default())
    }

    /// Create an engine with a specific catalog
    pub fn with_catalog(catalog: ExchangeCatalog) -> Self {
        Self {
            catalog,
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// The active exchange catalog
    pub fn catalog(&self) -> &ExchangeCatalog {
        &self.catalog
    }

    /// Replace the catalog from a tabular upload.
    ///
    /// A malformed upload keeps the current catalog in force and returns
    /// false; no error surfaces to the caller.
    pub fn load_catalog_csv(&mut self, data: &str) -> bool {
        match ExchangeCatalog::from_csv(data) {
            Ok(catalog) => {
                self.catalog = catalog;
                true
            }
            Err(_) => false,
        }
    }

    /// Run one calculation pass.
    ///
    /// The only precondition is the positive anthropometric triple; every
    /// optional input degrades to absent fields in the report.
    pub fn assess(&self, input: &AssessmentInput) -> Result<AssessmentReport, CalcError> {
        input.validate()?;

        let energy = EnergyCalculator::compute(
            input.equation,
            input.sex,
            input.weight_kg,
            input.height_cm,
            input.age_years,
            &input.mode,
            input.thermic_effect,
            input.goal,
        );

        let body = BodyCompositionEstimator::estimate(
            input.sex,
            input.age_years,
            input.weight_kg,
            input.height_cm,
            &input.anthropometry,
        );

        let macros = MacroAllocator::allocate(energy.target_kcal, &input.targets, input.weight_kg);
        let labs = LabInterpreter::interpret(input.sex, &input.labs);
        let exchanges =
            ExchangePlanner::plan(energy.target_kcal, &self.catalog, input.mode.is_facility());
        let sodium = sodium::convert(input.sodium.target_mg, input.sodium.consumed_mg);

        // Reference weight for the kcal/kg figure: adjusted when present,
        // else ideal, else actual
        let reference_kg = body
            .adjusted_weight_kg
            .filter(|w| *w > 0.0)
            .unwrap_or(if body.ideal_weight_kg > 0.0 {
                body.ideal_weight_kg
            } else {
                input.weight_kg
            });
        let denom = if reference_kg > 0.0 { reference_kg } else { 1.0 };
        let kcal_per_kg_reference = round2(energy.target_kcal as f64 / denom);

        Ok(AssessmentReport {
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            patient: PatientSummary {
                name: input.name.clone(),
                sex: input.sex,
                age_years: input.age_years,
                height_cm: input.height_cm,
                weight_kg: input.weight_kg,
                equation: input.equation,
                mode: input.mode,
                thermic_effect: input.thermic_effect,
                goal: input.goal,
            },
            energy,
            macros,
            body,
            labs,
            exchanges,
            sodium,
            kcal_per_kg_reference,
        })
    }

    /// Run one pass and serialize the report to pretty JSON
    pub fn assess_to_json(&self, input: &AssessmentInput) -> Result<String, CalcError> {
        let report = self.assess(input)?;
        serde_json::to_string_pretty(&report).map_err(CalcError::JsonError)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
