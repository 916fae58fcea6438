//! Report export
//!
//! Serializes the assessment report for downstream consumers: an editable
//! markdown meal plan, an ADIME-style clinical note, and FHIR-style
//! NutritionOrder / NutritionIntake interoperability records. The report's
//! field names and units are the only contract with this layer; nothing
//! here feeds back into the engine.

use chrono::NaiveDate;
use serde_json::{json, Value};
use std::fmt::Write;

use crate::types::AssessmentReport;

/// Free-text sections of the clinical note
#[derive(Debug, Clone)]
pub struct NoteFields {
    /// Consultation kind shown in the heading
    pub kind: String,
    pub professional: String,
    /// Evaluation (A)
    pub evaluation: String,
    /// Diagnosis (D): one PES statement per entry
    pub diagnoses: Vec<String>,
    /// Intervention (I)
    pub intervention: String,
    /// Monitoring (ME)
    pub monitoring: String,
}

impl Default for NoteFields {
    fn default() -> Self {
        Self {
            kind: "Consulta".to_string(),
            professional: "—".to_string(),
            evaluation: String::new(),
            diagnoses: Vec::new(),
            intervention: String::new(),
            monitoring: String::new(),
        }
    }
}

/// Prescription details carried on the NutritionOrder resource
#[derive(Debug, Clone)]
pub struct OrderOptions {
    pub patient_id: Option<String>,
    pub professional: String,
    pub diet_type: String,
    pub texture: String,
    pub exclusions: Vec<String>,
    pub supplements: Vec<String>,
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self {
            patient_id: None,
            professional: "—".to_string(),
            diet_type: "Plan individualizado".to_string(),
            texture: "Normal".to_string(),
            exclusions: Vec::new(),
            supplements: Vec::new(),
        }
    }
}

/// Render the exchange plan as an editable markdown document
pub fn plan_markdown(report: &AssessmentReport, date: NaiveDate) -> String {
    let mut out = String::new();
    let patient = report.patient.name.as_deref().unwrap_or("—");

    let _ = writeln!(out, "# Plan de alimentación");
    let _ = writeln!(out);
    let _ = writeln!(out, "Paciente: {patient}  |  Fecha: {date}");
    let _ = writeln!(
        out,
        "MB: {} kcal  |  TEE: {} kcal  |  Meta: {} kcal  |  kcal/kg ref.: {}",
        report.energy.resting_kcal.round() as i64,
        report.energy.expenditure_kcal,
        report.energy.target_kcal,
        report.kcal_per_kg_reference,
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "| Lista | Raciones/día | kcal/rac | CHO | PRO | FAT | Porción |");
    let _ = writeln!(out, "|---|---|---|---|---|---|---|");
    for daily in &report.exchanges.daily {
        let spec = &daily.per_portion;
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            daily.group.display_name(),
            daily.portions,
            spec.kcal,
            spec.carb_g,
            spec.protein_g,
            spec.fat_g,
            spec.portion,
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Distribución por tiempo de comida");
    let _ = writeln!(out);
    let mut header = String::from("| Tiempo |");
    let mut rule = String::from("|---|");
    for daily in &report.exchanges.daily {
        let _ = write!(header, " {} |", daily.group.display_name());
        rule.push_str("---|");
    }
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{rule}");
    for allocation in &report.exchanges.meals {
        let _ = write!(out, "| {} |", allocation.meal.label());
        for daily in &report.exchanges.daily {
            let portions = allocation.portions.get(&daily.group).copied().unwrap_or(0.0);
            let _ = write!(out, " {portions:.1} |");
        }
        let _ = writeln!(out);
    }

    out
}

/// Render the ADIME-style clinical note as markdown
pub fn clinical_note_markdown(
    report: &AssessmentReport,
    note: &NoteFields,
    date: NaiveDate,
) -> String {
    let mut out = String::new();
    let patient = report.patient.name.as_deref().unwrap_or("—");
    let m = &report.macros;

    let _ = writeln!(
        out,
        "# HISTORIA CLÍNICA NUTRICIONAL – {}",
        note.kind.to_uppercase()
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Fecha: {date}   Profesional: {}   Paciente: {patient}",
        note.professional
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "## Evaluación (A)");
    let _ = writeln!(out, "{}", note.evaluation);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Diagnóstico (D)");
    for pes in &note.diagnoses {
        let _ = writeln!(out, "- {pes}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "## Intervención (I)");
    let _ = writeln!(out, "{}", note.intervention);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Monitoreo/Evaluación (ME)");
    let _ = writeln!(out, "{}", note.monitoring);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Requerimientos");
    let _ = writeln!(
        out,
        "Energía: {} kcal/d  ({} kcal/kg)",
        report.energy.target_kcal, report.kcal_per_kg_reference
    );
    let _ = writeln!(
        out,
        "Proteínas: {}% → {} g ({} g/kg)",
        m.pct.protein, m.grams.protein, m.per_kg.protein
    );
    let _ = writeln!(
        out,
        "Grasas: {}% → {} g (Sat {} g, Poli {} g, Mono {} g)",
        m.pct.fat, m.grams.fat, m.grams.saturated, m.grams.poly, m.grams.mono
    );
    let _ = writeln!(
        out,
        "CHO: {}% → {} g (Complejos {} g, Simples {} g)",
        m.pct.carb, m.grams.carb, m.grams.carb_complex, m.grams.carb_simple
    );
    let _ = writeln!(out);
    let s = &report.sodium;
    let _ = writeln!(
        out,
        "Sodio objetivo: {} mg; Consumido: {} mg; Remanente: {} mg",
        s.target_mg, s.consumed_mg, s.remaining_mg
    );
    let _ = writeln!(out, "≈ {} g NaCl ({} cdtas)", s.salt_g, s.teaspoons);

    if !report.labs.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Laboratorios");
        for reading in &report.labs {
            let _ = writeln!(
                out,
                "- {}: {} ({})",
                reading.lab.display_name(),
                reading.value,
                reading.label
            );
        }
    }

    out
}

/// Build a FHIR-style NutritionOrder resource carrying the energy target
/// and top-level macro grams
pub fn fhir_nutrition_order(
    report: &AssessmentReport,
    options: &OrderOptions,
    date: NaiveDate,
) -> Value {
    let patient = report.patient.name.as_deref().unwrap_or("—");
    let patient_ref = format!(
        "Patient/{}",
        options.patient_id.as_deref().unwrap_or("temp")
    );

    json!({
        "resourceType": "NutritionOrder",
        "status": "active",
        "intent": "order",
        "dateTime": date.to_string(),
        "patient": { "reference": patient_ref, "display": patient },
        "orderer": { "display": options.professional },
        "oralDiet": {
            "type": [{ "text": options.diet_type }],
            "schedule": [{ "repeat": { "boundsDuration": { "value": 30, "unit": "days" } } }],
            "nutrient": [
                { "modifier": { "text": "Energy" },
                  "amount": { "value": report.energy.target_kcal, "unit": "kcal/d" } },
                { "modifier": { "text": "Protein" },
                  "amount": { "value": report.macros.grams.protein, "unit": "g/d" } },
                { "modifier": { "text": "Fat" },
                  "amount": { "value": report.macros.grams.fat, "unit": "g/d" } },
                { "modifier": { "text": "Carbohydrate" },
                  "amount": { "value": report.macros.grams.carb, "unit": "g/d" } }
            ],
            "texture": [{ "modifier": { "text": options.texture } }],
            "excludeFoodModifier": options.exclusions.iter()
                .map(|e| json!({ "text": e }))
                .collect::<Vec<_>>(),
        },
        "supplement": options.supplements.iter()
            .map(|s| json!({ "productName": s }))
            .collect::<Vec<_>>(),
    })
}

/// Build a FHIR-style NutritionIntake resource for the planned menu
pub fn fhir_nutrition_intake(report: &AssessmentReport, date: NaiveDate) -> Value {
    let patient = report.patient.name.as_deref().unwrap_or("—");

    json!({
        "resourceType": "NutritionIntake",
        "status": "completed",
        "occurrenceDateTime": date.to_string(),
        "consumedItem": [{
            "type": { "text": "Menu (plan)" },
            "amount": { "value": report.energy.target_kcal, "unit": "kcal" },
            "nutrient": [
                { "item": { "text": "Protein" },
                  "amount": { "value": report.macros.grams.protein, "unit": "g" } },
                { "item": { "text": "Fat" },
                  "amount": { "value": report.macros.grams.fat, "unit": "g" } },
                { "item": { "text": "Carbohydrate" },
                  "amount": { "value": report.macros.grams.carb, "unit": "g" } }
            ]
        }],
        "subject": { "display": patient },
        "recorded": { "value": date.to_string() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::AssessmentInput;
    use crate::pipeline::assess;

    fn report() -> AssessmentReport {
        assess(&AssessmentInput::example()).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_plan_markdown_lists_every_group_and_meal() {
        let md = plan_markdown(&report(), day());

        for name in [
            "Vegetales",
            "Frutas",
            "Cereales",
            "Leguminosas",
            "Lácteos descremados",
            "Proteínas magras",
            "Grasas saludables",
        ] {
            assert!(md.contains(name), "missing group {name}");
        }
        for meal in ["Desayuno", "Merienda AM", "Almuerzo", "Merienda PM", "Cena"] {
            assert!(md.contains(meal), "missing meal {meal}");
        }
        assert!(md.contains("2024-03-15"));
    }

    #[test]
    fn test_clinical_note_carries_requirements_and_sodium() {
        let r = report();
        let note = NoteFields {
            kind: "Primera consulta".to_string(),
            professional: "Lcda. Pérez".to_string(),
            evaluation: "Paciente estable".to_string(),
            diagnoses: vec!["Ingesta calórica excesiva".to_string()],
            intervention: "Plan hipocalórico".to_string(),
            monitoring: "Control en 4 semanas".to_string(),
        };
        let md = clinical_note_markdown(&r, &note, day());

        assert!(md.contains("HISTORIA CLÍNICA NUTRICIONAL – PRIMERA CONSULTA"));
        assert!(md.contains("- Ingesta calórica excesiva"));
        assert!(md.contains(&format!("Energía: {} kcal/d", r.energy.target_kcal)));
        assert!(md.contains(&format!("Remanente: {} mg", r.sodium.remaining_mg)));
        // The example record submits labs, so the note carries them
        assert!(md.contains("## Laboratorios"));
        assert!(md.contains("Glucosa"));
    }

    #[test]
    fn test_nutrition_order_carries_energy_and_macro_grams() {
        let r = report();
        let order = fhir_nutrition_order(&r, &OrderOptions::default(), day());

        assert_eq!(order["resourceType"], "NutritionOrder");
        assert_eq!(order["status"], "active");
        assert_eq!(order["patient"]["reference"], "Patient/temp");

        let nutrients = order["oralDiet"]["nutrient"].as_array().unwrap();
        assert_eq!(nutrients.len(), 4);
        assert_eq!(nutrients[0]["amount"]["value"], r.energy.target_kcal);
        assert_eq!(nutrients[1]["amount"]["value"], r.macros.grams.protein);
        assert_eq!(nutrients[3]["amount"]["unit"], "g/d");
    }

    #[test]
    fn test_nutrition_intake_shape() {
        let r = report();
        let intake = fhir_nutrition_intake(&r, day());

        assert_eq!(intake["resourceType"], "NutritionIntake");
        assert_eq!(intake["status"], "completed");
        let item = &intake["consumedItem"][0];
        assert_eq!(item["amount"]["value"], r.energy.target_kcal);
        assert_eq!(item["nutrient"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_patient_id_lands_in_reference() {
        let r = report();
        let options = OrderOptions {
            patient_id: Some("12345".to_string()),
            ..Default::default()
        };
        let order = fhir_nutrition_order(&r, &options, day());
        assert_eq!(order["patient"]["reference"], "Patient/12345");
    }
}
