//! Laboratory interpretation
//!
//! Threshold-based classification of submitted lab values into qualitative
//! flags. Values of 0 (the "not submitted" convention) are excluded from the
//! output, which always follows the canonical lab order. Cutoffs for
//! creatinine, hemoglobin, ferritin, and HDL are sex-dependent.

use crate::intake::LabValues;
use crate::types::{Lab, LabFlag, LabReading, Sex};

/// Laboratory interpreter
pub struct LabInterpreter;

impl LabInterpreter {
    /// Classify every submitted lab value, in canonical order.
    ///
    /// HOMA-IR is derived here from glucose and insulin and then treated as
    /// just another lab.
    pub fn interpret(sex: Sex, labs: &LabValues) -> Vec<LabReading> {
        let homa = homa_ir(labs.glucose, labs.insulin);

        Lab::CANONICAL_ORDER
            .iter()
            .filter_map(|&lab| {
                let value = submitted_value(lab, labs, homa);
                if value > 0.0 {
                    let (flag, label) = classify(lab, value, sex);
                    Some(LabReading {
                        lab,
                        value,
                        flag,
                        label: label.to_string(),
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}

/// HOMA-IR insulin-resistance index, 2 decimals.
///
/// `(glucose_mmol × insulin) / 22.5` with glucose converted from mg/dL.
/// Requires both fasting glucose and insulin.
pub fn homa_ir(glucose_mg_dl: f64, insulin_uu_ml: f64) -> Option<f64> {
    if glucose_mg_dl > 0.0 && insulin_uu_ml > 0.0 {
        let glucose_mmol = glucose_mg_dl / 18.0;
        Some(round2(glucose_mmol * insulin_uu_ml / 22.5))
    } else {
        None
    }
}

fn submitted_value(lab: Lab, labs: &LabValues, homa: Option<f64>) -> f64 {
    match lab {
        Lab::Glucose => labs.glucose,
        Lab::HbA1c => labs.hba1c,
        Lab::HomaIr => homa.unwrap_or(0.0),
        Lab::Ldl => labs.ldl,
        Lab::Hdl => labs.hdl,
        Lab::Triglycerides => labs.triglycerides,
        Lab::TotalCholesterol => labs.total_cholesterol,
        Lab::Creatinine => labs.creatinine,
        Lab::Alt => labs.alt,
        Lab::Ast => labs.ast,
        Lab::Hemoglobin => labs.hemoglobin,
        Lab::Ferritin => labs.ferritin,
        Lab::VitaminD => labs.vitamin_d,
        Lab::B12 => labs.b12,
        Lab::Tsh => labs.tsh,
        Lab::Urea => labs.urea,
        Lab::Crp => labs.crp,
    }
}

/// Fixed clinical thresholds per lab
fn classify(lab: Lab, value: f64, sex: Sex) -> (LabFlag, &'static str) {
    match lab {
        Lab::Glucose => {
            if value < 70.0 {
                (LabFlag::Warning, "Baja")
            } else if value < 100.0 {
                (LabFlag::Ok, "Normal")
            } else if value < 126.0 {
                (LabFlag::Warning, "Prediabetes")
            } else {
                (LabFlag::AbnormalHigh, "Diabetes")
            }
        }
        Lab::HbA1c => {
            if value < 5.7 {
                (LabFlag::Ok, "Normal")
            } else if value < 6.5 {
                (LabFlag::Warning, "Prediabetes")
            } else {
                (LabFlag::AbnormalHigh, "Diabetes")
            }
        }
        Lab::HomaIr => {
            if value < 2.5 {
                (LabFlag::Ok, "Aceptable")
            } else {
                (LabFlag::Warning, "Resistencia ↑")
            }
        }
        Lab::Ldl => {
            if value < 100.0 {
                (LabFlag::Ok, "Deseable")
            } else {
                (LabFlag::AbnormalHigh, "Alto")
            }
        }
        Lab::Hdl => {
            let low = match sex {
                Sex::Male => 40.0,
                Sex::Female => 50.0,
            };
            if value >= low {
                (LabFlag::Ok, "Protector")
            } else {
                (LabFlag::AbnormalLow, "Bajo")
            }
        }
        Lab::Triglycerides => {
            if value < 150.0 {
                (LabFlag::Ok, "Normal")
            } else {
                (LabFlag::AbnormalHigh, "Alto")
            }
        }
        Lab::TotalCholesterol => {
            if value < 200.0 {
                (LabFlag::Ok, "Deseable")
            } else {
                (LabFlag::AbnormalHigh, "Alto")
            }
        }
        Lab::Creatinine => {
            let high = match sex {
                Sex::Male => 1.3,
                Sex::Female => 1.1,
            };
            if value > high {
                (LabFlag::AbnormalHigh, "Alta")
            } else if value < 0.5 {
                (LabFlag::Warning, "Baja")
            } else {
                (LabFlag::Ok, "Normal")
            }
        }
        Lab::Alt | Lab::Ast => {
            if value <= 40.0 {
                (LabFlag::Ok, "Normal")
            } else {
                (LabFlag::AbnormalHigh, "Alta")
            }
        }
        Lab::Hemoglobin => {
            let (low, high) = match sex {
                Sex::Male => (13.5, 17.5),
                Sex::Female => (12.0, 16.0),
            };
            if value < low {
                (LabFlag::AbnormalLow, "Baja")
            } else if value > high {
                (LabFlag::Warning, "Alta")
            } else {
                (LabFlag::Ok, "Normal")
            }
        }
        Lab::Ferritin => {
            let (low, high) = match sex {
                Sex::Male => (24.0, 336.0),
                Sex::Female => (12.0, 150.0),
            };
            if value < low {
                (LabFlag::AbnormalLow, "Baja")
            } else if value > high {
                (LabFlag::Warning, "Alta")
            } else {
                (LabFlag::Ok, "Normal")
            }
        }
        Lab::VitaminD => {
            if value < 20.0 {
                (LabFlag::AbnormalLow, "Deficiencia")
            } else if value < 30.0 {
                (LabFlag::Warning, "Insuficiente")
            } else {
                (LabFlag::Ok, "Suficiente")
            }
        }
        Lab::B12 => {
            if value < 200.0 {
                (LabFlag::AbnormalLow, "Baja")
            } else if value > 900.0 {
                (LabFlag::Warning, "Alta")
            } else {
                (LabFlag::Ok, "Normal")
            }
        }
        Lab::Tsh => {
            if (0.4..=4.0).contains(&value) {
                (LabFlag::Ok, "Normal")
            } else {
                (LabFlag::Warning, "Alterada")
            }
        }
        Lab::Urea => {
            if (15.0..=45.0).contains(&value) {
                (LabFlag::Ok, "Normal")
            } else {
                (LabFlag::Warning, "Alterada")
            }
        }
        Lab::Crp => {
            if value <= 5.0 {
                (LabFlag::Ok, "Aceptable")
            } else {
                (LabFlag::AbnormalHigh, "Alta")
            }
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
