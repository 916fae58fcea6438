//! Macronutrient allocation
//!
//! Normalizes the user-supplied percentage targets, converts them to grams,
//! and resolves the carbohydrate and fat sub-splits. Percentages that do not
//! sum to their parent total are silently rescaled in proportion — never
//! rejected — so downstream consumers always receive a complete, coherent
//! plan. The last component of each partition absorbs the rounding
//! remainder, keeping every partition exact.

use crate::intake::MacroTargets;
use crate::types::{MacroGrams, MacroPerKg, MacroPercentages, MacronutrientPlan};

/// kcal per gram of protein or carbohydrate
const KCAL_PER_G_PROTEIN_CARB: f64 = 4.0;

/// kcal per gram of fat
const KCAL_PER_G_FAT: f64 = 9.0;

/// Macronutrient allocator
pub struct MacroAllocator;

impl MacroAllocator {
    /// Resolve the full plan from a calorie target and percentage targets
    pub fn allocate(kcal_target: i64, targets: &MacroTargets, weight_kg: f64) -> MacronutrientPlan {
        let kcal = kcal_target.max(0) as f64;

        // Top-level normalization: rescale to 100, carb absorbs the remainder
        let total = (targets.protein_pct + targets.fat_pct + targets.carb_pct).max(1) as f64;
        let protein_pct = (100.0 * targets.protein_pct as f64 / total).round() as i64;
        let fat_pct = (100.0 * targets.fat_pct as f64 / total).round() as i64;
        let carb_pct = 100 - protein_pct - fat_pct;

        let protein_g = round1(kcal * protein_pct as f64 / 100.0 / KCAL_PER_G_PROTEIN_CARB);
        let fat_g = round1(kcal * fat_pct as f64 / 100.0 / KCAL_PER_G_FAT);
        let carb_g = round1(kcal * carb_pct as f64 / 100.0 / KCAL_PER_G_PROTEIN_CARB);

        let per_kg = if weight_kg > 0.0 {
            MacroPerKg {
                protein: round2(protein_g / weight_kg),
                carb: round2(carb_g / weight_kg),
            }
        } else {
            MacroPerKg {
                protein: 0.0,
                carb: 0.0,
            }
        };

        // Carbohydrate split: complex share, simple takes the rest
        let carb_complex = round1(carb_g * targets.complex_carb_pct as f64 / 100.0);
        let carb_simple = round1(carb_g - carb_complex);

        // Fat sub-split: rescale so the three sum to the parent fat
        // percentage (not to 100), mono absorbs the remainder
        let split = &targets.fat_split;
        let subtotal = (split.saturated + split.poly + split.mono).max(1) as f64;
        let sat_pct = fat_pct as f64 * split.saturated as f64 / subtotal;
        let poly_pct = fat_pct as f64 * split.poly as f64 / subtotal;
        let mono_pct = fat_pct as f64 - sat_pct - poly_pct;

        let saturated = round1(kcal * sat_pct / 100.0 / KCAL_PER_G_FAT);
        let poly = round1(kcal * poly_pct / 100.0 / KCAL_PER_G_FAT);
        let mono = round1(kcal * mono_pct / 100.0 / KCAL_PER_G_FAT);

        MacronutrientPlan {
            pct: MacroPercentages {
                protein: protein_pct,
                fat: fat_pct,
                carb: carb_pct,
            },
            grams: MacroGrams {
                protein: protein_g,
                fat: fat_g,
                carb: carb_g,
                carb_complex,
                carb_simple,
                saturated,
                poly,
                mono,
            },
            per_kg,
        }
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
    use crate::intake::FatSplit;

    fn targets(protein: i64, fat: i64, carb: i64) -> MacroTargets {
        MacroTargets {
            protein_pct: protein,
            fat_pct: fat,
            carb_pct: carb,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_allocation() {
        // kcal=1872, 20/30/50, 70 kg
        let plan = MacroAllocator::allocate(1872, &targets(20, 30, 50), 70.0);

        assert_eq!(plan.pct.protein, 20);
        assert_eq!(plan.pct.fat, 30);
        assert_eq!(plan.pct.carb, 50);
        assert!((plan.grams.protein - 93.6).abs() < 1e-9);
        assert!((plan.grams.fat - 62.4).abs() < 1e-9);
        assert!((plan.grams.carb - 234.0).abs() < 1e-9);
        assert!((plan.per_kg.protein - 1.34).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_rescaled_to_100() {
        // 30+30+30 = 90: each scales up, carb absorbs the remainder
        let plan = MacroAllocator::allocate(2000, &targets(30, 30, 30), 70.0);
        assert_eq!(plan.pct.protein + plan.pct.fat + plan.pct.carb, 100);
        assert_eq!(plan.pct.protein, 33);
        assert_eq!(plan.pct.carb, 34);

        // Oversubscribed inputs scale down the same way
        let plan = MacroAllocator::allocate(2000, &targets(60, 60, 60), 70.0);
        assert_eq!(plan.pct.protein + plan.pct.fat + plan.pct.carb, 100);
    }

    #[test]
    fn test_all_zero_percentages_fall_back_safely() {
        // max(1, total) guards the denominator; carb picks up the full 100
        let plan = MacroAllocator::allocate(2000, &targets(0, 0, 0), 70.0);
        assert_eq!(plan.pct.protein, 0);
        assert_eq!(plan.pct.fat, 0);
        assert_eq!(plan.pct.carb, 100);
    }

    #[test]
    fn test_carb_split_closure() {
        let plan = MacroAllocator::allocate(1872, &targets(20, 30, 50), 70.0);
        // 85% complex of 234.0 g
        assert!((plan.grams.carb_complex - 198.9).abs() < 1e-9);
        assert!((plan.grams.carb_simple - 35.1).abs() < 1e-9);
        assert!(
            (plan.grams.carb_complex + plan.grams.carb_simple - plan.grams.carb).abs() < 0.1
        );
    }

    #[test]
    fn test_fat_split_sums_to_parent_percentage() {
        let mut t = targets(20, 30, 50);
        // A split that does not sum to 100 still rescales against fat%
        t.fat_split = FatSplit {
            saturated: 10,
            poly: 20,
            mono: 30,
        };
        let plan = MacroAllocator::allocate(1872, &t, 70.0);

        // Grams of the three fractions re-sum to total fat within rounding
        let sub = plan.grams.saturated + plan.grams.poly + plan.grams.mono;
        assert!((sub - plan.grams.fat).abs() <= 0.2);
    }

    #[test]
    fn test_all_zero_fat_split_gives_mono_the_remainder() {
        let mut t = targets(20, 30, 50);
        t.fat_split = FatSplit {
            saturated: 0,
            poly: 0,
            mono: 0,
        };
        let plan = MacroAllocator::allocate(1872, &t, 70.0);
        assert_eq!(plan.grams.saturated, 0.0);
        assert_eq!(plan.grams.poly, 0.0);
        // mono_pct = fat% − 0 − 0, so all fat grams land on mono
        assert!((plan.grams.mono - plan.grams.fat).abs() <= 0.1);
    }

    #[test]
    fn test_missing_weight_zeroes_per_kg() {
        let plan = MacroAllocator::allocate(1872, &targets(20, 30, 50), 0.0);
        assert_eq!(plan.per_kg.protein, 0.0);
        assert_eq!(plan.per_kg.carb, 0.0);
    }

    #[test]
    fn test_negative_calorie_target_clamps_to_zero() {
        let plan = MacroAllocator::allocate(-500, &targets(20, 30, 50), 70.0);
        assert_eq!(plan.grams.protein, 0.0);
        assert_eq!(plan.grams.fat, 0.0);
        assert_eq!(plan.grams.carb, 0.0);
        // Percentages still normalize
        assert_eq!(plan.pct.protein + plan.pct.fat + plan.pct.carb, 100);
    }

    #[test]
    fn test_percentage_closure_across_inputs() {
        for (p, f, c) in [(10, 10, 10), (25, 35, 45), (1, 1, 0), (99, 1, 1), (17, 29, 61)] {
            let plan = MacroAllocator::allocate(2150, &targets(p, f, c), 64.0);
            assert_eq!(
                plan.pct.protein + plan.pct.fat + plan.pct.carb,
                100,
                "failed for ({p},{f},{c})"
            );
        }
    }
}
