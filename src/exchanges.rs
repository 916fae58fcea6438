//! Food-exchange planning
//!
//! Scales the base daily portion counts to the calorie target and
//! distributes each group's daily count across the five meal slots.

use std::collections::BTreeMap;

use crate::catalog::ExchangeCatalog;
use crate::types::{DailyExchange, ExchangePlan, Meal, MealAllocation};

/// Reference intake the base portion counts are calibrated to (kcal)
const REFERENCE_KCAL: f64 = 2000.0;

/// Scale-factor ceiling in ambulatory mode
const MAX_SCALE_AMBULATORY: f64 = 2.4;

/// Scale-factor ceiling in facility mode
const MAX_SCALE_FACILITY: f64 = 2.2;

/// Food-exchange planner
pub struct ExchangePlanner;

impl ExchangePlanner {
    /// Build the daily plan and its per-meal distribution.
    ///
    /// A non-positive calorie target zeroes every portion count. The scale
    /// factor is floored at 1.0 and capped per mode.
    pub fn plan(kcal_target: i64, catalog: &ExchangeCatalog, facility: bool) -> ExchangePlan {
        let scale = scale_factor(kcal_target, facility);

        let daily: Vec<DailyExchange> = catalog
            .iter()
            .map(|(group, per_portion)| {
                let portions = if kcal_target <= 0 {
                    0
                } else {
                    (group.base_portions() * scale).round() as i64
                };
                DailyExchange {
                    group,
                    portions,
                    per_portion: per_portion.clone(),
                }
            })
            .collect();

        let meals = Meal::ALL
            .iter()
            .map(|&meal| {
                let portions: BTreeMap<_, _> = daily
                    .iter()
                    .map(|d| (d.group, round1(d.portions as f64 * meal.fraction())))
                    .collect();
                MealAllocation { meal, portions }
            })
            .collect();

        ExchangePlan { daily, meals }
    }
}

fn scale_factor(kcal_target: i64, facility: bool) -> f64 {
    let cap = if facility {
        MAX_SCALE_FACILITY
    } else {
        MAX_SCALE_AMBULATORY
    };
    (kcal_target as f64 / REFERENCE_KCAL).clamp(1.0, cap)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FoodGroup;

    fn portions_for(plan: &ExchangePlan, group: FoodGroup) -> i64 {
        plan.daily
            .iter()
            .find(|d| d.group == group)
            .map(|d| d.portions)
            .unwrap()
    }

    #[test]
    fn test_reference_target_keeps_base_counts() {
        let catalog = ExchangeCatalog::default();
        let plan = ExchangePlanner::plan(2000, &catalog, false);

        assert_eq!(portions_for(&plan, FoodGroup::Vegetables), 4);
        assert_eq!(portions_for(&plan, FoodGroup::Fruits), 2);
        assert_eq!(portions_for(&plan, FoodGroup::Grains), 5);
        assert_eq!(portions_for(&plan, FoodGroup::Legumes), 1);
        assert_eq!(portions_for(&plan, FoodGroup::Dairy), 1);
        assert_eq!(portions_for(&plan, FoodGroup::LeanProtein), 4);
        assert_eq!(portions_for(&plan, FoodGroup::Fats), 4);
    }

    #[test]
    fn test_non_positive_target_zeroes_every_count() {
        let catalog = ExchangeCatalog::default();
        for kcal in [0, -100] {
            let plan = ExchangePlanner::plan(kcal, &catalog, false);
            assert!(plan.daily.iter().all(|d| d.portions == 0));
            assert!(plan
                .meals
                .iter()
                .all(|m| m.portions.values().all(|&p| p == 0.0)));
        }
    }

    #[test]
    fn test_scale_is_floored_and_capped() {
        let catalog = ExchangeCatalog::default();

        // Low targets never shrink below the base counts
        let plan = ExchangePlanner::plan(1200, &catalog, false);
        assert_eq!(portions_for(&plan, FoodGroup::Grains), 5);

        // Ambulatory cap 2.4: vegetables 4 × 2.4 = 9.6 → 10
        let plan = ExchangePlanner::plan(10_000, &catalog, false);
        assert_eq!(portions_for(&plan, FoodGroup::Vegetables), 10);

        // Facility cap 2.2: vegetables 4 × 2.2 = 8.8 → 9
        let plan = ExchangePlanner::plan(10_000, &catalog, true);
        assert_eq!(portions_for(&plan, FoodGroup::Vegetables), 9);
    }

    #[test]
    fn test_counts_are_non_negative_across_range() {
        let catalog = ExchangeCatalog::default();
        for kcal in (0..=10_000).step_by(500) {
            let plan = ExchangePlanner::plan(kcal, &catalog, false);
            assert!(plan.daily.iter().all(|d| d.portions >= 0));
        }
    }

    #[test]
    fn test_meal_distribution_fractions() {
        let catalog = ExchangeCatalog::default();
        let plan = ExchangePlanner::plan(2000, &catalog, false);

        assert_eq!(plan.meals.len(), 5);
        let breakfast = &plan.meals[0];
        assert_eq!(breakfast.meal, Meal::Breakfast);
        // Vegetables: 4 daily × 0.25
        assert_eq!(breakfast.portions[&FoodGroup::Vegetables], 1.0);
        // Grains: 5 daily × 0.25 = 1.25 → 1.3 at 1 decimal; sub-allocations
        // are not forced to re-sum to the integer daily count
        assert_eq!(breakfast.portions[&FoodGroup::Grains], 1.3);

        let lunch = &plan.meals[2];
        assert_eq!(lunch.meal, Meal::Lunch);
        assert_eq!(lunch.portions[&FoodGroup::Grains], 1.5);
    }
}
