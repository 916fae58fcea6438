//! Sodium budget conversion
//!
//! Translates the remaining daily sodium budget into salt mass and a
//! household teaspoon measure. Pure, total function.

use crate::intake::DEFAULT_SODIUM_TARGET_MG;
use crate::types::SodiumBudget;

/// Sodium content of table salt: 400 mg Na per gram of NaCl
const SODIUM_MG_PER_SALT_G: f64 = 400.0;

/// Grams of salt in a household teaspoon
const SALT_G_PER_TEASPOON: f64 = 5.0;

/// Convert a sodium target and consumed amount into the remaining budget.
///
/// A non-positive target falls back to the 2300 mg default; negative
/// remainders clamp to zero.
pub fn convert(target_mg: i64, consumed_mg: i64) -> SodiumBudget {
    let target = if target_mg > 0 {
        target_mg
    } else {
        DEFAULT_SODIUM_TARGET_MG
    };
    let consumed = consumed_mg.max(0);
    let remaining = (target - consumed).max(0);
    let salt_g = round2(remaining as f64 / SODIUM_MG_PER_SALT_G);
    let teaspoons = round2(salt_g / SALT_G_PER_TEASPOON);

    SodiumBudget {
        target_mg: target,
        consumed_mg: consumed,
        remaining_mg: remaining,
        salt_g,
        teaspoons,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_conversion() {
        // 2300 − 900 = 1400 mg → 3.5 g salt → 0.7 teaspoons
        let budget = convert(2300, 900);
        assert_eq!(budget.remaining_mg, 1400);
        assert_eq!(budget.salt_g, 3.5);
        assert_eq!(budget.teaspoons, 0.7);
    }

    #[test]
    fn test_overconsumption_clamps_to_zero() {
        let budget = convert(2300, 3000);
        assert_eq!(budget.remaining_mg, 0);
        assert_eq!(budget.salt_g, 0.0);
        assert_eq!(budget.teaspoons, 0.0);
    }

    #[test]
    fn test_zero_target_uses_default() {
        let budget = convert(0, 500);
        assert_eq!(budget.target_mg, 2300);
        assert_eq!(budget.remaining_mg, 1800);
    }
}
