//! Exchange catalog
//!
//! The fixed seven-group food-exchange catalog and the tabular override
//! loader. An upload never mutates a catalog in place: it produces a whole
//! new catalog value, and the planner takes the catalog as an immutable
//! per-call snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::types::{FoodGroup, GroupSpec};

/// Immutable food-exchange catalog: per-portion nutrient content for each
/// of the seven groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeCatalog {
    groups: BTreeMap<FoodGroup, GroupSpec>,
}

impl Default for ExchangeCatalog {
    fn default() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(
            FoodGroup::Vegetables,
            spec(25.0, 5.0, 2.0, 0.0, "1 taza crudas / 1/2 taza cocidas",
                 &["lechuga", "espinaca", "brócoli", "chayota"]),
        );
        groups.insert(
            FoodGroup::Fruits,
            spec(60.0, 15.0, 0.0, 0.0, "1 unidad pequeña / 1/2 taza picada",
                 &["manzana", "mandarina", "lechoza 3/4 taza"]),
        );
        groups.insert(
            FoodGroup::Grains,
            spec(80.0, 15.0, 2.0, 1.0, "1/2 taza cocidos / 1 rebanada pan",
                 &["arroz 1/2 tz", "pasta 1/2 tz", "arepa 1/3 unid (50 g)", "pan 1 reb."]),
        );
        groups.insert(
            FoodGroup::Legumes,
            spec(100.0, 18.0, 7.0, 1.0, "1/2 taza cocidas",
                 &["caraotas", "lentejas", "frijol bayo"]),
        );
        groups.insert(
            FoodGroup::Dairy,
            spec(90.0, 12.0, 8.0, 2.0, "1 tz leche / yogurt natural",
                 &["leche 1 tz", "yogurt natural 1 tz"]),
        );
        groups.insert(
            FoodGroup::LeanProtein,
            spec(110.0, 0.0, 21.0, 3.0, "30 g cocidos",
                 &["pollo sin piel", "pavo", "pescado blanco", "atún al agua 1/2 lata"]),
        );
        groups.insert(
            FoodGroup::Fats,
            spec(45.0, 0.0, 0.0, 5.0, "1 cdita (5 g)",
                 &["aceite 1 cdita", "aguacate 1/8 unid", "nueces 6"]),
        );
        Self { groups }
    }
}

fn spec(
    kcal: f64,
    carb_g: f64,
    protein_g: f64,
    fat_g: f64,
    portion: &str,
    examples: &[&str],
) -> GroupSpec {
    GroupSpec {
        kcal,
        carb_g,
        protein_g,
        fat_g,
        portion: portion.to_string(),
        examples: examples.iter().map(|e| e.to_string()).collect(),
    }
}

impl ExchangeCatalog {
    /// Per-portion content for one group
    pub fn spec(&self, group: FoodGroup) -> Option<&GroupSpec> {
        self.groups.get(&group)
    }

    /// Iterate the catalog in canonical group order
    pub fn iter(&self) -> impl Iterator<Item = (FoodGroup, &GroupSpec)> {
        FoodGroup::ALL
            .iter()
            .filter_map(move |&g| self.groups.get(&g).map(|s| (g, s)))
    }

    /// Build a catalog from a tabular upload, replacing any subset of the
    /// seven groups.
    ///
    /// Required columns (case-insensitive): `group, name, kcal, carb,
    /// protein, fat, portion`. Rows are grouped by their `group` value
    /// (matched case-insensitively against the catalog display names) and
    /// the numeric columns averaged; row names become the example list and
    /// the first non-empty portion text wins. Unrecognized group names are
    /// skipped; groups with no rows keep their default entry. Any parse
    /// failure is an error — the caller decides whether to fall back to the
    /// default catalog.
    pub fn from_csv(data: &str) -> Result<Self, CalcError> {
        let mut reader = csv::Reader::from_reader(data.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| CalcError::CatalogError(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect::<csv::StringRecord>();
        reader.set_headers(headers);

        let mut rows_by_group: BTreeMap<FoodGroup, Vec<CatalogRow>> = BTreeMap::new();
        for result in reader.deserialize() {
            let row: CatalogRow = result.map_err(|e| CalcError::CatalogError(e.to_string()))?;
            if let Some(group) = match_group(&row.group) {
                rows_by_group.entry(group).or_default().push(row);
            }
        }

        let mut catalog = Self::default();
        for (group, rows) in rows_by_group {
            let n = rows.len() as f64;
            let portion = rows
                .iter()
                .map(|r| r.portion.trim())
                .find(|p| !p.is_empty())
                .unwrap_or("")
                .to_string();
            let examples = rows
                .iter()
                .map(|r| r.name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();

            catalog.groups.insert(
                group,
                GroupSpec {
                    kcal: rows.iter().map(|r| r.kcal).sum::<f64>() / n,
                    carb_g: rows.iter().map(|r| r.carb).sum::<f64>() / n,
                    protein_g: rows.iter().map(|r| r.protein).sum::<f64>() / n,
                    fat_g: rows.iter().map(|r| r.fat).sum::<f64>() / n,
                    portion,
                    examples,
                },
            );
        }

        Ok(catalog)
    }
}

/// One upload row after header normalization
#[derive(Debug, Deserialize)]
struct CatalogRow {
    group: String,
    name: String,
    kcal: f64,
    carb: f64,
    protein: f64,
    fat: f64,
    portion: String,
}

fn match_group(name: &str) -> Option<FoodGroup> {
    let wanted = name.trim().to_lowercase();
    FoodGroup::ALL
        .iter()
        .find(|g| g.display_name().to_lowercase() == wanted)
        .copied()
}
