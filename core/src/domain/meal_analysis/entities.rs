use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub name: String,
    pub grams: f64,
}

/// One ingredient as estimated by the extractor, with its nutrient amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEstimate {
    pub ingredient: Ingredient,
    pub nutrients: BTreeMap<String, f64>,
}

/// Raw extractor output before it is shaped into a [`NutritionBreakdown`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractedMeal {
    pub ingredients: Vec<IngredientEstimate>,
    /// Whole-meal totals when the extractor reports them.
    pub total_meal: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NutritionBreakdown {
    /// Ingredient name to nutrient name to amount.
    pub ingredients: BTreeMap<String, BTreeMap<String, f64>>,
    pub total_meal: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MealAnalysis {
    Breakdown(NutritionBreakdown),
    /// The image was processed but no ingredient could be identified.
    NoIngredients,
}

impl NutritionBreakdown {
    /// Shapes extractor output. Returns `None` when no usable ingredient remains.
    ///
    /// Ingredients with a blank name or a non-positive weight are dropped,
    /// repeated names are merged, and `total_meal` is summed from the
    /// ingredients when the extractor did not provide it.
    pub fn from_extraction(meal: ExtractedMeal) -> Option<Self> {
        let mut ingredients: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();

        for estimate in meal.ingredients {
            let name = estimate.ingredient.name.trim();
            let grams = estimate.ingredient.grams;
            if name.is_empty() || !grams.is_finite() || grams <= 0.0 {
                tracing::warn!(ingredient = name, grams, "Dropping unusable ingredient estimate");
                continue;
            }

            let amounts = ingredients.entry(name.to_string()).or_default();
            for (nutrient, amount) in estimate.nutrients {
                if amount.is_finite() {
                    *amounts.entry(nutrient).or_insert(0.0) += amount;
                }
            }
        }

        if ingredients.is_empty() {
            return None;
        }

        let total_meal = match meal.total_meal {
            Some(total) if !total.is_empty() => total,
            _ => sum_nutrients(ingredients.values()),
        };

        Some(Self {
            ingredients,
            total_meal,
        })
    }
}

fn sum_nutrients<'a>(
    amounts: impl Iterator<Item = &'a BTreeMap<String, f64>>,
) -> BTreeMap<String, f64> {
    let mut total = BTreeMap::new();
    for per_ingredient in amounts {
        for (nutrient, amount) in per_ingredient {
            *total.entry(nutrient.clone()).or_insert(0.0) += amount;
        }
    }
    total
}
