use serde::{Deserialize, Serialize};
use weekplate_recipe::{Recipe, RecipeError};

use crate::categorization::Categorizer;
use crate::consolidation::{Consolidator, MixedUnitPolicy};
use crate::formatter::{GroceryList, purchasable_amount};
use crate::parser::parse_ingredient;
use crate::tips::{CostEstimate, equipment_reminders, estimate_cost, shopping_tips};

/// Number of dinners a weekly grocery list is built from.
pub const DEFAULT_REQUIRED_RECIPES: usize = 4;

/// Error types for grocery list commands
#[derive(Debug, thiserror::Error)]
pub enum ShoppingListError {
    #[error("Exactly {expected} recipes must be selected, got {actual}")]
    WrongRecipeCount { expected: usize, actual: usize },

    #[error("Invalid recipe: {0}")]
    InvalidRecipe(#[from] RecipeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryOptions {
    pub required_recipes: usize,
    pub mixed_units: MixedUnitPolicy,
    /// Round merged quantities to amounts a store sells.
    pub optimize_quantities: bool,
}

impl Default for GroceryOptions {
    fn default() -> Self {
        Self {
            required_recipes: DEFAULT_REQUIRED_RECIPES,
            mixed_units: MixedUnitPolicy::default(),
            optimize_quantities: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub name: String,
    pub ingredient_count: usize,
    pub protein: Option<String>,
    pub cuisine: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryStatistics {
    pub total_recipes: usize,
    pub total_unique_ingredients: usize,
    pub total_original_ingredients: usize,
    /// Percentage of ingredient lines saved by merging.
    pub combination_efficiency: i64,
    pub departments_needed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryReport {
    pub grocery_list: GroceryList,
    pub recipe_summaries: Vec<RecipeSummary>,
    pub equipment_reminders: Vec<String>,
    pub shopping_tips: Vec<String>,
    pub estimated_cost: CostEstimate,
    pub statistics: GroceryStatistics,
}

/// Generate the consolidated grocery list for a week's selected recipes
///
/// This command:
/// 1. Checks the selection has exactly `required_recipes` recipes
/// 2. Parses every ingredient line (never failing on odd text)
/// 3. Merges lines by normalized name into canonical units
/// 4. Optionally rounds merged quantities to purchasable amounts
/// 5. Files each merged item under a grocery department
/// 6. Adds equipment reminders, shopping tips and a cost estimate
///
/// Nothing is produced when validation fails.
#[tracing::instrument(skip(recipes, categorizer), fields(recipes = recipes.len()))]
pub fn generate_grocery_list(
    recipes: &[Recipe],
    options: &GroceryOptions,
    categorizer: &Categorizer,
) -> Result<GroceryReport, ShoppingListError> {
    if recipes.len() != options.required_recipes {
        return Err(ShoppingListError::WrongRecipeCount {
            expected: options.required_recipes,
            actual: recipes.len(),
        });
    }

    for recipe in recipes {
        recipe.validate()?;
    }

    let mut consolidator = Consolidator::new(options.mixed_units);
    for recipe in recipes {
        for line in recipe.ingredients.iter().filter(|l| !l.trim().is_empty()) {
            consolidator.add(&parse_ingredient(line), Some(recipe.name.as_str()));
        }
    }

    let total_original_ingredients = consolidator.line_count();
    let mut entries = consolidator.finish();
    if options.optimize_quantities {
        for entry in &mut entries {
            entry.total_quantity = purchasable_amount(entry.total_quantity, entry.canonical.as_ref());
        }
    }
    let grocery_list = GroceryList::build(entries, categorizer);
    let total_unique_ingredients = grocery_list.item_count();

    let combination_efficiency = ((1.0
        - total_unique_ingredients as f64 / total_original_ingredients.max(1) as f64)
        * 100.0)
        .round() as i64;

    let statistics = GroceryStatistics {
        total_recipes: recipes.len(),
        total_unique_ingredients,
        total_original_ingredients,
        combination_efficiency,
        departments_needed: grocery_list.department_count(),
    };

    let recipe_summaries = recipes
        .iter()
        .map(|r| RecipeSummary {
            name: r.name.clone(),
            ingredient_count: r.ingredients.len(),
            protein: r.protein.clone(),
            cuisine: r.cuisine.clone(),
        })
        .collect();

    let report = GroceryReport {
        equipment_reminders: equipment_reminders(recipes),
        shopping_tips: shopping_tips(recipes, &grocery_list),
        estimated_cost: estimate_cost(&grocery_list),
        recipe_summaries,
        statistics,
        grocery_list,
    };

    tracing::info!(
        lines = report.statistics.total_original_ingredients,
        items = report.statistics.total_unique_ingredients,
        departments = report.statistics.departments_needed,
        efficiency = report.statistics.combination_efficiency,
        "Grocery list generated"
    );

    Ok(report)
}
