use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RecipeError, RecipeResult};
use crate::types::Recipe;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientOverlap {
    /// Ingredient lines used by more than one recipe, in first-seen order.
    pub shared_ingredients: Vec<String>,
    pub total_unique_ingredients: usize,
    /// Sum over shared lines of (occurrences - 1).
    pub overlap_score: usize,
    pub overlap_percentage: f64,
    /// 0-10 rating of how much shopping the selection saves.
    pub efficiency_score: u8,
}

/// Measure how much a set of recipes shares ingredient lines.
///
/// Lines are compared verbatim (trimmed, case-insensitive); consolidation of
/// differently-worded lines is the grocery list's job.
pub fn calculate_ingredient_overlap(recipes: &[Recipe]) -> RecipeResult<IngredientOverlap> {
    if recipes.len() < 2 {
        return Err(RecipeError::NotEnoughRecipes {
            required: 2,
            actual: recipes.len(),
        });
    }

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total_lines = 0usize;

    for line in recipes.iter().flat_map(|r| r.ingredients.iter()) {
        let key = line.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        total_lines += 1;
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    }

    let shared_ingredients: Vec<String> = order
        .iter()
        .filter(|k| counts[*k] > 1)
        .cloned()
        .collect();
    let overlap_score: usize = counts.values().filter(|c| **c > 1).map(|c| c - 1).sum();

    let overlap_percentage = if total_lines == 0 {
        0.0
    } else {
        (overlap_score as f64 / total_lines as f64 * 1000.0).round() / 10.0
    };

    let efficiency_score = (overlap_percentage / 5.0).round().clamp(0.0, 10.0) as u8;

    Ok(IngredientOverlap {
        shared_ingredients,
        total_unique_ingredients: counts.len(),
        overlap_score,
        overlap_percentage,
        efficiency_score,
    })
}
