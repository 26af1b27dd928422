use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use weekplate_recipe::{IngredientOverlap, Recipe, calculate_ingredient_overlap};
use weekplate_shopping::{
    GroceryList, GroceryStatistics, RecipeSummary, ShoppingListError, generate_grocery_list,
    render_markdown,
};

use crate::error::AppError;
use crate::routes::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct OverlapRequest {
    #[validate(length(min = 2, message = "At least 2 recipes are needed"))]
    pub recipe_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct OverlapResponse {
    pub overlap_info: IngredientOverlap,
}

/// POST /api/recipe/ingredient-overlap
pub async fn ingredient_overlap(
    State(state): State<AppState>,
    Json(payload): Json<OverlapRequest>,
) -> Result<Json<OverlapResponse>, AppError> {
    payload.validate()?;

    let recipes = state.catalog.resolve(&payload.recipe_ids)?;
    let overlap_info = calculate_ingredient_overlap(&recipes)?;

    Ok(Json(OverlapResponse { overlap_info }))
}

/// Either catalog ids or full recipe records; records win when both are sent.
#[derive(Debug, Default, Deserialize)]
pub struct GroceryListRequest {
    #[serde(default)]
    pub recipe_ids: Option<Vec<String>>,
    #[serde(default)]
    pub recipes: Option<Vec<Recipe>>,
    #[serde(default)]
    pub week_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroceryListResponse {
    pub history_id: Uuid,
    pub week_date: String,
    pub grocery_list: GroceryList,
    pub formatted_list: String,
    pub equipment_reminders: Vec<String>,
    pub shopping_tips: Vec<String>,
    pub estimated_cost: String,
    pub statistics: GroceryStatistics,
    pub recipe_summaries: Vec<RecipeSummary>,
    pub selected_recipes: Vec<Recipe>,
}

/// POST /api/recipe/grocery-list
///
/// The selection size is checked before anything is resolved, so an unknown
/// id in a selection of the wrong size still reports the count.
#[tracing::instrument(skip(state, payload))]
pub async fn grocery_list(
    State(state): State<AppState>,
    Json(payload): Json<GroceryListRequest>,
) -> Result<Json<GroceryListResponse>, AppError> {
    let options = state.config.planning.grocery_options();

    let recipes = match (payload.recipes, payload.recipe_ids) {
        (Some(recipes), _) => recipes,
        (None, ids) => {
            let ids = ids.unwrap_or_default();
            if ids.len() != options.required_recipes {
                return Err(ShoppingListError::WrongRecipeCount {
                    expected: options.required_recipes,
                    actual: ids.len(),
                }
                .into());
            }
            state.catalog.resolve(&ids)?
        }
    };

    let report = generate_grocery_list(&recipes, &options, &state.categorizer)?;

    let week_date = payload
        .week_date
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| chrono::Utc::now().date_naive().to_string());
    let formatted_list = render_markdown(&report, &recipes, &week_date);
    let estimated_cost = report.estimated_cost.to_string();

    let history_id = state
        .history
        .record_grocery_list(
            &week_date,
            &recipes,
            report.statistics.total_unique_ingredients,
            estimated_cost.clone(),
        )
        .await?;

    Ok(Json(GroceryListResponse {
        history_id,
        week_date,
        grocery_list: report.grocery_list,
        formatted_list,
        equipment_reminders: report.equipment_reminders,
        shopping_tips: report.shopping_tips,
        estimated_cost,
        statistics: report.statistics,
        recipe_summaries: report.recipe_summaries,
        selected_recipes: recipes,
    }))
}
