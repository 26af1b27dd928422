use std::collections::{BTreeMap, BTreeSet};

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;
use weekplate_recipe::{Recipe, RecipeError};

use crate::error::AppError;
use crate::history::Preferences;
use crate::routes::AppState;

const METHOD_DESCRIPTIONS: [(&str, &str); 5] = [
    ("stove", "Stovetop pan or pot cooking"),
    ("oven", "Baked or roasted in the oven"),
    ("grill", "Outdoor or grill pan cooking"),
    ("air_fryer", "Quick crisping in the air fryer"),
    ("instant_pot", "Pressure cooked in the Instant Pot"),
];

/// GET /api/recipe/recipe/{id}
pub async fn recipe_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, AppError> {
    let recipe = state
        .catalog
        .find(&id)
        .cloned()
        .ok_or(RecipeError::NotFound(id))?;

    Ok(Json(recipe))
}

#[derive(Debug, Serialize)]
pub struct EquipmentResponse {
    pub equipment: Vec<String>,
    pub method_preferences: BTreeMap<&'static str, &'static str>,
}

/// GET /api/recipe/cooking-equipment
///
/// Equipment named anywhere in the catalog, plus the cooking methods the
/// planner knows about.
pub async fn cooking_equipment(State(state): State<AppState>) -> Json<EquipmentResponse> {
    let equipment: BTreeSet<String> = state
        .catalog
        .all()
        .iter()
        .flat_map(|r| r.equipment.iter().cloned())
        .collect();

    Json(EquipmentResponse {
        equipment: equipment.into_iter().collect(),
        method_preferences: METHOD_DESCRIPTIONS.into_iter().collect(),
    })
}

#[derive(Debug, Serialize)]
pub struct UserPreferencesResponse {
    pub favorites: Vec<Recipe>,
    pub preferences: Preferences,
}

/// GET /api/recipe/user-preferences
pub async fn user_preferences(State(state): State<AppState>) -> Json<UserPreferencesResponse> {
    Json(UserPreferencesResponse {
        favorites: state.catalog.favorites().into_iter().cloned().collect(),
        preferences: state.history.preferences().await,
    })
}

fn default_rating() -> i64 {
    3
}

#[derive(Debug, Deserialize, Validate)]
pub struct RateRecipeRequest {
    pub recipe_id: String,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5, message = "Must be between 1 and 5"))]
    pub rating: i64,
}

#[derive(Debug, Serialize)]
pub struct RateRecipeResponse {
    pub message: String,
    pub preferences: Preferences,
}

/// POST /api/recipe/rate-recipe
#[tracing::instrument(skip(state))]
pub async fn rate_recipe(
    State(state): State<AppState>,
    Json(payload): Json<RateRecipeRequest>,
) -> Result<Json<RateRecipeResponse>, AppError> {
    payload.validate()?;

    let recipe = state
        .catalog
        .find(&payload.recipe_id)
        .ok_or_else(|| RecipeError::NotFound(payload.recipe_id.clone()))?;

    let preferences = state.history.rate_recipe(recipe, payload.rating).await?;

    Ok(Json(RateRecipeResponse {
        message: "Recipe rating updated".to_string(),
        preferences,
    }))
}
