use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;
use weekplate_recipe::{
    Recipe, Suggestion, SuggestionContext, WeeklySuggestions, generate_weekly_suggestions,
    suggestion::RECENT_SELECTION_WINDOW, update_after_selection,
};

use crate::error::AppError;
use crate::routes::AppState;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SuggestionsQuery {
    #[validate(range(min = 1, max = 100, message = "Must be between 1 and 100"))]
    pub count: Option<usize>,
    /// Fixed seed for a reproducible list
    pub seed: Option<u64>,
}

/// GET /api/recipe/weekly-suggestions
///
/// Recipes picked in recent grocery lists are left out while the catalog
/// has enough others.
#[tracing::instrument(skip(state))]
pub async fn weekly_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<WeeklySuggestions>, AppError> {
    query.validate()?;

    let planning = &state.config.planning;
    let count = query.count.unwrap_or(planning.suggestion_count);

    let ctx = SuggestionContext {
        recent_selections: state
            .history
            .recent_selection_names(RECENT_SELECTION_WINDOW)
            .await,
        max_per_protein: planning.max_per_protein,
        max_per_cuisine: planning.max_per_cuisine,
    };

    let suggestions = generate_weekly_suggestions(&state.catalog, count, &ctx, query.seed);
    Ok(Json(suggestions))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSuggestionsRequest {
    pub selected_recipe: Recipe,
    #[serde(default)]
    pub remaining_suggestions: Vec<Recipe>,
}

#[derive(Debug, Serialize)]
pub struct UpdateSuggestionsResponse {
    pub updated_suggestions: Vec<Suggestion>,
}

/// POST /api/recipe/update-suggestions
pub async fn update_suggestions(
    Json(payload): Json<UpdateSuggestionsRequest>,
) -> Result<Json<UpdateSuggestionsResponse>, AppError> {
    payload.selected_recipe.validate()?;

    let updated_suggestions =
        update_after_selection(&payload.selected_recipe, payload.remaining_suggestions);

    tracing::debug!(
        selected = %payload.selected_recipe.name,
        remaining = updated_suggestions.len(),
        "Suggestions updated after selection"
    );

    Ok(Json(UpdateSuggestionsResponse {
        updated_suggestions,
    }))
}
