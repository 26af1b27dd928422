use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use weekplate_recipe::RecipeCatalog;
use weekplate_shopping::Categorizer;

use crate::config::Config;
use crate::history::HistoryStore;

mod grocery;
mod health;
mod recipes;
mod suggestions;

pub use grocery::{GroceryListRequest, GroceryListResponse, OverlapRequest};
pub use recipes::RateRecipeRequest;
pub use suggestions::{SuggestionsQuery, UpdateSuggestionsRequest};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<RecipeCatalog>,
    pub categorizer: Arc<Categorizer>,
    pub history: Arc<HistoryStore>,
}

impl AppState {
    /// Load the catalog, keyword table and history named by `config`.
    pub async fn from_config(config: Config) -> Self {
        let catalog = match &config.data.recipes_path {
            Some(path) => RecipeCatalog::load(path),
            None => RecipeCatalog::builtin(),
        };
        let categorizer = match &config.data.departments_path {
            Some(path) => Categorizer::from_path(path),
            None => Categorizer::builtin(),
        };
        let history = HistoryStore::open(&config.data.history_path).await;

        tracing::info!(
            recipes = catalog.len(),
            history = %history.path().display(),
            "Application state loaded"
        );

        Self {
            config,
            catalog: Arc::new(catalog),
            categorizer: Arc::new(categorizer),
            history: Arc::new(history),
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/weekly-suggestions", get(suggestions::weekly_suggestions))
        .route("/update-suggestions", post(suggestions::update_suggestions))
        .route("/ingredient-overlap", post(grocery::ingredient_overlap))
        .route("/grocery-list", post(grocery::grocery_list))
        .route("/recipe/{id}", get(recipes::recipe_details))
        .route("/cooking-equipment", get(recipes::cooking_equipment))
        .route("/user-preferences", get(recipes::user_preferences))
        .route("/rate-recipe", post(recipes::rate_recipe));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/recipe", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
