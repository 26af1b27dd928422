pub mod catalog;
pub mod error;
pub mod overlap;
pub mod suggestion;
pub mod types;

pub use catalog::RecipeCatalog;
pub use error::{RecipeError, RecipeResult};
pub use overlap::{IngredientOverlap, calculate_ingredient_overlap};
pub use suggestion::{
    Suggestion, SuggestionContext, SuggestionSummary, WeeklySuggestions,
    generate_weekly_suggestions, update_after_selection,
};
pub use types::Recipe;
