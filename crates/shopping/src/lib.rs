pub mod categorization;
pub mod commands;
pub mod consolidation;
pub mod formatter;
pub mod fraction_utils;
pub mod markdown;
pub mod parser;
pub mod tips;
pub mod units;

// Re-export commonly used types
pub use categorization::{Categorizer, Department};
pub use commands::{
    GroceryOptions, GroceryReport, GroceryStatistics, RecipeSummary, ShoppingListError,
    generate_grocery_list,
};
pub use consolidation::{ConsolidatedEntry, Consolidator, MixedUnitPolicy, consolidate};
pub use formatter::{GroceryItem, GroceryList, format_amount, purchasable_amount};
pub use markdown::render_markdown;
pub use parser::{ParsedIngredient, parse_ingredient};
pub use tips::CostEstimate;
pub use units::{CanonicalUnit, normalize_unit};
