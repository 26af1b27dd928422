use std::collections::{BTreeMap, HashMap, HashSet};

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::catalog::RecipeCatalog;
use crate::types::Recipe;

/// Selections older than this many entries are forgotten.
pub const RECENT_SELECTION_WINDOW: usize = 20;

/// Per-call planning context.
///
/// Callers own the selection history and pass it in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionContext {
    #[serde(default)]
    pub recent_selections: Vec<String>,
    pub max_per_protein: usize,
    pub max_per_cuisine: usize,
}

impl Default for SuggestionContext {
    fn default() -> Self {
        Self {
            recent_selections: Vec::new(),
            max_per_protein: 3,
            max_per_cuisine: 4,
        }
    }
}

impl SuggestionContext {
    pub fn with_recent(recent_selections: Vec<String>) -> Self {
        let mut ctx = Self::default();
        ctx.remember(recent_selections);
        ctx
    }

    /// Append selected recipe names, keeping only the most recent ones.
    pub fn remember<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recent_selections
            .extend(names.into_iter().map(Into::into));
        let overflow = self
            .recent_selections
            .len()
            .saturating_sub(RECENT_SELECTION_WINDOW);
        self.recent_selections.drain(..overflow);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggestion_number: usize,
    #[serde(flatten)]
    pub recipe: Recipe,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionSummary {
    pub total_count: usize,
    pub protein_variety: BTreeMap<String, usize>,
    pub cuisine_variety: BTreeMap<String, usize>,
    pub cooking_methods: BTreeMap<String, usize>,
}

impl SuggestionSummary {
    pub fn from_recipes<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Self {
        let mut summary = Self::default();
        for recipe in recipes {
            summary.total_count += 1;
            *summary
                .protein_variety
                .entry(recipe.protein_key().to_string())
                .or_default() += 1;
            *summary
                .cuisine_variety
                .entry(recipe.cuisine_key().to_string())
                .or_default() += 1;
            *summary
                .cooking_methods
                .entry(recipe.cooking_method_key().to_string())
                .or_default() += 1;
        }
        summary
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySuggestions {
    pub suggestions: Vec<Suggestion>,
    pub summary: SuggestionSummary,
}

/// Build a varied list of `count` suggestions from the catalog.
///
/// Recently selected recipes are skipped when enough others remain. A first
/// pass over the shuffled pool honors the protein and cuisine caps; a second
/// pass fills any free slots from what is left.
///
/// The same `seed` over the same catalog and context yields the same list.
#[tracing::instrument(skip(catalog, ctx), fields(catalog_size = catalog.len()))]
pub fn generate_weekly_suggestions(
    catalog: &RecipeCatalog,
    count: usize,
    ctx: &SuggestionContext,
    seed: Option<u64>,
) -> WeeklySuggestions {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut pool: Vec<&Recipe> = catalog.all().iter().collect();

    if !ctx.recent_selections.is_empty() {
        let recent: HashSet<&str> = ctx.recent_selections.iter().map(String::as_str).collect();
        let fresh: Vec<&Recipe> = pool
            .iter()
            .copied()
            .filter(|r| !recent.contains(r.name.as_str()))
            .collect();
        if fresh.len() >= count {
            pool = fresh;
        } else {
            tracing::debug!(
                fresh = fresh.len(),
                count,
                "Not enough unseen recipes, keeping recent selections in the pool"
            );
        }
    }

    pool.shuffle(&mut rng);

    let mut selected: Vec<&Recipe> = Vec::with_capacity(count);
    let mut taken = vec![false; pool.len()];
    let mut protein_counts: HashMap<&str, usize> = HashMap::new();
    let mut cuisine_counts: HashMap<&str, usize> = HashMap::new();

    for (idx, recipe) in pool.iter().enumerate() {
        if selected.len() >= count {
            break;
        }

        let protein = protein_counts.entry(recipe.protein_key()).or_default();
        let cuisine = cuisine_counts.entry(recipe.cuisine_key()).or_default();

        if *protein < ctx.max_per_protein && *cuisine < ctx.max_per_cuisine {
            *protein += 1;
            *cuisine += 1;
            taken[idx] = true;
            selected.push(recipe);
        }
    }

    if selected.len() < count {
        let mut remaining: Vec<&Recipe> = pool
            .iter()
            .zip(&taken)
            .filter(|(_, taken)| !**taken)
            .map(|(recipe, _)| *recipe)
            .collect();
        remaining.shuffle(&mut rng);
        let missing = count - selected.len();
        selected.extend(remaining.into_iter().take(missing));
    }

    let summary = SuggestionSummary::from_recipes(selected.iter().copied());
    let suggestions = number(selected.into_iter().cloned());

    tracing::info!(
        suggestions = suggestions.len(),
        proteins = summary.protein_variety.len(),
        cuisines = summary.cuisine_variety.len(),
        "Weekly suggestions generated"
    );

    WeeklySuggestions {
        suggestions,
        summary,
    }
}

/// Remaining suggestions once `selected` has been picked.
///
/// The selected recipe is dropped and at most two recipes per protein are
/// kept, counting the selected one. Suggestions are renumbered from 1.
pub fn update_after_selection(selected: &Recipe, remaining: Vec<Recipe>) -> Vec<Suggestion> {
    let mut protein_counts: HashMap<String, usize> = HashMap::new();
    protein_counts.insert(selected.protein_key().to_string(), 1);

    let kept = remaining
        .into_iter()
        .filter(|r| r.name != selected.name)
        .filter(|r| {
            let count = protein_counts.entry(r.protein_key().to_string()).or_default();
            if *count < 2 {
                *count += 1;
                true
            } else {
                false
            }
        });

    number(kept)
}

fn number(recipes: impl IntoIterator<Item = Recipe>) -> Vec<Suggestion> {
    recipes
        .into_iter()
        .enumerate()
        .map(|(i, recipe)| Suggestion {
            suggestion_number: i + 1,
            recipe,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, protein: &str, cuisine: &str) -> Recipe {
        Recipe {
            id: name.to_lowercase().replace(' ', "-"),
            protein: Some(protein.to_string()),
            cuisine: Some(cuisine.to_string()),
            cooking_method: Some("stove".to_string()),
            ..Recipe::new(name, vec![])
        }
    }

    fn varied_catalog() -> RecipeCatalog {
        let proteins = ["chicken", "beef", "salmon", "pork", "shrimp", "turkey"];
        let cuisines = ["asian", "italian", "mexican", "american", "thai"];
        let mut recipes = Vec::new();
        for (i, protein) in proteins.iter().enumerate() {
            for j in 0..5 {
                let cuisine = cuisines[(i + j) % cuisines.len()];
                recipes.push(recipe(&format!("{protein} dish {j}"), protein, cuisine));
            }
        }
        RecipeCatalog::new(recipes)
    }

    #[test]
    fn test_suggestions_respect_caps() {
        let catalog = varied_catalog();
        let result = generate_weekly_suggestions(&catalog, 12, &SuggestionContext::default(), Some(7));

        assert_eq!(result.suggestions.len(), 12);
        for (protein, count) in &result.summary.protein_variety {
            assert!(*count <= 3, "protein {protein} appears {count} times");
        }
        for (cuisine, count) in &result.summary.cuisine_variety {
            assert!(*count <= 4, "cuisine {cuisine} appears {count} times");
        }
    }

    #[test]
    fn test_suggestions_fill_when_caps_too_tight() {
        let recipes = (0..8)
            .map(|i| recipe(&format!("chicken {i}"), "chicken", "asian"))
            .collect();
        let catalog = RecipeCatalog::new(recipes);

        let result = generate_weekly_suggestions(&catalog, 6, &SuggestionContext::default(), Some(1));

        assert_eq!(result.suggestions.len(), 6, "second pass should fill free slots");
        let names: HashSet<_> = result.suggestions.iter().map(|s| &s.recipe.name).collect();
        assert_eq!(names.len(), 6, "no recipe should be suggested twice");
    }

    #[test]
    fn test_suggestions_are_numbered_from_one() {
        let catalog = varied_catalog();
        let result = generate_weekly_suggestions(&catalog, 5, &SuggestionContext::default(), Some(3));
        let numbers: Vec<_> = result.suggestions.iter().map(|s| s.suggestion_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_same_seed_same_suggestions() {
        let catalog = varied_catalog();
        let ctx = SuggestionContext::default();
        let a = generate_weekly_suggestions(&catalog, 10, &ctx, Some(42));
        let b = generate_weekly_suggestions(&catalog, 10, &ctx, Some(42));

        let names_a: Vec<_> = a.suggestions.iter().map(|s| s.recipe.name.clone()).collect();
        let names_b: Vec<_> = b.suggestions.iter().map(|s| s.recipe.name.clone()).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn test_recent_selections_are_skipped() {
        let catalog = varied_catalog();
        let recent = vec!["chicken dish 0".to_string(), "beef dish 1".to_string()];
        let ctx = SuggestionContext::with_recent(recent.clone());

        let result = generate_weekly_suggestions(&catalog, 10, &ctx, Some(9));

        assert!(
            result
                .suggestions
                .iter()
                .all(|s| !recent.contains(&s.recipe.name))
        );
    }

    #[test]
    fn test_recent_selections_kept_when_pool_too_small() {
        let catalog = RecipeCatalog::new(vec![
            recipe("A", "chicken", "asian"),
            recipe("B", "beef", "italian"),
        ]);
        let ctx = SuggestionContext::with_recent(vec!["A".to_string()]);

        let result = generate_weekly_suggestions(&catalog, 2, &ctx, Some(0));
        assert_eq!(result.suggestions.len(), 2);
    }

    #[test]
    fn test_remember_keeps_last_twenty() {
        let mut ctx = SuggestionContext::default();
        ctx.remember((0..25).map(|i| format!("recipe {i}")));

        assert_eq!(ctx.recent_selections.len(), RECENT_SELECTION_WINDOW);
        assert_eq!(ctx.recent_selections[0], "recipe 5");
        assert_eq!(ctx.recent_selections[19], "recipe 24");
    }

    #[test]
    fn test_update_after_selection_limits_protein() {
        let selected = recipe("Chicken Curry", "chicken", "indian");
        let remaining = vec![
            recipe("Chicken Curry", "chicken", "indian"),
            recipe("Chicken Tacos", "chicken", "mexican"),
            recipe("Chicken Soup", "chicken", "american"),
            recipe("Beef Stew", "beef", "american"),
            recipe("Beef Tacos", "beef", "mexican"),
            recipe("Beef Bowl", "beef", "asian"),
        ];

        let updated = update_after_selection(&selected, remaining);
        let names: Vec<_> = updated.iter().map(|s| s.recipe.name.as_str()).collect();

        assert_eq!(names, vec!["Chicken Tacos", "Beef Stew", "Beef Tacos"]);
        assert_eq!(updated[2].suggestion_number, 3);
    }

    #[test]
    fn test_summary_distributions() {
        let recipes = [
            recipe("A", "chicken", "asian"),
            recipe("B", "chicken", "thai"),
            recipe("C", "beef", "asian"),
        ];
        let summary = SuggestionSummary::from_recipes(recipes.iter());

        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.protein_variety["chicken"], 2);
        assert_eq!(summary.cuisine_variety["asian"], 2);
        assert_eq!(summary.cooking_methods["stove"], 3);
    }
}
