use std::{collections::HashSet, path::Path};

use serde::Deserialize;

use crate::error::{RecipeError, RecipeResult};
use crate::types::Recipe;

const BUILTIN_RECIPES: &str = include_str!("../../../data/recipes.json");

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<serde_json::Value>),
    Wrapped { recipes: Vec<serde_json::Value> },
}

/// Read-only collection of recipes loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Catalog bundled with the crate.
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_RECIPES) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(error = %e, "Built-in recipe catalog is unreadable");
                Self::default()
            }
        }
    }

    /// Load a catalog from disk.
    ///
    /// A missing or unreadable file yields an empty catalog so the rest of the
    /// service can keep running.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(catalog) => {
                tracing::info!(path = %path.display(), recipes = catalog.len(), "Recipe catalog loaded");
                catalog
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Recipe catalog unavailable, starting empty");
                Self::default()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> RecipeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a JSON array of recipes (or an object with a `recipes` array).
    ///
    /// Individual records that fail to deserialize or validate are skipped.
    pub fn from_json(content: &str) -> RecipeResult<Self> {
        let values = match serde_json::from_str::<CatalogFile>(content)? {
            CatalogFile::List(values) => values,
            CatalogFile::Wrapped { recipes } => recipes,
        };

        let mut seen_ids = HashSet::new();
        let mut recipes = Vec::with_capacity(values.len());

        for value in values {
            let recipe = match serde_json::from_value::<Recipe>(value) {
                Ok(recipe) => recipe,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed recipe record");
                    continue;
                }
            };

            if let Err(e) = recipe.validate() {
                tracing::warn!(error = %e, "Skipping invalid recipe record");
                continue;
            }

            if !recipe.id.is_empty() && !seen_ids.insert(recipe.id.clone()) {
                tracing::warn!(id = %recipe.id, "Skipping duplicate recipe id");
                continue;
            }

            recipes.push(recipe);
        }

        Ok(Self { recipes })
    }

    pub fn all(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Look up every id, preserving the caller's order.
    pub fn resolve(&self, ids: &[String]) -> RecipeResult<Vec<Recipe>> {
        ids.iter()
            .map(|id| {
                self.find(id)
                    .cloned()
                    .ok_or_else(|| RecipeError::NotFound(id.clone()))
            })
            .collect()
    }

    pub fn favorites(&self) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| r.is_favorite()).collect()
    }
}
