use serde::{Deserialize, Serialize};

use crate::error::{RecipeError, RecipeResult};

/// A dinner recipe as stored in the catalog or posted by a client.
///
/// Only `name` and `ingredients` are needed to build a grocery list; the
/// descriptive fields drive suggestion variety, equipment reminders and
/// shopping tips and may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegetables: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starch: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, ingredients: Vec<&str>) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.into_iter().map(str::to_owned).collect(),
            ..Default::default()
        }
    }

    /// Reject records that cannot take part in planning.
    ///
    /// Ingredient text itself is never validated here: malformed lines are
    /// handled downstream by best-effort parsing.
    pub fn validate(&self) -> RecipeResult<()> {
        if self.name.trim().is_empty() {
            return Err(RecipeError::ValidationError(
                "recipe name must not be empty".to_string(),
            ));
        }

        if self.prep_time.is_some_and(|t| t > 24 * 60) || self.cook_time.is_some_and(|t| t > 24 * 60)
        {
            return Err(RecipeError::ValidationError(format!(
                "recipe '{}' has an unrealistic preparation or cooking time",
                self.name
            )));
        }

        Ok(())
    }

    pub fn total_time(&self) -> Option<u32> {
        match (self.prep_time, self.cook_time) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0) + cook.unwrap_or(0)),
        }
    }

    /// Protein label used for frequency caps; recipes without one share "unknown".
    pub fn protein_key(&self) -> &str {
        self.protein.as_deref().unwrap_or("unknown")
    }

    pub fn cuisine_key(&self) -> &str {
        self.cuisine.as_deref().unwrap_or("unknown")
    }

    pub fn cooking_method_key(&self) -> &str {
        self.cooking_method.as_deref().unwrap_or("stove")
    }

    pub fn is_favorite(&self) -> bool {
        self.source.as_deref() == Some("user_favorite")
    }
}
