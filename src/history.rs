use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;
use weekplate_recipe::Recipe;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("History file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub id: Uuid,
    pub week_date: String,
    pub recipe_ids: Vec<String>,
    pub recipe_names: Vec<String>,
    pub selected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryListRecord {
    pub id: Uuid,
    pub selection_id: Uuid,
    pub week_date: String,
    pub item_count: usize,
    pub estimated_cost: String,
    pub generated_at: DateTime<Utc>,
}

/// Rating totals per protein and cuisine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub favorite_proteins: BTreeMap<String, i64>,
    #[serde(default)]
    pub favorite_cuisines: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub selections: Vec<SelectionRecord>,
    #[serde(default)]
    pub grocery_lists: Vec<GroceryListRecord>,
    #[serde(default)]
    pub preferences: Preferences,
}

/// JSON file holding past selections, generated lists and preferences.
///
/// Every mutation rewrites the whole file while holding the lock, so
/// concurrent requests never interleave writes. The in-memory copy only
/// changes once the write succeeded.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    history: Mutex<History>,
}

impl HistoryStore {
    /// Open the store at `path`. A missing or unreadable file starts an empty
    /// history; the file is created on the first write.
    pub async fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let history = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "History file is malformed, starting empty");
                History::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => History::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "History file unreadable, starting empty");
                History::default()
            }
        };

        Self {
            path,
            history: Mutex::new(history),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> History {
        self.history.lock().await.clone()
    }

    /// Names of the most recently selected recipes, oldest first.
    pub async fn recent_selection_names(&self, limit: usize) -> Vec<String> {
        let history = self.history.lock().await;
        let names: Vec<String> = history
            .selections
            .iter()
            .flat_map(|s| s.recipe_names.iter().cloned())
            .collect();
        let skip = names.len().saturating_sub(limit);
        names.into_iter().skip(skip).collect()
    }

    /// Append the selection and the list generated from it.
    #[tracing::instrument(skip(self, recipes, estimated_cost))]
    pub async fn record_grocery_list(
        &self,
        week_date: &str,
        recipes: &[Recipe],
        item_count: usize,
        estimated_cost: String,
    ) -> Result<Uuid, HistoryError> {
        let now = Utc::now();
        let selection = SelectionRecord {
            id: Uuid::new_v4(),
            week_date: week_date.to_string(),
            recipe_ids: recipes.iter().map(|r| r.id.clone()).collect(),
            recipe_names: recipes.iter().map(|r| r.name.clone()).collect(),
            selected_at: now,
        };
        let list = GroceryListRecord {
            id: Uuid::new_v4(),
            selection_id: selection.id,
            week_date: week_date.to_string(),
            item_count,
            estimated_cost,
            generated_at: now,
        };
        let list_id = list.id;

        let mut history = self.history.lock().await;
        let mut updated = history.clone();
        updated.selections.push(selection);
        updated.grocery_lists.push(list);
        self.persist(&updated).await?;
        *history = updated;

        tracing::info!(list_id = %list_id, "Grocery list recorded in history");
        Ok(list_id)
    }

    /// Add `rating` to the recipe's protein and cuisine totals.
    pub async fn rate_recipe(&self, recipe: &Recipe, rating: i64) -> Result<Preferences, HistoryError> {
        let mut history = self.history.lock().await;
        let mut updated = history.clone();

        if let Some(protein) = &recipe.protein {
            *updated
                .preferences
                .favorite_proteins
                .entry(protein.clone())
                .or_default() += rating;
        }
        if let Some(cuisine) = &recipe.cuisine {
            *updated
                .preferences
                .favorite_cuisines
                .entry(cuisine.clone())
                .or_default() += rating;
        }

        self.persist(&updated).await?;
        *history = updated;
        Ok(history.preferences.clone())
    }

    pub async fn preferences(&self) -> Preferences {
        self.history.lock().await.preferences.clone()
    }

    async fn persist(&self, history: &History) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(history)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
