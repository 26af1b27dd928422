use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

const BUILTIN_DEPARTMENTS: &str = include_str!("../../../data/departments.json");

/// Grocery store section, declared in shopping order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Produce,
    MeatSeafood,
    Dairy,
    Pantry,
    Frozen,
    Condiments,
    Spices,
    Other,
}

impl Department {
    pub const SHOPPING_ORDER: [Department; 8] = [
        Department::Produce,
        Department::MeatSeafood,
        Department::Dairy,
        Department::Pantry,
        Department::Frozen,
        Department::Condiments,
        Department::Spices,
        Department::Other,
    ];

    /// Keyword lists are tried in this order; the first hit wins.
    pub const MATCH_ORDER: [Department; 7] = [
        Department::Frozen,
        Department::Spices,
        Department::Condiments,
        Department::Pantry,
        Department::MeatSeafood,
        Department::Produce,
        Department::Dairy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Produce => "produce",
            Department::MeatSeafood => "meat_seafood",
            Department::Dairy => "dairy",
            Department::Pantry => "pantry",
            Department::Frozen => "frozen",
            Department::Condiments => "condiments",
            Department::Spices => "spices",
            Department::Other => "other",
        }
    }

    /// Heading text, e.g. "Meat Seafood".
    pub fn title(&self) -> String {
        title_case(self.as_str())
    }
}

/// "air_fryer" → "Air Fryer"
pub fn title_case(value: &str) -> String {
    value
        .split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps normalized ingredient names to departments by keyword lookup.
///
/// Approximate: a department matches when one of its keywords occurs in the
/// name or the name occurs in a keyword, and departments are tried in
/// [`Department::MATCH_ORDER`]. "chicken broth" lands in pantry because pantry
/// is checked before meat.
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    keywords: Vec<(Department, Vec<String>)>,
}

impl Categorizer {
    /// Categorizer over the keyword table bundled with the crate.
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_DEPARTMENTS) {
            Ok(categorizer) => categorizer,
            Err(e) => {
                tracing::error!(error = %e, "Built-in department keywords are unreadable");
                Self::default()
            }
        }
    }

    /// Load keywords from a JSON file of `{"department": ["keyword", ...]}`.
    ///
    /// A missing or malformed file leaves the categorizer empty, which files
    /// every ingredient under "other".
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let result = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::from_json(&content).map_err(|e| e.to_string()));

        match result {
            Ok(categorizer) => categorizer,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Department keywords unavailable, every ingredient will be filed under other"
                );
                Self::default()
            }
        }
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let table: HashMap<Department, Vec<String>> = serde_json::from_str(content)?;
        Ok(Self::from_table(table))
    }

    pub fn from_table(mut table: HashMap<Department, Vec<String>>) -> Self {
        let keywords = Department::MATCH_ORDER
            .iter()
            .filter_map(|department| {
                table.remove(department).map(|words| {
                    let words = words
                        .into_iter()
                        .map(|w| w.trim().to_lowercase())
                        .filter(|w| !w.is_empty())
                        .collect();
                    (*department, words)
                })
            })
            .collect();

        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.iter().all(|(_, words)| words.is_empty())
    }

    pub fn department(&self, ingredient_name: &str) -> Department {
        let name = ingredient_name.trim().to_lowercase();
        if name.is_empty() {
            return Department::Other;
        }

        self.keywords
            .iter()
            .find(|(_, words)| {
                words
                    .iter()
                    .any(|w| name.contains(w.as_str()) || w.contains(name.as_str()))
            })
            .map(|(department, _)| *department)
            .unwrap_or(Department::Other)
    }
}
