use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parser::ParsedIngredient;
use crate::units::{CanonicalUnit, normalize_unit};

static PARENTHETICAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// Multi-word descriptors, removed before single words are filtered.
static DESCRIPTOR_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(extra[ -]virgin|to taste|for garnish|for serving|as needed)\b").unwrap()
});

const DESCRIPTORS: &[&str] = &[
    "fresh", "freshly", "dried", "chopped", "diced", "sliced", "minced", "crushed", "cubed",
    "whole", "large", "medium", "small", "boneless", "skinless", "trimmed", "cooked", "uncooked",
    "raw", "organic", "free-range", "salted", "unsalted", "juiced", "finely", "thinly", "roughly",
];

static EQUIVALENTS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("chicken breasts", "chicken breast"),
        ("chicken thigh", "chicken thighs"),
        ("bell peppers", "bell pepper"),
        ("sweet peppers", "bell pepper"),
        ("sweet pepper", "bell pepper"),
        ("sugar snap peas", "snap peas"),
        ("snow peas", "snap peas"),
        ("evoo", "olive oil"),
        ("cherry tomato", "cherry tomatoes"),
        ("green onions", "scallions"),
        ("green onion", "scallions"),
        ("scallion", "scallions"),
        ("sweet potato", "sweet potatoes"),
        ("onions", "onion"),
        ("carrot", "carrots"),
        ("lemons", "lemon"),
        ("limes", "lime"),
        ("eggs", "egg"),
        ("garlic cloves", "garlic"),
        ("cilantro leaves", "cilantro"),
        ("zucchinis", "zucchini"),
        ("mushroom", "mushrooms"),
    ])
});

/// Grouping key for an ingredient name.
///
/// Lower-cases, drops anything after the first comma and any parenthesized
/// note, strips preparation descriptors and maps known synonyms, so that
/// "Onion, diced" and "onion" share a key.
pub fn normalize_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let head = lower.split(',').next().unwrap_or_default();
    let without_notes = PARENTHETICAL_RE.replace_all(head, " ");
    let without_phrases = DESCRIPTOR_PHRASE_RE.replace_all(&without_notes, " ");

    let cleaned = without_phrases
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c == '.' || c == ';' || c == ':'))
        .filter(|w| !w.is_empty() && !DESCRIPTORS.contains(w))
        .collect::<Vec<_>>()
        .join(" ");

    match EQUIVALENTS.get(cleaned.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => cleaned,
    }
}

/// What to do when the same ingredient shows up in units that do not convert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedUnitPolicy {
    /// Add the raw numbers and join the unit labels ("2 cloves" + "1 cup" →
    /// "3 cloves, cups"). Imprecise across unit systems.
    #[default]
    Combine,
    /// Keep one line item per (name, canonical unit).
    Separate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedEntry {
    pub name: String,
    pub total_quantity: f64,
    /// Canonical unit label, or a comma-joined list after a mixed-unit merge.
    pub unit: String,
    /// `None` once incompatible units were merged.
    #[serde(skip)]
    pub canonical: Option<CanonicalUnit>,
    pub original_entries: Vec<String>,
    pub recipes: Vec<String>,
}

impl ConsolidatedEntry {
    /// Unit text to show next to `total_quantity`.
    pub fn display_unit(&self) -> String {
        match &self.canonical {
            Some(unit) => unit.display(self.total_quantity),
            None => self.unit.clone(),
        }
    }

    fn record_source(&mut self, original: &str, recipe: Option<&str>) {
        self.original_entries.push(original.to_string());
        if let Some(recipe) = recipe {
            if !self.recipes.iter().any(|r| r == recipe) {
                self.recipes.push(recipe.to_string());
            }
        }
    }
}

/// Accumulates parsed ingredients into one entry per normalized name.
#[derive(Debug, Default)]
pub struct Consolidator {
    policy: MixedUnitPolicy,
    entries: Vec<ConsolidatedEntry>,
    index: HashMap<String, usize>,
    lines: usize,
}

impl Consolidator {
    pub fn new(policy: MixedUnitPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Number of ingredient lines added so far.
    pub fn line_count(&self) -> usize {
        self.lines
    }

    pub fn add(&mut self, parsed: &ParsedIngredient, recipe: Option<&str>) {
        self.lines += 1;

        let mut name = normalize_name(&parsed.name);
        if name.is_empty() {
            name = parsed.name.trim().to_lowercase();
        }

        let raw_quantity = parsed.amount();
        let (canonical, quantity) = normalize_unit(&parsed.unit, raw_quantity);

        let key = match self.policy {
            MixedUnitPolicy::Combine => name.clone(),
            MixedUnitPolicy::Separate => format!("{}\u{1f}{}", name, canonical.label()),
        };

        let Some(&idx) = self.index.get(&key) else {
            let mut entry = ConsolidatedEntry {
                name,
                total_quantity: quantity,
                unit: canonical.label().to_string(),
                canonical: Some(canonical),
                original_entries: Vec::new(),
                recipes: Vec::new(),
            };
            entry.record_source(&parsed.original, recipe);
            self.index.insert(key, self.entries.len());
            self.entries.push(entry);
            return;
        };

        let entry = &mut self.entries[idx];
        if entry.canonical.as_ref() == Some(&canonical) {
            entry.total_quantity += quantity;
        } else {
            tracing::debug!(
                ingredient = %entry.name,
                existing = %entry.unit,
                incoming = %canonical,
                "Combining incompatible units"
            );
            entry.total_quantity += raw_quantity;
            if !entry.unit.split(", ").any(|u| u == canonical.label()) {
                entry.unit = format!("{}, {}", entry.unit, canonical.label());
            }
            entry.canonical = None;
        }
        entry.record_source(&parsed.original, recipe);
    }

    /// Entries in first-seen order.
    pub fn finish(self) -> Vec<ConsolidatedEntry> {
        self.entries
    }
}

/// Consolidate `(recipe name, ingredient line)` pairs in one go.
pub fn consolidate<'a>(
    lines: impl IntoIterator<Item = (&'a str, &'a ParsedIngredient)>,
    policy: MixedUnitPolicy,
) -> Vec<ConsolidatedEntry> {
    let mut consolidator = Consolidator::new(policy);
    for (recipe, parsed) in lines {
        consolidator.add(parsed, Some(recipe));
    }
    consolidator.finish()
}
