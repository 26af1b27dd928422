use std::collections::BTreeMap;

use fraction::Fraction;
use serde::{Deserialize, Serialize};

use crate::categorization::{Categorizer, Department};
use crate::consolidation::ConsolidatedEntry;
use crate::fraction_utils::{format_quantity, nearest_fraction};
use crate::units::CanonicalUnit;

const MAX_DENOMINATOR: u64 = 16;
const FRACTION_TOLERANCE: f64 = 0.01;

/// Render a quantity for a shopping list.
///
/// Whole numbers print as integers, values within 0.01 of a fraction with
/// denominator up to 16 print as that fraction ("1 1/2"), anything else
/// keeps one decimal.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    if (value - value.round()).abs() < 1e-9 {
        return format!("{}", value.round() as i64);
    }

    let (numer, denom) = nearest_fraction(value, MAX_DENOMINATOR);
    if (value - numer as f64 / denom as f64).abs() < FRACTION_TOLERANCE {
        return format_quantity(Fraction::new(numer, denom));
    }

    format!("{:.1}", value)
}

/// Round `quantity` to an amount a store sells.
///
/// Cups and pounds go to the nearest quarter, counts and merged mixed units
/// to a whole number. Never less than one step.
pub fn purchasable_amount(quantity: f64, unit: Option<&CanonicalUnit>) -> f64 {
    let step = match unit {
        Some(CanonicalUnit::Cups | CanonicalUnit::Pounds) => 0.25,
        Some(CanonicalUnit::Count(_)) | None => 1.0,
    };
    ((quantity / step).round() * step).max(step)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub name: String,
    /// Display text such as "1 1/2 cups".
    pub quantity: String,
    pub amount: f64,
    pub unit: String,
    pub original_entries: Vec<String>,
    pub recipes: Vec<String>,
}

impl GroceryItem {
    pub fn from_entry(entry: ConsolidatedEntry) -> Self {
        let quantity = format!(
            "{} {}",
            format_amount(entry.total_quantity),
            entry.display_unit()
        )
        .trim()
        .to_string();

        Self {
            name: entry.name,
            quantity,
            amount: entry.total_quantity,
            unit: entry.unit,
            original_entries: entry.original_entries,
            recipes: entry.recipes,
        }
    }
}

/// Items grouped by department.
///
/// Departments iterate (and serialize) in shopping order; items within a
/// department are sorted by name. Empty departments are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroceryList {
    departments: BTreeMap<Department, Vec<GroceryItem>>,
}

impl GroceryList {
    pub fn build(entries: Vec<ConsolidatedEntry>, categorizer: &Categorizer) -> Self {
        let mut departments: BTreeMap<Department, Vec<GroceryItem>> = BTreeMap::new();

        for entry in entries {
            let department = categorizer.department(&entry.name);
            departments
                .entry(department)
                .or_default()
                .push(GroceryItem::from_entry(entry));
        }

        for items in departments.values_mut() {
            items.sort_by(|a, b| a.name.cmp(&b.name));
        }

        Self { departments }
    }

    pub fn departments(&self) -> impl Iterator<Item = (Department, &[GroceryItem])> {
        self.departments
            .iter()
            .map(|(department, items)| (*department, items.as_slice()))
    }

    pub fn get(&self, department: Department) -> &[GroceryItem] {
        self.departments
            .get(&department)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn items(&self) -> impl Iterator<Item = (Department, &GroceryItem)> {
        self.departments
            .iter()
            .flat_map(|(department, items)| items.iter().map(move |item| (*department, item)))
    }

    /// Department holding `name`, if listed.
    pub fn department_of(&self, name: &str) -> Option<Department> {
        self.items()
            .find(|(_, item)| item.name == name)
            .map(|(department, _)| department)
    }

    pub fn item_count(&self) -> usize {
        self.departments.values().map(Vec::len).sum()
    }

    pub fn department_count(&self) -> usize {
        self.departments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }
}
