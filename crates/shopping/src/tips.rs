use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use weekplate_recipe::Recipe;

use crate::categorization::Department;
use crate::formatter::GroceryList;

const LARGE_LIST_THRESHOLD: usize = 20;

/// Equipment worth checking before the week's cooking starts.
pub fn equipment_reminders(recipes: &[Recipe]) -> Vec<String> {
    let mut needed: BTreeSet<&str> = BTreeSet::new();
    for recipe in recipes {
        needed.extend(recipe.equipment.iter().map(String::as_str));
        if let Some(method) = recipe.cooking_method.as_deref() {
            needed.insert(method);
        }
    }

    let mut reminders = Vec::new();
    if needed.contains("grill") {
        reminders.push("Check grill propane/charcoal levels".to_string());
    }
    if needed.contains("air_fryer") {
        reminders.push("Clean air fryer basket".to_string());
    }
    if needed.contains("instant_pot") {
        reminders.push("Ensure Instant Pot sealing ring is clean".to_string());
    }
    if needed.contains("sheet_pan") {
        reminders.push("Have parchment paper or cooking spray ready".to_string());
    }
    if needed.contains("oven") {
        reminders.push("Make sure the oven is free for preheating".to_string());
    }
    reminders
}

pub fn shopping_tips(recipes: &[Recipe], list: &GroceryList) -> Vec<String> {
    let mut tips = Vec::new();

    let proteins: HashSet<&str> = recipes.iter().filter_map(|r| r.protein.as_deref()).collect();
    if proteins.len() >= 3 {
        tips.push("You're buying multiple proteins - check for bulk discounts".to_string());
    }

    let mentions = |needle: &str| {
        list.items().any(|(_, item)| item.name.contains(needle))
            || recipes
                .iter()
                .filter_map(|r| r.vegetables.as_deref())
                .any(|v| v.to_lowercase().contains(needle))
    };
    if mentions("broccoli") && mentions("carrot") {
        tips.push("Consider buying pre-cut vegetable mix if available".to_string());
    }

    if recipes
        .iter()
        .any(|r| r.cooking_method.as_deref() == Some("grill"))
    {
        tips.push("Grilling this week - check for seasonal vegetable sales".to_string());
    }

    if list.item_count() > LARGE_LIST_THRESHOLD {
        tips.push("Large shopping list - consider using grocery pickup/delivery".to_string());
    }

    tips
}

impl Department {
    /// Rough per-item price in dollars.
    pub fn base_cost(&self) -> f64 {
        match self {
            Department::Produce => 3.0,
            Department::MeatSeafood => 8.0,
            Department::Dairy => 4.0,
            Department::Pantry => 2.0,
            Department::Frozen => 3.0,
            Department::Condiments => 3.0,
            Department::Spices => 2.0,
            Department::Other => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub low: f64,
    pub high: f64,
}

impl fmt::Display for CostEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.0} - ${:.0}", self.low, self.high)
    }
}

/// Ballpark cost: a department base price per item, half again for items
/// bought in quantities above two, spread to a 0.8x-1.5x range.
pub fn estimate_cost(list: &GroceryList) -> CostEstimate {
    list.items().fold(
        CostEstimate {
            low: 0.0,
            high: 0.0,
        },
        |acc, (department, item)| {
            let multiplier = if item.amount > 2.0 { 1.5 } else { 1.0 };
            let base = department.base_cost() * multiplier;
            CostEstimate {
                low: acc.low + base * 0.8,
                high: acc.high + base * 1.5,
            }
        },
    )
}
