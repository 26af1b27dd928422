use std::fmt::{self, Write};

use weekplate_recipe::{Recipe, calculate_ingredient_overlap};

use crate::categorization::title_case;
use crate::commands::GroceryReport;

/// Printable checklist for the week, grouped by department.
pub fn render_markdown(report: &GroceryReport, recipes: &[Recipe], week_of: &str) -> String {
    let mut out = String::new();
    if let Err(e) = write_report(&mut out, report, recipes, week_of) {
        tracing::error!(error = %e, "Grocery list markdown incomplete");
    }
    out
}

fn write_report(
    out: &mut String,
    report: &GroceryReport,
    recipes: &[Recipe],
    week_of: &str,
) -> fmt::Result {
    writeln!(out, "# Weekly Grocery List")?;
    writeln!(out, "**Week of:** {week_of}")?;
    writeln!(out, "**Total Recipes:** {}", report.statistics.total_recipes)?;
    writeln!(out, "**Estimated Cost:** {}", report.estimated_cost)?;
    writeln!(out)?;

    writeln!(out, "## This Week's Dinner Menu")?;
    writeln!(out)?;
    for (i, recipe) in recipes.iter().enumerate() {
        writeln!(out, "### {}. {}", i + 1, recipe.name)?;
        writeln!(
            out,
            "**Method:** {} | **Protein:** {}",
            title_case(recipe.cooking_method_key()),
            title_case(recipe.protein_key())
        )?;
        if let Some(vegetables) = &recipe.vegetables {
            writeln!(out, "**Vegetables:** {vegetables}")?;
        }
        if let Some(starch) = &recipe.starch {
            writeln!(out, "**Starch:** {starch}")?;
        }
        if let Some(url) = &recipe.url {
            writeln!(out, "**Recipe:** {url}")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Shopping List by Department")?;
    writeln!(out)?;
    for (department, items) in report.grocery_list.departments() {
        writeln!(out, "### {}", department.title())?;
        for item in items {
            writeln!(out, "- [ ] **{} {}**", item.quantity, item.name)?;
            if item.recipes.len() > 1 {
                writeln!(out, "  *Used in: {}*", item.recipes.join(", "))?;
            }
        }
        writeln!(out)?;
    }

    if !report.equipment_reminders.is_empty() {
        writeln!(out, "## Equipment Reminders")?;
        for reminder in &report.equipment_reminders {
            writeln!(out, "- {reminder}")?;
        }
        writeln!(out)?;
    }

    if !report.shopping_tips.is_empty() {
        writeln!(out, "## Shopping Tips")?;
        for tip in &report.shopping_tips {
            writeln!(out, "- {tip}")?;
        }
        writeln!(out)?;
    }

    if let Ok(overlap) = calculate_ingredient_overlap(recipes) {
        writeln!(out, "## Ingredient Efficiency")?;
        writeln!(
            out,
            "- **Shared ingredients:** {}",
            overlap.shared_ingredients.len()
        )?;
        writeln!(
            out,
            "- **Total unique ingredients:** {}",
            overlap.total_unique_ingredients
        )?;
        writeln!(
            out,
            "- **Efficiency score:** {}/10",
            overlap.efficiency_score
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorization::Categorizer;
    use crate::commands::{GroceryOptions, generate_grocery_list};

    fn recipes() -> Vec<Recipe> {
        let mut first = Recipe::new("Grilled Steak", vec!["1 lb beef sirloin", "1 cup jasmine rice"]);
        first.cooking_method = Some("grill".to_string());
        first.protein = Some("beef".to_string());
        first.vegetables = Some("asparagus".to_string());
        first.url = Some("https://example.com/steak".to_string());

        vec![
            first,
            Recipe::new("Chicken Rice", vec!["1 lb chicken breast", "1 cup jasmine rice"]),
            Recipe::new("Shrimp Tacos", vec!["1 lb shrimp", "8 tortillas"]),
            Recipe::new("Veggie Curry", vec!["1 can coconut milk", "2 tbsp red curry paste"]),
        ]
    }

    #[test]
    fn test_render_markdown_sections() {
        let recipes = recipes();
        let report =
            generate_grocery_list(&recipes, &GroceryOptions::default(), &Categorizer::builtin())
                .unwrap();

        let markdown = render_markdown(&report, &recipes, "2026-10-19");

        assert!(markdown.starts_with("# Weekly Grocery List\n"));
        assert!(markdown.contains("**Week of:** 2026-10-19"));
        assert!(markdown.contains("### 1. Grilled Steak"));
        assert!(markdown.contains("**Method:** Grill | **Protein:** Beef"));
        assert!(markdown.contains("**Method:** Stove | **Protein:** Unknown"));
        assert!(markdown.contains("**Recipe:** https://example.com/steak"));
        assert!(markdown.contains("### Meat Seafood"));
        assert!(markdown.contains("- [ ] **2 cups jasmine rice**"));
        assert!(markdown.contains("  *Used in: Grilled Steak, Chicken Rice*"));
        assert!(markdown.contains("## Equipment Reminders"));
        assert!(markdown.contains("## Ingredient Efficiency"));
        assert!(markdown.contains("- **Shared ingredients:** 1"));
    }

    #[test]
    fn test_departments_rendered_in_shopping_order() {
        let recipes = recipes();
        let report =
            generate_grocery_list(&recipes, &GroceryOptions::default(), &Categorizer::builtin())
                .unwrap();

        let markdown = render_markdown(&report, &recipes, "this week");
        let meat = markdown.find("### Meat Seafood").unwrap();
        let pantry = markdown.find("### Pantry").unwrap();
        let condiments = markdown.find("### Condiments").unwrap();
        assert!(meat < pantry && pantry < condiments);
    }
}
