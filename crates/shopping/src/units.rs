use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// How a recognized unit word converts into a canonical unit.
#[derive(Debug, Clone, Copy, PartialEq)]
enum UnitKind {
    /// Factor to cups.
    Volume(f64),
    /// Factor to pounds.
    Weight(f64),
    /// Plural display label.
    Count(&'static str),
}

static UNITS: LazyLock<HashMap<&'static str, UnitKind>> = LazyLock::new(|| {
    use UnitKind::*;

    let mut units = HashMap::new();
    let mut add = |words: &[&'static str], kind: UnitKind| {
        for word in words {
            units.insert(*word, kind);
        }
    };

    add(&["cup", "cups", "c"], Volume(1.0));
    add(&["tablespoon", "tablespoons", "tbsp", "tbs", "tbsps"], Volume(1.0 / 16.0));
    add(&["teaspoon", "teaspoons", "tsp", "tsps"], Volume(1.0 / 48.0));
    add(&["pint", "pints", "pt"], Volume(2.0));
    add(&["quart", "quarts", "qt"], Volume(4.0));
    add(&["gallon", "gallons", "gal"], Volume(16.0));
    add(&["fl oz", "fluid ounce", "fluid ounces"], Volume(1.0 / 8.0));
    add(&["ml", "milliliter", "milliliters"], Volume(1.0 / 236.588));
    add(&["l", "liter", "liters", "litre", "litres"], Volume(4.22675));

    add(&["pound", "pounds", "lb", "lbs"], Weight(1.0));
    add(&["ounce", "ounces", "oz"], Weight(1.0 / 16.0));
    add(&["gram", "grams", "g"], Weight(1.0 / 453.592));
    add(&["kilogram", "kilograms", "kg"], Weight(2.20462));

    add(&["piece", "pieces"], Count("pieces"));
    add(&["item", "items"], Count("items"));
    add(&["clove", "cloves"], Count("cloves"));
    add(&["head", "heads"], Count("heads"));
    add(&["bunch", "bunches"], Count("bunches"));
    add(&["package", "packages", "pkg"], Count("packages"));
    add(&["can", "cans"], Count("cans"));
    add(&["jar", "jars"], Count("jars"));
    add(&["bottle", "bottles"], Count("bottles"));
    add(&["fillet", "fillets"], Count("fillets"));
    add(&["slice", "slices"], Count("slices"));
    add(&["stalk", "stalks"], Count("stalks"));
    add(&["sprig", "sprigs"], Count("sprigs"));

    units
});

/// Label used for count quantities with no recognized unit.
pub const DEFAULT_COUNT_LABEL: &str = "items";

/// Base unit every quantity is expressed in after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalUnit {
    Cups,
    Pounds,
    Count(String),
}

impl CanonicalUnit {
    /// Plural label, as shown for quantities above one.
    pub fn label(&self) -> &str {
        match self {
            CanonicalUnit::Cups => "cups",
            CanonicalUnit::Pounds => "lbs",
            CanonicalUnit::Count(label) => label,
        }
    }

    /// Label matching `quantity`: "1 lb" but "2 lbs".
    pub fn display(&self, quantity: f64) -> String {
        if quantity > 1.0 {
            return self.label().to_string();
        }

        match self {
            CanonicalUnit::Cups => "cup".to_string(),
            CanonicalUnit::Pounds => "lb".to_string(),
            CanonicalUnit::Count(label) => singular(label),
        }
    }
}

impl fmt::Display for CanonicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn singular(label: &str) -> String {
    if let Some(stem) = label.strip_suffix("ches") {
        format!("{stem}ch")
    } else if let Some(stem) = label.strip_suffix('s') {
        stem.to_string()
    } else {
        label.to_string()
    }
}

fn clean(unit: &str) -> String {
    unit.trim().trim_end_matches('.').to_lowercase()
}

/// Whether `word` belongs to the unit vocabulary.
pub fn is_known_unit(word: &str) -> bool {
    UNITS.contains_key(clean(word).as_str())
}

/// Convert `quantity` in `unit` to its canonical unit.
///
/// Volume ends up in cups, weight in pounds. Count units keep their label and
/// value; empty or unknown units are counted as items.
pub fn normalize_unit(unit: &str, quantity: f64) -> (CanonicalUnit, f64) {
    match UNITS.get(clean(unit).as_str()) {
        Some(UnitKind::Volume(factor)) => (CanonicalUnit::Cups, quantity * factor),
        Some(UnitKind::Weight(factor)) => (CanonicalUnit::Pounds, quantity * factor),
        Some(UnitKind::Count(label)) => (CanonicalUnit::Count(label.to_string()), quantity),
        None => (
            CanonicalUnit::Count(DEFAULT_COUNT_LABEL.to_string()),
            quantity,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_volume_to_cups() {
        let cases = [
            ("cups", 2.0, 2.0),
            ("c", 1.0, 1.0),
            ("tbsp", 4.0, 0.25),
            ("Tablespoons", 8.0, 0.5),
            ("tsp", 3.0, 0.0625),
            ("pint", 1.0, 2.0),
            ("quart", 1.0, 4.0),
            ("gallon", 0.5, 8.0),
            ("fl oz", 8.0, 1.0),
            ("ml", 236.588, 1.0),
            ("liter", 1.0, 4.22675),
        ];

        for (unit, quantity, cups) in cases {
            let (canonical, value) = normalize_unit(unit, quantity);
            assert_eq!(canonical, CanonicalUnit::Cups, "unit {unit}");
            assert_close(value, cups);
        }
    }

    #[test]
    fn test_weight_to_pounds() {
        let cases = [
            ("lb", 1.0, 1.0),
            ("lbs", 1.5, 1.5),
            ("oz", 8.0, 0.5),
            ("ounces", 16.0, 1.0),
            ("g", 453.592, 1.0),
            ("kg", 1.0, 2.20462),
        ];

        for (unit, quantity, pounds) in cases {
            let (canonical, value) = normalize_unit(unit, quantity);
            assert_eq!(canonical, CanonicalUnit::Pounds, "unit {unit}");
            assert_close(value, pounds);
        }
    }

    #[test]
    fn test_count_units_pass_through() {
        let (canonical, value) = normalize_unit("clove", 3.0);
        assert_eq!(canonical, CanonicalUnit::Count("cloves".to_string()));
        assert_eq!(value, 3.0);

        let (canonical, _) = normalize_unit("bunches", 2.0);
        assert_eq!(canonical.label(), "bunches");
    }

    #[test]
    fn test_unknown_and_empty_units_are_items() {
        for unit in ["", "handful", "item", "items", "whatever"] {
            let (canonical, value) = normalize_unit(unit, 2.0);
            assert_eq!(canonical.label(), "items", "unit '{unit}'");
            assert_eq!(value, 2.0);
        }
    }

    #[test]
    fn test_trailing_period_is_ignored() {
        assert!(is_known_unit("tbsp."));
        assert!(is_known_unit("Oz."));
        assert!(!is_known_unit("garlic"));
    }

    #[test]
    fn test_display_singular_and_plural() {
        assert_eq!(CanonicalUnit::Pounds.display(1.0), "lb");
        assert_eq!(CanonicalUnit::Pounds.display(1.5), "lbs");
        assert_eq!(CanonicalUnit::Cups.display(0.5), "cup");
        assert_eq!(CanonicalUnit::Cups.display(3.0), "cups");
        assert_eq!(
            CanonicalUnit::Count("items".to_string()).display(1.0),
            "item"
        );
        assert_eq!(
            CanonicalUnit::Count("bunches".to_string()).display(1.0),
            "bunch"
        );
        assert_eq!(
            CanonicalUnit::Count("cloves".to_string()).display(4.0),
            "cloves"
        );
    }
}
