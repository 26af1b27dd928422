use std::sync::LazyLock;

use fraction::Fraction;
use regex::Regex;
use serde::Serialize;

use crate::fraction_utils::{parse_quantity, to_f64};
use crate::units::is_known_unit;

/// Leading quantity: mixed number, simple fraction, decimal or integer.
static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\s+\d+\s*/\s*\d+|\d+\s*/\s*\d+|\d+(?:\.\d+)?|\.\d+)\s*(.*)$").unwrap()
});

/// Package size such as "(14 oz)" placed before the unit.
static LEADING_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\([^)]*\)\s*").unwrap());

/// Unit assigned when a line carries no quantity at all.
pub const FALLBACK_UNIT: &str = "item";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedIngredient {
    #[serde(serialize_with = "serialize_fraction")]
    pub quantity: Fraction,
    /// Lower-cased unit token, empty when a quantity had no recognized unit.
    pub unit: String,
    pub name: String,
    pub original: String,
}

fn serialize_fraction<S: serde::Serializer>(q: &Fraction, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(to_f64(*q))
}

impl ParsedIngredient {
    fn fallback(line: &str) -> Self {
        let trimmed = line.trim();
        Self {
            quantity: Fraction::new(1u64, 1u64),
            unit: FALLBACK_UNIT.to_string(),
            name: trimmed.to_string(),
            original: trimmed.to_string(),
        }
    }

    pub fn amount(&self) -> f64 {
        to_f64(self.quantity)
    }
}

/// Split an ingredient line into quantity, unit and name.
///
/// Never fails: anything that does not look like "<quantity> [unit] <name>"
/// becomes one "item" named after the whole trimmed line.
pub fn parse_ingredient(line: &str) -> ParsedIngredient {
    let trimmed = line.trim();

    let Some(caps) = QUANTITY_RE.captures(trimmed) else {
        return ParsedIngredient::fallback(trimmed);
    };

    let quantity = match parse_quantity(&normalize_quantity_token(&caps[1])) {
        Ok(q) if to_f64(q) > 0.0 => q,
        Ok(_) => {
            tracing::debug!(line = trimmed, "Zero quantity, using fallback");
            return ParsedIngredient::fallback(trimmed);
        }
        Err(e) => {
            tracing::debug!(line = trimmed, error = %e, "Unparseable quantity, using fallback");
            return ParsedIngredient::fallback(trimmed);
        }
    };

    let rest = LEADING_PAREN_RE.replace(caps[2].trim(), "");
    let (unit, name) = split_unit(&rest);

    if name.is_empty() {
        return ParsedIngredient::fallback(trimmed);
    }

    ParsedIngredient {
        quantity,
        unit,
        name,
        original: trimmed.to_string(),
    }
}

/// "1 1 / 2" → "1 1/2"
fn normalize_quantity_token(token: &str) -> String {
    let compact = token.replace(" /", "/").replace("/ ", "/");
    compact.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_unit(rest: &str) -> (String, String) {
    let words: Vec<&str> = rest.split_whitespace().collect();

    let unit_len = if words.len() >= 2 && is_known_unit(&format!("{} {}", words[0], words[1])) {
        2
    } else if !words.is_empty() && is_known_unit(words[0]) {
        1
    } else {
        0
    };

    let unit = words[..unit_len]
        .join(" ")
        .trim_end_matches('.')
        .to_lowercase();

    let mut name_words = &words[unit_len..];
    if unit_len > 0 && name_words.first().is_some_and(|w| w.eq_ignore_ascii_case("of")) {
        name_words = &name_words[1..];
    }

    (unit, name_words.join(" "))
}
