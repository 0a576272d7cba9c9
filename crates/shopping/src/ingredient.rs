use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::quantity::{parse_quantity, quantity_pattern, QuantityValue};
use crate::units::{unit_pattern, Unit};

/// Trailing "(...)" notes; only the last parenthetical group counts
static NOTES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<base>.*?)\s*\((?P<notes>[^()]*)\)\s*$").expect("Notes pattern should be valid")
});

/// quantity + unit + name, e.g. "1 1/2 cups of flour"
static UNIT_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?P<quantity>{})\s+(?P<unit>{})\.?\s+(?:of\s+)?(?P<name>\S.*)$",
        quantity_pattern(),
        unit_pattern()
    ))
    .expect("Unit line pattern should be valid")
});

/// quantity + name, e.g. "2 onions"
static QUANTITY_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?P<quantity>{})\s+(?P<name>\S.*)$",
        quantity_pattern()
    ))
    .expect("Quantity line pattern should be valid")
});

/// One ingredient line split into its parts
///
/// `quantity` keeps the original text ("1 1/2"), `unit` the matched surface
/// form lowercased ("tbsp", "t").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub ingredient_name: String,
    pub notes: Option<String>,
}

impl ParsedIngredient {
    /// Parsed quantity, `None` when absent or unparseable
    pub fn quantity_value(&self) -> Option<QuantityValue> {
        self.quantity.as_deref().and_then(parse_quantity)
    }

    pub fn unit_class(&self) -> Option<Unit> {
        self.unit.as_deref().and_then(Unit::from_surface)
    }
}

impl fmt::Display for ParsedIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            self.quantity.as_deref(),
            self.unit.as_deref(),
            Some(self.ingredient_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();

        write!(f, "{}", parts.join(" "))?;

        if let Some(notes) = &self.notes {
            write!(f, " ({notes})")?;
        }

        Ok(())
    }
}

/// Split a free-form ingredient line into quantity, unit, name and notes
///
/// Order of attempts:
/// 1. trailing "(notes)" are split off
/// 2. quantity + known unit + name
/// 3. quantity + name
/// 4. the whole line is the name
///
/// A quantity is only taken when more text follows it, so "Vitamin 2" or a
/// bare "2" stay names.
pub fn parse_ingredient_line(line: &str) -> ParsedIngredient {
    let line = line.trim();

    let (base, notes) = match NOTES_REGEX.captures(line) {
        Some(captures) => {
            let base = captures.name("base").map_or("", |m| m.as_str()).trim();
            let notes = captures
                .name("notes")
                .map(|m| m.as_str().trim())
                .filter(|notes| !notes.is_empty())
                .map(str::to_string);
            (base, notes)
        }
        None => (line, None),
    };

    if let Some(captures) = UNIT_LINE_REGEX.captures(base) {
        let quantity = captures.name("quantity").map(|m| m.as_str().trim().to_string());
        let unit = captures.name("unit").map(|m| m.as_str().to_lowercase());
        let name = captures.name("name").map_or("", |m| m.as_str()).trim();

        tracing::trace!(line, ?quantity, ?unit, name, "Parsed ingredient with unit");

        return ParsedIngredient {
            quantity,
            unit,
            ingredient_name: name.to_string(),
            notes,
        };
    }

    if let Some(captures) = QUANTITY_LINE_REGEX.captures(base) {
        let quantity = captures.name("quantity").map(|m| m.as_str().trim().to_string());
        let name = captures.name("name").map_or("", |m| m.as_str()).trim();

        tracing::trace!(line, ?quantity, name, "Parsed ingredient without unit");

        return ParsedIngredient {
            quantity,
            unit: None,
            ingredient_name: name.to_string(),
            notes,
        };
    }

    ParsedIngredient {
        quantity: None,
        unit: None,
        ingredient_name: base.to_string(),
        notes,
    }
}
