use fraction::Fraction;
use strum::{AsRefStr, Display};

/// Canonical unit classes recognised in ingredient lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Unit {
    Teaspoon,
    Tablespoon,
    Cup,
    Milliliter,
    Liter,
    Pint,
    Quart,
    Gallon,
    Ounce,
    Pound,
    Gram,
    Kilogram,
    Inch,
    Piece,
    Slice,
    Clove,
    Can,
    Bottle,
    Package,
    Bunch,
    Head,
    Large,
    Medium,
    Small,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Volume,
    Weight,
    Count,
    Size,
}

/// Surface forms, lowercased. "t" is what a capital "T" (tablespoon) becomes
/// once stored lowercased.
const UNIT_ALIASES: &[(&str, Unit)] = &[
    ("teaspoons", Unit::Teaspoon),
    ("teaspoon", Unit::Teaspoon),
    ("tsp", Unit::Teaspoon),
    ("tablespoons", Unit::Tablespoon),
    ("tablespoon", Unit::Tablespoon),
    ("tbsp", Unit::Tablespoon),
    ("tbs", Unit::Tablespoon),
    ("tbl", Unit::Tablespoon),
    ("t", Unit::Tablespoon),
    ("cups", Unit::Cup),
    ("cup", Unit::Cup),
    ("milliliters", Unit::Milliliter),
    ("milliliter", Unit::Milliliter),
    ("millilitres", Unit::Milliliter),
    ("millilitre", Unit::Milliliter),
    ("ml", Unit::Milliliter),
    ("liters", Unit::Liter),
    ("liter", Unit::Liter),
    ("litres", Unit::Liter),
    ("litre", Unit::Liter),
    ("l", Unit::Liter),
    ("pints", Unit::Pint),
    ("pint", Unit::Pint),
    ("pt", Unit::Pint),
    ("quarts", Unit::Quart),
    ("quart", Unit::Quart),
    ("qt", Unit::Quart),
    ("gallons", Unit::Gallon),
    ("gallon", Unit::Gallon),
    ("gal", Unit::Gallon),
    ("ounces", Unit::Ounce),
    ("ounce", Unit::Ounce),
    ("oz", Unit::Ounce),
    ("pounds", Unit::Pound),
    ("pound", Unit::Pound),
    ("lbs", Unit::Pound),
    ("lb", Unit::Pound),
    ("grams", Unit::Gram),
    ("gram", Unit::Gram),
    ("g", Unit::Gram),
    ("kilograms", Unit::Kilogram),
    ("kilogram", Unit::Kilogram),
    ("kg", Unit::Kilogram),
    ("inches", Unit::Inch),
    ("inch", Unit::Inch),
    ("pieces", Unit::Piece),
    ("piece", Unit::Piece),
    ("slices", Unit::Slice),
    ("slice", Unit::Slice),
    ("cloves", Unit::Clove),
    ("clove", Unit::Clove),
    ("cans", Unit::Can),
    ("can", Unit::Can),
    ("bottles", Unit::Bottle),
    ("bottle", Unit::Bottle),
    ("packages", Unit::Package),
    ("package", Unit::Package),
    ("pkg", Unit::Package),
    ("bunches", Unit::Bunch),
    ("bunch", Unit::Bunch),
    ("heads", Unit::Head),
    ("head", Unit::Head),
    ("large", Unit::Large),
    ("medium", Unit::Medium),
    ("small", Unit::Small),
];

impl Unit {
    /// Resolve a surface form ("Tbsp.", "cups", "T") to its unit class
    pub fn from_surface(text: &str) -> Option<Unit> {
        let normalized = text.trim().trim_end_matches('.').to_lowercase();

        UNIT_ALIASES
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|(_, unit)| *unit)
    }

    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Teaspoon
            | Unit::Tablespoon
            | Unit::Cup
            | Unit::Milliliter
            | Unit::Liter
            | Unit::Pint
            | Unit::Quart
            | Unit::Gallon => Dimension::Volume,
            Unit::Ounce | Unit::Pound | Unit::Gram | Unit::Kilogram => Dimension::Weight,
            Unit::Large | Unit::Medium | Unit::Small => Dimension::Size,
            Unit::Inch
            | Unit::Piece
            | Unit::Slice
            | Unit::Clove
            | Unit::Can
            | Unit::Bottle
            | Unit::Package
            | Unit::Bunch
            | Unit::Head => Dimension::Count,
        }
    }

    /// Exact size in the dimension's base unit
    ///
    /// Base units:
    /// - Volume: ml (cup 240, tbsp 15, tsp 5)
    /// - Weight: g (lb = 453.59237 g exactly, oz = lb / 16)
    ///
    /// Count and size units have no conversion.
    fn base_factor(self) -> Option<Fraction> {
        let (numerator, denominator): (u64, u64) = match self {
            Unit::Teaspoon => (5, 1),
            Unit::Tablespoon => (15, 1),
            Unit::Cup => (240, 1),
            Unit::Milliliter => (1, 1),
            Unit::Liter => (1000, 1),
            Unit::Pint => (480, 1),
            Unit::Quart => (960, 1),
            Unit::Gallon => (3840, 1),
            Unit::Gram => (1, 1),
            Unit::Kilogram => (1000, 1),
            Unit::Pound => (45_359_237, 100_000),
            Unit::Ounce => (45_359_237, 1_600_000),
            _ => return None,
        };

        Some(Fraction::new(numerator, denominator))
    }

    /// Factor turning a quantity in `self` into a quantity in `target`
    ///
    /// `None` when the units belong to different dimensions or either unit
    /// has no fixed size (cloves, cans, "large").
    pub fn conversion_factor(self, target: Unit) -> Option<Fraction> {
        if self == target {
            return Some(Fraction::new(1u64, 1u64));
        }

        if self.dimension() != target.dimension() {
            return None;
        }

        Some(self.base_factor()? / target.base_factor()?)
    }
}

/// Regex alternation matching every unit surface form, longest first
///
/// The capital "T" abbreviation is only accepted in upper case so "t" in a
/// lowercase line is never read as a unit.
pub(crate) fn unit_pattern() -> String {
    let mut aliases: Vec<&str> = UNIT_ALIASES
        .iter()
        .map(|(alias, _)| *alias)
        .filter(|alias| *alias != "t")
        .collect();
    aliases.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let escaped: Vec<String> = aliases.iter().map(|alias| regex::escape(alias)).collect();

    format!("(?:{}|(?-i:T))", escaped.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_surface_accepts_variants() {
        assert_eq!(Unit::from_surface("Tbsp."), Some(Unit::Tablespoon));
        assert_eq!(Unit::from_surface("tbs"), Some(Unit::Tablespoon));
        assert_eq!(Unit::from_surface("T"), Some(Unit::Tablespoon));
        assert_eq!(Unit::from_surface("CUPS"), Some(Unit::Cup));
        assert_eq!(Unit::from_surface("lbs"), Some(Unit::Pound));
        assert_eq!(Unit::from_surface("litres"), Some(Unit::Liter));
        assert_eq!(Unit::from_surface("handful"), None);
    }

    #[test]
    fn test_volume_conversion() {
        let factor = Unit::Tablespoon.conversion_factor(Unit::Cup).unwrap();
        assert_eq!(factor, Fraction::new(1u64, 16u64));

        let factor = Unit::Cup.conversion_factor(Unit::Milliliter).unwrap();
        assert_eq!(factor, Fraction::new(240u64, 1u64));
    }

    #[test]
    fn test_weight_conversion_is_exact() {
        let factor = Unit::Pound.conversion_factor(Unit::Ounce).unwrap();
        assert_eq!(factor, Fraction::new(16u64, 1u64));

        let factor = Unit::Kilogram.conversion_factor(Unit::Gram).unwrap();
        assert_eq!(factor, Fraction::new(1000u64, 1u64));
    }

    #[test]
    fn test_incompatible_units_do_not_convert() {
        assert_eq!(Unit::Cup.conversion_factor(Unit::Gram), None);
        assert_eq!(Unit::Clove.conversion_factor(Unit::Tablespoon), None);
        assert_eq!(Unit::Can.conversion_factor(Unit::Bottle), None);
        assert_eq!(
            Unit::Clove.conversion_factor(Unit::Clove),
            Some(Fraction::new(1u64, 1u64))
        );
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(Unit::Tablespoon.to_string(), "tablespoon");
        assert_eq!(Unit::Kilogram.as_ref(), "kilogram");
    }
}
