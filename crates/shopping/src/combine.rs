use serde::{Deserialize, Serialize};

use crate::quantity::{format_quantity, parse_quantity, QuantityValue};
use crate::units::Unit;

/// Result of merging quantity/unit pairs
///
/// `needs_review` is set when the operands could not be combined
/// numerically and `quantity` holds them side by side
/// ("2 cloves + 1 tbsp") with no unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedQuantity {
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub needs_review: bool,
}

/// One operand of a combination
///
/// `text` is what gets shown when the operand cannot be summed; `value` is
/// its exact amount when known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantityTerm {
    pub text: Option<String>,
    pub value: Option<QuantityValue>,
    pub unit: Option<String>,
}

impl QuantityTerm {
    /// Operand from stored text; blank quantities and units count as absent
    pub fn parse(quantity: Option<&str>, unit: Option<&str>) -> Self {
        let text = non_blank(quantity);
        Self {
            text: text.map(str::to_string),
            value: text.and_then(parse_quantity),
            unit: non_blank(unit).map(str::to_string),
        }
    }

    /// Operand whose exact value is already known, e.g. after scaling
    pub fn new(text: Option<&str>, value: Option<QuantityValue>, unit: Option<&str>) -> Self {
        Self {
            text: non_blank(text).map(str::to_string),
            value,
            unit: non_blank(unit).map(str::to_string),
        }
    }

    fn exact(value: QuantityValue, unit: Option<String>) -> Self {
        Self {
            text: Some(format_quantity(&value)),
            value: Some(value),
            unit,
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_none() && self.unit.is_none()
    }

    fn describe(&self) -> String {
        [self.text.as_deref(), self.unit.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Left fold over quantity operands
///
/// Sums stay exact between steps; the total is formatted once by
/// [`QuantityFold::finish`]. A step that needs review keeps the whole fold
/// flagged.
#[derive(Debug, Clone, Default)]
pub struct QuantityFold {
    acc: Option<QuantityTerm>,
    needs_review: bool,
}

impl QuantityFold {
    pub fn add(&mut self, term: QuantityTerm) {
        let (next, needs_review) = match self.acc.take() {
            None => (term, false),
            Some(acc) => combine_terms(acc, term),
        };

        self.acc = Some(next);
        self.needs_review |= needs_review;
    }

    pub fn finish(self) -> CombinedQuantity {
        let Some(term) = self.acc else {
            return CombinedQuantity::default();
        };

        CombinedQuantity {
            quantity: term.text,
            unit: term.unit,
            needs_review: self.needs_review,
        }
    }
}

/// Merge two quantity/unit pairs
///
/// Rules, in priority order:
/// 1. an absent or unparseable quantity falls back to keeping the textual
///    forms ("a pinch + 1 tsp")
/// 2. same unit (case-insensitive, or same unit class such as "cup"/"cups"),
///    or both units absent: quantities are summed and A's unit is kept
/// 3. different units of the same dimension: B is converted into A's unit
///    and summed ("1 cup" + "2 tbsp" = "1⅛ cup")
/// 4. otherwise the two are concatenated for manual review
///    ("2 cloves + 1 cup")
///
/// A sum that overflows, or whose formatted form would hide a non-zero
/// operand ("1 kg" + "1 g"), is also concatenated for review. Neither
/// operand's information is ever dropped.
pub fn combine_quantities(
    quantity_a: Option<&str>,
    unit_a: Option<&str>,
    quantity_b: Option<&str>,
    unit_b: Option<&str>,
) -> CombinedQuantity {
    let mut fold = QuantityFold::default();
    fold.add(QuantityTerm::parse(quantity_a, unit_a));
    fold.add(QuantityTerm::parse(quantity_b, unit_b));
    fold.finish()
}

fn combine_terms(a: QuantityTerm, b: QuantityTerm) -> (QuantityTerm, bool) {
    let (Some(value_a), Some(value_b)) = (a.value.clone(), b.value.clone()) else {
        return combine_textually(a, b);
    };

    let converted = if same_unit(a.unit.as_deref(), b.unit.as_deref()) {
        Some(value_b)
    } else {
        let factor = match (
            a.unit.as_deref().and_then(Unit::from_surface),
            b.unit.as_deref().and_then(Unit::from_surface),
        ) {
            (Some(target), Some(source)) => source.conversion_factor(target),
            _ => None,
        };
        let Some(factor) = factor else {
            return for_review(&a, &b);
        };

        tracing::debug!(unit_a = ?a.unit, unit_b = ?b.unit, "Converting quantity before combining");
        value_b.checked_scale(&factor)
    };

    match converted.and_then(|value_b| visible_sum(&value_a, &value_b)) {
        Some(sum) => {
            let unit = a.unit.or(b.unit);
            (QuantityTerm::exact(sum, unit), false)
        }
        None => {
            tracing::debug!(
                a = %a.describe(),
                b = %b.describe(),
                "Sum overflows or rounds an operand away, keeping both"
            );
            for_review(&a, &b)
        }
    }
}

/// Exact sum, unless it overflows or its formatted form would be
/// indistinguishable from one of its non-zero operands
fn visible_sum(a: &QuantityValue, b: &QuantityValue) -> Option<QuantityValue> {
    let sum = a.checked_add(b)?;
    let shown = format_quantity(&sum);

    let hides_a = !a.is_zero() && shown == format_quantity(b);
    let hides_b = !b.is_zero() && shown == format_quantity(a);

    (!hides_a && !hides_b).then_some(sum)
}

fn for_review(a: &QuantityTerm, b: &QuantityTerm) -> (QuantityTerm, bool) {
    let term = QuantityTerm {
        text: Some(format!("{} + {}", a.describe(), b.describe())),
        value: None,
        unit: None,
    };
    (term, true)
}

/// Merge two optional notes, skipping empty and already-present ones
///
/// Distinct notes are joined with "; ".
pub fn combine_notes(notes_a: Option<&str>, notes_b: Option<&str>) -> Option<String> {
    let notes_a = non_blank(notes_a);
    let notes_b = non_blank(notes_b);

    match (notes_a, notes_b) {
        (None, None) => None,
        (Some(notes), None) | (None, Some(notes)) => Some(notes.to_string()),
        (Some(a), Some(b)) => {
            let already_present = a
                .split(';')
                .any(|existing| existing.trim().eq_ignore_ascii_case(b));
            if already_present {
                Some(a.to_string())
            } else {
                Some(format!("{a}; {b}"))
            }
        }
    }
}

fn combine_textually(a: QuantityTerm, b: QuantityTerm) -> (QuantityTerm, bool) {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => (QuantityTerm::default(), false),
        (false, true) => (a, false),
        (true, false) => (b, false),
        (false, false) => {
            // "to taste" + "to taste" stays "to taste"
            if a.describe().eq_ignore_ascii_case(&b.describe()) {
                return (a, false);
            }

            tracing::debug!(a = %a.describe(), b = %b.describe(), "Quantities cannot be summed, keeping both");
            for_review(&a, &b)
        }
    }
}

fn same_unit(unit_a: Option<&str>, unit_b: Option<&str>) -> bool {
    match (unit_a, unit_b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            if a.eq_ignore_ascii_case(b) {
                return true;
            }
            matches!(
                (Unit::from_surface(a), Unit::from_surface(b)),
                (Some(a), Some(b)) if a == b
            )
        }
        _ => false,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fraction::Fraction;

    fn combined(quantity: &str, unit: Option<&str>) -> CombinedQuantity {
        CombinedQuantity {
            quantity: Some(quantity.to_string()),
            unit: unit.map(str::to_string),
            needs_review: false,
        }
    }

    #[test]
    fn test_same_unit_sums() {
        assert_eq!(
            combine_quantities(Some("1"), Some("cup"), Some("1"), Some("cup")),
            combined("2", Some("cup"))
        );
        assert_eq!(
            combine_quantities(Some("1/2"), Some("Cups"), Some("1/4"), Some("cups")),
            combined("¾", Some("Cups"))
        );
    }

    #[test]
    fn test_same_unit_class_sums_without_conversion() {
        assert_eq!(
            combine_quantities(Some("2"), Some("cloves"), Some("1"), Some("clove")),
            combined("3", Some("cloves"))
        );
    }

    #[test]
    fn test_both_units_absent_sums() {
        assert_eq!(
            combine_quantities(Some("2"), None, Some("1½"), None),
            combined("3½", None)
        );
    }

    #[test]
    fn test_convertible_units_convert_into_first_unit() {
        assert_eq!(
            combine_quantities(Some("1"), Some("cup"), Some("2"), Some("tbsp")),
            combined("1⅛", Some("cup"))
        );
        assert_eq!(
            combine_quantities(Some("1"), Some("lb"), Some("8"), Some("oz")),
            combined("1½", Some("lb"))
        );
        assert_eq!(
            combine_quantities(Some("1"), Some("l"), Some("250"), Some("ml")),
            combined("1¼", Some("l"))
        );
    }

    #[test]
    fn test_small_converted_operand_is_kept_for_review() {
        assert_eq!(
            combine_quantities(Some("1"), Some("kg"), Some("1"), Some("g")),
            CombinedQuantity {
                quantity: Some("1 kg + 1 g".to_string()),
                unit: None,
                needs_review: true,
            }
        );
        assert_eq!(
            combine_quantities(Some("1"), Some("gallon"), Some("1"), Some("tsp")).quantity,
            Some("1 gallon + 1 tsp".to_string())
        );
        assert_eq!(
            combine_quantities(Some("1"), Some("kg"), Some("10"), Some("g")),
            combined("1.01", Some("kg"))
        );
    }

    #[test]
    fn test_sum_rounding_to_zero_is_kept_for_review() {
        let result = combine_quantities(Some("1/4294967291"), None, Some("1/4294967279"), None);
        assert_eq!(result.quantity.as_deref(), Some("1/4294967291 + 1/4294967279"));
        assert!(result.needs_review);

        assert_eq!(combine_quantities(Some("0"), None, Some("0"), None), combined("0", None));
    }

    #[test]
    fn test_overflowing_sum_is_kept_for_review() {
        let result = combine_quantities(Some("18446744073709551615"), None, Some("1"), None);
        assert_eq!(result.quantity.as_deref(), Some("18446744073709551615 + 1"));
        assert!(result.needs_review);

        let converted = combine_quantities(Some("1"), Some("tsp"), Some("18446744073709551615"), Some("gallon"));
        assert_eq!(
            converted.quantity.as_deref(),
            Some("1 tsp + 18446744073709551615 gallon")
        );
        assert!(converted.needs_review);
    }

    #[test]
    fn test_fold_sums_exact_values_before_formatting() {
        let scaled = QuantityValue::Single(Fraction::new(11u64, 30u64));
        let mut fold = QuantityFold::default();
        fold.add(QuantityTerm::new(Some("0.37"), Some(scaled.clone()), Some("tsp")));
        fold.add(QuantityTerm::new(Some("0.37"), Some(scaled), Some("tsp")));

        assert_eq!(fold.finish(), combined("0.73", Some("tsp")));
    }

    #[test]
    fn test_fold_keeps_single_operand_as_written() {
        let mut fold = QuantityFold::default();
        fold.add(QuantityTerm::parse(Some(" 1 1/2 "), Some("cups")));

        assert_eq!(fold.finish(), combined("1 1/2", Some("cups")));
        assert_eq!(QuantityFold::default().finish(), CombinedQuantity::default());
    }

    #[test]
    fn test_incompatible_units_concatenate_for_review() {
        assert_eq!(
            combine_quantities(Some("2"), Some("cloves"), Some("1"), Some("cup")),
            CombinedQuantity {
                quantity: Some("2 cloves + 1 cup".to_string()),
                unit: None,
                needs_review: true,
            }
        );
        assert!(combine_quantities(Some("1"), Some("cup"), Some("100"), Some("g")).needs_review);
        assert_eq!(
            combine_quantities(Some("2"), None, Some("1"), Some("cup")).quantity,
            Some("2 + 1 cup".to_string())
        );
    }

    #[test]
    fn test_ranges_combine_bound_wise() {
        assert_eq!(
            combine_quantities(Some("1-2"), Some("cups"), Some("1"), Some("cup")),
            combined("2-3", Some("cups"))
        );
        assert_eq!(
            combine_quantities(Some("2-3"), Some("tbsp"), Some("1-2"), Some("tsp")),
            combined("2⅓-3⅔", Some("tbsp"))
        );
    }

    #[test]
    fn test_unparseable_quantity_falls_back_to_text() {
        assert_eq!(
            combine_quantities(Some("a pinch"), None, Some("1"), Some("tsp")),
            CombinedQuantity {
                quantity: Some("a pinch + 1 tsp".to_string()),
                unit: None,
                needs_review: true,
            }
        );
        assert_eq!(
            combine_quantities(Some("to taste"), None, Some("to taste"), None),
            combined("to taste", None)
        );
    }

    #[test]
    fn test_missing_side_keeps_other() {
        assert_eq!(
            combine_quantities(None, None, Some("2"), Some("cups")),
            combined("2", Some("cups"))
        );
        assert_eq!(
            combine_quantities(Some("3"), None, Some("  "), None),
            combined("3", None)
        );
        assert_eq!(combine_quantities(None, None, None, None), CombinedQuantity::default());
    }

    #[test]
    fn test_combine_notes() {
        assert_eq!(combine_notes(None, None), None);
        assert_eq!(combine_notes(Some("ripe"), None), Some("ripe".to_string()));
        assert_eq!(combine_notes(Some(""), Some("diced")), Some("diced".to_string()));
        assert_eq!(
            combine_notes(Some("ripe"), Some("diced")),
            Some("ripe; diced".to_string())
        );
        assert_eq!(
            combine_notes(Some("ripe; diced"), Some("Diced")),
            Some("ripe; diced".to_string())
        );
    }
}
