use std::fmt;
use std::sync::LazyLock;

use fraction::{CheckedAdd, CheckedMul, Fraction};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{ShoppingError, ShoppingResult};

/// Unicode vulgar fractions accepted on input and preferred on output
const VULGAR_FRACTIONS: [(char, u64, u64); 9] = [
    ('¼', 1, 4),
    ('½', 1, 2),
    ('¾', 3, 4),
    ('⅓', 1, 3),
    ('⅔', 2, 3),
    ('⅛', 1, 8),
    ('⅜', 3, 8),
    ('⅝', 5, 8),
    ('⅞', 7, 8),
];

/// Fractional decimal digits kept when parsing quantity text; the rest are truncated.
const MAX_DECIMAL_DIGITS: usize = 9;

/// One quantity bound: mixed number, glyph (optionally after a whole number),
/// simple fraction, decimal or integer. Alternation order matters, the
/// longest forms come first.
pub(crate) const NUMBER_PATTERN: &str = r"(?:[0-9]+\s+[0-9]+/[0-9]+|[0-9]+\s*[¼½¾⅓⅔⅛⅜⅝⅞]|[0-9]+/[0-9]+|[0-9]*\.[0-9]+|[0-9]+|[¼½¾⅓⅔⅛⅜⅝⅞])";

pub(crate) const RANGE_SEPARATOR_PATTERN: &str = r"(?:\s*[-–]\s*|\s+to\s+)";

static QUANTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*(?P<low>{NUMBER_PATTERN})(?:{RANGE_SEPARATOR_PATTERN}(?P<high>{NUMBER_PATTERN}))?\s*$"
    ))
    .expect("Quantity pattern should be valid")
});

/// Pattern for a complete quantity token (single value or range), without anchors
pub(crate) fn quantity_pattern() -> String {
    format!("{NUMBER_PATTERN}(?:{RANGE_SEPARATOR_PATTERN}{NUMBER_PATTERN})?")
}

/// An exact quantity: a single rational or an inclusive range of rationals
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityValue {
    Single(Fraction),
    Range { low: Fraction, high: Fraction },
}

impl QuantityValue {
    pub fn single(value: Fraction) -> Self {
        QuantityValue::Single(value)
    }

    /// Build a range, collapsing equal bounds into a single value
    ///
    /// # Errors
    /// * `ShoppingError::InvertedRange` when `low > high`
    pub fn range(low: Fraction, high: Fraction) -> ShoppingResult<Self> {
        if low > high {
            return Err(ShoppingError::InvertedRange {
                low: format_fraction(&low),
                high: format_fraction(&high),
            });
        }

        if low == high {
            return Ok(QuantityValue::Single(low));
        }

        Ok(QuantityValue::Range { low, high })
    }

    pub fn low(&self) -> &Fraction {
        match self {
            QuantityValue::Single(value) => value,
            QuantityValue::Range { low, .. } => low,
        }
    }

    pub fn high(&self) -> &Fraction {
        match self {
            QuantityValue::Single(value) => value,
            QuantityValue::Range { high, .. } => high,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, QuantityValue::Range { .. })
    }

    pub fn is_zero(&self) -> bool {
        *self.high() == Fraction::new(0u64, 1u64)
    }

    /// Exact sum; ranges add bound-wise and a single value acts as a range
    /// with equal bounds
    ///
    /// Returns `None` when the sum does not fit the underlying rationals.
    pub fn checked_add(&self, other: &QuantityValue) -> Option<QuantityValue> {
        match (self, other) {
            (QuantityValue::Single(a), QuantityValue::Single(b)) => Some(QuantityValue::Single(a.checked_add(b)?)),
            (a, b) => Some(QuantityValue::Range {
                low: a.low().checked_add(b.low())?,
                high: a.high().checked_add(b.high())?,
            }),
        }
    }

    /// Exact product of every bound with `factor`, `None` on overflow
    pub fn checked_scale(&self, factor: &Fraction) -> Option<QuantityValue> {
        match self {
            QuantityValue::Single(value) => Some(QuantityValue::Single(value.checked_mul(factor)?)),
            QuantityValue::Range { low, high } => Some(QuantityValue::Range {
                low: low.checked_mul(factor)?,
                high: high.checked_mul(factor)?,
            }),
        }
    }
}

impl fmt::Display for QuantityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_quantity(self))
    }
}

impl Serialize for QuantityValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a quantity token into an exact value
///
/// Supports formats:
/// - Whole numbers: "2"
/// - Decimals: "2.5", ".5"
/// - Simple fractions: "1/2"
/// - Unicode fractions: "½", "1½", "1 ½"
/// - Mixed numbers: "1 1/2"
/// - Ranges of any of the above: "1-2", "1/2 to 1", "2–3"
///
/// Returns `None` when the text is not a quantity, when a denominator is
/// zero, or when a range is inverted ("3-1"). The caller then treats the
/// text as having no quantity.
pub fn parse_quantity(text: &str) -> Option<QuantityValue> {
    let captures = QUANTITY_REGEX.captures(text)?;
    let low = parse_number(captures.name("low")?.as_str())?;

    let Some(high) = captures.name("high") else {
        return Some(QuantityValue::Single(low));
    };
    let high = parse_number(high.as_str())?;

    match QuantityValue::range(low, high) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(quantity = text, "Ignoring quantity: {err}");
            None
        }
    }
}

/// Scale a quantity by a positive multiplier
///
/// A multiplier of exactly 1 returns the input unchanged. Both bounds of a
/// range are scaled.
///
/// # Errors
/// * `ShoppingError::InvalidMultiplier` for zero, negative or non-finite
///   multipliers
/// * `ShoppingError::MultiplierOutOfRange` for multipliers too large or too
///   finely divided to hold exactly
/// * `ShoppingError::QuantityOverflow` when the scaled value does not fit
pub fn scale_quantity(value: &QuantityValue, multiplier: f64) -> ShoppingResult<QuantityValue> {
    let factor = multiplier_to_fraction(multiplier)?;

    if factor == Fraction::new(1u64, 1u64) {
        return Ok(value.clone());
    }

    value
        .checked_scale(&factor)
        .ok_or_else(|| ShoppingError::QuantityOverflow(format!("{} x {multiplier}", format_quantity(value))))
}

/// Format a quantity as a human-readable string
///
/// Formats:
/// - Whole numbers: 2/1 → "2"
/// - Halves, thirds, quarters and eighths: 3/2 → "1½", 2/3 → "⅔"
/// - Anything else as a decimal rounded to two places: 6/5 → "1.2"
/// - Ranges: "1½-2"
pub fn format_quantity(value: &QuantityValue) -> String {
    match value {
        QuantityValue::Single(value) => format_fraction(value),
        QuantityValue::Range { low, high } => {
            format!("{}-{}", format_fraction(low), format_fraction(high))
        }
    }
}

pub(crate) fn validate_multiplier(multiplier: f64) -> ShoppingResult<()> {
    multiplier_to_fraction(multiplier).map(|_| ())
}

/// Multipliers arrive as `f64`; going through the shortest decimal text keeps
/// 1.5 exactly 3/2 instead of its binary approximation.
fn multiplier_to_fraction(multiplier: f64) -> ShoppingResult<Fraction> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(ShoppingError::InvalidMultiplier(multiplier));
    }

    // f64 Display never uses exponent notation. Multipliers are not
    // truncated: past 19 fractional digits the denominator no longer fits.
    let text = multiplier.to_string();
    let factor = if text.contains('.') {
        parse_decimal(&text, usize::MAX)
    } else {
        parse_integer(&text)
    };

    match factor {
        Some(factor) if factor != Fraction::new(0u64, 1u64) => Ok(factor),
        _ => Err(ShoppingError::MultiplierOutOfRange(multiplier)),
    }
}

fn parse_number(text: &str) -> Option<Fraction> {
    let text = text.trim();

    if let Some((position, glyph)) = text.char_indices().find(|(_, c)| vulgar_value(*c).is_some()) {
        let fraction = vulgar_value(glyph)?;
        let whole = text[..position].trim();
        if whole.is_empty() {
            return Some(fraction);
        }
        return parse_integer(whole)?.checked_add(&fraction);
    }

    if let Some((whole, fraction)) = text.split_once(char::is_whitespace) {
        return parse_integer(whole)?.checked_add(&parse_simple_fraction(fraction.trim())?);
    }

    if text.contains('/') {
        return parse_simple_fraction(text);
    }

    if text.contains('.') {
        return parse_decimal(text, MAX_DECIMAL_DIGITS);
    }

    parse_integer(text)
}

fn parse_integer(text: &str) -> Option<Fraction> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: u64 = text.parse().ok()?;
    Some(Fraction::new(value, 1u64))
}

fn parse_simple_fraction(text: &str) -> Option<Fraction> {
    let (numerator, denominator) = text.split_once('/')?;
    let numerator: u64 = numerator.trim().parse().ok()?;
    let denominator: u64 = denominator.trim().parse().ok()?;

    if denominator == 0 {
        return None;
    }

    Some(Fraction::new(numerator, denominator))
}

/// Digit-by-digit decimal parse, so "0.1" is exactly 1/10
///
/// Fractional digits past `max_digits` are truncated.
fn parse_decimal(text: &str, max_digits: usize) -> Option<Fraction> {
    let (whole, digits) = text.split_once('.')?;
    let digits = &digits[..digits.len().min(max_digits)];

    if !whole.bytes().all(|b| b.is_ascii_digit()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if whole.is_empty() && digits.is_empty() {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let denominator = 10u64.checked_pow(digits.len() as u32)?;
    let fractional: u64 = if digits.is_empty() { 0 } else { digits.parse().ok()? };
    let numerator = whole.checked_mul(denominator)?.checked_add(fractional)?;

    Some(Fraction::new(numerator, denominator))
}

fn vulgar_value(glyph: char) -> Option<Fraction> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(candidate, _, _)| *candidate == glyph)
        .map(|(_, numerator, denominator)| Fraction::new(*numerator, *denominator))
}

fn fraction_parts(value: &Fraction) -> Option<(u64, u64)> {
    Some((*value.numer()?, *value.denom()?))
}

fn format_fraction(value: &Fraction) -> String {
    let Some((numerator, denominator)) = fraction_parts(value) else {
        return value.to_string();
    };

    let whole = numerator / denominator;
    let remainder = numerator % denominator;

    if remainder == 0 {
        return whole.to_string();
    }

    // Fractions are kept reduced, so remainder/denominator is already in lowest terms
    let glyph = VULGAR_FRACTIONS
        .iter()
        .find(|(_, n, d)| *n == remainder && *d == denominator)
        .map(|(glyph, _, _)| *glyph);

    match glyph {
        Some(glyph) if whole == 0 => glyph.to_string(),
        Some(glyph) => format!("{whole}{glyph}"),
        None => format_decimal(numerator, denominator),
    }
}

/// Half-up rounding to hundredths, trailing zeros trimmed
fn format_decimal(numerator: u64, denominator: u64) -> String {
    let numerator = numerator as u128;
    let denominator = denominator as u128;
    let hundredths = (numerator * 100 + denominator / 2) / denominator;
    let whole = hundredths / 100;
    let cents = hundredths % 100;

    if cents == 0 {
        whole.to_string()
    } else if cents % 10 == 0 {
        format!("{whole}.{}", cents / 10)
    } else {
        format!("{whole}.{cents:02}")
    }
}
