use thiserror::Error;

pub type ShoppingResult<T> = Result<T, ShoppingError>;

/// Contract violations raised by the shopping core.
///
/// Irregular ingredient text is never an error: unparseable quantities,
/// incompatible units and sums too large to hold exactly degrade to absent
/// values or flagged concatenations. Everything here is either a caller bug
/// or raised by the typed quantity API, which the list-level operations
/// recover from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShoppingError {
    #[error("Invalid multiplier {0}: multipliers must be finite and greater than zero")]
    InvalidMultiplier(f64),

    #[error("Multiplier {0} cannot be represented exactly")]
    MultiplierOutOfRange(f64),

    #[error("Quantity {0} is too large to compute exactly")]
    QuantityOverflow(String),

    #[error("Invalid range: low bound {low} is greater than high bound {high}")]
    InvertedRange { low: String, high: String },

    #[error("Duplicate list item id: {0}")]
    DuplicateItemId(String),

    #[error("Cannot merge a duplicate group without duplicate items")]
    EmptyGroup,
}
