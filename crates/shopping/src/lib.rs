pub mod categorization;
pub mod combine;
pub mod duplicates;
pub mod error;
pub mod ingredient;
pub mod matching;
pub mod model;
pub mod mutation;
pub mod quantity;
pub mod similarity;
pub mod units;

// Re-export commonly used types
pub use categorization::{categorize, Category};
pub use combine::{combine_notes, combine_quantities, CombinedQuantity, QuantityFold, QuantityTerm};
pub use duplicates::find_duplicates;
pub use error::{ShoppingError, ShoppingResult};
pub use ingredient::{parse_ingredient_line, ParsedIngredient};
pub use matching::reconcile;
pub use model::{
    collect_candidates, CandidateIngredient, DuplicateGroup, GroceryListItem, MatchResult, MatchedIngredient,
    Reconciliation, RecipeInclusion,
};
pub use mutation::{plan_match, plan_reconciliation, resolve_duplicates, ListMutation, NewItemSlot, Resolution};
pub use quantity::{format_quantity, parse_quantity, scale_quantity, QuantityValue};
pub use similarity::{
    name_similarity, normalize_name, similarity, EXACT_THRESHOLD, MATCH_THRESHOLD, RECIPE_TO_RECIPE_CONFIDENCE,
};
pub use units::{Dimension, Unit};
