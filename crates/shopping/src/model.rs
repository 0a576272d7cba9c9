use serde::{Deserialize, Serialize};

use crate::combine::{combine_notes, CombinedQuantity, QuantityFold, QuantityTerm};
use crate::error::{ShoppingError, ShoppingResult};
use crate::ingredient::{parse_ingredient_line, ParsedIngredient};
use crate::quantity::{format_quantity, scale_quantity, validate_multiplier, QuantityValue};

/// An item on the shopping list, as owned by the persistence layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroceryListItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub is_completed: bool,
}

/// One recipe added to the list in a batch, with its scaling multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeInclusion {
    pub recipe_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub recipe_title: String,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    pub lines: Vec<String>,
}

fn default_multiplier() -> f64 {
    1.0
}

impl RecipeInclusion {
    /// Parse every non-blank line into a candidate
    ///
    /// `source_index` is the line's position in `lines`, blank lines included.
    pub fn candidates(&self) -> Vec<CandidateIngredient> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(source_index, line)| CandidateIngredient {
                ingredient: parse_ingredient_line(line),
                recipe_id: self.recipe_id.clone(),
                variant_id: self.variant_id.clone(),
                multiplier: self.multiplier,
                recipe_title: self.recipe_title.clone(),
                source_index,
            })
            .collect()
    }
}

/// Candidates for a whole batch, in recipe then line order
pub fn collect_candidates(recipes: &[RecipeInclusion]) -> Vec<CandidateIngredient> {
    recipes.iter().flat_map(RecipeInclusion::candidates).collect()
}

/// A parsed ingredient line with the recipe it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateIngredient {
    pub ingredient: ParsedIngredient,
    pub recipe_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub multiplier: f64,
    #[serde(default)]
    pub recipe_title: String,
    #[serde(default)]
    pub source_index: usize,
}

impl CandidateIngredient {
    /// Quantity text after applying the recipe multiplier
    ///
    /// A multiplier of 1 keeps the original text. Unparseable quantities
    /// ("a pinch") cannot be scaled and are kept as written.
    ///
    /// # Errors
    /// * `ShoppingError::InvalidMultiplier` for zero, negative or non-finite
    ///   multipliers, even when there is no quantity to scale
    /// * `ShoppingError::MultiplierOutOfRange` for multipliers that cannot be
    ///   held exactly
    pub fn scaled_quantity(&self) -> ShoppingResult<Option<String>> {
        Ok(self.scale()?.0)
    }

    /// Exact quantity after applying the recipe multiplier
    ///
    /// `None` when the line has no quantity, when it cannot be parsed, or when
    /// the scaled value is too large to hold exactly.
    ///
    /// # Errors
    /// Same as [`CandidateIngredient::scaled_quantity`].
    pub fn scaled_value(&self) -> ShoppingResult<Option<QuantityValue>> {
        Ok(self.scale()?.1)
    }

    fn scale(&self) -> ShoppingResult<(Option<String>, Option<QuantityValue>)> {
        validate_multiplier(self.multiplier)?;

        let Some(text) = &self.ingredient.quantity else {
            return Ok((None, None));
        };

        let Some(value) = self.ingredient.quantity_value() else {
            if self.multiplier != 1.0 {
                tracing::warn!(
                    recipe_id = %self.recipe_id,
                    quantity = %text,
                    "Cannot scale unparseable quantity, keeping it as written"
                );
            }
            return Ok((Some(text.clone()), None));
        };

        if self.multiplier == 1.0 {
            return Ok((Some(text.clone()), Some(value)));
        }

        match scale_quantity(&value, self.multiplier) {
            Ok(scaled) => Ok((Some(format_quantity(&scaled)), Some(scaled))),
            Err(ShoppingError::QuantityOverflow(description)) => {
                tracing::warn!(
                    recipe_id = %self.recipe_id,
                    quantity = %text,
                    multiplier = self.multiplier,
                    "Scaled quantity is too large to compute, keeping the product as text"
                );
                Ok((Some(description), None))
            }
            Err(err) => Err(err),
        }
    }
}

/// A candidate together with its scaled quantity, as carried in match results
///
/// `quantity` is the display text; `value` keeps the exact scaled amount so
/// combining never starts from a rounded figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedIngredient {
    pub candidate: CandidateIngredient,
    pub quantity: Option<String>,
    #[serde(skip)]
    pub value: Option<QuantityValue>,
}

impl MatchedIngredient {
    /// Scale `candidate` by its recipe multiplier
    ///
    /// # Errors
    /// Same as [`CandidateIngredient::scaled_quantity`].
    pub fn new(candidate: CandidateIngredient) -> ShoppingResult<Self> {
        let (quantity, value) = candidate.scale()?;
        Ok(Self {
            candidate,
            quantity,
            value,
        })
    }

    pub fn name(&self) -> &str {
        &self.candidate.ingredient.ingredient_name
    }

    pub fn unit(&self) -> Option<&str> {
        self.candidate.ingredient.unit.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.candidate.ingredient.notes.as_deref()
    }

    /// Operand for combining: exact scaled value with the display text
    pub fn term(&self) -> QuantityTerm {
        QuantityTerm::new(self.quantity.as_deref(), self.value.clone(), self.unit())
    }
}

/// Classification of one candidate, or one recipe-to-recipe group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchResult {
    /// Name identical to an existing list item
    ExactMatch {
        ingredient: MatchedIngredient,
        existing_item: GroceryListItem,
        confidence: f64,
    },
    /// Name similar to an existing list item; the user decides whether to merge
    PartialMatch {
        ingredient: MatchedIngredient,
        existing_item: GroceryListItem,
        confidence: f64,
    },
    /// Candidates from different recipes in the same batch that look like the
    /// same ingredient; there is no list item to merge into yet
    RecipeToRecipeMatch {
        ingredients: Vec<MatchedIngredient>,
        confidence: f64,
    },
    NewItem {
        ingredient: MatchedIngredient,
        confidence: f64,
    },
}

impl MatchResult {
    pub fn confidence(&self) -> f64 {
        match self {
            MatchResult::ExactMatch { confidence, .. }
            | MatchResult::PartialMatch { confidence, .. }
            | MatchResult::RecipeToRecipeMatch { confidence, .. }
            | MatchResult::NewItem { confidence, .. } => *confidence,
        }
    }

    pub fn existing_item(&self) -> Option<&GroceryListItem> {
        match self {
            MatchResult::ExactMatch { existing_item, .. }
            | MatchResult::PartialMatch { existing_item, .. } => Some(existing_item),
            MatchResult::RecipeToRecipeMatch { .. } | MatchResult::NewItem { .. } => None,
        }
    }

    pub fn ingredients(&self) -> &[MatchedIngredient] {
        match self {
            MatchResult::ExactMatch { ingredient, .. }
            | MatchResult::PartialMatch { ingredient, .. }
            | MatchResult::NewItem { ingredient, .. } => std::slice::from_ref(ingredient),
            MatchResult::RecipeToRecipeMatch { ingredients, .. } => ingredients,
        }
    }

    pub fn is_recipe_to_recipe(&self) -> bool {
        matches!(self, MatchResult::RecipeToRecipeMatch { .. })
    }

    /// Quantity the list would hold once this result is accepted
    ///
    /// The existing item is the first operand, so its unit wins on
    /// conversion. Groups fold left over their members on exact values and
    /// the total is formatted once.
    pub fn combined_quantity(&self) -> CombinedQuantity {
        let mut fold = QuantityFold::default();

        if let Some(item) = self.existing_item() {
            fold.add(QuantityTerm::parse(item.quantity.as_deref(), item.unit.as_deref()));
        }
        for ingredient in self.ingredients() {
            fold.add(ingredient.term());
        }

        fold.finish()
    }

    pub fn combined_notes(&self) -> Option<String> {
        let existing = self.existing_item().and_then(|item| item.notes.clone());

        self.ingredients()
            .iter()
            .fold(existing, |acc, ingredient| combine_notes(acc.as_deref(), ingredient.notes()))
    }
}

/// Output of one reconciliation run
///
/// Recipe-to-recipe groups are reported inside `partial_matches` as
/// [`MatchResult::RecipeToRecipeMatch`], distinct from partial matches
/// against an existing item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub exact_matches: Vec<MatchResult>,
    pub partial_matches: Vec<MatchResult>,
    pub new_items: Vec<MatchResult>,
}

impl Reconciliation {
    pub fn len(&self) -> usize {
        self.exact_matches.len() + self.partial_matches.len() + self.new_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every result: exact matches, then partial matches, then new items
    pub fn iter(&self) -> impl Iterator<Item = &MatchResult> {
        self.exact_matches
            .iter()
            .chain(self.partial_matches.iter())
            .chain(self.new_items.iter())
    }

    pub fn recipe_to_recipe_matches(&self) -> impl Iterator<Item = &MatchResult> {
        self.partial_matches
            .iter()
            .filter(|result| result.is_recipe_to_recipe())
    }
}

/// Existing list items judged to be the same ingredient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub primary_item: GroceryListItem,
    pub duplicate_items: Vec<GroceryListItem>,
    pub confidence: f64,
}

impl DuplicateGroup {
    pub fn len(&self) -> usize {
        1 + self.duplicate_items.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn items(&self) -> impl Iterator<Item = &GroceryListItem> {
        std::iter::once(&self.primary_item).chain(self.duplicate_items.iter())
    }
}
