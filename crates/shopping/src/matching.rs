use std::collections::HashSet;

use crate::error::{ShoppingError, ShoppingResult};
use crate::model::{CandidateIngredient, GroceryListItem, MatchResult, MatchedIngredient, Reconciliation};
use crate::similarity::{
    is_exact_match, is_plausible_match, normalize_name, similarity, RECIPE_TO_RECIPE_CONFIDENCE,
};

/// A candidate prepared for matching: normalised name and scaled quantity
struct Prepared {
    name: String,
    ingredient: MatchedIngredient,
}

impl Prepared {
    fn into_matched(self) -> MatchedIngredient {
        self.ingredient
    }
}

/// Classify a batch of recipe ingredients against the current list
///
/// Phase 1 groups candidates from different recipes that look like the same
/// ingredient. A candidate seeds a group and claims every later unclaimed
/// candidate from another recipe scoring at least the match threshold
/// against it. Groups of two or more become
/// [`MatchResult::RecipeToRecipeMatch`] and skip phase 2.
///
/// Phase 2 scores each remaining candidate against every existing item and
/// keeps the best one, the first in list order on ties.
///
/// # Errors
/// * `ShoppingError::InvalidMultiplier` if a candidate's multiplier is zero,
///   negative or not finite
/// * `ShoppingError::MultiplierOutOfRange` if a multiplier cannot be held
///   exactly
/// * `ShoppingError::DuplicateItemId` if two existing items share an id
#[tracing::instrument(skip_all, fields(candidates = candidates.len(), existing = existing.len()))]
pub fn reconcile(
    candidates: &[CandidateIngredient],
    existing: &[GroceryListItem],
) -> ShoppingResult<Reconciliation> {
    ensure_unique_ids(existing)?;

    let prepared = candidates
        .iter()
        .map(|candidate| {
            Ok(Prepared {
                name: normalize_name(&candidate.ingredient.ingredient_name),
                ingredient: MatchedIngredient::new(candidate.clone())?,
            })
        })
        .collect::<ShoppingResult<Vec<_>>>()?;

    let mut reconciliation = Reconciliation::default();
    let groups = group_across_recipes(&prepared);
    let mut slots: Vec<Option<Prepared>> = prepared.into_iter().map(Some).collect();

    for group in groups {
        if group.len() > 1 {
            let ingredients: Vec<MatchedIngredient> = group
                .iter()
                .filter_map(|&index| slots[index].take())
                .map(Prepared::into_matched)
                .collect();

            tracing::debug!(
                name = %ingredients[0].name(),
                members = ingredients.len(),
                "Grouped ingredients across recipes"
            );

            reconciliation.partial_matches.push(MatchResult::RecipeToRecipeMatch {
                ingredients,
                confidence: RECIPE_TO_RECIPE_CONFIDENCE,
            });
            continue;
        }

        let Some(entry) = slots[group[0]].take() else {
            continue;
        };

        match_against_list(entry, existing, &mut reconciliation);
    }

    tracing::info!(
        exact = reconciliation.exact_matches.len(),
        partial = reconciliation.partial_matches.len(),
        new = reconciliation.new_items.len(),
        "Reconciled ingredients against list"
    );

    Ok(reconciliation)
}

/// Phase 1 grouping, as lists of indices in seed order
///
/// Every index appears in exactly one group; singletons are candidates with
/// no partner in another recipe.
fn group_across_recipes(prepared: &[Prepared]) -> Vec<Vec<usize>> {
    let mut claimed = vec![false; prepared.len()];
    let mut groups = Vec::new();

    for seed in 0..prepared.len() {
        if claimed[seed] {
            continue;
        }
        claimed[seed] = true;

        let mut group = vec![seed];
        let seed_entry = &prepared[seed];

        for other in (seed + 1)..prepared.len() {
            if claimed[other] {
                continue;
            }

            let entry = &prepared[other];
            if entry.ingredient.candidate.recipe_id == seed_entry.ingredient.candidate.recipe_id {
                continue;
            }

            if is_plausible_match(similarity(&seed_entry.name, &entry.name)) {
                claimed[other] = true;
                group.push(other);
            }
        }

        groups.push(group);
    }

    groups
}

/// Phase 2: best existing item decides exact, partial or new
fn match_against_list(entry: Prepared, existing: &[GroceryListItem], reconciliation: &mut Reconciliation) {
    let mut best: Option<(&GroceryListItem, f64)> = None;

    for item in existing {
        let score = similarity(&entry.name, &normalize_name(&item.name));
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((item, score));
        }
    }

    let ingredient = entry.into_matched();

    match best {
        Some((item, confidence)) if is_exact_match(confidence) => {
            reconciliation.exact_matches.push(MatchResult::ExactMatch {
                ingredient,
                existing_item: item.clone(),
                confidence,
            });
        }
        Some((item, confidence)) if is_plausible_match(confidence) => {
            reconciliation.partial_matches.push(MatchResult::PartialMatch {
                ingredient,
                existing_item: item.clone(),
                confidence,
            });
        }
        best => {
            reconciliation.new_items.push(MatchResult::NewItem {
                ingredient,
                confidence: best.map_or(0.0, |(_, score)| score),
            });
        }
    }
}

pub(crate) fn ensure_unique_ids(items: &[GroceryListItem]) -> ShoppingResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        if !seen.insert(item.id.as_str()) {
            return Err(ShoppingError::DuplicateItemId(item.id.clone()));
        }
    }

    Ok(())
}
