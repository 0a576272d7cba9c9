use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::categorization::categorize;
use crate::combine::{combine_notes, CombinedQuantity, QuantityFold, QuantityTerm};
use crate::error::{ShoppingError, ShoppingResult};
use crate::model::{DuplicateGroup, GroceryListItem, MatchResult, Reconciliation};

/// A change to the persisted list
///
/// A batch of mutations produced by one call must be applied atomically,
/// otherwise a merge can leave the list with both the updated primary and
/// the items folded into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListMutation {
    Update { item: GroceryListItem },
    Create { item: GroceryListItem },
    Delete { id: String },
}

/// Id and position for an item about to be created, supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemSlot {
    pub id: String,
    pub order: i64,
}

/// User decision on a duplicate group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Resolution {
    Merge,
    KeepSeparate,
}

/// Mutations that accept one match result
///
/// Exact and partial matches update the existing item in place: quantity,
/// unit and notes change, everything else is kept. Recipe-to-recipe groups
/// and new items create one item each, taking an id and order from
/// `next_slot`.
pub fn plan_match<F>(result: &MatchResult, next_slot: &mut F) -> Vec<ListMutation>
where
    F: FnMut() -> NewItemSlot,
{
    let combined = result.combined_quantity();
    let notes = result.combined_notes();

    if combined.needs_review {
        tracing::warn!(quantity = ?combined.quantity, "Combined quantity needs manual review");
    }

    if let Some(existing) = result.existing_item() {
        return vec![ListMutation::Update {
            item: updated(existing, combined, notes),
        }];
    }

    let Some(first) = result.ingredients().first() else {
        return Vec::new();
    };

    let name = first.name().trim().to_string();
    let slot = next_slot();

    vec![ListMutation::Create {
        item: GroceryListItem {
            id: slot.id,
            category: categorize(&name).to_string(),
            name,
            quantity: combined.quantity,
            unit: combined.unit,
            notes,
            order: slot.order,
            is_completed: false,
        },
    }]
}

/// [`plan_match`] over every result, exact matches first
pub fn plan_reconciliation<F>(reconciliation: &Reconciliation, mut next_slot: F) -> Vec<ListMutation>
where
    F: FnMut() -> NewItemSlot,
{
    reconciliation
        .iter()
        .flat_map(|result| plan_match(result, &mut next_slot))
        .collect()
}

/// Mutations that apply the user's decision on a duplicate group
///
/// Merging folds every duplicate's quantity and notes into the primary item,
/// in group order, then deletes the duplicates.
///
/// # Errors
/// * `ShoppingError::EmptyGroup` when asked to merge a group with no duplicates
pub fn resolve_duplicates(group: &DuplicateGroup, resolution: Resolution) -> ShoppingResult<Vec<ListMutation>> {
    match resolution {
        Resolution::KeepSeparate => Ok(Vec::new()),
        Resolution::Merge => {
            if group.duplicate_items.is_empty() {
                return Err(ShoppingError::EmptyGroup);
            }

            let primary = &group.primary_item;
            let mut fold = QuantityFold::default();
            let mut notes = primary.notes.clone();

            for item in group.items() {
                fold.add(QuantityTerm::parse(item.quantity.as_deref(), item.unit.as_deref()));
            }
            for duplicate in &group.duplicate_items {
                notes = combine_notes(notes.as_deref(), duplicate.notes.as_deref());
            }
            let combined = fold.finish();

            tracing::info!(
                primary = %primary.id,
                merged = group.duplicate_items.len(),
                needs_review = combined.needs_review,
                "Merging duplicate items"
            );

            let mut mutations = vec![ListMutation::Update {
                item: updated(primary, combined, notes),
            }];
            mutations.extend(
                group
                    .duplicate_items
                    .iter()
                    .map(|item| ListMutation::Delete { id: item.id.clone() }),
            );

            Ok(mutations)
        }
    }
}

fn updated(item: &GroceryListItem, combined: CombinedQuantity, notes: Option<String>) -> GroceryListItem {
    GroceryListItem {
        quantity: combined.quantity,
        unit: combined.unit,
        notes,
        ..item.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::parse_ingredient_line;
    use crate::model::{CandidateIngredient, MatchedIngredient};

    fn matched(line: &str, recipe_id: &str) -> MatchedIngredient {
        MatchedIngredient::new(CandidateIngredient {
            ingredient: parse_ingredient_line(line),
            recipe_id: recipe_id.to_string(),
            variant_id: None,
            multiplier: 1.0,
            recipe_title: String::new(),
            source_index: 0,
        })
        .unwrap()
    }

    fn item(id: &str, name: &str, quantity: &str, unit: Option<&str>) -> GroceryListItem {
        GroceryListItem {
            id: id.to_string(),
            name: name.to_string(),
            quantity: Some(quantity.to_string()),
            unit: unit.map(str::to_string),
            category: "Produce".to_string(),
            order: 3,
            ..Default::default()
        }
    }

    fn slots() -> impl FnMut() -> NewItemSlot {
        let mut next = 0;
        move || {
            next += 1;
            NewItemSlot {
                id: format!("new-{next}"),
                order: 100 + next,
            }
        }
    }

    #[test]
    fn test_exact_match_updates_existing_item() {
        let result = MatchResult::ExactMatch {
            ingredient: matched("1 cup onion (diced)", "a"),
            existing_item: item("1", "onion", "1", Some("cup")),
            confidence: 1.0,
        };

        let mutations = plan_match(&result, &mut slots());

        assert_eq!(
            mutations,
            vec![ListMutation::Update {
                item: GroceryListItem {
                    quantity: Some("2".to_string()),
                    notes: Some("diced".to_string()),
                    ..item("1", "onion", "1", Some("cup"))
                }
            }]
        );
    }

    #[test]
    fn test_new_item_is_created_and_categorized() {
        let result = MatchResult::NewItem {
            ingredient: matched("2 tbsp olive oil", "a"),
            confidence: 0.1,
        };

        let mutations = plan_match(&result, &mut slots());

        let [ListMutation::Create { item }] = mutations.as_slice() else {
            panic!("expected a single create, got {mutations:?}");
        };
        assert_eq!(item.id, "new-1");
        assert_eq!(item.order, 101);
        assert_eq!(item.name, "olive oil");
        assert_eq!(item.quantity.as_deref(), Some("2"));
        assert_eq!(item.unit.as_deref(), Some("tbsp"));
        assert_eq!(item.category, "Pantry");
        assert!(!item.is_completed);
    }

    #[test]
    fn test_recipe_group_creates_one_item() {
        let result = MatchResult::RecipeToRecipeMatch {
            ingredients: vec![matched("1 onion", "a"), matched("2 onions", "b")],
            confidence: 0.8,
        };

        let mutations = plan_match(&result, &mut slots());

        let [ListMutation::Create { item }] = mutations.as_slice() else {
            panic!("expected a single create, got {mutations:?}");
        };
        assert_eq!(item.name, "onion");
        assert_eq!(item.quantity.as_deref(), Some("3"));
        assert_eq!(item.unit, None);
    }

    #[test]
    fn test_merge_updates_primary_then_deletes_duplicates() {
        let group = DuplicateGroup {
            primary_item: item("1", "tomato", "2", None),
            duplicate_items: vec![item("2", "tomatoes", "3", None)],
            confidence: 0.9,
        };

        let mutations = resolve_duplicates(&group, Resolution::Merge).unwrap();

        assert_eq!(mutations.len(), 2);
        assert_eq!(
            mutations[0],
            ListMutation::Update {
                item: item("1", "tomato", "5", None)
            }
        );
        assert_eq!(mutations[1], ListMutation::Delete { id: "2".to_string() });
    }

    #[test]
    fn test_merge_keeps_amounts_that_would_round_away() {
        let group = DuplicateGroup {
            primary_item: item("1", "flour", "1", Some("kg")),
            duplicate_items: vec![item("2", "flour", "4", Some("g")), item("3", "flour", "4", Some("g"))],
            confidence: 1.0,
        };

        let mutations = resolve_duplicates(&group, Resolution::Merge).unwrap();

        assert_eq!(
            mutations[0],
            ListMutation::Update {
                item: GroceryListItem {
                    quantity: Some("1 kg + 4 g + 4 g".to_string()),
                    unit: None,
                    ..item("1", "flour", "1", Some("kg"))
                }
            }
        );
    }

    #[test]
    fn test_keep_separate_changes_nothing() {
        let group = DuplicateGroup {
            primary_item: item("1", "tomato", "2", None),
            duplicate_items: vec![item("2", "tomatoes", "3", None)],
            confidence: 0.9,
        };

        assert_eq!(resolve_duplicates(&group, Resolution::KeepSeparate), Ok(Vec::new()));
    }

    #[test]
    fn test_merge_without_duplicates_is_rejected() {
        let group = DuplicateGroup {
            primary_item: item("1", "tomato", "2", None),
            duplicate_items: Vec::new(),
            confidence: 0.0,
        };

        assert_eq!(
            resolve_duplicates(&group, Resolution::Merge),
            Err(ShoppingError::EmptyGroup)
        );
    }

    #[test]
    fn test_resolution_parses_from_snake_case() {
        assert_eq!("keep_separate".parse::<Resolution>(), Ok(Resolution::KeepSeparate));
        assert_eq!(Resolution::Merge.to_string(), "merge");
    }
}
