use crate::error::ShoppingResult;
use crate::matching::ensure_unique_ids;
use crate::model::{DuplicateGroup, GroceryListItem};
use crate::similarity::{is_plausible_match, normalize_name, similarity};

/// Find existing list items that look like the same ingredient
///
/// Items are taken as seeds in list order. A seed claims every later
/// unclaimed item scoring at least the match threshold against it, so no
/// item appears in two groups. A group's confidence is the highest pairwise
/// score among all of its members.
///
/// Completed items take part like any other item.
///
/// # Errors
/// * `ShoppingError::DuplicateItemId` if two items share an id
#[tracing::instrument(skip_all, fields(items = items.len()))]
pub fn find_duplicates(items: &[GroceryListItem]) -> ShoppingResult<Vec<DuplicateGroup>> {
    ensure_unique_ids(items)?;

    let names: Vec<String> = items.iter().map(|item| normalize_name(&item.name)).collect();
    let mut claimed = vec![false; items.len()];
    let mut groups = Vec::new();

    for seed in 0..items.len() {
        if claimed[seed] {
            continue;
        }
        claimed[seed] = true;

        let mut members = vec![seed];
        for other in (seed + 1)..items.len() {
            if !claimed[other] && is_plausible_match(similarity(&names[seed], &names[other])) {
                claimed[other] = true;
                members.push(other);
            }
        }

        if members.len() < 2 {
            continue;
        }

        let confidence = max_pairwise_score(&names, &members);

        tracing::debug!(
            primary = %items[seed].name,
            size = members.len(),
            confidence,
            "Found duplicate group"
        );

        groups.push(DuplicateGroup {
            primary_item: items[seed].clone(),
            duplicate_items: members[1..].iter().map(|&index| items[index].clone()).collect(),
            confidence,
        });
    }

    Ok(groups)
}

fn max_pairwise_score(names: &[String], members: &[usize]) -> f64 {
    let mut best = 0.0_f64;

    for (position, &a) in members.iter().enumerate() {
        for &b in &members[position + 1..] {
            best = best.max(similarity(&names[a], &names[b]));
        }
    }

    best
}
