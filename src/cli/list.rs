use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use grocer_shopping::{
    collect_candidates, find_duplicates, plan_reconciliation, resolve_duplicates, Category, DuplicateGroup,
    GroceryListItem, ListMutation, NewItemSlot, Reconciliation, RecipeInclusion, Resolution,
};
use serde::Serialize;

use super::{read_json, write_json};
use crate::config::Config;
use crate::error::AppError;

#[derive(Serialize)]
struct PlannedReconciliation {
    reconciliation: Reconciliation,
    mutations: Vec<ListMutation>,
}

#[derive(Serialize)]
struct ResolvedGroup {
    group: DuplicateGroup,
    mutations: Vec<ListMutation>,
}

/// Reconcile a batch of recipes against a list, optionally planning the
/// list mutations that accept every result
#[tracing::instrument(skip(config, out))]
pub fn reconcile(config: &Config, recipes_path: &Path, list_path: &Path, plan: bool, out: &mut impl Write) -> Result<()> {
    let recipes: Vec<RecipeInclusion> = read_json(recipes_path)?;
    let items: Vec<GroceryListItem> = read_json(list_path)?;

    let candidates = collect_candidates(&recipes);
    tracing::info!(
        recipes = recipes.len(),
        candidates = candidates.len(),
        items = items.len(),
        "Reconciling recipes against list"
    );

    let reconciliation = grocer_shopping::reconcile(&candidates, &items).map_err(AppError::from)?;

    if !plan {
        return write_json(out, &reconciliation, config.output.pretty);
    }

    let fallback = config.list.fallback_category().map_err(AppError::ValidationError)?;
    let mut next_order = items.iter().map(|item| item.order).max().unwrap_or(0);
    let taken: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
    let mut created = 0;

    let mutations = plan_reconciliation(&reconciliation, || {
        next_order += 1;
        let id = loop {
            created += 1;
            let id = format!("new-{created}");
            if !taken.contains(id.as_str()) {
                break id;
            }
        };
        NewItemSlot { id, order: next_order }
    })
    .into_iter()
    .map(|mutation| with_fallback_category(mutation, fallback))
    .collect();

    write_json(
        out,
        &PlannedReconciliation {
            reconciliation,
            mutations,
        },
        config.output.pretty,
    )
}

/// Report duplicate groups, with the mutations for `resolution` when given
#[tracing::instrument(skip(config, out))]
pub fn duplicates(config: &Config, list_path: &Path, resolution: Option<Resolution>, out: &mut impl Write) -> Result<()> {
    let items: Vec<GroceryListItem> = read_json(list_path)?;
    let groups = find_duplicates(&items).map_err(AppError::from)?;

    tracing::info!(items = items.len(), groups = groups.len(), "Scanned list for duplicates");

    let Some(resolution) = resolution else {
        return write_json(out, &groups, config.output.pretty);
    };

    let resolved = groups
        .into_iter()
        .map(|group| {
            let mutations = resolve_duplicates(&group, resolution)?;
            Ok(ResolvedGroup { group, mutations })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    write_json(out, &resolved, config.output.pretty)
}

fn with_fallback_category(mutation: ListMutation, fallback: Category) -> ListMutation {
    match mutation {
        ListMutation::Create { mut item } if item.category == Category::Other.as_ref() => {
            item.category = fallback.to_string();
            ListMutation::Create { item }
        }
        mutation => mutation,
    }
}
