use grocer_shopping::{
    collect_candidates, plan_reconciliation, reconcile, GroceryListItem, ListMutation, MatchResult, NewItemSlot,
    RecipeInclusion, ShoppingError, RECIPE_TO_RECIPE_CONFIDENCE,
};

fn recipe(recipe_id: &str, multiplier: f64, lines: &[&str]) -> RecipeInclusion {
    RecipeInclusion {
        recipe_id: recipe_id.to_string(),
        variant_id: None,
        recipe_title: format!("Recipe {recipe_id}"),
        multiplier,
        lines: lines.iter().map(|line| line.to_string()).collect(),
    }
}

fn list_item(id: &str, name: &str, quantity: Option<&str>, unit: Option<&str>) -> GroceryListItem {
    GroceryListItem {
        id: id.to_string(),
        name: name.to_string(),
        quantity: quantity.map(str::to_string),
        unit: unit.map(str::to_string),
        category: "Produce".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_same_ingredient_across_recipes_is_one_group() {
    let candidates = collect_candidates(&[
        recipe("a", 1.0, &["1 cup onion, diced"]),
        recipe("b", 1.0, &["2 onions"]),
    ]);

    let result = reconcile(&candidates, &[]).unwrap();

    assert!(result.exact_matches.is_empty());
    assert!(result.new_items.is_empty());
    assert_eq!(result.partial_matches.len(), 1);

    let MatchResult::RecipeToRecipeMatch { ingredients, confidence } = &result.partial_matches[0] else {
        panic!("expected a recipe-to-recipe group, got {:?}", result.partial_matches[0]);
    };
    assert_eq!(*confidence, RECIPE_TO_RECIPE_CONFIDENCE);
    assert_eq!(ingredients.len(), 2);
    assert_eq!(ingredients[0].candidate.recipe_id, "a");
    assert_eq!(ingredients[1].candidate.recipe_id, "b");
}

#[test]
fn test_exact_match_combines_into_existing_quantity() {
    let candidates = collect_candidates(&[recipe("a", 1.0, &["1 cup onion"])]);
    let existing = vec![list_item("item-1", "onion", Some("1"), Some("cup"))];

    let result = reconcile(&candidates, &existing).unwrap();

    assert_eq!(result.exact_matches.len(), 1);
    let combined = result.exact_matches[0].combined_quantity();
    assert_eq!(combined.quantity.as_deref(), Some("2"));
    assert_eq!(combined.unit.as_deref(), Some("cup"));
    assert!(!combined.needs_review);
}

#[test]
fn test_multiplier_is_applied_before_combining() {
    let candidates = collect_candidates(&[recipe("a", 2.0, &["1 1/2 cups flour", "2 tbsp sugar"])]);
    let existing = vec![
        list_item("flour", "flour", Some("1"), Some("cup")),
        list_item("sugar", "sugar", Some("1"), Some("cup")),
    ];

    let result = reconcile(&candidates, &existing).unwrap();

    assert_eq!(result.exact_matches.len(), 2);
    assert_eq!(result.exact_matches[0].ingredients()[0].quantity.as_deref(), Some("3"));
    assert_eq!(result.exact_matches[0].combined_quantity().quantity.as_deref(), Some("4"));
    // 1 cup + 4 tbsp = 1¼ cups
    assert_eq!(result.exact_matches[1].combined_quantity().quantity.as_deref(), Some("1¼"));
}

#[test]
fn test_scaled_group_combines_exact_amounts() {
    let candidates = collect_candidates(&[
        recipe("a", 1.1, &["1/3 tsp salt"]),
        recipe("b", 1.1, &["1/3 tsp salt"]),
    ]);

    let result = reconcile(&candidates, &[]).unwrap();

    let group = &result.partial_matches[0];
    assert!(group.is_recipe_to_recipe());
    assert_eq!(group.ingredients()[0].quantity.as_deref(), Some("0.37"));
    let combined = group.combined_quantity();
    assert_eq!(combined.quantity.as_deref(), Some("0.73"));
    assert_eq!(combined.unit.as_deref(), Some("tsp"));
}

#[test]
fn test_tiny_addition_to_large_item_is_flagged_for_review() {
    let candidates = collect_candidates(&[recipe("a", 1.0, &["1 g flour"])]);
    let existing = vec![list_item("flour", "flour", Some("1"), Some("kg"))];

    let result = reconcile(&candidates, &existing).unwrap();

    let combined = result.exact_matches[0].combined_quantity();
    assert_eq!(combined.quantity.as_deref(), Some("1 kg + 1 g"));
    assert!(combined.needs_review);
}

#[test]
fn test_incompatible_units_are_flagged_for_review() {
    let candidates = collect_candidates(&[recipe("a", 1.0, &["1 tbsp garlic"])]);
    let existing = vec![list_item("garlic", "garlic", Some("2"), Some("cloves"))];

    let result = reconcile(&candidates, &existing).unwrap();

    let combined = result.exact_matches[0].combined_quantity();
    assert_eq!(combined.quantity.as_deref(), Some("2 cloves + 1 tbsp"));
    assert_eq!(combined.unit, None);
    assert!(combined.needs_review);
}

#[test]
fn test_invalid_multiplier_is_an_error() {
    let candidates = collect_candidates(&[recipe("a", -1.0, &["2 eggs"])]);

    assert_eq!(reconcile(&candidates, &[]), Err(ShoppingError::InvalidMultiplier(-1.0)));
}

#[test]
fn test_unrepresentable_multiplier_is_a_distinct_error() {
    let candidates = collect_candidates(&[recipe("a", 1e20, &["2 eggs"])]);

    assert_eq!(reconcile(&candidates, &[]), Err(ShoppingError::MultiplierOutOfRange(1e20)));
}

#[test]
fn test_results_are_deterministic() {
    let candidates = collect_candidates(&[
        recipe("a", 1.0, &["2 tomatoes", "1 cup basil", "salt to taste"]),
        recipe("b", 1.5, &["3 tomatoes (ripe)", "1 tsp salt"]),
    ]);
    let existing = vec![list_item("1", "tomato", Some("1"), None), list_item("2", "basil", None, None)];

    assert_eq!(reconcile(&candidates, &existing), reconcile(&candidates, &existing));
}

#[test]
fn test_plan_reconciliation_produces_list_mutations() {
    let candidates = collect_candidates(&[
        recipe("a", 1.0, &["1 cup onion", "2 carrots"]),
        recipe("b", 1.0, &["1 carrot"]),
    ]);
    let existing = vec![list_item("onion", "onion", Some("1"), Some("cup"))];
    let result = reconcile(&candidates, &existing).unwrap();

    let mut next = 0;
    let mutations = plan_reconciliation(&result, || {
        next += 1;
        NewItemSlot {
            id: format!("new-{next}"),
            order: next,
        }
    });

    assert_eq!(mutations.len(), 2);

    let ListMutation::Update { item } = &mutations[0] else {
        panic!("expected an update, got {:?}", mutations[0]);
    };
    assert_eq!(item.id, "onion");
    assert_eq!(item.quantity.as_deref(), Some("2"));

    let ListMutation::Create { item } = &mutations[1] else {
        panic!("expected a create, got {:?}", mutations[1]);
    };
    assert_eq!(item.id, "new-1");
    assert_eq!(item.name, "carrots");
    assert_eq!(item.quantity.as_deref(), Some("3"));
    assert_eq!(item.category, "Produce");
}

#[test]
fn test_reconciliation_serializes_for_callers() {
    let candidates = collect_candidates(&[recipe("a", 1.0, &["2 eggs"])]);
    let result = reconcile(&candidates, &[]).unwrap();

    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["new_items"][0]["kind"], "new_item");
    assert_eq!(json["new_items"][0]["ingredient"]["candidate"]["recipe_id"], "a");
    assert_eq!(json["exact_matches"], serde_json::json!([]));
}
