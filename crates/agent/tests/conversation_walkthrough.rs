//! Drives a whole conversation through the runtime the way the host would:
//! each turn's context writes become the next turn's restored contexts.

use serde_json::json;

use souschef_agent::fixtures::{FixtureCart, FixtureCatalog, FixtureProducts};
use souschef_agent::{AgentRuntime, Disposition, Intent, SlotValues, TurnRequest, TurnResponse};
use souschef_core::{CatalogId, ContextBag, RecipeCandidate, SURVEY_CONTEXT};

fn omelette() -> RecipeCandidate {
    RecipeCandidate {
        name: "two-minute omelette".to_string(),
        rating: 4.5,
        total_time_secs: 120,
        source_name: "Fixture Kitchen".to_string(),
        ingredients: vec!["egg".to_string(), "milk".to_string()],
    }
}

fn carry_contexts(response: &TurnResponse) -> ContextBag {
    response
        .context_writes
        .iter()
        .map(|write| (write.name.clone(), write.payload.clone()))
        .collect()
}

fn turn(intent: Intent, slots: SlotValues, contexts: ContextBag, id: &str) -> TurnRequest {
    TurnRequest { intent, slots, contexts, correlation_id: id.to_string() }
}

fn slot(name: &str, value: serde_json::Value) -> SlotValues {
    SlotValues::from_iter([(name.to_string(), value)])
}

#[tokio::test]
async fn empty_cart_walkthrough_commits_every_ingredient_then_surveys() {
    let cart = FixtureCart::new(Vec::new());
    let products = FixtureProducts::default()
        .with_hits("egg", vec![("p-egg", "Free Range Eggs", "4.99")])
        .with_hits("milk", vec![("p-milk", "Whole Milk", "3.49")]);
    let runtime =
        AgentRuntime::new(FixtureCatalog::with_candidates(vec![omelette()]), cart, products);

    // Turn 1: find a recipe.
    let response = runtime
        .handle(turn(
            Intent::FindRecipe,
            slot("recipe", json!("omelette")),
            ContextBag::new(),
            "t-1",
        ))
        .await;
    assert!(response.prompt.contains("two-minute omelette"));
    assert_eq!(response.disposition, Disposition::Await);

    // Turn 2: select it. The cart is empty, so the first ingredient is
    // proposed outright.
    let response = runtime
        .handle(turn(
            Intent::SelectRecipe,
            SlotValues::new(),
            carry_contexts(&response),
            "t-2",
        ))
        .await;
    assert!(response.prompt.contains("The first ingredient is egg"));
    assert!(response.prompt.contains("add egg to your cart"));

    // Turn 3: yes - no cart match, so product search proposes the first hit.
    let response = runtime
        .handle(turn(
            Intent::ResolveProduct,
            SlotValues::new(),
            carry_contexts(&response),
            "t-3",
        ))
        .await;
    assert!(response.prompt.contains("Free Range Eggs"));

    // Turn 4: one egg carton, committed and advanced to milk.
    let response = runtime
        .handle(turn(
            Intent::AddProduct,
            slot("number", json!(1)),
            carry_contexts(&response),
            "t-4",
        ))
        .await;
    assert!(response.prompt.contains("has been added to your cart"));
    assert!(response.prompt.contains("milk"));
    assert_eq!(response.disposition, Disposition::Await);

    // Turn 5: yes again - milk also needs a product search.
    let response = runtime
        .handle(turn(
            Intent::ResolveProduct,
            SlotValues::new(),
            carry_contexts(&response),
            "t-5",
        ))
        .await;
    assert!(response.prompt.contains("Whole Milk"));

    // Turn 6: one milk; the walk is complete and the survey context is
    // written alongside the terminal message.
    let response = runtime
        .handle(turn(
            Intent::AddProduct,
            slot("number", json!(1)),
            carry_contexts(&response),
            "t-6",
        ))
        .await;
    assert_eq!(response.disposition, Disposition::End);
    assert!(response.prompt.contains("done adding"));
    assert_eq!(response.context_writes.len(), 1);
    assert_eq!(response.context_writes[0].name, SURVEY_CONTEXT);
}

#[tokio::test]
async fn existing_cart_entries_are_topped_up_additively() {
    let cart = FixtureCart::new(vec![souschef_core::CartEntry {
        id: CatalogId("p-egg".to_string()),
        display_name: "Large Eggs".to_string(),
        quantity: 2,
    }]);
    let runtime = AgentRuntime::new(
        FixtureCatalog::with_candidates(vec![omelette()]),
        cart,
        FixtureProducts::default().with_hits("milk", vec![("p-milk", "Whole Milk", "3.49")]),
    );

    let response = runtime
        .handle(turn(
            Intent::FindRecipe,
            slot("recipe", json!("omelette")),
            ContextBag::new(),
            "t-1",
        ))
        .await;

    // Selecting matches "egg" against the existing "Large Eggs" entry.
    let response = runtime
        .handle(turn(
            Intent::SelectRecipe,
            SlotValues::new(),
            carry_contexts(&response),
            "t-2",
        ))
        .await;
    assert!(response.prompt.contains("You have 2 items of Large Eggs"));
    assert!(response.prompt.contains("add more Large Eggs"));

    // Yes: the match is already in hand, so we go straight to quantity.
    let response = runtime
        .handle(turn(
            Intent::ResolveProduct,
            SlotValues::new(),
            carry_contexts(&response),
            "t-3",
        ))
        .await;
    assert!(response.prompt.contains("How many items of Large Eggs"));

    // Three more: 2 already in the cart + 3 requested = 5 in the PUT body.
    let response = runtime
        .handle(turn(
            Intent::AddProduct,
            slot("number", json!(3)),
            carry_contexts(&response),
            "t-4",
        ))
        .await;
    assert!(response.prompt.contains("3 Large Eggs has been added"));
    assert!(response.prompt.contains("milk"));
}

#[tokio::test]
async fn browsing_runs_through_the_ranked_list_in_order() {
    let mut slow = omelette();
    slow.name = "slow-baked frittata".to_string();
    slow.total_time_secs = 3_600;
    let runtime = AgentRuntime::new(
        FixtureCatalog::with_candidates(vec![slow, omelette()]),
        FixtureCart::new(Vec::new()),
        FixtureProducts::default(),
    );

    let response = runtime
        .handle(turn(
            Intent::FindRecipe,
            slot("recipe", json!("omelette")),
            ContextBag::new(),
            "t-1",
        ))
        .await;
    assert!(response.prompt.contains("two-minute omelette"), "fastest recipe comes first");

    let response = runtime
        .handle(turn(
            Intent::AnotherRecipe,
            SlotValues::new(),
            carry_contexts(&response),
            "t-2",
        ))
        .await;
    assert!(response.prompt.contains("slow-baked frittata"));
    assert_eq!(response.disposition, Disposition::Await);

    let response = runtime
        .handle(turn(
            Intent::AnotherRecipe,
            SlotValues::new(),
            carry_contexts(&response),
            "t-3",
        ))
        .await;
    assert_eq!(response.disposition, Disposition::End);
    assert!(response.prompt.contains("no more recipes"));
    assert!(response.context_writes.is_empty());
}
