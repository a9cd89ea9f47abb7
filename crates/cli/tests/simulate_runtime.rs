use std::fs;

use souschef_cli::commands::simulate;
use tempfile::TempDir;

fn write_script(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("script should be writable");
    path
}

const FULL_WALK: &str = r#"{
  "recipes": [
    {
      "name": "two-minute omelette",
      "rating": 4.5,
      "total_time_secs": 120,
      "source_name": "Fixture Kitchen",
      "ingredients": ["egg", "milk"]
    }
  ],
  "cart": [],
  "products": {
    "egg": [ { "id": "p-egg", "name": "Free Range Eggs", "price": "4.99" } ],
    "milk": [ { "id": "p-milk", "name": "Whole Milk", "price": "3.49" } ]
  },
  "turns": [
    { "intent": "get_recipe", "slots": { "recipe": "omelette" } },
    { "intent": "select_recipe" },
    { "intent": "get_product" },
    { "intent": "add_product", "slots": { "number": 1 } },
    { "intent": "get_product" },
    { "intent": "add_product", "slots": { "number": 1 } }
  ]
}"#;

#[test]
fn replays_a_full_walk_to_the_survey_prompt() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_script(&dir, "walk.json", FULL_WALK);

    let result = simulate::run(&path);

    assert_eq!(result.exit_code, 0, "simulate failed: {}", result.output);
    assert!(result.output.contains("> get_recipe"));
    assert!(result.output.contains("two-minute omelette"));
    assert!(result.output.contains("Free Range Eggs"));
    assert!(result.output.contains("done adding"));
    assert!(result.output.trim_end().ends_with("(conversation ended)"));
}

#[test]
fn expired_contexts_degrade_to_a_restart_prompt() {
    // Two wasted turns exhaust the recipe_selection TTL of two, so the
    // browse on turn four finds no context and answers with a restart
    // prompt instead of crashing.
    let script = r#"{
  "recipes": [
    {
      "name": "two-minute omelette",
      "rating": 4.5,
      "total_time_secs": 120,
      "source_name": "Fixture Kitchen",
      "ingredients": ["egg"]
    }
  ],
  "turns": [
    { "intent": "get_recipe", "slots": { "recipe": "omelette" } },
    { "intent": "get_product" },
    { "intent": "get_product" },
    { "intent": "get_another_recipe" }
  ]
}"#;
    let dir = TempDir::new().expect("temp dir");
    let path = write_script(&dir, "expiry.json", script);

    let result = simulate::run(&path);
    assert_eq!(result.exit_code, 0, "simulate failed: {}", result.output);
    assert!(result.output.contains("start over"));
}

#[test]
fn unknown_intents_fail_the_script() {
    let script = r#"{ "turns": [ { "intent": "order_pizza" } ] }"#;
    let dir = TempDir::new().expect("temp dir");
    let path = write_script(&dir, "bad.json", script);

    let result = simulate::run(&path);
    assert_eq!(result.exit_code, 1);
    assert!(result.output.contains("order_pizza"));
}

#[test]
fn missing_script_files_report_an_io_failure() {
    let dir = TempDir::new().expect("temp dir");
    let result = simulate::run(&dir.path().join("nope.json"));
    assert_eq!(result.exit_code, 1);
    assert!(result.output.contains("could not read script"));
}
