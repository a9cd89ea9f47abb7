use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use souschef_agent::fixtures::{FixtureCart, FixtureCatalog, FixtureProducts};
use souschef_agent::{AgentRuntime, Intent, SlotValues, TurnRequest};
use souschef_core::{CartEntry, ContextBag, RecipeCandidate};

use super::CommandResult;

/// A canned world plus the turns to play through it. Fixtures stand in for
/// the three external collaborators, so the whole conversation core runs
/// exactly as in production with zero network.
#[derive(Debug, Deserialize)]
struct SimulationScript {
    #[serde(default)]
    recipes: Vec<RecipeCandidate>,
    #[serde(default)]
    cart: Vec<CartEntry>,
    #[serde(default)]
    products: HashMap<String, Vec<ScriptProduct>>,
    turns: Vec<ScriptTurn>,
}

#[derive(Debug, Deserialize)]
struct ScriptProduct {
    id: String,
    name: String,
    price: String,
}

#[derive(Debug, Deserialize)]
struct ScriptTurn {
    intent: String,
    #[serde(default)]
    slots: HashMap<String, Value>,
}

struct LiveContext {
    name: String,
    remaining: u32,
    payload: Value,
}

pub fn run(script_path: &Path) -> CommandResult {
    let raw = match std::fs::read_to_string(script_path) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure(
                "simulate",
                "io",
                format!("could not read script `{}`: {error}", script_path.display()),
                1,
            );
        }
    };

    let script: SimulationScript = match serde_json::from_str(&raw) {
        Ok(script) => script,
        Err(error) => {
            return CommandResult::failure(
                "simulate",
                "parse",
                format!("could not parse script `{}`: {error}", script_path.display()),
                1,
            );
        }
    };

    let mut products = FixtureProducts::default();
    for (query, hits) in &script.products {
        let hits =
            hits.iter().map(|p| (p.id.as_str(), p.name.as_str(), p.price.as_str())).collect();
        products = products.with_hits(query, hits);
    }
    let runtime = AgentRuntime::new(
        FixtureCatalog::with_candidates(script.recipes.clone()),
        FixtureCart::new(script.cart.clone()),
        products,
    );

    let tokio_runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "simulate",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            );
        }
    };

    let mut live: Vec<LiveContext> = Vec::new();
    let mut transcript = Vec::new();
    let mut ended = false;

    for (index, scripted) in script.turns.iter().enumerate() {
        if ended {
            return CommandResult::failure(
                "simulate",
                "script",
                format!("turn {} arrives after the conversation already ended", index + 1),
                1,
            );
        }

        let intent: Intent = match scripted.intent.parse() {
            Ok(intent) => intent,
            Err(error) => {
                return CommandResult::failure("simulate", "intent", error.to_string(), 1);
            }
        };

        let contexts = live
            .iter()
            .map(|context| (context.name.clone(), context.payload.clone()))
            .collect::<ContextBag>();
        let slots = scripted
            .slots
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect::<SlotValues>();
        let request =
            TurnRequest { intent, slots, contexts, correlation_id: format!("sim-{}", index + 1) };

        let response = tokio_runtime.block_on(runtime.handle(request));

        transcript.push(format!("> {}", scripted.intent));
        transcript.push(format!("< {}", response.prompt));

        // Host TTL semantics: contexts not refreshed this turn lose one turn
        // of life; a write replaces its namesake at full lifespan.
        for context in &mut live {
            context.remaining = context.remaining.saturating_sub(1);
        }
        for write in &response.context_writes {
            live.retain(|context| context.name != write.name);
            live.push(LiveContext {
                name: write.name.clone(),
                remaining: write.lifespan_turns,
                payload: write.payload.clone(),
            });
        }
        live.retain(|context| context.remaining > 0);

        if !response.expects_input() {
            ended = true;
            transcript.push("(conversation ended)".to_string());
        }
    }

    CommandResult { exit_code: 0, output: transcript.join("\n") }
}
