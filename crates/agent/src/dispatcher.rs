use std::collections::HashMap;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use souschef_core::{ContextBag, ContextWrite, TurnError};

pub const RECIPE_SLOT: &str = "recipe";
pub const QUANTITY_SLOT: &str = "number";

/// The intents the upstream NLU can fire at this webhook. Wire names are the
/// action strings configured in the conversation host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    FindRecipe,
    AnotherRecipe,
    SelectRecipe,
    ResolveProduct,
    AddProduct,
    SkipProduct,
}

impl Intent {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::FindRecipe => "get_recipe",
            Self::AnotherRecipe => "get_another_recipe",
            Self::SelectRecipe => "select_recipe",
            Self::ResolveProduct => "get_product",
            Self::AddProduct => "add_product",
            Self::SkipProduct => "next_product",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown intent `{0}`")]
pub struct UnknownIntentError(pub String);

impl FromStr for Intent {
    type Err = UnknownIntentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "get_recipe" => Ok(Self::FindRecipe),
            "get_another_recipe" => Ok(Self::AnotherRecipe),
            "select_recipe" => Ok(Self::SelectRecipe),
            "get_product" => Ok(Self::ResolveProduct),
            "add_product" => Ok(Self::AddProduct),
            "next_product" => Ok(Self::SkipProduct),
            other => Err(UnknownIntentError(other.to_string())),
        }
    }
}

/// Named slot values extracted by the upstream NLU.
#[derive(Clone, Debug, Default)]
pub struct SlotValues {
    values: HashMap<String, Value>,
}

impl SlotValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: impl Into<String>, value: Value) {
        self.values.insert(slot.into(), value);
    }

    /// A non-empty free-text slot, if present.
    pub fn text(&self, slot: &str) -> Option<&str> {
        self.values
            .get(slot)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Explicit parse-and-validate for a quantity slot: a positive whole
    /// number, arriving as a JSON integer, an integral float, or a numeric
    /// string. Anything else is a `Validation` failure for re-prompting,
    /// never a silent coercion.
    pub fn quantity(&self, slot: &'static str) -> Result<u32, TurnError> {
        let value = self.values.get(slot).ok_or(TurnError::Validation {
            slot,
            detail: "no value was provided".to_string(),
        })?;

        let parsed = match value {
            Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()).or_else(
                || {
                    number
                        .as_f64()
                        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
                        .map(|n| n as u32)
                },
            ),
            Value::String(text) => text.trim().parse::<u32>().ok(),
            _ => None,
        };

        match parsed {
            Some(quantity) if quantity > 0 => Ok(quantity),
            Some(_) => Err(TurnError::Validation {
                slot,
                detail: "quantity must be greater than zero".to_string(),
            }),
            None => Err(TurnError::Validation {
                slot,
                detail: format!("expected a positive whole number, got `{value}`"),
            }),
        }
    }
}

impl FromIterator<(String, Value)> for SlotValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

/// One incoming turn: the fired intent, its slots, and the contexts the host
/// restored for this conversation.
#[derive(Clone, Debug)]
pub struct TurnRequest {
    pub intent: Intent,
    pub slots: SlotValues,
    pub contexts: ContextBag,
    pub correlation_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Keep the microphone open; the conversation continues.
    Await,
    /// The conversation is over after this prompt.
    End,
}

/// The whole outgoing surface of one turn: exactly one prompt, exactly one
/// disposition, zero or more context writes.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnResponse {
    pub prompt: String,
    pub disposition: Disposition,
    pub context_writes: Vec<ContextWrite>,
}

impl TurnResponse {
    pub fn ask(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), disposition: Disposition::Await, context_writes: Vec::new() }
    }

    pub fn tell(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), disposition: Disposition::End, context_writes: Vec::new() }
    }

    pub fn with_context(mut self, write: ContextWrite) -> Self {
        self.context_writes.push(write);
        self
    }

    pub fn expects_input(&self) -> bool {
        self.disposition == Disposition::Await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use souschef_core::TurnError;

    use super::{Intent, SlotValues, TurnResponse, QUANTITY_SLOT};

    #[test]
    fn intents_round_trip_through_their_wire_names() {
        for intent in [
            Intent::FindRecipe,
            Intent::AnotherRecipe,
            Intent::SelectRecipe,
            Intent::ResolveProduct,
            Intent::AddProduct,
            Intent::SkipProduct,
        ] {
            let parsed: Intent =
                intent.wire_name().parse().expect("wire name should parse back");
            assert_eq!(parsed, intent);
        }

        assert!("order_pizza".parse::<Intent>().is_err());
    }

    #[test]
    fn quantity_accepts_integers_and_numeric_strings() {
        let mut slots = SlotValues::new();
        slots.insert(QUANTITY_SLOT, json!(3));
        assert_eq!(slots.quantity(QUANTITY_SLOT).expect("integer"), 3);

        let mut slots = SlotValues::new();
        slots.insert(QUANTITY_SLOT, json!("2"));
        assert_eq!(slots.quantity(QUANTITY_SLOT).expect("numeric string"), 2);

        let mut slots = SlotValues::new();
        slots.insert(QUANTITY_SLOT, json!(4.0));
        assert_eq!(slots.quantity(QUANTITY_SLOT).expect("integral float"), 4);
    }

    #[test]
    fn quantity_rejects_non_numeric_missing_and_non_positive_values() {
        for value in [json!("a couple"), json!(2.5), json!(0), json!(null), json!(["2"])] {
            let mut slots = SlotValues::new();
            slots.insert(QUANTITY_SLOT, value.clone());
            let error = slots
                .quantity(QUANTITY_SLOT)
                .expect_err(&format!("{value} should not validate"));
            assert!(matches!(error, TurnError::Validation { slot: QUANTITY_SLOT, .. }));
        }

        let empty = SlotValues::new();
        assert!(matches!(
            empty.quantity(QUANTITY_SLOT),
            Err(TurnError::Validation { slot: QUANTITY_SLOT, .. })
        ));
    }

    #[test]
    fn text_slots_ignore_blank_values() {
        let mut slots = SlotValues::new();
        slots.insert("recipe", json!("  "));
        assert_eq!(slots.text("recipe"), None);

        let mut slots = SlotValues::new();
        slots.insert("recipe", json!(" pancakes "));
        assert_eq!(slots.text("recipe"), Some("pancakes"));
    }

    #[test]
    fn ask_and_tell_set_the_disposition() {
        assert!(TurnResponse::ask("still with me?").expects_input());
        assert!(!TurnResponse::tell("goodbye").expects_input());
    }
}
