//! The host-owned context store is the only state that survives between
//! turns. Each context is a named snapshot with a lifetime measured in turns;
//! the core reads incoming contexts through [`ContextBag`] and emits
//! [`ContextWrite`]s, never holding memory of its own across invocations.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::StateError;

pub const RECIPE_SELECTION_CONTEXT: &str = "recipe_selection";
pub const CART_WALK_CONTEXT: &str = "cart_walk";
pub const SURVEY_CONTEXT: &str = "satisfaction_survey";

/// Flow contexts live two turns so one failed exchange does not strand the
/// conversation; the survey context lingers longer.
pub const FLOW_CONTEXT_TTL_TURNS: u32 = 2;
pub const SURVEY_CONTEXT_TTL_TURNS: u32 = 5;

/// A context whose presence implies the conversation expects further input.
pub fn is_flow_context(name: &str) -> bool {
    name == RECIPE_SELECTION_CONTEXT || name == CART_WALK_CONTEXT
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContextWrite {
    pub name: String,
    pub lifespan_turns: u32,
    pub payload: Value,
}

impl ContextWrite {
    pub fn new(
        name: &str,
        lifespan_turns: u32,
        payload: &impl Serialize,
    ) -> Result<Self, StateError> {
        let payload = serde_json::to_value(payload).map_err(|error| {
            StateError::UnserializableContext { name: name.to_string(), detail: error.to_string() }
        })?;
        Ok(Self { name: name.to_string(), lifespan_turns, payload })
    }

    /// A flow-continuation context at the standard flow TTL.
    pub fn flow(name: &str, payload: &impl Serialize) -> Result<Self, StateError> {
        Self::new(name, FLOW_CONTEXT_TTL_TURNS, payload)
    }

    pub fn survey() -> Self {
        Self {
            name: SURVEY_CONTEXT.to_string(),
            lifespan_turns: SURVEY_CONTEXT_TTL_TURNS,
            payload: Value::Object(serde_json::Map::new()),
        }
    }
}

/// Contexts restored by the host for the current turn.
#[derive(Clone, Debug, Default)]
pub struct ContextBag {
    contexts: HashMap<String, Value>,
}

impl ContextBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, payload: Value) {
        self.contexts.insert(name.into(), payload);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.contexts.contains_key(name)
    }

    /// Deserializes a named context payload. A missing or malformed context
    /// is a [`StateError`], which handlers turn into a restart prompt rather
    /// than a crash.
    pub fn restore<T>(&self, name: &str) -> Result<T, StateError>
    where
        T: DeserializeOwned,
    {
        let payload = self
            .contexts
            .get(name)
            .ok_or_else(|| StateError::MissingContext(name.to_string()))?;
        serde_json::from_value(payload.clone()).map_err(|error| StateError::MalformedContext {
            name: name.to_string(),
            detail: error.to_string(),
        })
    }
}

impl FromIterator<(String, Value)> for ContextBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { contexts: iter.into_iter().collect() }
    }
}
