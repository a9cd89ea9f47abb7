use thiserror::Error;

use crate::services::ServiceError;
use crate::walk::engine::WalkTransitionError;
use crate::walk::states::WalkPhase;

/// Problems with state restored from the context store. These must never
/// crash a turn; handlers degrade to a fresh-flow restart prompt.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("context `{0}` is missing")]
    MissingContext(String),
    #[error("context `{name}` payload did not deserialize: {detail}")]
    MalformedContext { name: String, detail: String },
    #[error("context `{name}` payload did not serialize: {detail}")]
    UnserializableContext { name: String, detail: String },
    #[error("index {index} is out of bounds for {collection} of length {len}")]
    IndexOutOfBounds { collection: &'static str, index: usize, len: usize },
    #[error("no pending match while handling `{intent}`")]
    MissingPendingMatch { intent: String },
    #[error("intent `{intent}` is not valid during the {phase:?} phase")]
    PhaseMismatch { intent: String, phase: WalkPhase },
    #[error(transparent)]
    Transition(#[from] WalkTransitionError),
}

/// Everything that can go wrong inside one turn, caught at the handler
/// boundary and spoken back to the user; never propagated to the host.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    #[error(transparent)]
    Network(#[from] ServiceError),
    #[error("no results from {service} for `{query}`")]
    NotFound { service: &'static str, query: String },
    #[error("slot `{slot}` is invalid: {detail}")]
    Validation { slot: &'static str, detail: String },
    #[error(transparent)]
    State(#[from] StateError),
}

impl From<WalkTransitionError> for TurnError {
    fn from(error: WalkTransitionError) -> Self {
        Self::State(StateError::Transition(error))
    }
}

impl TurnError {
    /// Network failures end the conversation; everything else keeps it open
    /// (NotFound and Validation re-prompt, StateError restarts the flow).
    pub fn ends_conversation(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
