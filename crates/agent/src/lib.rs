//! Turn handling for the souschef conversation.
//!
//! Each turn the host delivers a structured intent, its slot values, and the
//! contexts restored from the previous turn. This crate:
//! 1. **Dispatch** (`dispatcher`) - classify the intent and carry typed slots
//! 2. **Handle** (`handlers`) - run the recipe-browse or cart-walk step,
//!    performing at most one external lookup plus an optional commit
//! 3. **Respond** (`prompts`) - phrase the spoken reply and the next contexts
//!
//! # Key Types
//!
//! - `AgentRuntime` - the per-turn orchestrator, generic over the three
//!   external collaborators (see `runtime` module)
//! - `TurnRequest` / `TurnResponse` - the whole surface a host needs
//!
//! # State Principle
//!
//! Handlers hold no memory between calls. Everything a later turn needs must
//! round-trip through the returned context writes; the host-owned context
//! store is the only persistence there is.

pub mod dispatcher;
pub mod fixtures;
pub mod handlers;
pub mod prompts;
pub mod runtime;

pub use dispatcher::{
    Disposition, Intent, SlotValues, TurnRequest, TurnResponse, UnknownIntentError, QUANTITY_SLOT,
    RECIPE_SLOT,
};
pub use runtime::AgentRuntime;
