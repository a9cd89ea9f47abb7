//! Conversation-host adapter.
//!
//! The hosting platform delivers one webhook call per turn: a structured
//! intent, its slot values, and the contexts still alive for this
//! conversation. This crate owns the wire shapes (`payload`) and the mapping
//! into and out of the agent's `TurnRequest`/`TurnResponse` (`turn`),
//! including the exit contract: exactly one prompt, exactly one
//! await-or-end flag, and never a terminal end combined with a
//! flow-continuation context write.

pub mod payload;
pub mod turn;

pub use payload::{IncomingContext, OutgoingContext, WebhookRequest, WebhookResponse, WebhookResult};
pub use turn::{extract_turn, render_response, ExtractError, RenderError};
