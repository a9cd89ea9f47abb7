use thiserror::Error;
use uuid::Uuid;

use souschef_agent::{SlotValues, TurnRequest, TurnResponse, UnknownIntentError};
use souschef_core::contexts::is_flow_context;
use souschef_core::ContextBag;

use crate::payload::{OutgoingContext, WebhookRequest, WebhookResponse};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error(transparent)]
    UnknownIntent(#[from] UnknownIntentError),
    #[error("webhook request carried no action")]
    MissingAction,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("terminal response must not write flow context `{0}`")]
    FlowContextOnTerminal(String),
}

/// Normalizes a webhook call into the agent's turn envelope. The request id
/// doubles as the correlation id; a blank one gets a generated stand-in so
/// every log line stays traceable.
pub fn extract_turn(request: &WebhookRequest) -> Result<TurnRequest, ExtractError> {
    let action = request.result.action.trim();
    if action.is_empty() {
        return Err(ExtractError::MissingAction);
    }
    let intent = action.parse()?;

    let slots = request
        .result
        .parameters
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect::<SlotValues>();

    let contexts = request
        .result
        .contexts
        .iter()
        .map(|context| (context.name.clone(), context.parameters.clone()))
        .collect::<ContextBag>();

    let correlation_id = if request.id.trim().is_empty() {
        Uuid::new_v4().to_string()
    } else {
        request.id.clone()
    };

    Ok(TurnRequest { intent, slots, contexts, correlation_id })
}

/// Converts a turn's outcome into the wire response, enforcing the exit
/// contract: a response that ends the conversation must not also write a
/// context that expects further input.
pub fn render_response(response: TurnResponse) -> Result<WebhookResponse, RenderError> {
    if !response.expects_input() {
        if let Some(write) =
            response.context_writes.iter().find(|write| is_flow_context(&write.name))
        {
            return Err(RenderError::FlowContextOnTerminal(write.name.clone()));
        }
    }

    let expect_user_response = response.expects_input();
    let context_out = response
        .context_writes
        .into_iter()
        .map(|write| OutgoingContext {
            name: write.name,
            lifespan: write.lifespan_turns,
            parameters: write.payload,
        })
        .collect();

    Ok(WebhookResponse {
        speech: response.prompt.clone(),
        display_text: response.prompt,
        expect_user_response,
        context_out,
    })
}
