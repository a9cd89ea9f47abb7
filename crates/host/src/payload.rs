use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One incoming webhook call from the conversation host.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "sessionId", default)]
    pub session_id: String,
    pub result: WebhookResult,
}

/// The NLU's reading of the user's utterance.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WebhookResult {
    pub action: String,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
    #[serde(default)]
    pub contexts: Vec<IncomingContext>,
}

/// A context the host restored for this turn. `lifespan` is the number of
/// turns it had left when the request was built.
#[derive(Clone, Debug, Deserialize)]
pub struct IncomingContext {
    pub name: String,
    #[serde(default)]
    pub lifespan: u32,
    #[serde(default)]
    pub parameters: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WebhookResponse {
    pub speech: String,
    #[serde(rename = "displayText")]
    pub display_text: String,
    #[serde(rename = "expectUserResponse")]
    pub expect_user_response: bool,
    #[serde(rename = "contextOut")]
    pub context_out: Vec<OutgoingContext>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutgoingContext {
    pub name: String,
    pub lifespan: u32,
    pub parameters: Value,
}
