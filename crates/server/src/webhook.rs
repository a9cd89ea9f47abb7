use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use souschef_agent::AgentRuntime;
use souschef_core::config::AppConfig;
use souschef_host::{extract_turn, render_response, WebhookRequest, WebhookResponse};
use tracing::{info, warn};

use crate::health;
use crate::integrations::groceries::GroceryClient;
use crate::integrations::recipes::RecipeCatalogClient;

pub type Runtime = AgentRuntime<RecipeCatalogClient, GroceryClient, GroceryClient>;

#[derive(Clone)]
pub struct AppState {
    runtime: Arc<Runtime>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(runtime: Runtime, config: AppConfig) -> Self {
        Self { runtime: Arc::new(runtime), config: Arc::new(config) }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/health", get(health::health))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct WebhookFault {
    pub error: String,
}

/// One conversation turn. Malformed envelopes are a 400; everything past
/// extraction is the runtime's problem and always yields a spoken response.
pub async fn webhook(
    State(state): State<AppState>,
    Json(request): Json<WebhookRequest>,
) -> Result<Json<WebhookResponse>, (StatusCode, Json<WebhookFault>)> {
    let turn = extract_turn(&request).map_err(|error| {
        warn!(
            event_name = "webhook.bad_request",
            correlation_id = %request.id,
            error = %error,
            "rejecting malformed webhook request"
        );
        (StatusCode::BAD_REQUEST, Json(WebhookFault { error: error.to_string() }))
    })?;

    info!(
        event_name = "webhook.turn",
        intent = turn.intent.wire_name(),
        correlation_id = %turn.correlation_id,
        "dispatching turn"
    );

    let response = state.runtime.handle(turn).await;
    let rendered = render_response(response).map_err(|error| {
        warn!(
            event_name = "webhook.render_failed",
            correlation_id = %request.id,
            error = %error,
            "turn response violated the exit contract"
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Json(WebhookFault { error: error.to_string() }))
    })?;

    Ok(Json(rendered))
}
