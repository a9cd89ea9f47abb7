use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::webhook::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub recipe_catalog: HealthCheck,
    pub grocery_api: HealthCheck,
    pub checked_at: String,
}

/// Liveness plus a configuration echo for each collaborator. The endpoints
/// themselves are not probed here; a user turn is the real health check.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let config = state.config();

    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "souschef webhook runtime initialized".to_string(),
        },
        recipe_catalog: endpoint_check(&config.recipes.base_url),
        grocery_api: endpoint_check(&config.groceries.base_url),
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}

fn endpoint_check(base_url: &str) -> HealthCheck {
    HealthCheck { status: "configured", detail: format!("endpoint {base_url}") }
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;
    use souschef_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::bootstrap;
    use crate::health::health;

    #[tokio::test]
    async fn health_reports_ready_with_collaborator_endpoints() {
        let state = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                recipes_base_url: Some("https://recipes.test/v1".to_string()),
                recipes_app_id: Some("app-id".to_string()),
                recipes_app_key: Some("app-key".to_string()),
                groceries_base_url: Some("https://groceries.test/v1".to_string()),
                groceries_access_token: Some("bearer-token".to_string()),
                groceries_cart_id: Some("cart-1".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("bootstrap should succeed")
        .state;

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.service.status, "ready");
        assert!(payload.recipe_catalog.detail.contains("recipes.test"));
        assert!(payload.grocery_api.detail.contains("groceries.test"));
    }
}
