use souschef_agent::AgentRuntime;
use souschef_core::config::{AppConfig, ConfigError, LoadOptions};
use thiserror::Error;
use tracing::info;

use crate::integrations::groceries::GroceryClient;
use crate::integrations::recipes::RecipeCatalogClient;
use crate::webhook::AppState;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let recipes = RecipeCatalogClient::new(&config).map_err(BootstrapError::HttpClient)?;
    let groceries = GroceryClient::new(&config).map_err(BootstrapError::HttpClient)?;
    let runtime = AgentRuntime::new(recipes, groceries.clone(), groceries);

    info!(
        event_name = "system.bootstrap.integrations_ready",
        correlation_id = "bootstrap",
        "external collaborators wired into the agent runtime"
    );

    let state = AppState::new(runtime, config.clone());
    Ok(Application { config, state })
}
