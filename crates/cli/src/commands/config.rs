use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use souschef_core::config::{AppConfig, LoadOptions};
use toml::Value;

struct ConfigRow {
    key: &'static str,
    env_var: &'static str,
    value: String,
    secret: bool,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let rows = [
        ConfigRow {
            key: "recipes.base_url",
            env_var: "SOUSCHEF_RECIPES_BASE_URL",
            value: config.recipes.base_url.clone(),
            secret: false,
        },
        ConfigRow {
            key: "recipes.app_id",
            env_var: "SOUSCHEF_RECIPES_APP_ID",
            value: config.recipes.app_id.clone(),
            secret: false,
        },
        ConfigRow {
            key: "recipes.app_key",
            env_var: "SOUSCHEF_RECIPES_APP_KEY",
            value: "<set>".to_string(),
            secret: true,
        },
        ConfigRow {
            key: "groceries.base_url",
            env_var: "SOUSCHEF_GROCERIES_BASE_URL",
            value: config.groceries.base_url.clone(),
            secret: false,
        },
        ConfigRow {
            key: "groceries.access_token",
            env_var: "SOUSCHEF_GROCERIES_ACCESS_TOKEN",
            value: "<set>".to_string(),
            secret: true,
        },
        ConfigRow {
            key: "groceries.cart_id",
            env_var: "SOUSCHEF_GROCERIES_CART_ID",
            value: config.groceries.cart_id.clone(),
            secret: false,
        },
        ConfigRow {
            key: "http.timeout_secs",
            env_var: "SOUSCHEF_HTTP_TIMEOUT_SECS",
            value: config.http.timeout_secs.to_string(),
            secret: false,
        },
        ConfigRow {
            key: "http.retry_once",
            env_var: "SOUSCHEF_HTTP_RETRY_ONCE",
            value: config.http.retry_once.to_string(),
            secret: false,
        },
        ConfigRow {
            key: "server.bind_address",
            env_var: "SOUSCHEF_SERVER_BIND_ADDRESS",
            value: config.server.bind_address.clone(),
            secret: false,
        },
        ConfigRow {
            key: "server.port",
            env_var: "SOUSCHEF_SERVER_PORT",
            value: config.server.port.to_string(),
            secret: false,
        },
        ConfigRow {
            key: "server.graceful_shutdown_secs",
            env_var: "SOUSCHEF_SERVER_GRACEFUL_SHUTDOWN_SECS",
            value: config.server.graceful_shutdown_secs.to_string(),
            secret: false,
        },
        ConfigRow {
            key: "logging.level",
            env_var: "SOUSCHEF_LOGGING_LEVEL",
            value: config.logging.level.clone(),
            secret: false,
        },
        ConfigRow {
            key: "logging.format",
            env_var: "SOUSCHEF_LOGGING_FORMAT",
            value: format!("{:?}", config.logging.format).to_lowercase(),
            secret: false,
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for row in rows {
        let source = field_source(row.key, row.env_var, config_file_doc.as_ref());
        let value = if row.secret { "<set (redacted)>".to_string() } else { row.value };
        lines.push(format!("  {:<32} {:<24} [{source}]", row.key, value));
    }

    if let Some(path) = config_file_path {
        lines.push(format!("config file: {}", path.display()));
    } else {
        lines.push("config file: <none found>".to_string());
    }

    lines.join("\n")
}

fn field_source(dotted_key: &str, env_var: &str, doc: Option<&Value>) -> &'static str {
    if env::var(env_var).is_ok_and(|value| !value.trim().is_empty()) {
        return "env";
    }
    if doc.map(|doc| doc_has_key(doc, dotted_key)).unwrap_or(false) {
        return "file";
    }
    "default"
}

fn doc_has_key(doc: &Value, dotted_key: &str) -> bool {
    let mut current = doc;
    for segment in dotted_key.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("souschef.toml"), PathBuf::from("config/souschef.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}
