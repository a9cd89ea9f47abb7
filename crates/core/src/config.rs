use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub recipes: RecipesConfig,
    pub groceries: GroceriesConfig,
    pub http: HttpConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Recipe catalog credentials ride on every search request as query
/// parameters, so the key is a secret even though the id is not.
#[derive(Clone, Debug)]
pub struct RecipesConfig {
    pub base_url: String,
    pub app_id: String,
    pub app_key: SecretString,
}

#[derive(Clone, Debug)]
pub struct GroceriesConfig {
    pub base_url: String,
    pub access_token: SecretString,
    pub cart_id: String,
}

#[derive(Clone, Debug)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub retry_once: bool,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub recipes_base_url: Option<String>,
    pub recipes_app_id: Option<String>,
    pub recipes_app_key: Option<String>,
    pub groceries_base_url: Option<String>,
    pub groceries_access_token: Option<String>,
    pub groceries_cart_id: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recipes: RecipesConfig {
                base_url: String::new(),
                app_id: String::new(),
                app_key: String::new().into(),
            },
            groceries: GroceriesConfig {
                base_url: String::new(),
                access_token: String::new().into(),
                cart_id: String::new(),
            },
            http: HttpConfig { timeout_secs: 10, retry_once: true },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("souschef.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(recipes) = patch.recipes {
            if let Some(base_url) = recipes.base_url {
                self.recipes.base_url = base_url;
            }
            if let Some(app_id) = recipes.app_id {
                self.recipes.app_id = app_id;
            }
            if let Some(app_key_value) = recipes.app_key {
                self.recipes.app_key = secret_value(app_key_value);
            }
        }

        if let Some(groceries) = patch.groceries {
            if let Some(base_url) = groceries.base_url {
                self.groceries.base_url = base_url;
            }
            if let Some(access_token_value) = groceries.access_token {
                self.groceries.access_token = secret_value(access_token_value);
            }
            if let Some(cart_id) = groceries.cart_id {
                self.groceries.cart_id = cart_id;
            }
        }

        if let Some(http) = patch.http {
            if let Some(timeout_secs) = http.timeout_secs {
                self.http.timeout_secs = timeout_secs;
            }
            if let Some(retry_once) = http.retry_once {
                self.http.retry_once = retry_once;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SOUSCHEF_RECIPES_BASE_URL") {
            self.recipes.base_url = value;
        }
        if let Some(value) = read_env("SOUSCHEF_RECIPES_APP_ID") {
            self.recipes.app_id = value;
        }
        if let Some(value) = read_env("SOUSCHEF_RECIPES_APP_KEY") {
            self.recipes.app_key = secret_value(value);
        }

        if let Some(value) = read_env("SOUSCHEF_GROCERIES_BASE_URL") {
            self.groceries.base_url = value;
        }
        if let Some(value) = read_env("SOUSCHEF_GROCERIES_ACCESS_TOKEN") {
            self.groceries.access_token = secret_value(value);
        }
        if let Some(value) = read_env("SOUSCHEF_GROCERIES_CART_ID") {
            self.groceries.cart_id = value;
        }

        if let Some(value) = read_env("SOUSCHEF_HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = parse_u64("SOUSCHEF_HTTP_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("SOUSCHEF_HTTP_RETRY_ONCE") {
            self.http.retry_once = parse_bool("SOUSCHEF_HTTP_RETRY_ONCE", &value)?;
        }

        if let Some(value) = read_env("SOUSCHEF_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("SOUSCHEF_SERVER_PORT") {
            self.server.port = parse_u16("SOUSCHEF_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("SOUSCHEF_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("SOUSCHEF_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("SOUSCHEF_LOGGING_LEVEL").or_else(|| read_env("SOUSCHEF_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SOUSCHEF_LOGGING_FORMAT").or_else(|| read_env("SOUSCHEF_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(recipes_base_url) = overrides.recipes_base_url {
            self.recipes.base_url = recipes_base_url;
        }
        if let Some(recipes_app_id) = overrides.recipes_app_id {
            self.recipes.app_id = recipes_app_id;
        }
        if let Some(recipes_app_key) = overrides.recipes_app_key {
            self.recipes.app_key = secret_value(recipes_app_key);
        }
        if let Some(groceries_base_url) = overrides.groceries_base_url {
            self.groceries.base_url = groceries_base_url;
        }
        if let Some(groceries_access_token) = overrides.groceries_access_token {
            self.groceries.access_token = secret_value(groceries_access_token);
        }
        if let Some(groceries_cart_id) = overrides.groceries_cart_id {
            self.groceries.cart_id = groceries_cart_id;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_recipes(&self.recipes)?;
        validate_groceries(&self.groceries)?;
        validate_http(&self.http)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("souschef.toml"), PathBuf::from("config/souschef.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_base_url(field: &str, url: &str) -> Result<(), ConfigError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ConfigError::Validation(format!("{field} is required")));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn validate_recipes(recipes: &RecipesConfig) -> Result<(), ConfigError> {
    validate_base_url("recipes.base_url", &recipes.base_url)?;

    if recipes.app_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "recipes.app_id is required. Get it from your recipe catalog developer console"
                .to_string(),
        ));
    }
    if recipes.app_key.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "recipes.app_key is required. Get it from your recipe catalog developer console"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_groceries(groceries: &GroceriesConfig) -> Result<(), ConfigError> {
    validate_base_url("groceries.base_url", &groceries.base_url)?;

    if groceries.access_token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "groceries.access_token is required. Issue a bearer token for the grocery API"
                .to_string(),
        ));
    }
    if groceries.cart_id.trim().is_empty() {
        return Err(ConfigError::Validation("groceries.cart_id is required".to_string()));
    }

    Ok(())
}

fn validate_http(http: &HttpConfig) -> Result<(), ConfigError> {
    if http.timeout_secs == 0 || http.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "http.timeout_secs must be in range 1..=300".to_string(),
        ));
    }
    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }
    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    recipes: Option<RecipesPatch>,
    groceries: Option<GroceriesPatch>,
    http: Option<HttpPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RecipesPatch {
    base_url: Option<String>,
    app_id: Option<String>,
    app_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GroceriesPatch {
    base_url: Option<String>,
    access_token: Option<String>,
    cart_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HttpPatch {
    timeout_secs: Option<u64>,
    retry_once: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
