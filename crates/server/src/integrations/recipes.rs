use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use souschef_core::config::AppConfig;
use souschef_core::{RecipeCandidate, RecipeCatalog, ServiceError, RECIPE_CATALOG};

use crate::integrations::http::{build_client, decode_json, send_checked};

/// Recipe catalog over HTTP. Credentials ride as query parameters per the
/// catalog's contract, which is why the app key is secret-wrapped in config.
#[derive(Clone)]
pub struct RecipeCatalogClient {
    client: Client,
    base_url: String,
    app_id: String,
    app_key: SecretString,
    retry_once: bool,
}

impl RecipeCatalogClient {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(config.http.timeout_secs)?,
            base_url: config.recipes.base_url.trim_end_matches('/').to_string(),
            app_id: config.recipes.app_id.clone(),
            app_key: config.recipes.app_key.clone(),
            retry_once: config.http.retry_once,
        })
    }
}

#[async_trait]
impl RecipeCatalog for RecipeCatalogClient {
    async fn search(&self, query: &str) -> Result<Vec<RecipeCandidate>, ServiceError> {
        let request = self.client.get(format!("{}/recipes", self.base_url)).query(&[
            ("q", query),
            ("_app_id", self.app_id.as_str()),
            ("_app_key", self.app_key.expose_secret()),
        ]);

        let response = send_checked(request, RECIPE_CATALOG, self.retry_once).await?;
        let body: RecipeSearchBody = decode_json(response, RECIPE_CATALOG).await?;
        Ok(body.matches.into_iter().map(WireRecipe::into_candidate).collect())
    }
}

#[derive(Debug, Default, Deserialize)]
struct RecipeSearchBody {
    #[serde(default)]
    matches: Vec<WireRecipe>,
}

#[derive(Debug, Deserialize)]
struct WireRecipe {
    #[serde(rename = "recipeName")]
    recipe_name: String,
    #[serde(default)]
    rating: f32,
    #[serde(rename = "totalTimeInSeconds", default)]
    total_time_in_seconds: u32,
    #[serde(default)]
    ingredients: Vec<String>,
    #[serde(rename = "sourceDisplayName", default)]
    source_display_name: String,
}

impl WireRecipe {
    fn into_candidate(self) -> RecipeCandidate {
        RecipeCandidate {
            name: self.recipe_name,
            rating: self.rating,
            total_time_secs: self.total_time_in_seconds,
            source_name: self.source_display_name,
            ingredients: self.ingredients,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{RecipeSearchBody, WireRecipe};

    #[test]
    fn decodes_the_catalog_wire_shape_into_candidates() {
        let body: RecipeSearchBody = serde_json::from_value(json!({
            "matches": [
                {
                    "recipeName": "Two-Minute Omelette",
                    "rating": 4.5,
                    "totalTimeInSeconds": 120,
                    "ingredients": ["egg", "milk"],
                    "sourceDisplayName": "Test Kitchen"
                }
            ]
        }))
        .expect("body should deserialize");

        let candidates =
            body.matches.into_iter().map(WireRecipe::into_candidate).collect::<Vec<_>>();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Two-Minute Omelette");
        assert_eq!(candidates[0].total_time_secs, 120);
        assert_eq!(candidates[0].ingredients, vec!["egg", "milk"]);
    }

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let body: RecipeSearchBody = serde_json::from_value(json!({
            "matches": [ { "recipeName": "Mystery Dish" } ]
        }))
        .expect("sparse body should deserialize");

        let candidate = body.matches.into_iter().map(WireRecipe::into_candidate).next()
            .expect("one candidate");
        assert_eq!(candidate.rating, 0.0);
        assert_eq!(candidate.total_time_secs, 0);
        assert!(candidate.ingredients.is_empty());
    }

    #[test]
    fn an_empty_body_is_zero_results_not_an_error() {
        let body: RecipeSearchBody =
            serde_json::from_value(json!({})).expect("empty body should deserialize");
        assert!(body.matches.is_empty());
    }
}
