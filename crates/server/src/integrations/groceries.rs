use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use souschef_core::config::AppConfig;
use souschef_core::{
    CartEntry, CartService, CatalogId, ProductHit, ProductSearch, ServiceError, CART_SERVICE,
    PRODUCT_SEARCH,
};

use crate::integrations::http::{build_client, decode_json, send_checked};

/// One bearer-authenticated client for both halves of the grocery API: the
/// cart (read and write) and the popularity-ranked product search.
#[derive(Clone)]
pub struct GroceryClient {
    client: Client,
    base_url: String,
    access_token: SecretString,
    cart_id: String,
    retry_once: bool,
}

impl GroceryClient {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(config.http.timeout_secs)?,
            base_url: config.groceries.base_url.trim_end_matches('/').to_string(),
            access_token: config.groceries.access_token.clone(),
            cart_id: config.groceries.cart_id.clone(),
            retry_once: config.http.retry_once,
        })
    }

    fn bearer(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.access_token.expose_secret())
    }
}

#[async_trait]
impl CartService for GroceryClient {
    async fn entries(&self) -> Result<Vec<CartEntry>, ServiceError> {
        let request =
            self.bearer(self.client.get(format!("{}/cart/{}", self.base_url, self.cart_id)));

        let response = send_checked(request, CART_SERVICE, self.retry_once).await?;
        let body: CartBody = decode_json(response, CART_SERVICE).await?;
        Ok(body.entries.into_iter().map(WireCartEntry::into_entry).collect())
    }

    async fn put_entry(&self, id: &CatalogId, quantity: u32) -> Result<(), ServiceError> {
        let request = self
            .bearer(self.client.put(format!("{}/cart/{}/entry", self.base_url, self.cart_id)))
            .json(&json!({ "productId": id.0, "quantity": quantity }));

        send_checked(request, CART_SERVICE, self.retry_once).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductSearch for GroceryClient {
    async fn search(&self, query: &str) -> Result<Vec<ProductHit>, ServiceError> {
        let request = self.bearer(
            self.client
                .get(format!("{}/products", self.base_url))
                .query(&[("query", query), ("sort", "popularity")]),
        );

        let response = send_checked(request, PRODUCT_SEARCH, self.retry_once).await?;
        let body: ProductSearchBody = decode_json(response, PRODUCT_SEARCH).await?;
        Ok(body.search_results.products.into_iter().map(WireProduct::into_hit).collect())
    }
}

/// Product ids arrive as numbers from some endpoints and strings from others;
/// both are carried as strings and echoed back verbatim on commit.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

impl From<WireId> for CatalogId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(number) => CatalogId(number.to_string()),
            WireId::Text(text) => CatalogId(text),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CartBody {
    #[serde(default)]
    entries: Vec<WireCartEntry>,
}

#[derive(Debug, Deserialize)]
struct WireCartEntry {
    #[serde(default)]
    quantity: u32,
    product: WireProductRef,
}

#[derive(Debug, Deserialize)]
struct WireProductRef {
    id: WireId,
    #[serde(rename = "productName")]
    product_name: String,
}

impl WireCartEntry {
    fn into_entry(self) -> CartEntry {
        CartEntry {
            id: self.product.id.into(),
            display_name: self.product.product_name,
            quantity: self.quantity,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProductSearchBody {
    #[serde(rename = "searchResults", default)]
    search_results: SearchResults,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResults {
    #[serde(default)]
    products: Vec<WireProduct>,
}

#[derive(Debug, Deserialize)]
struct WireProduct {
    id: WireId,
    #[serde(rename = "productName")]
    product_name: String,
    #[serde(default)]
    price: Decimal,
}

impl WireProduct {
    fn into_hit(self) -> ProductHit {
        ProductHit {
            id: self.id.into(),
            display_name: self.product_name,
            unit_price: self.price,
        }
    }
}
