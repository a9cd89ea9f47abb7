use async_trait::async_trait;
use thiserror::Error;

use crate::domain::cart::{CartEntry, CatalogId, ProductHit};
use crate::domain::recipe::RecipeCandidate;

pub const RECIPE_CATALOG: &str = "recipe-catalog";
pub const CART_SERVICE: &str = "cart-service";
pub const PRODUCT_SEARCH: &str = "product-search";

/// Transport and decode failures are kept apart for diagnosis; both surface
/// to the user as the same "unavailable" outcome.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{service} is unreachable: {detail}")]
    Transport { service: &'static str, detail: String },
    #[error("{service} returned an undecodable response: {detail}")]
    Decode { service: &'static str, detail: String },
}

impl ServiceError {
    pub fn service(&self) -> &'static str {
        match self {
            Self::Transport { service, .. } | Self::Decode { service, .. } => service,
        }
    }
}

/// External recipe catalog. Zero results is `Ok(vec![])`, never an error.
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<RecipeCandidate>, ServiceError>;
}

/// The user's grocery cart. The cart id is fixed per deployment, so it lives
/// in the implementation, not the call surface.
#[async_trait]
pub trait CartService: Send + Sync {
    async fn entries(&self) -> Result<Vec<CartEntry>, ServiceError>;

    /// Overwrites the entry for `id` with `quantity`. Overwrite semantics are
    /// what make retrying a failed commit safe.
    async fn put_entry(&self, id: &CatalogId, quantity: u32) -> Result<(), ServiceError>;
}

/// Grocery product search; results arrive popularity-ranked.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ProductHit>, ServiceError>;
}
