//! Deterministic in-memory collaborators for tests and the CLI simulator.
//! Each fixture answers from canned data and records the mutations it sees,
//! so conversations can be replayed without any network.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use souschef_core::{
    CartEntry, CartService, CatalogId, ProductHit, ProductSearch, RecipeCandidate, RecipeCatalog,
    ServiceError, CART_SERVICE, PRODUCT_SEARCH, RECIPE_CATALOG,
};

#[derive(Clone, Debug, Default)]
pub struct FixtureCatalog {
    candidates: Vec<RecipeCandidate>,
    fail: bool,
}

impl FixtureCatalog {
    pub fn with_candidates(candidates: Vec<RecipeCandidate>) -> Self {
        Self { candidates, fail: false }
    }

    pub fn failing() -> Self {
        Self { candidates: Vec::new(), fail: true }
    }
}

#[async_trait]
impl RecipeCatalog for FixtureCatalog {
    async fn search(&self, _query: &str) -> Result<Vec<RecipeCandidate>, ServiceError> {
        if self.fail {
            return Err(ServiceError::Transport {
                service: RECIPE_CATALOG,
                detail: "fixture outage".to_string(),
            });
        }
        Ok(self.candidates.clone())
    }
}

#[derive(Debug, Default)]
pub struct FixtureCart {
    entries: Mutex<Vec<CartEntry>>,
    puts: Mutex<Vec<(CatalogId, u32)>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl FixtureCart {
    pub fn new(entries: Vec<CartEntry>) -> Self {
        Self { entries: Mutex::new(entries), ..Self::default() }
    }

    pub fn failing_reads() -> Self {
        Self { fail_reads: true, ..Self::default() }
    }

    pub fn failing_writes(entries: Vec<CartEntry>) -> Self {
        Self { entries: Mutex::new(entries), fail_writes: true, ..Self::default() }
    }

    /// Every PUT this cart has accepted, in order.
    pub fn recorded_puts(&self) -> Vec<(CatalogId, u32)> {
        self.puts.lock().map(|puts| puts.clone()).unwrap_or_default()
    }

    pub fn entries_snapshot(&self) -> Vec<CartEntry> {
        self.entries.lock().map(|entries| entries.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CartService for FixtureCart {
    async fn entries(&self) -> Result<Vec<CartEntry>, ServiceError> {
        if self.fail_reads {
            return Err(ServiceError::Transport {
                service: CART_SERVICE,
                detail: "fixture outage".to_string(),
            });
        }
        Ok(self.entries_snapshot())
    }

    async fn put_entry(&self, id: &CatalogId, quantity: u32) -> Result<(), ServiceError> {
        if self.fail_writes {
            return Err(ServiceError::Transport {
                service: CART_SERVICE,
                detail: "fixture outage".to_string(),
            });
        }

        if let Ok(mut puts) = self.puts.lock() {
            puts.push((id.clone(), quantity));
        }
        if let Ok(mut entries) = self.entries.lock() {
            match entries.iter_mut().find(|entry| &entry.id == id) {
                Some(entry) => entry.quantity = quantity,
                None => entries.push(CartEntry {
                    id: id.clone(),
                    display_name: id.0.clone(),
                    quantity,
                }),
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct FixtureProducts {
    hits_by_query: HashMap<String, Vec<ProductHit>>,
    fail: bool,
}

impl FixtureProducts {
    pub fn failing() -> Self {
        Self { hits_by_query: HashMap::new(), fail: true }
    }

    /// Registers popularity-ordered hits for one query. Prices are decimal
    /// strings so fixtures read like the catalog's own responses.
    pub fn with_hits(mut self, query: &str, hits: Vec<(&str, &str, &str)>) -> Self {
        let hits = hits
            .into_iter()
            .map(|(id, display_name, price)| ProductHit {
                id: CatalogId(id.to_string()),
                display_name: display_name.to_string(),
                unit_price: price.parse::<Decimal>().unwrap_or_default(),
            })
            .collect();
        self.hits_by_query.insert(query.to_lowercase(), hits);
        self
    }
}

#[async_trait]
impl ProductSearch for FixtureProducts {
    async fn search(&self, query: &str) -> Result<Vec<ProductHit>, ServiceError> {
        if self.fail {
            return Err(ServiceError::Transport {
                service: PRODUCT_SEARCH,
                detail: "fixture outage".to_string(),
            });
        }
        Ok(self.hits_by_query.get(&query.to_lowercase()).cloned().unwrap_or_default())
    }
}
