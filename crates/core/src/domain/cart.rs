use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogId(pub String);

/// One (product, quantity) line of the user's grocery cart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: CatalogId,
    pub display_name: String,
    pub quantity: u32,
}

/// A normalized product-search result, popularity-ranked by the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductHit {
    pub id: CatalogId,
    pub display_name: String,
    pub unit_price: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    CartSnapshot,
    ProductSearch,
}

/// The system's current best guess for the ingredient being resolved.
///
/// Cart entries and product-search hits arrive in different wire shapes; both
/// convert into this one tagged structure at the boundary, so the rest of the
/// walk never branches on where a match came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMatch {
    pub id: CatalogId,
    pub display_name: String,
    pub quantity_in_cart: u32,
    pub unit_price: Option<Decimal>,
    pub source: MatchSource,
}

impl ProductMatch {
    /// Quantity to write on commit. Adding to an entry already in the cart is
    /// additive, never a replacement.
    pub fn committed_quantity(&self, requested: u32) -> u32 {
        self.quantity_in_cart.saturating_add(requested)
    }

    pub fn already_in_cart(&self) -> bool {
        self.quantity_in_cart > 0
    }
}

impl From<&CartEntry> for ProductMatch {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.id.clone(),
            display_name: entry.display_name.clone(),
            quantity_in_cart: entry.quantity,
            unit_price: None,
            source: MatchSource::CartSnapshot,
        }
    }
}

impl From<ProductHit> for ProductMatch {
    fn from(hit: ProductHit) -> Self {
        Self {
            id: hit.id,
            display_name: hit.display_name,
            quantity_in_cart: 0,
            unit_price: Some(hit.unit_price),
            source: MatchSource::ProductSearch,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{CartEntry, CatalogId, MatchSource, ProductHit, ProductMatch};

    #[test]
    fn commit_quantity_is_additive_for_existing_entries() {
        let matched = ProductMatch::from(&CartEntry {
            id: CatalogId("p-42".to_string()),
            display_name: "Large Eggs".to_string(),
            quantity: 2,
        });

        assert!(matched.already_in_cart());
        assert_eq!(matched.committed_quantity(3), 5);
    }

    #[test]
    fn commit_quantity_for_a_fresh_search_hit_is_the_requested_amount() {
        let matched = ProductMatch::from(ProductHit {
            id: CatalogId("p-7".to_string()),
            display_name: "Whole Milk".to_string(),
            unit_price: Decimal::new(349, 2),
        });

        assert!(!matched.already_in_cart());
        assert_eq!(matched.source, MatchSource::ProductSearch);
        assert_eq!(matched.committed_quantity(1), 1);
        assert_eq!(matched.unit_price, Some(Decimal::new(349, 2)));
    }
}
