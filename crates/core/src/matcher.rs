use crate::domain::cart::{CartEntry, ProductMatch};

/// How an ingredient name is tested against a candidate display name.
/// Isolated behind a trait so a stricter matcher can replace the default
/// without touching the walk.
pub trait MatchStrategy {
    fn is_match(&self, ingredient: &str, candidate_name: &str) -> bool;
}

/// Case-insensitive containment: the candidate display name must contain the
/// ingredient name, not the other way around. Deliberately permissive; short
/// ingredient names can false-positive ("lime" matches "limeade").
#[derive(Clone, Copy, Debug, Default)]
pub struct SubstringMatcher;

impl MatchStrategy for SubstringMatcher {
    fn is_match(&self, ingredient: &str, candidate_name: &str) -> bool {
        candidate_name.to_lowercase().contains(&ingredient.to_lowercase())
    }
}

#[derive(Clone, Debug, Default)]
pub struct CartMatcher<S = SubstringMatcher> {
    strategy: S,
}

impl CartMatcher<SubstringMatcher> {
    pub fn new() -> Self {
        Self { strategy: SubstringMatcher }
    }
}

impl<S> CartMatcher<S>
where
    S: MatchStrategy,
{
    pub fn with_strategy(strategy: S) -> Self {
        Self { strategy }
    }

    /// First matching entry in input order wins; there is no scoring. No
    /// match is `None`, not an error.
    pub fn find_match(&self, ingredient: &str, entries: &[CartEntry]) -> Option<ProductMatch> {
        entries
            .iter()
            .find(|entry| self.strategy.is_match(ingredient, &entry.display_name))
            .map(ProductMatch::from)
    }
}
