pub mod config;
pub mod contexts;
pub mod domain;
pub mod errors;
pub mod matcher;
pub mod services;
pub mod walk;

pub use contexts::{
    ContextBag, ContextWrite, CART_WALK_CONTEXT, FLOW_CONTEXT_TTL_TURNS, RECIPE_SELECTION_CONTEXT,
    SURVEY_CONTEXT, SURVEY_CONTEXT_TTL_TURNS,
};
pub use domain::cart::{CartEntry, CatalogId, MatchSource, ProductHit, ProductMatch};
pub use domain::recipe::{rank_candidates, Advance, RecipeCandidate, RecipeSelection};
pub use errors::{StateError, TurnError};
pub use matcher::{CartMatcher, MatchStrategy, SubstringMatcher};
pub use services::{
    CartService, ProductSearch, RecipeCatalog, ServiceError, CART_SERVICE, PRODUCT_SEARCH,
    RECIPE_CATALOG,
};
pub use walk::engine::{IngredientWalk, WalkEngine, WalkTransitionError};
pub use walk::states::{
    CartWalk, TransitionOutcome, WalkAction, WalkContext, WalkEvent, WalkPhase,
};
