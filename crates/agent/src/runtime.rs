use souschef_core::{
    CartMatcher, CartService, MatchStrategy, ProductSearch, RecipeCatalog, SubstringMatcher,
    TurnError,
};

use crate::dispatcher::{Intent, TurnRequest, TurnResponse};
use crate::handlers;
use crate::prompts;

/// The per-turn orchestrator: maps an intent to its handler and catches every
/// `TurnError` at the boundary, so the host only ever sees a spoken response.
pub struct AgentRuntime<R, C, P, S = SubstringMatcher> {
    recipes: R,
    cart: C,
    products: P,
    matcher: CartMatcher<S>,
}

impl<R, C, P> AgentRuntime<R, C, P> {
    pub fn new(recipes: R, cart: C, products: P) -> Self {
        Self { recipes, cart, products, matcher: CartMatcher::new() }
    }
}

impl<R, C, P, S> AgentRuntime<R, C, P, S>
where
    R: RecipeCatalog,
    C: CartService,
    P: ProductSearch,
    S: MatchStrategy,
{
    pub fn with_matcher(recipes: R, cart: C, products: P, matcher: CartMatcher<S>) -> Self {
        Self { recipes, cart, products, matcher }
    }

    pub async fn handle(&self, turn: TurnRequest) -> TurnResponse {
        tracing::debug!(
            event_name = "turn.received",
            intent = turn.intent.wire_name(),
            correlation_id = %turn.correlation_id,
            "turn received"
        );

        match self.dispatch(&turn).await {
            Ok(response) => {
                tracing::debug!(
                    event_name = "turn.completed",
                    intent = turn.intent.wire_name(),
                    correlation_id = %turn.correlation_id,
                    expects_input = response.expects_input(),
                    "turn completed"
                );
                response
            }
            Err(error) => {
                tracing::warn!(
                    event_name = "turn.failed",
                    intent = turn.intent.wire_name(),
                    correlation_id = %turn.correlation_id,
                    error = %error,
                    "turn failed; speaking a recovery message"
                );
                Self::recovery_response(&error)
            }
        }
    }

    async fn dispatch(&self, turn: &TurnRequest) -> Result<TurnResponse, TurnError> {
        match turn.intent {
            Intent::FindRecipe => handlers::recipes::find_recipe(&self.recipes, turn).await,
            Intent::AnotherRecipe => handlers::recipes::another_recipe(turn),
            Intent::SelectRecipe => {
                handlers::cart::select_recipe(&self.cart, &self.matcher, turn).await
            }
            Intent::ResolveProduct => handlers::cart::resolve_product(&self.products, turn).await,
            Intent::AddProduct => {
                handlers::cart::add_product(&self.cart, &self.matcher, turn).await
            }
            Intent::SkipProduct => handlers::cart::skip_product(&self.matcher, turn),
        }
    }

    /// Network failures end the conversation; NotFound and Validation
    /// re-prompt; state inconsistencies reset to a fresh flow by answering
    /// with no context writes at all.
    fn recovery_response(error: &TurnError) -> TurnResponse {
        let prompt = prompts::spoken_error(error);
        if error.ends_conversation() {
            TurnResponse::tell(prompt)
        } else {
            TurnResponse::ask(prompt)
        }
    }
}
