use souschef_core::{
    CartMatcher, CartService, CartWalk, ContextWrite, MatchStrategy, ProductMatch, ProductSearch,
    RecipeSelection, StateError, TransitionOutcome, TurnError, WalkAction, WalkEngine, WalkEvent,
    WalkPhase, CART_WALK_CONTEXT, PRODUCT_SEARCH, RECIPE_SELECTION_CONTEXT,
};

use crate::dispatcher::{TurnRequest, TurnResponse, QUANTITY_SLOT};
use crate::prompts;

/// `select_recipe`: the one cart snapshot fetch for this walk. Failure here
/// is fatal to the flow and speaks a cart-specific message; success seeds the
/// walk and proposes the first ingredient.
pub async fn select_recipe<C, S>(
    cart: &C,
    matcher: &CartMatcher<S>,
    turn: &TurnRequest,
) -> Result<TurnResponse, TurnError>
where
    C: CartService,
    S: MatchStrategy,
{
    let selection: RecipeSelection = turn.contexts.restore(RECIPE_SELECTION_CONTEXT)?;
    let candidate = selection.current()?;

    let snapshot = cart.entries().await?;

    let mut walk =
        CartWalk::begin(candidate.name.clone(), candidate.ingredients.clone(), snapshot);
    let engine = WalkEngine::default();
    let outcome = engine.apply(&walk.phase, &WalkEvent::SnapshotFetched, &walk.walk_context())?;
    walk.phase = outcome.to;

    if walk.is_complete() {
        // A recipe with no ingredients has nothing to walk.
        return Ok(TurnResponse::tell(prompts::walk_complete(&walk.recipe_name))
            .with_context(ContextWrite::survey()));
    }

    let ingredient = resolve_current(&mut walk, matcher)?;
    let prompt = prompts::walk_intro(&walk.recipe_name, &ingredient, walk.pending_match.as_ref());
    Ok(TurnResponse::ask(prompt).with_context(ContextWrite::flow(CART_WALK_CONTEXT, &walk)?))
}

/// `get_product`: with a pending match in hand, ask for a quantity; without
/// one, run the popularity-ranked product search and propose the first hit.
/// Zero hits is a reported NotFound that keeps the walk alive.
pub async fn resolve_product<P>(
    products: &P,
    turn: &TurnRequest,
) -> Result<TurnResponse, TurnError>
where
    P: ProductSearch,
{
    let mut walk: CartWalk = turn.contexts.restore(CART_WALK_CONTEXT)?;
    walk.validate()?;
    walk.expect_phase(&[WalkPhase::ResolvingIngredient], turn.intent.wire_name())?;
    let engine = WalkEngine::default();

    if let Some(pending) = walk.pending_match.clone() {
        let outcome = engine.apply(&walk.phase, &WalkEvent::MatchProposed, &walk.walk_context())?;
        walk.phase = outcome.to;
        let prompt = prompts::ask_quantity(&pending.display_name);
        return Ok(TurnResponse::ask(prompt)
            .with_context(ContextWrite::flow(CART_WALK_CONTEXT, &walk)?));
    }

    let ingredient = walk.current_ingredient()?.to_string();
    let hits = products.search(&ingredient).await?;

    let Some(first) = hits.into_iter().next() else {
        let outcome =
            engine.apply(&walk.phase, &WalkEvent::SearchExhausted, &walk.walk_context())?;
        walk.phase = outcome.to;
        let not_found = TurnError::NotFound { service: PRODUCT_SEARCH, query: ingredient };
        tracing::info!(
            event_name = "turn.product_search_empty",
            correlation_id = %turn.correlation_id,
            error = %not_found,
            "no catalog hits for the current ingredient"
        );
        return Ok(TurnResponse::ask(prompts::spoken_error(&not_found))
            .with_context(ContextWrite::flow(CART_WALK_CONTEXT, &walk)?));
    };

    let prompt = prompts::product_found(&ingredient, &first);
    walk.pending_match = Some(ProductMatch::from(first));
    let outcome = engine.apply(&walk.phase, &WalkEvent::MatchProposed, &walk.walk_context())?;
    walk.phase = outcome.to;
    Ok(TurnResponse::ask(prompt).with_context(ContextWrite::flow(CART_WALK_CONTEXT, &walk)?))
}

/// `add_product`: validate the quantity, commit additively, and advance the
/// cursor. A failed commit keeps the cursor in place and re-prompts; the
/// underlying PUT overwrites by id, so retrying is safe.
pub async fn add_product<C, S>(
    cart: &C,
    matcher: &CartMatcher<S>,
    turn: &TurnRequest,
) -> Result<TurnResponse, TurnError>
where
    C: CartService,
    S: MatchStrategy,
{
    let mut walk: CartWalk = turn.contexts.restore(CART_WALK_CONTEXT)?;
    walk.validate()?;
    walk.expect_phase(&[WalkPhase::AwaitingQuantity], turn.intent.wire_name())?;
    let pending = walk.pending_match.clone().ok_or_else(|| {
        StateError::MissingPendingMatch { intent: turn.intent.wire_name().to_string() }
    })?;
    let engine = WalkEngine::default();

    let requested = match turn.slots.quantity(QUANTITY_SLOT) {
        Ok(requested) => requested,
        Err(error) => {
            let outcome =
                engine.apply(&walk.phase, &WalkEvent::QuantityRejected, &walk.walk_context())?;
            walk.phase = outcome.to;
            tracing::info!(
                event_name = "turn.quantity_rejected",
                correlation_id = %turn.correlation_id,
                error = %error,
                "quantity slot failed validation; re-prompting"
            );
            return Ok(TurnResponse::ask(prompts::reprompt_quantity(&pending.display_name))
                .with_context(ContextWrite::flow(CART_WALK_CONTEXT, &walk)?));
        }
    };

    let outcome = engine.apply(&walk.phase, &WalkEvent::QuantityAccepted, &walk.walk_context())?;
    walk.phase = outcome.to;

    let committed = pending.committed_quantity(requested);
    if let Err(error) = cart.put_entry(&pending.id, committed).await {
        tracing::warn!(
            event_name = "turn.commit_failed",
            correlation_id = %turn.correlation_id,
            error = %error,
            "cart commit failed; cursor stays on the current ingredient"
        );
        let outcome =
            engine.apply(&walk.phase, &WalkEvent::CommitFailed, &walk.walk_context())?;
        walk.phase = outcome.to;
        return Ok(TurnResponse::ask(prompts::commit_failed(&pending.display_name))
            .with_context(ContextWrite::flow(CART_WALK_CONTEXT, &walk)?));
    }

    let outcome = engine.apply(&walk.phase, &WalkEvent::CommitSucceeded, &walk.walk_context())?;
    finish_advance(walk, outcome, matcher, prompts::added_line(requested, &pending.display_name))
}

/// `next_product`: move past the current ingredient without committing.
/// Legal both while resolving and while a quantity question is open.
pub fn skip_product<S>(
    matcher: &CartMatcher<S>,
    turn: &TurnRequest,
) -> Result<TurnResponse, TurnError>
where
    S: MatchStrategy,
{
    let mut walk: CartWalk = turn.contexts.restore(CART_WALK_CONTEXT)?;
    walk.validate()?;
    walk.expect_phase(
        &[WalkPhase::ResolvingIngredient, WalkPhase::AwaitingQuantity],
        turn.intent.wire_name(),
    )?;

    let engine = WalkEngine::default();
    let outcome = engine.apply(&walk.phase, &WalkEvent::IngredientSkipped, &walk.walk_context())?;
    walk.pending_match = None;
    finish_advance(walk, outcome, matcher, "Ok.".to_string())
}

fn resolve_current<S>(walk: &mut CartWalk, matcher: &CartMatcher<S>) -> Result<String, TurnError>
where
    S: MatchStrategy,
{
    let ingredient = walk.current_ingredient()?.to_string();
    walk.pending_match = matcher.find_match(&ingredient, &walk.cart_snapshot);
    Ok(ingredient)
}

/// Executes the actions of an advancing transition: move the cursor, then
/// either re-match the next ingredient against the retained snapshot or close
/// the walk with the survey context.
fn finish_advance<S>(
    mut walk: CartWalk,
    outcome: TransitionOutcome,
    matcher: &CartMatcher<S>,
    lead: String,
) -> Result<TurnResponse, TurnError>
where
    S: MatchStrategy,
{
    walk.phase = outcome.to;
    let mut survey = false;
    let mut next_prompt = None;

    for action in &outcome.actions {
        match action {
            WalkAction::AdvanceCursor => walk.advance()?,
            WalkAction::ResolveIngredient => {
                let ingredient = resolve_current(&mut walk, matcher)?;
                next_prompt =
                    Some(prompts::next_ingredient(&ingredient, walk.pending_match.as_ref()));
            }
            WalkAction::EmitSurvey => survey = true,
            WalkAction::PromptQuantity | WalkAction::CommitEntry => {}
        }
    }

    if survey {
        return Ok(TurnResponse::tell(prompts::walk_complete(&walk.recipe_name))
            .with_context(ContextWrite::survey()));
    }

    let tail = next_prompt.ok_or(StateError::IndexOutOfBounds {
        collection: "ingredient list",
        index: walk.cart_index,
        len: walk.ingredients.len(),
    })?;
    Ok(TurnResponse::ask(format!("{lead} {tail}"))
        .with_context(ContextWrite::flow(CART_WALK_CONTEXT, &walk)?))
}
