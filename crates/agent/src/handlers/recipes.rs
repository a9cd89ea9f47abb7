use souschef_core::{
    rank_candidates, Advance, ContextWrite, RecipeCatalog, RecipeSelection, TurnError,
    RECIPE_CATALOG, RECIPE_SELECTION_CONTEXT,
};

use crate::dispatcher::{TurnRequest, TurnResponse, RECIPE_SLOT};
use crate::prompts;

/// `get_recipe`: search the catalog, rank, and present the first candidate.
/// A search outage is a NetworkFailure; zero results is NotFound, with its
/// own message and the conversation left open for another query.
pub async fn find_recipe<R>(recipes: &R, turn: &TurnRequest) -> Result<TurnResponse, TurnError>
where
    R: RecipeCatalog,
{
    let query = turn.slots.text(RECIPE_SLOT).ok_or(TurnError::Validation {
        slot: RECIPE_SLOT,
        detail: "no recipe query was provided".to_string(),
    })?;

    let candidates = recipes.search(query).await?;
    if candidates.is_empty() {
        return Err(TurnError::NotFound { service: RECIPE_CATALOG, query: query.to_string() });
    }

    let selection = RecipeSelection::seed(rank_candidates(candidates))?;
    let prompt = prompts::recipe_found(selection.current()?, query);
    Ok(TurnResponse::ask(prompt)
        .with_context(ContextWrite::flow(RECIPE_SELECTION_CONTEXT, &selection)?))
}

/// `get_another_recipe`: step to the next ranked candidate. Exhausting the
/// list ends the conversation rather than erroring.
pub fn another_recipe(turn: &TurnRequest) -> Result<TurnResponse, TurnError> {
    let selection: RecipeSelection = turn.contexts.restore(RECIPE_SELECTION_CONTEXT)?;
    selection.current()?;

    match selection.advance() {
        Advance::EndOfList => Ok(TurnResponse::tell(prompts::no_more_recipes())),
        Advance::Next(next) => {
            let prompt = prompts::next_recipe(next.current()?);
            Ok(TurnResponse::ask(prompt)
                .with_context(ContextWrite::flow(RECIPE_SELECTION_CONTEXT, &next)?))
        }
    }
}
