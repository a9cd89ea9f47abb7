//! Every spoken sentence the agent can produce, in one place. Handlers stay
//! free of wording so the copy can change without touching flow logic.

use souschef_core::{
    ProductHit, ProductMatch, RecipeCandidate, TurnError, CART_SERVICE, RECIPE_CATALOG,
};

pub fn recipe_found(candidate: &RecipeCandidate, query: &str) -> String {
    format!(
        "Voila! I found a recipe called {} with a rating of {}. The ingredients you'll need are {}. \
         Would you like to select this recipe, or get another recipe for {query}?",
        candidate.name,
        candidate.rating,
        candidate.ingredients.join(", "),
    )
}

pub fn next_recipe(candidate: &RecipeCandidate) -> String {
    format!(
        "The next recipe is called {} with a rating of {}. The ingredients you'll need are {}. \
         Would you like to select this recipe or get another recipe?",
        candidate.name,
        candidate.rating,
        candidate.ingredients.join(", "),
    )
}

pub fn no_more_recipes() -> String {
    "Sorry, there are no more recipes left. Goodbye.".to_string()
}

pub fn walk_intro(recipe_name: &str, ingredient: &str, matched: Option<&ProductMatch>) -> String {
    format!(
        "Before starting our recipe for {recipe_name}, let's make sure we have all the \
         ingredients we need! The first ingredient is {ingredient}. {}",
        need_ingredient(ingredient, matched)
    )
}

pub fn next_ingredient(ingredient: &str, matched: Option<&ProductMatch>) -> String {
    format!("Our next ingredient is {ingredient}. {}", need_ingredient(ingredient, matched))
}

fn need_ingredient(ingredient: &str, matched: Option<&ProductMatch>) -> String {
    match matched {
        Some(matched) if matched.already_in_cart() => format!(
            "You have {} items of {} in your cart. We need {ingredient} for our recipe. \
             Do you want to add more {} to your cart?",
            matched.quantity_in_cart, matched.display_name, matched.display_name,
        ),
        _ => format!(
            "We need {ingredient} for our recipe. Do you want to add {ingredient} to your cart?"
        ),
    }
}

pub fn ask_quantity(display_name: &str) -> String {
    format!("How many items of {display_name} would you like to add to your cart?")
}

pub fn product_found(ingredient: &str, hit: &ProductHit) -> String {
    format!(
        "I found a product for {ingredient} called {} selling for {} dollars. \
         How many would you like to add to your cart?",
        hit.display_name, hit.unit_price,
    )
}

pub fn added_line(quantity: u32, display_name: &str) -> String {
    format!("{quantity} {display_name} has been added to your cart.")
}

pub fn reprompt_quantity(display_name: &str) -> String {
    format!(
        "I need a whole number for that. How many items of {display_name} should I add to \
         your cart?"
    )
}

pub fn commit_failed(display_name: &str) -> String {
    format!(
        "I couldn't update your cart just now. How many items of {display_name} should I \
         try to add again?"
    )
}

pub fn walk_complete(recipe_name: &str) -> String {
    format!(
        "You're done adding to your cart! I can't wait to start making {recipe_name} with you. \
         On a scale from 1 to 5, how likely are you to recommend this service to a friend?"
    )
}

/// The boundary phrasing for a failed turn. Network failures and state
/// inconsistencies close or reset the conversation; the rest re-prompt.
pub fn spoken_error(error: &TurnError) -> String {
    match error {
        TurnError::Network(service_error) => match service_error.service() {
            CART_SERVICE => {
                "I couldn't reach your cart right now. Let's pick this up again later."
                    .to_string()
            }
            RECIPE_CATALOG => {
                "Recipe search isn't available right now. Please try again in a little while."
                    .to_string()
            }
            _ => "Product search isn't available right now. Please try again in a little while."
                .to_string(),
        },
        TurnError::NotFound { service, query } => {
            if *service == RECIPE_CATALOG {
                format!("Hmm, I couldn't find a recipe for {query}. Would you like to try a different dish?")
            } else {
                format!("I couldn't find any products for {query}. Say next ingredient to skip it.")
            }
        }
        TurnError::Validation { .. } => {
            "I was expecting a whole number there. Could you say that again?".to_string()
        }
        TurnError::State(_) => {
            "I lost track of where we were. Let's start over: what recipe would you like to make?"
                .to_string()
        }
    }
}
