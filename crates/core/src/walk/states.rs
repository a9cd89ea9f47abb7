use serde::{Deserialize, Serialize};

use crate::domain::cart::{CartEntry, ProductMatch};
use crate::errors::StateError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkPhase {
    AwaitingCartSnapshot,
    ResolvingIngredient,
    AwaitingQuantity,
    Committing,
    Complete,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkEvent {
    SnapshotFetched,
    MatchProposed,
    SearchExhausted,
    QuantityAccepted,
    QuantityRejected,
    CommitSucceeded,
    CommitFailed,
    IngredientSkipped,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkAction {
    ResolveIngredient,
    PromptQuantity,
    CommitEntry,
    AdvanceCursor,
    EmitSurvey,
}

/// Inputs the transition table needs beyond the phase itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WalkContext {
    /// Ingredients left after the one currently under the cursor.
    pub remaining_ingredients: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: WalkPhase,
    pub to: WalkPhase,
    pub event: WalkEvent,
    pub actions: Vec<WalkAction>,
}

/// Ingredient-by-ingredient cart progress, round-tripped through the
/// `cart_walk` context between turns.
///
/// `cart_index` is the sole progress cursor: it advances by exactly one per
/// committed or skipped ingredient, and `cart_index == ingredients.len()`
/// means the walk is complete. The cart snapshot is fetched once when the
/// recipe is selected and reused for every later ingredient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartWalk {
    pub recipe_name: String,
    pub ingredients: Vec<String>,
    pub cart_index: usize,
    pub cart_snapshot: Vec<CartEntry>,
    pub pending_match: Option<ProductMatch>,
    pub phase: WalkPhase,
}

impl CartWalk {
    pub fn begin(
        recipe_name: impl Into<String>,
        ingredients: Vec<String>,
        cart_snapshot: Vec<CartEntry>,
    ) -> Self {
        Self {
            recipe_name: recipe_name.into(),
            ingredients,
            cart_index: 0,
            cart_snapshot,
            pending_match: None,
            phase: WalkPhase::AwaitingCartSnapshot,
        }
    }

    /// Rejects a restored walk whose cursor has escaped the ingredient list.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.cart_index > self.ingredients.len() {
            return Err(StateError::IndexOutOfBounds {
                collection: "ingredient list",
                index: self.cart_index,
                len: self.ingredients.len(),
            });
        }
        Ok(())
    }

    pub fn expect_phase(&self, expected: &[WalkPhase], intent: &str) -> Result<(), StateError> {
        if expected.contains(&self.phase) {
            return Ok(());
        }
        Err(StateError::PhaseMismatch { intent: intent.to_string(), phase: self.phase })
    }

    pub fn is_complete(&self) -> bool {
        self.cart_index >= self.ingredients.len()
    }

    pub fn current_ingredient(&self) -> Result<&str, StateError> {
        self.ingredients.get(self.cart_index).map(String::as_str).ok_or(
            StateError::IndexOutOfBounds {
                collection: "ingredient list",
                index: self.cart_index,
                len: self.ingredients.len(),
            },
        )
    }

    pub fn walk_context(&self) -> WalkContext {
        WalkContext {
            remaining_ingredients: self
                .ingredients
                .len()
                .saturating_sub(self.cart_index)
                .saturating_sub(1),
        }
    }

    /// Moves the cursor past the current ingredient and clears the pending
    /// match; only legal while an ingredient remains under the cursor.
    pub fn advance(&mut self) -> Result<(), StateError> {
        if self.is_complete() {
            return Err(StateError::IndexOutOfBounds {
                collection: "ingredient list",
                index: self.cart_index + 1,
                len: self.ingredients.len(),
            });
        }
        self.cart_index += 1;
        self.pending_match = None;
        Ok(())
    }
}
