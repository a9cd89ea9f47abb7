use serde::{Deserialize, Serialize};

use crate::errors::StateError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeCandidate {
    pub name: String,
    pub rating: f32,
    pub total_time_secs: u32,
    pub source_name: String,
    pub ingredients: Vec<String>,
}

/// Orders search results for presentation. Ascending total preparation time;
/// rating is carried for display but does not participate in the ordering.
pub fn rank_candidates(mut candidates: Vec<RecipeCandidate>) -> Vec<RecipeCandidate> {
    candidates.sort_by_key(|candidate| candidate.total_time_secs);
    candidates
}

/// Browse position over a ranked recipe list, round-tripped through the
/// `recipe_selection` context between turns. The `current_*` fields are
/// denormalized copies of `ranked[selected_index]` kept in lockstep by the
/// constructors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeSelection {
    pub selected_index: usize,
    pub ranked: Vec<RecipeCandidate>,
    pub current_name: String,
    pub current_ingredients: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    Next(RecipeSelection),
    EndOfList,
}

impl RecipeSelection {
    pub fn seed(ranked: Vec<RecipeCandidate>) -> Result<Self, StateError> {
        Self::at(ranked, 0)
    }

    pub fn at(ranked: Vec<RecipeCandidate>, selected_index: usize) -> Result<Self, StateError> {
        let current = ranked.get(selected_index).ok_or(StateError::IndexOutOfBounds {
            collection: "ranked recipe list",
            index: selected_index,
            len: ranked.len(),
        })?;
        let current_name = current.name.clone();
        let current_ingredients = current.ingredients.clone();
        Ok(Self { selected_index, ranked, current_name, current_ingredients })
    }

    pub fn current(&self) -> Result<&RecipeCandidate, StateError> {
        self.ranked.get(self.selected_index).ok_or(StateError::IndexOutOfBounds {
            collection: "ranked recipe list",
            index: self.selected_index,
            len: self.ranked.len(),
        })
    }

    /// Moves to the next ranked candidate. Walking off the end of the list is
    /// `EndOfList`, a terminal browse outcome rather than an error.
    pub fn advance(self) -> Advance {
        let next_index = self.selected_index + 1;
        if next_index >= self.ranked.len() {
            return Advance::EndOfList;
        }
        match Self::at(self.ranked, next_index) {
            Ok(next) => Advance::Next(next),
            Err(_) => Advance::EndOfList,
        }
    }
}
