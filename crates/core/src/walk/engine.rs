use thiserror::Error;

use crate::walk::states::{TransitionOutcome, WalkAction, WalkContext, WalkEvent, WalkPhase};

/// A pure transition table for one flavor of ingredient walk. Handlers apply
/// events and execute the returned actions; the table itself never touches
/// the network or the context store.
pub trait WalkDefinition {
    fn initial_phase(&self) -> WalkPhase;
    fn transition(
        &self,
        current: &WalkPhase,
        event: &WalkEvent,
        context: &WalkContext,
    ) -> Result<TransitionOutcome, WalkTransitionError>;
}

/// The shipping walk: resolve each ingredient against the retained cart
/// snapshot, fall back to one catalog search, confirm a quantity, commit,
/// advance.
#[derive(Clone, Debug, Default)]
pub struct IngredientWalk;

impl WalkDefinition for IngredientWalk {
    fn initial_phase(&self) -> WalkPhase {
        WalkPhase::AwaitingCartSnapshot
    }

    fn transition(
        &self,
        current: &WalkPhase,
        event: &WalkEvent,
        context: &WalkContext,
    ) -> Result<TransitionOutcome, WalkTransitionError> {
        transition_ingredient_walk(current, event, context)
    }
}

pub struct WalkEngine<W> {
    walk: W,
}

impl<W> WalkEngine<W>
where
    W: WalkDefinition,
{
    pub fn new(walk: W) -> Self {
        Self { walk }
    }

    pub fn initial_phase(&self) -> WalkPhase {
        self.walk.initial_phase()
    }

    pub fn apply(
        &self,
        current: &WalkPhase,
        event: &WalkEvent,
        context: &WalkContext,
    ) -> Result<TransitionOutcome, WalkTransitionError> {
        self.walk.transition(current, event, context)
    }
}

impl Default for WalkEngine<IngredientWalk> {
    fn default() -> Self {
        Self::new(IngredientWalk)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WalkTransitionError {
    #[error("invalid transition from {phase:?} using event {event:?}")]
    InvalidTransition { phase: WalkPhase, event: WalkEvent },
}

fn transition_ingredient_walk(
    current: &WalkPhase,
    event: &WalkEvent,
    context: &WalkContext,
) -> Result<TransitionOutcome, WalkTransitionError> {
    use WalkAction::{AdvanceCursor, CommitEntry, EmitSurvey, PromptQuantity, ResolveIngredient};
    use WalkEvent::{
        CommitFailed, CommitSucceeded, IngredientSkipped, MatchProposed, QuantityAccepted,
        QuantityRejected, SearchExhausted, SnapshotFetched,
    };
    use WalkPhase::{
        AwaitingCartSnapshot, AwaitingQuantity, Committing, Complete, ResolvingIngredient,
    };

    let last_ingredient = context.remaining_ingredients == 0;

    let (to, actions) = match (current, event) {
        (AwaitingCartSnapshot, SnapshotFetched) => (ResolvingIngredient, vec![ResolveIngredient]),
        (ResolvingIngredient, MatchProposed) => (AwaitingQuantity, vec![PromptQuantity]),
        // Zero catalog hits: stay resolvable so the user can skip ahead.
        (ResolvingIngredient, SearchExhausted) => (ResolvingIngredient, Vec::new()),
        (AwaitingQuantity, QuantityAccepted) => (Committing, vec![CommitEntry]),
        (AwaitingQuantity, QuantityRejected) => (AwaitingQuantity, vec![PromptQuantity]),
        (Committing, CommitSucceeded) if last_ingredient => {
            (Complete, vec![AdvanceCursor, EmitSurvey])
        }
        (Committing, CommitSucceeded) => {
            (ResolvingIngredient, vec![AdvanceCursor, ResolveIngredient])
        }
        // A failed commit keeps the cursor where it is; the PUT is
        // overwrite-by-id, so asking for the quantity again is a safe retry.
        (Committing, CommitFailed) => (AwaitingQuantity, vec![PromptQuantity]),
        (ResolvingIngredient, IngredientSkipped) | (AwaitingQuantity, IngredientSkipped)
            if last_ingredient =>
        {
            (Complete, vec![AdvanceCursor, EmitSurvey])
        }
        (ResolvingIngredient, IngredientSkipped) | (AwaitingQuantity, IngredientSkipped) => {
            (ResolvingIngredient, vec![AdvanceCursor, ResolveIngredient])
        }
        _ => {
            return Err(WalkTransitionError::InvalidTransition {
                phase: *current,
                event: event.clone(),
            });
        }
    };

    Ok(TransitionOutcome { from: *current, to, event: event.clone(), actions })
}

#[cfg(test)]
mod tests {
    use crate::walk::engine::{WalkEngine, WalkTransitionError};
    use crate::walk::states::{WalkAction, WalkContext, WalkEvent, WalkPhase};

    fn context(remaining_ingredients: usize) -> WalkContext {
        WalkContext { remaining_ingredients }
    }

    #[test]
    fn happy_path_commits_and_moves_to_the_next_ingredient() {
        let engine = WalkEngine::default();
        let mut phase = engine.initial_phase();

        phase = engine
            .apply(&phase, &WalkEvent::SnapshotFetched, &context(1))
            .expect("snapshot -> resolving")
            .to;
        phase = engine
            .apply(&phase, &WalkEvent::MatchProposed, &context(1))
            .expect("resolving -> awaiting quantity")
            .to;
        phase = engine
            .apply(&phase, &WalkEvent::QuantityAccepted, &context(1))
            .expect("awaiting quantity -> committing")
            .to;

        let outcome = engine
            .apply(&phase, &WalkEvent::CommitSucceeded, &context(1))
            .expect("committing -> resolving next");
        assert_eq!(outcome.to, WalkPhase::ResolvingIngredient);
        assert_eq!(
            outcome.actions,
            vec![WalkAction::AdvanceCursor, WalkAction::ResolveIngredient]
        );
    }

    #[test]
    fn committing_the_last_ingredient_completes_the_walk_with_a_survey() {
        let engine = WalkEngine::default();
        let outcome = engine
            .apply(&WalkPhase::Committing, &WalkEvent::CommitSucceeded, &context(0))
            .expect("last commit should complete the walk");

        assert_eq!(outcome.to, WalkPhase::Complete);
        assert_eq!(outcome.actions, vec![WalkAction::AdvanceCursor, WalkAction::EmitSurvey]);
    }

    #[test]
    fn failed_commit_returns_to_quantity_without_advancing() {
        let engine = WalkEngine::default();
        let outcome = engine
            .apply(&WalkPhase::Committing, &WalkEvent::CommitFailed, &context(1))
            .expect("failed commit should re-prompt");

        assert_eq!(outcome.to, WalkPhase::AwaitingQuantity);
        assert!(!outcome.actions.contains(&WalkAction::AdvanceCursor));
    }

    #[test]
    fn rejected_quantity_reprompts_in_place() {
        let engine = WalkEngine::default();
        let outcome = engine
            .apply(&WalkPhase::AwaitingQuantity, &WalkEvent::QuantityRejected, &context(1))
            .expect("rejected quantity should re-prompt");

        assert_eq!(outcome.to, WalkPhase::AwaitingQuantity);
        assert_eq!(outcome.actions, vec![WalkAction::PromptQuantity]);
    }

    #[test]
    fn skipping_is_legal_from_both_resolving_and_quantity_phases() {
        let engine = WalkEngine::default();

        for phase in [WalkPhase::ResolvingIngredient, WalkPhase::AwaitingQuantity] {
            let outcome = engine
                .apply(&phase, &WalkEvent::IngredientSkipped, &context(2))
                .expect("skip should advance");
            assert_eq!(outcome.to, WalkPhase::ResolvingIngredient);
            assert!(outcome.actions.contains(&WalkAction::AdvanceCursor));
        }

        let last = engine
            .apply(&WalkPhase::ResolvingIngredient, &WalkEvent::IngredientSkipped, &context(0))
            .expect("skipping the last ingredient completes the walk");
        assert_eq!(last.to, WalkPhase::Complete);
    }

    #[test]
    fn complete_is_terminal() {
        let engine = WalkEngine::default();
        let error = engine
            .apply(&WalkPhase::Complete, &WalkEvent::MatchProposed, &context(0))
            .expect_err("complete walks accept no further events");

        assert!(matches!(
            error,
            WalkTransitionError::InvalidTransition { phase: WalkPhase::Complete, .. }
        ));
    }

    #[test]
    fn replay_is_deterministic_for_the_same_event_sequence() {
        let engine = WalkEngine::default();
        let events = [
            WalkEvent::SnapshotFetched,
            WalkEvent::MatchProposed,
            WalkEvent::QuantityAccepted,
            WalkEvent::CommitSucceeded,
        ];

        let run = || {
            let mut phase = engine.initial_phase();
            let mut actions = Vec::new();
            for event in &events {
                let outcome =
                    engine.apply(&phase, event, &context(3)).expect("deterministic run");
                actions.push(outcome.actions.clone());
                phase = outcome.to;
            }
            (phase, actions)
        };

        assert_eq!(run(), run());
    }
}
