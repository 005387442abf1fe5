use super::intent::Intent;
use super::state::UiState;

/// Reducer transforms state based on intents.
///
/// The only place where dialog state transitions happen. Must be a pure
/// function: (State, Intent) -> State. Side effects such as committing a
/// search belong to the caller.
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
