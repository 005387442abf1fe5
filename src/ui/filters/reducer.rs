use crate::ui::filters::intent::FilterDialogIntent;
use crate::ui::filters::state::FilterDialogState;
use crate::ui::mvi::Reducer;

pub struct FilterDialogReducer;

impl Reducer for FilterDialogReducer {
    type State = FilterDialogState;
    type Intent = FilterDialogIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FilterDialogIntent::Open { committed } => FilterDialogState::Editing {
                draft: committed.clone(),
                baseline: committed,
                dirty: false,
            },
            FilterDialogIntent::Discard | FilterDialogIntent::Applied => FilterDialogState::Hidden,
            FilterDialogIntent::Toggle { family, option } => match state {
                FilterDialogState::Editing {
                    mut draft,
                    baseline,
                    ..
                } => {
                    draft.toggle(family, &option);
                    let dirty = draft != baseline;
                    FilterDialogState::Editing {
                        draft,
                        baseline,
                        dirty,
                    }
                }
                other => other,
            },
            FilterDialogIntent::ClearAll => match state {
                FilterDialogState::Editing {
                    mut draft,
                    baseline,
                    ..
                } => {
                    draft.clear();
                    let dirty = draft != baseline;
                    FilterDialogState::Editing {
                        draft,
                        baseline,
                        dirty,
                    }
                }
                other => other,
            },
        }
    }
}
