use crate::input::{clamp_achieved, clamp_goal, parse_step_count};
use crate::models::Entry;
use std::mem;

/// A detached copy of an entry being edited in the history view. Changes to
/// the draft stay here until `commit` hands it to the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing(Entry),
}

impl EditState {
    /// Starts editing a copy of `entry`, discarding any previous draft.
    pub fn start(&mut self, entry: &Entry) {
        *self = EditState::Editing(entry.clone());
    }

    pub fn draft(&self) -> Option<&Entry> {
        match self {
            EditState::Editing(draft) => Some(draft),
            EditState::Idle => None,
        }
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.draft().is_some_and(|draft| draft.id == id)
    }

    pub fn set_goal(&mut self, raw: &str) {
        if let EditState::Editing(draft) = self {
            draft.goal = clamp_goal(parse_step_count(raw));
        }
    }

    pub fn set_achieved(&mut self, raw: &str) {
        if let EditState::Editing(draft) = self {
            draft.achieved = clamp_achieved(parse_step_count(raw));
        }
    }

    /// Takes the draft and returns to `Idle`.
    pub fn commit(&mut self) -> Option<Entry> {
        match mem::take(self) {
            EditState::Editing(draft) => Some(draft),
            EditState::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = EditState::Idle;
    }
}
