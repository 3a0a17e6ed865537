use std::collections::VecDeque;

use super::error::{InteractionError, InteractionResult};
use super::{InteractionEvent, InteractionState, StateTransition};

const HISTORY_LIMIT: usize = 64;

#[derive(Debug)]
pub struct InteractionMachine {
    state: InteractionState,
    transition_history: VecDeque<StateTransition>,
}

impl InteractionMachine {
    pub fn new() -> Self {
        Self {
            state: InteractionState::default(),
            transition_history: VecDeque::new(),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn can_transition(&self, event: InteractionEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: InteractionEvent) -> Option<InteractionState> {
        use InteractionEvent::*;
        use InteractionState::*;
        match (self.state, event) {
            (_, ToolChange | Cancel) => Some(Idle),
            (Idle, PressImmediate) => Some(Pressed),
            (Idle, PressPreview) => Some(DraggingPreview),
            (Idle, PressModal) => Some(Idle),
            (Pressed, Move) => Some(Pressed),
            (DraggingPreview, Move) => Some(DraggingPreview),
            (Pressed | DraggingPreview, Release) => Some(Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: InteractionEvent) -> InteractionResult<InteractionState> {
        let from = self.state;
        let next = self.next_state(event).ok_or_else(|| {
            tracing::trace!(from = ?from, event = ?event, "interaction event ignored");
            InteractionError::InvalidTransition { from, event }
        })?;

        if next != from {
            tracing::debug!(from = ?from, event = ?event, to = ?next, "interaction state changed");
        }
        if self.transition_history.len() == HISTORY_LIMIT {
            self.transition_history.pop_front();
        }
        self.transition_history
            .push_back(StateTransition::new(from, event, next));
        self.state = next;

        Ok(self.state)
    }
}

#[cfg(test)]
impl InteractionMachine {
    fn history(&self) -> &VecDeque<StateTransition> {
        &self.transition_history
    }
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InteractionMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InteractionState::{:?}", self.state)
    }
}
