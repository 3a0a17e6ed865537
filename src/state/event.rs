use super::model::InteractionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionEvent {
    /// Press with a tool that paints on click/drag.
    PressImmediate,
    /// Press with a tool that previews and commits on release.
    PressPreview,
    /// Press with a modal tool (text); handled synchronously inside the press.
    PressModal,
    Move,
    Release,
    ToolChange,
    /// Pointer capture lost, zoom changed or the host aborted the gesture.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: InteractionState,
    pub event: InteractionEvent,
    pub to: InteractionState,
}

impl StateTransition {
    pub const fn new(from: InteractionState, event: InteractionEvent, to: InteractionState) -> Self {
        Self { from, event, to }
    }
}
