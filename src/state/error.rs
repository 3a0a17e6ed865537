use super::event::InteractionEvent;
use super::model::InteractionState;
use thiserror::Error;

pub type InteractionResult<T> = std::result::Result<T, InteractionError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InteractionError {
    #[error("invalid interaction transition: from {from:?} using event {event:?}")]
    InvalidTransition {
        from: InteractionState,
        event: InteractionEvent,
    },
}
