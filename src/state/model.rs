/// Pointer interaction phase of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Button held with an immediate-draw tool; every move paints.
    Pressed,
    /// Button held with a preview tool; moves only refresh the overlay.
    DraggingPreview,
}
