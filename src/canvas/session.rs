use crate::editor::viewport::CoordinateFrame;
use crate::geometry::ImagePoint;
use crate::overlay::OverlayHandle;

/// In-progress press/drag. Zoom and inset are captured at press time and held
/// until the session ends; the scroll offset in `frame` is replaced with the
/// host's current one on every pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSession {
    pub start: ImagePoint,
    pub current: ImagePoint,
    pub preview: Option<OverlayHandle>,
    pub frame: CoordinateFrame,
}

impl InteractionSession {
    pub fn new(start: ImagePoint, frame: CoordinateFrame) -> Self {
        Self {
            start,
            current: start,
            preview: None,
            frame,
        }
    }

    pub fn has_preview(&self) -> bool {
        self.preview.is_some()
    }
}

/// Outline drawn around the pixel under the pointer in pixel-perfect mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelHighlight {
    pub at: ImagePoint,
    pub handle: OverlayHandle,
}
