//! Presentation overlay contract: transient display-space shapes drawn over the canvas.
//!
//! Overlays are used for shape previews, the pixel highlight and the zoomed
//! grid. Committed content never goes through this layer.

mod recording;

pub use recording::{OverlayItem, OverlayShape, RecordingCanvas};

use crate::geometry::{Color, DisplayPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashPattern {
    pub on: u8,
    pub off: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub outline: Color,
    pub fill: Option<Color>,
    pub width: f64,
    pub dash: Option<DashPattern>,
}

pub const PREVIEW_DASH: DashPattern = DashPattern { on: 4, off: 4 };

impl OverlayStyle {
    pub const fn solid(outline: Color, width: f64) -> Self {
        Self {
            outline,
            fill: None,
            width,
            dash: None,
        }
    }

    /// Dashed outline used for shape previews.
    pub const fn dashed(outline: Color, width: f64) -> Self {
        Self {
            outline,
            fill: None,
            width,
            dash: Some(PREVIEW_DASH),
        }
    }
}

/// Drawing surface of the host widget. Coordinates are in display space.
pub trait OverlayCanvas {
    fn create_line(&mut self, from: DisplayPoint, to: DisplayPoint, style: &OverlayStyle)
        -> OverlayHandle;

    fn create_rectangle(
        &mut self,
        corner: DisplayPoint,
        opposite: DisplayPoint,
        style: &OverlayStyle,
    ) -> OverlayHandle;

    fn create_oval(
        &mut self,
        corner: DisplayPoint,
        opposite: DisplayPoint,
        style: &OverlayStyle,
    ) -> OverlayHandle;

    /// Deleting an unknown handle is a no-op.
    fn delete(&mut self, handle: OverlayHandle);
}
