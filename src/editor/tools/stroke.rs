use super::settings::{ToolSettings, GRID, ZOOM};
use crate::editor::viewport::PIXEL_PERFECT_MIN_ZOOM;
use crate::geometry::{Color, ImagePoint, ToolBounds};
use crate::raster::RasterSurface;

/// Grid visible and zoomed to at least 4x: tools address single pixels.
pub fn is_pixel_perfect(settings: &ToolSettings) -> bool {
    settings.bool_or(GRID, false) && settings.float_or(ZOOM, 1.0) >= PIXEL_PERFECT_MIN_ZOOM
}

/// Square box of `size` pixels centred on `at`; even sizes extend one pixel right/down.
pub(super) fn disk_bounds(at: ImagePoint, size: u32) -> ToolBounds {
    let size = i32::try_from(size.max(1)).unwrap_or(i32::MAX);
    let left = at.x.saturating_sub(size / 2);
    let top = at.y.saturating_sub(size / 2);
    ToolBounds::new(
        left,
        top,
        left.saturating_add(size - 1),
        top.saturating_add(size - 1),
    )
}

/// Dab/segment policy shared by the freehand tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct StrokeStyle {
    pub(super) color: Color,
    pub(super) size: u32,
    pub(super) single_pixel: bool,
}

impl StrokeStyle {
    pub(super) fn dab(&self, image: &mut dyn RasterSurface, at: ImagePoint) {
        if self.single_pixel {
            image.point(at, self.color);
        } else {
            image.ellipse(disk_bounds(at, self.size), None, Some(self.color), 1);
        }
    }

    pub(super) fn segment(&self, image: &mut dyn RasterSurface, from: ImagePoint, to: ImagePoint) {
        if self.single_pixel {
            image.line(from, to, self.color, 1);
            return;
        }
        image.line(from, to, self.color, self.size);
        self.dab(image, from);
        self.dab(image, to);
    }
}
