use super::rectangle::{shape_schema, ShapePaint};
use super::settings::{SettingSpec, ToolSettings};
use super::{CursorHint, Tool, ToolCapabilities, ToolDescriptor};
use crate::geometry::{DisplayPoint, ImagePoint, ToolBounds};
use crate::overlay::{OverlayCanvas, OverlayHandle};
use crate::raster::RasterSurface;

const PERFECT_CIRCLE: &str = "perfect_circle";

/// Shrinks `bounds` to a square of side `min(width, height)` sharing its centre.
pub fn square_bounds(bounds: ToolBounds) -> ToolBounds {
    let side = bounds.width().min(bounds.height());
    let left = i64::from(bounds.left) + (bounds.width() - side) / 2;
    let top = i64::from(bounds.top) + (bounds.height() - side) / 2;
    // Every value stays within the original box, so narrowing cannot fail.
    let narrow = |value: i64| i32::try_from(value).unwrap_or(i32::MAX);
    ToolBounds::new(
        narrow(left),
        narrow(top),
        narrow(left + side),
        narrow(top + side),
    )
}

fn square_display(start: DisplayPoint, end: DisplayPoint) -> (DisplayPoint, DisplayPoint) {
    let (left, right) = (start.x.min(end.x), start.x.max(end.x));
    let (top, bottom) = (start.y.min(end.y), start.y.max(end.y));
    let side = (right - left).min(bottom - top);
    let x = left + (right - left - side) / 2.0;
    let y = top + (bottom - top - side) / 2.0;
    (DisplayPoint::new(x, y), DisplayPoint::new(x + side, y + side))
}

/// Ellipse inscribed in the dragged box; optionally forced to a circle.
#[derive(Debug, Clone)]
pub struct CircleTool {
    descriptor: ToolDescriptor,
    schema: Vec<SettingSpec>,
}

impl Default for CircleTool {
    fn default() -> Self {
        Self::new()
    }
}

impl CircleTool {
    pub fn new() -> Self {
        let mut schema = shape_schema();
        schema.push(SettingSpec::checkbox(PERFECT_CIRCLE, "Perfect circle", false));
        Self {
            descriptor: ToolDescriptor::new(
                "circle",
                "Circle",
                ToolCapabilities::shape(),
                CursorHint::Crosshair,
            ),
            schema,
        }
    }
}

impl Tool for CircleTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn settings_schema(&self) -> &[SettingSpec] {
        &self.schema
    }

    fn on_release(
        &self,
        image: &mut dyn RasterSurface,
        start: ImagePoint,
        end: ImagePoint,
        settings: &ToolSettings,
    ) {
        let mut bounds = ToolBounds::from_corners(start, end);
        if !bounds.has_area() {
            return;
        }
        if settings.bool_or(PERFECT_CIRCLE, false) {
            bounds = square_bounds(bounds);
        }
        let paint = ShapePaint::from_settings(settings);
        image.ellipse(bounds, Some(paint.outline), paint.fill, paint.width);
    }

    fn create_preview(
        &self,
        canvas: &mut dyn OverlayCanvas,
        start: DisplayPoint,
        end: DisplayPoint,
        _zoom: f64,
        settings: &ToolSettings,
    ) -> Option<OverlayHandle> {
        let (corner, opposite) = if settings.bool_or(PERFECT_CIRCLE, false) {
            square_display(start, end)
        } else {
            (start, end)
        };
        let style = ShapePaint::from_settings(settings).preview_style();
        Some(canvas.create_oval(corner, opposite, &style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::tools::settings::{COLOR, SIZE};
    use crate::geometry::Color;
    use crate::overlay::{OverlayShape, RecordingCanvas};
    use crate::raster::recording::{RasterCall, RecordingSurface};
    use proptest::prelude::*;

    const WHITE: Color = Color::new(255, 255, 255);
    const RED: Color = Color::new(255, 0, 0);

    fn settings(perfect: bool) -> ToolSettings {
        CircleTool::new().validate_settings(
            &ToolSettings::new()
                .with(SIZE, 2)
                .with(COLOR, RED)
                .with(PERFECT_CIRCLE, perfect),
        )
    }

    #[test]
    fn square_bounds_recentres_on_the_shorter_side() {
        let squared = square_bounds(ToolBounds::new(10, 10, 50, 30));
        assert_eq!(squared, ToolBounds::new(20, 10, 40, 30));
    }

    #[test]
    fn release_draws_ellipse_in_dragged_box() {
        let mut surface = RecordingSurface::new(64, 64, WHITE);
        CircleTool::new().on_release(
            &mut surface,
            ImagePoint::new(50, 30),
            ImagePoint::new(10, 10),
            &settings(false),
        );
        assert_eq!(
            surface.calls,
            vec![RasterCall::Ellipse(ToolBounds::new(10, 10, 50, 30), Some(RED), None, 2)]
        );
    }

    #[test]
    fn perfect_circle_mode_draws_square_bounds() {
        let mut surface = RecordingSurface::new(64, 64, WHITE);
        CircleTool::new().on_release(
            &mut surface,
            ImagePoint::new(10, 10),
            ImagePoint::new(50, 30),
            &settings(true),
        );
        assert_eq!(
            surface.calls,
            vec![RasterCall::Ellipse(ToolBounds::new(20, 10, 40, 30), Some(RED), None, 2)]
        );
    }

    #[test]
    fn zero_size_drag_is_ignored() {
        let mut surface = RecordingSurface::new(16, 16, WHITE);
        let at = ImagePoint::new(3, 3);
        CircleTool::new().on_release(&mut surface, at, at, &settings(true));
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn perfect_preview_is_square_oval() {
        let mut canvas = RecordingCanvas::new();
        let handle = CircleTool::new()
            .create_preview(
                &mut canvas,
                DisplayPoint::new(0.0, 0.0),
                DisplayPoint::new(40.0, 20.0),
                2.0,
                &settings(true),
            )
            .expect("circle should preview");
        let item = canvas.get(handle).expect("preview should be live");
        assert_eq!(item.shape, OverlayShape::Oval);
        assert_eq!(item.from, DisplayPoint::new(10.0, 0.0));
        assert_eq!(item.to, DisplayPoint::new(30.0, 20.0));
    }

    proptest! {
        #[test]
        fn squared_bounds_are_square_and_inside_original(
            left in -200i32..200,
            top in -200i32..200,
            width in 1i32..300,
            height in 1i32..300,
        ) {
            let original = ToolBounds::new(left, top, left + width, top + height);
            let squared = square_bounds(original);
            prop_assert_eq!(squared.width(), squared.height());
            prop_assert_eq!(squared.width(), i64::from(width.min(height)));
            prop_assert!(original.contains(ImagePoint::new(squared.left, squared.top)));
            prop_assert!(original.contains(ImagePoint::new(squared.right, squared.bottom)));
        }
    }
}
