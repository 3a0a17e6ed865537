use super::settings::{SettingSpec, ToolSettings, COLOR, SIZE};
use super::{CursorHint, Tool, ToolCapabilities, ToolDescriptor};
use crate::geometry::{Color, DisplayPoint, ImagePoint, ToolBounds, DEFAULT_COLOR};
use crate::overlay::{OverlayCanvas, OverlayHandle, OverlayStyle};
use crate::raster::RasterSurface;

pub(super) const FILL: &str = "fill";
pub(super) const FILL_COLOR: &str = "fill_color";
pub(super) const DEFAULT_SHAPE_WIDTH: i64 = 2;
pub(super) const MAX_SHAPE_WIDTH: i64 = 50;
pub(super) const DEFAULT_FILL_COLOR: Color = Color::new(255, 255, 255);

/// Outline/fill settings shared by the rectangle and circle tools.
pub(super) fn shape_schema() -> Vec<SettingSpec> {
    vec![
        SettingSpec::slider(SIZE, "Border width", 1, MAX_SHAPE_WIDTH, DEFAULT_SHAPE_WIDTH),
        SettingSpec::color(COLOR, "Border color", DEFAULT_COLOR),
        SettingSpec::checkbox(FILL, "Fill", false),
        SettingSpec::color(FILL_COLOR, "Fill color", DEFAULT_FILL_COLOR),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ShapePaint {
    pub(super) outline: Color,
    pub(super) fill: Option<Color>,
    pub(super) width: u32,
}

impl ShapePaint {
    pub(super) fn from_settings(settings: &ToolSettings) -> Self {
        Self {
            outline: settings.color_or(COLOR, DEFAULT_COLOR),
            fill: settings
                .bool_or(FILL, false)
                .then(|| settings.color_or(FILL_COLOR, DEFAULT_FILL_COLOR)),
            width: settings.size_or(DEFAULT_SHAPE_WIDTH as u32),
        }
    }

    pub(super) fn preview_style(&self) -> OverlayStyle {
        OverlayStyle::dashed(self.outline, 1.0)
    }
}

/// Axis-aligned box between the press and release points, outline plus optional fill.
#[derive(Debug, Clone)]
pub struct RectangleTool {
    descriptor: ToolDescriptor,
    schema: Vec<SettingSpec>,
}

impl Default for RectangleTool {
    fn default() -> Self {
        Self::new()
    }
}

impl RectangleTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                "rectangle",
                "Rectangle",
                ToolCapabilities::shape(),
                CursorHint::Crosshair,
            ),
            schema: shape_schema(),
        }
    }
}

impl Tool for RectangleTool {
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
        let bounds = ToolBounds::from_corners(start, end);
        if !bounds.has_area() {
            return;
        }
        let paint = ShapePaint::from_settings(settings);
        image.rectangle(bounds, Some(paint.outline), paint.fill, paint.width);
    }

    fn create_preview(
        &self,
        canvas: &mut dyn OverlayCanvas,
        start: DisplayPoint,
        end: DisplayPoint,
        _zoom: f64,
        settings: &ToolSettings,
    ) -> Option<OverlayHandle> {
        let style = ShapePaint::from_settings(settings).preview_style();
        Some(canvas.create_rectangle(start, end, &style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{OverlayShape, RecordingCanvas};
    use crate::raster::recording::{RasterCall, RecordingSurface};
    use crate::raster::RgbaRaster;

    const WHITE: Color = Color::new(255, 255, 255);
    const RED: Color = Color::new(255, 0, 0);
    const YELLOW: Color = Color::new(255, 255, 0);

    fn settings(fill: bool) -> ToolSettings {
        RectangleTool::new().validate_settings(
            &ToolSettings::new()
                .with(SIZE, 1)
                .with(COLOR, RED)
                .with(FILL, fill)
                .with(FILL_COLOR, YELLOW),
        )
    }

    #[test]
    fn release_draws_outline_with_exact_corners() {
        let mut raster = RgbaRaster::filled(64, 64, WHITE);
        RectangleTool::new().on_release(
            &mut raster,
            ImagePoint::new(10, 10),
            ImagePoint::new(50, 30),
            &settings(false),
        );
        for corner in [(10, 10), (50, 10), (10, 30), (50, 30)] {
            assert_eq!(raster.pixel(ImagePoint::new(corner.0, corner.1)), Some(RED));
        }
        assert_eq!(raster.pixel(ImagePoint::new(30, 20)), Some(WHITE));
        assert_eq!(raster.pixel(ImagePoint::new(51, 30)), Some(WHITE));
    }

    #[test]
    fn fill_mode_uses_the_secondary_color() {
        let mut surface = RecordingSurface::new(40, 40, WHITE);
        RectangleTool::new().on_release(
            &mut surface,
            ImagePoint::new(30, 25),
            ImagePoint::new(5, 5),
            &settings(true),
        );
        assert_eq!(
            surface.calls,
            vec![RasterCall::Rectangle(
                ToolBounds::new(5, 5, 30, 25),
                Some(RED),
                Some(YELLOW),
                1
            )]
        );
        assert_eq!(surface.pixel(ImagePoint::new(15, 15)), Some(YELLOW));
    }

    #[test]
    fn zero_size_drag_produces_no_primitive() {
        let mut surface = RecordingSurface::new(20, 20, WHITE);
        let tool = RectangleTool::new();
        let at = ImagePoint::new(7, 7);
        tool.on_release(&mut surface, at, at, &settings(true));
        tool.on_release(&mut surface, at, ImagePoint::new(7, 15), &settings(true));
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn preview_is_a_dashed_rectangle_in_display_space() {
        let mut canvas = RecordingCanvas::new();
        let handle = RectangleTool::new()
            .create_preview(
                &mut canvas,
                DisplayPoint::new(12.0, 12.0),
                DisplayPoint::new(52.0, 32.0),
                1.0,
                &settings(true),
            )
            .expect("rectangle should preview");
        let item = canvas.get(handle).expect("preview should be live");
        assert_eq!(item.shape, OverlayShape::Rectangle);
        assert!(item.style.dash.is_some());
        assert_eq!(item.style.fill, None);
        assert_eq!(item.to, DisplayPoint::new(52.0, 32.0));
    }
}
