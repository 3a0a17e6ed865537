use super::settings::{SettingSpec, ToolSettings, COLOR, SIZE};
use super::stroke::{is_pixel_perfect, StrokeStyle};
use super::{CursorHint, Tool, ToolCapabilities, ToolDescriptor};
use crate::geometry::{ImagePoint, DEFAULT_COLOR};
use crate::raster::RasterSurface;

const DEFAULT_PENCIL_SIZE: i64 = 1;
const MAX_PENCIL_SIZE: i64 = 20;

/// Hard-edged freehand tool. Size 1 always addresses exactly one pixel.
#[derive(Debug, Clone)]
pub struct PencilTool {
    descriptor: ToolDescriptor,
    schema: Vec<SettingSpec>,
}

impl Default for PencilTool {
    fn default() -> Self {
        Self::new()
    }
}

impl PencilTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                "pencil",
                "Pencil",
                ToolCapabilities::immediate(),
                CursorHint::Pencil,
            ),
            schema: vec![
                SettingSpec::slider(SIZE, "Size", 1, MAX_PENCIL_SIZE, DEFAULT_PENCIL_SIZE),
                SettingSpec::color(COLOR, "Color", DEFAULT_COLOR),
            ],
        }
    }

    fn style(settings: &ToolSettings) -> StrokeStyle {
        let size = settings.size_or(DEFAULT_PENCIL_SIZE as u32);
        StrokeStyle {
            color: settings.color_or(COLOR, DEFAULT_COLOR),
            size,
            single_pixel: size <= 1 || is_pixel_perfect(settings),
        }
    }
}

impl Tool for PencilTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn settings_schema(&self) -> &[SettingSpec] {
        &self.schema
    }

    fn on_click(&self, image: &mut dyn RasterSurface, at: ImagePoint, settings: &ToolSettings) {
        Self::style(settings).dab(image, at);
    }

    fn on_drag(
        &self,
        image: &mut dyn RasterSurface,
        from: ImagePoint,
        to: ImagePoint,
        settings: &ToolSettings,
    ) {
        Self::style(settings).segment(image, from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::super::brush::painted_pixels;
    use super::*;
    use crate::editor::tools::settings::{GRID, ZOOM};
    use crate::geometry::Color;
    use crate::raster::recording::{RasterCall, RecordingSurface};
    use crate::raster::RgbaRaster;

    const WHITE: Color = Color::new(255, 255, 255);
    const BLUE: Color = Color::new(0, 0, 255);

    fn validated(settings: ToolSettings) -> ToolSettings {
        PencilTool::new().validate_settings(&settings.with(COLOR, BLUE))
    }

    #[test]
    fn default_size_click_sets_one_pixel() {
        let mut raster = RgbaRaster::filled(10, 10, WHITE);
        PencilTool::new().on_click(&mut raster, ImagePoint::new(4, 6), &validated(ToolSettings::new()));
        assert_eq!(painted_pixels(&raster, BLUE), vec![ImagePoint::new(4, 6)]);
    }

    #[test]
    fn larger_pencil_draws_a_disk_unless_pixel_perfect() {
        let mut surface = RecordingSurface::new(20, 20, WHITE);
        let tool = PencilTool::new();
        tool.on_click(&mut surface, ImagePoint::new(5, 5), &validated(ToolSettings::new().with(SIZE, 4)));
        assert!(matches!(surface.calls[0], RasterCall::Ellipse(..)));

        let zoomed = validated(ToolSettings::new().with(SIZE, 4).with(GRID, true).with(ZOOM, 8.0));
        tool.on_click(&mut surface, ImagePoint::new(5, 5), &zoomed);
        assert_eq!(surface.calls[1], RasterCall::Point(ImagePoint::new(5, 5), BLUE));
    }

    #[test]
    fn drag_draws_single_width_line_between_points() {
        let mut surface = RecordingSurface::new(20, 20, WHITE);
        PencilTool::new().on_drag(
            &mut surface,
            ImagePoint::new(1, 1),
            ImagePoint::new(9, 4),
            &validated(ToolSettings::new()),
        );
        assert_eq!(
            surface.calls,
            vec![RasterCall::Line(ImagePoint::new(1, 1), ImagePoint::new(9, 4), BLUE, 1)]
        );
    }

    #[test]
    fn oversized_request_is_clamped_to_schema_max() {
        let settings = validated(ToolSettings::new().with(SIZE, 500));
        assert_eq!(settings.int_or(SIZE, 0), MAX_PENCIL_SIZE);
    }
}
