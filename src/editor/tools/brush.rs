use super::settings::{SettingSpec, ToolSettings, COLOR, SIZE};
use super::stroke::{is_pixel_perfect, StrokeStyle};
use super::{CursorHint, Tool, ToolCapabilities, ToolDescriptor};
use crate::geometry::{ImagePoint, DEFAULT_COLOR};
use crate::raster::RasterSurface;

const DEFAULT_BRUSH_SIZE: i64 = 5;
const MAX_BRUSH_SIZE: i64 = 100;

/// Round soft-edged freehand brush.
#[derive(Debug, Clone)]
pub struct BrushTool {
    descriptor: ToolDescriptor,
    schema: Vec<SettingSpec>,
}

impl Default for BrushTool {
    fn default() -> Self {
        Self::new()
    }
}

impl BrushTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                "brush",
                "Brush",
                ToolCapabilities::immediate(),
                CursorHint::Circle,
            ),
            schema: vec![
                SettingSpec::slider(SIZE, "Size", 1, MAX_BRUSH_SIZE, DEFAULT_BRUSH_SIZE),
                SettingSpec::color(COLOR, "Color", DEFAULT_COLOR),
            ],
        }
    }

    fn style(settings: &ToolSettings) -> StrokeStyle {
        StrokeStyle {
            color: settings.color_or(COLOR, DEFAULT_COLOR),
            size: settings.size_or(DEFAULT_BRUSH_SIZE as u32),
            single_pixel: is_pixel_perfect(settings),
        }
    }
}

impl Tool for BrushTool {
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
pub(super) fn painted_pixels(
    image: &dyn RasterSurface,
    color: crate::geometry::Color,
) -> Vec<ImagePoint> {
    let mut hits = Vec::new();
    for y in 0..image.height() as i32 {
        for x in 0..image.width() as i32 {
            let at = ImagePoint::new(x, y);
            if image.pixel(at) == Some(color) {
                hits.push(at);
            }
        }
    }
    hits
}
