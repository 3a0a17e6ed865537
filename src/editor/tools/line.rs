use super::settings::{SettingSpec, ToolSettings, COLOR, SIZE};
use super::{CursorHint, Tool, ToolCapabilities, ToolDescriptor};
use crate::geometry::{DisplayPoint, ImagePoint, DEFAULT_COLOR};
use crate::overlay::{OverlayCanvas, OverlayHandle, OverlayStyle};
use crate::raster::RasterSurface;

const DEFAULT_LINE_WIDTH: i64 = 2;
const MAX_LINE_WIDTH: i64 = 50;

/// Straight segment committed on release.
#[derive(Debug, Clone)]
pub struct LineTool {
    descriptor: ToolDescriptor,
    schema: Vec<SettingSpec>,
}

impl Default for LineTool {
    fn default() -> Self {
        Self::new()
    }
}

impl LineTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                "line",
                "Line",
                ToolCapabilities::shape(),
                CursorHint::Crosshair,
            ),
            schema: vec![
                SettingSpec::slider(SIZE, "Width", 1, MAX_LINE_WIDTH, DEFAULT_LINE_WIDTH),
                SettingSpec::color(COLOR, "Color", DEFAULT_COLOR),
            ],
        }
    }
}

impl Tool for LineTool {
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
        if start == end {
            return;
        }
        image.line(
            start,
            end,
            settings.color_or(COLOR, DEFAULT_COLOR),
            settings.size_or(DEFAULT_LINE_WIDTH as u32),
        );
    }

    fn create_preview(
        &self,
        canvas: &mut dyn OverlayCanvas,
        start: DisplayPoint,
        end: DisplayPoint,
        zoom: f64,
        settings: &ToolSettings,
    ) -> Option<OverlayHandle> {
        let width = f64::from(settings.size_or(DEFAULT_LINE_WIDTH as u32)) * zoom;
        let style = OverlayStyle::dashed(settings.color_or(COLOR, DEFAULT_COLOR), width.max(1.0));
        Some(canvas.create_line(start, end, &style))
    }
}
