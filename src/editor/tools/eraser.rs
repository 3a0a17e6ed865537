use super::settings::{SettingSpec, ToolSettings, SIZE};
use super::stroke::{is_pixel_perfect, StrokeStyle};
use super::{CursorHint, Tool, ToolCapabilities, ToolDescriptor};
use crate::geometry::{Color, ImagePoint};
use crate::raster::RasterSurface;

const DEFAULT_ERASER_SIZE: i64 = 10;
const MAX_ERASER_SIZE: i64 = 100;

/// Brush geometry that paints fully transparent pixels. Ignores the global color.
#[derive(Debug, Clone)]
pub struct EraserTool {
    descriptor: ToolDescriptor,
    schema: Vec<SettingSpec>,
}

impl Default for EraserTool {
    fn default() -> Self {
        Self::new()
    }
}

impl EraserTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                "eraser",
                "Eraser",
                ToolCapabilities::immediate(),
                CursorHint::Circle,
            ),
            schema: vec![SettingSpec::slider(
                SIZE,
                "Size",
                1,
                MAX_ERASER_SIZE,
                DEFAULT_ERASER_SIZE,
            )],
        }
    }

    fn style(settings: &ToolSettings) -> StrokeStyle {
        StrokeStyle {
            color: Color::TRANSPARENT,
            size: settings.size_or(DEFAULT_ERASER_SIZE as u32),
            single_pixel: is_pixel_perfect(settings),
        }
    }
}

impl Tool for EraserTool {
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
    use crate::editor::tools::settings::{COLOR, GRID, ZOOM};
    use crate::raster::RgbaRaster;

    const RED: Color = Color::new(255, 0, 0);

    #[test]
    fn click_clears_pixels_to_transparent() {
        let mut raster = RgbaRaster::filled(30, 30, RED);
        let settings = EraserTool::new().validate_settings(&ToolSettings::new().with(SIZE, 6));
        EraserTool::new().on_click(&mut raster, ImagePoint::new(15, 15), &settings);
        assert_eq!(raster.pixel(ImagePoint::new(15, 15)), Some(Color::TRANSPARENT));
        assert_eq!(raster.pixel(ImagePoint::new(0, 0)), Some(RED));
    }

    #[test]
    fn eraser_ignores_the_color_setting() {
        let mut raster = RgbaRaster::filled(10, 10, RED);
        let settings = ToolSettings::new()
            .with(SIZE, 1)
            .with(COLOR, Color::new(0, 255, 0))
            .with(GRID, true)
            .with(ZOOM, 4.0);
        EraserTool::new().on_click(&mut raster, ImagePoint::new(2, 2), &settings);
        assert_eq!(
            painted_pixels(&raster, Color::TRANSPARENT),
            vec![ImagePoint::new(2, 2)]
        );
    }

    #[test]
    fn schema_exposes_size_only() {
        let tool = EraserTool::new();
        let names: Vec<_> = tool.settings_schema().iter().map(|spec| spec.name).collect();
        assert_eq!(names, vec![SIZE]);
        assert_eq!(
            tool.validate_settings(&ToolSettings::new()).int_or(SIZE, 0),
            DEFAULT_ERASER_SIZE
        );
    }
}
