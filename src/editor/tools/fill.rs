use tracing::debug;

use super::settings::{SettingSpec, ToolSettings, COLOR};
use super::{CursorHint, Tool, ToolCapabilities, ToolDescriptor};
use crate::geometry::{Color, ImagePoint, DEFAULT_COLOR};
use crate::raster::RasterSurface;

const TOLERANCE: &str = "tolerance";
const CONTIGUOUS: &str = "contiguous";
/// Largest Euclidean RGBA distance between two colors.
const MAX_COLOR_DISTANCE: f64 = 510.0;

/// Paint bucket. Contiguous mode floods the 4-connected region around the seed;
/// global mode recolours every matching pixel in the image.
#[derive(Debug, Clone)]
pub struct FillTool {
    descriptor: ToolDescriptor,
    schema: Vec<SettingSpec>,
}

impl Default for FillTool {
    fn default() -> Self {
        Self::new()
    }
}

impl FillTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                "fill",
                "Fill",
                ToolCapabilities::click_only(),
                CursorHint::Bucket,
            ),
            schema: vec![
                SettingSpec::slider(TOLERANCE, "Tolerance", 0, 100, 0),
                SettingSpec::checkbox(CONTIGUOUS, "Contiguous", true),
                SettingSpec::color(COLOR, "Color", DEFAULT_COLOR),
            ],
        }
    }
}

fn tolerance_fraction(settings: &ToolSettings) -> f64 {
    settings.int_or(TOLERANCE, 0).clamp(0, 100) as f64 / 100.0
}

/// Full-image scan: every pixel whose largest channel difference from `target`
/// is within the limit is replaced.
fn replace_matching(image: &mut dyn RasterSurface, target: Color, color: Color, limit: f64) {
    let mut replaced = 0usize;
    for y in 0..image.height() {
        for x in 0..image.width() {
            let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
                continue;
            };
            let at = ImagePoint::new(x, y);
            let Some(current) = image.pixel(at) else {
                continue;
            };
            if f64::from(current.max_channel_difference(target)) <= limit {
                image.point(at, color);
                replaced += 1;
            }
        }
    }
    debug!(replaced, "global fill finished");
}

impl Tool for FillTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn settings_schema(&self) -> &[SettingSpec] {
        &self.schema
    }

    fn on_click(&self, image: &mut dyn RasterSurface, at: ImagePoint, settings: &ToolSettings) {
        let Some(target) = image.pixel(at) else {
            return;
        };
        let color = settings.color_or(COLOR, DEFAULT_COLOR);
        let tolerance = tolerance_fraction(settings);

        if settings.bool_or(CONTIGUOUS, true) {
            image.flood_fill(at, color, tolerance * MAX_COLOR_DISTANCE);
        } else {
            replace_matching(image, target, color, tolerance * 255.0);
        }
    }
}
