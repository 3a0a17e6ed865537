use std::cell::RefCell;
use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::settings::{SettingSpec, ToolSettings, COLOR, SIZE};
use super::{CursorHint, Tool, ToolCapabilities, ToolDescriptor};
use crate::geometry::{Color, ImagePoint, DEFAULT_COLOR};
use crate::raster::RasterSurface;

const DENSITY: &str = "density";
const PRESSURE: &str = "pressure";
const DEFAULT_SPRAY_SIZE: i64 = 15;
const DEFAULT_DENSITY: i64 = 20;

/// Airbrush that scatters `density` dots per sample within a pressure-scaled radius.
#[derive(Debug)]
pub struct SprayTool {
    descriptor: ToolDescriptor,
    schema: Vec<SettingSpec>,
    rng: RefCell<StdRng>,
}

impl Default for SprayTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SprayTool {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic scatter for reproducible strokes.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                "spray",
                "Spray",
                ToolCapabilities::immediate(),
                CursorHint::Spray,
            ),
            schema: vec![
                SettingSpec::slider(SIZE, "Radius", 1, 100, DEFAULT_SPRAY_SIZE),
                SettingSpec::slider(DENSITY, "Density", 1, 200, DEFAULT_DENSITY),
                SettingSpec::float_slider(PRESSURE, "Pressure", 0.1, 1.0, 1.0),
                SettingSpec::color(COLOR, "Color", DEFAULT_COLOR),
            ],
            rng: RefCell::new(rng),
        }
    }

    fn radius(settings: &ToolSettings) -> f64 {
        let size = f64::from(settings.size_or(DEFAULT_SPRAY_SIZE as u32));
        (size * settings.float_or(PRESSURE, 1.0)).max(1.0)
    }

    fn burst(
        &self,
        image: &mut dyn RasterSurface,
        center: ImagePoint,
        radius: f64,
        density: u32,
        color: Color,
    ) {
        let mut rng = self.rng.borrow_mut();
        for _ in 0..density {
            let angle = rng.gen_range(0.0..TAU);
            // sqrt keeps the dots uniformly spread over the disk area.
            let distance = radius * rng.gen::<f64>().sqrt();
            let dx = (angle.cos() * distance).round() as i32;
            let dy = (angle.sin() * distance).round() as i32;
            image.point(center.offset(dx, dy), color);
        }
    }
}

impl Tool for SprayTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn settings_schema(&self) -> &[SettingSpec] {
        &self.schema
    }

    fn on_click(&self, image: &mut dyn RasterSurface, at: ImagePoint, settings: &ToolSettings) {
        let density = settings.int_or(DENSITY, DEFAULT_DENSITY).clamp(1, 200) as u32;
        let color = settings.color_or(COLOR, DEFAULT_COLOR);
        self.burst(image, at, Self::radius(settings), density, color);
    }

    fn on_drag(
        &self,
        image: &mut dyn RasterSurface,
        from: ImagePoint,
        to: ImagePoint,
        settings: &ToolSettings,
    ) {
        let radius = Self::radius(settings);
        let density = settings.int_or(DENSITY, DEFAULT_DENSITY).clamp(1, 200) as u32;
        let color = settings.color_or(COLOR, DEFAULT_COLOR);

        let dx = f64::from(to.x) - f64::from(from.x);
        let dy = f64::from(to.y) - f64::from(from.y);
        let spacing = (radius / 2.0).max(1.0);
        let steps = ((dx.hypot(dy) / spacing).ceil() as u32).max(1);
        for step in 1..=steps {
            let t = f64::from(step) / f64::from(steps);
            let center = ImagePoint::new(
                (f64::from(from.x) + dx * t).round() as i32,
                (f64::from(from.y) + dy * t).round() as i32,
            );
            self.burst(image, center, radius, density, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::recording::{RasterCall, RecordingSurface};
    use crate::raster::RgbaRaster;

    const WHITE: Color = Color::new(255, 255, 255);
    const RED: Color = Color::new(255, 0, 0);

    fn settings(size: i64, density: i64, pressure: f64) -> ToolSettings {
        SprayTool::new().validate_settings(
            &ToolSettings::new()
                .with(SIZE, size)
                .with(DENSITY, density)
                .with(PRESSURE, pressure)
                .with(COLOR, RED),
        )
    }

    fn dots(calls: &[RasterCall]) -> Vec<ImagePoint> {
        calls
            .iter()
            .filter_map(|call| match call {
                RasterCall::Point(at, _) => Some(*at),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn click_scatters_density_dots_within_radius() {
        let mut surface = RecordingSurface::new(100, 100, WHITE);
        let center = ImagePoint::new(50, 50);
        SprayTool::with_seed(7).on_click(&mut surface, center, &settings(10, 40, 1.0));

        let points = dots(&surface.calls);
        assert_eq!(points.len(), 40);
        for p in points {
            let distance = f64::from(p.x - 50).hypot(f64::from(p.y - 50));
            assert!(distance <= 10.0 + 1.0, "dot {p:?} escaped the radius");
        }
    }

    #[test]
    fn pressure_shrinks_the_radius() {
        let mut surface = RecordingSurface::new(100, 100, WHITE);
        SprayTool::with_seed(3).on_click(&mut surface, ImagePoint::new(50, 50), &settings(20, 60, 0.1));
        for p in dots(&surface.calls) {
            assert!((p.x - 50).abs() <= 3 && (p.y - 50).abs() <= 3, "dot {p:?}");
        }
    }

    #[test]
    fn same_seed_gives_identical_strokes() {
        let mut first = RgbaRaster::filled(40, 40, WHITE);
        let mut second = RgbaRaster::filled(40, 40, WHITE);
        let s = settings(6, 25, 1.0);
        SprayTool::with_seed(11).on_click(&mut first, ImagePoint::new(20, 20), &s);
        SprayTool::with_seed(11).on_click(&mut second, ImagePoint::new(20, 20), &s);
        assert_eq!(first.image(), second.image());
    }

    #[test]
    fn drag_samples_along_the_whole_segment() {
        let mut surface = RecordingSurface::new(200, 20, WHITE);
        SprayTool::with_seed(5).on_drag(
            &mut surface,
            ImagePoint::new(10, 10),
            ImagePoint::new(150, 10),
            &settings(4, 5, 1.0),
        );
        let points = dots(&surface.calls);
        // radius 4 gives a sample every 2px: 70 bursts of 5 dots.
        assert_eq!(points.len(), 70 * 5);
        assert!(points.iter().any(|p| p.x >= 145));
        assert!(points.iter().any(|p| (70..=90).contains(&p.x)));
    }

    #[test]
    fn dots_outside_the_image_are_dropped() {
        let mut surface = RecordingSurface::new(4, 4, WHITE);
        SprayTool::with_seed(1).on_click(&mut surface, ImagePoint::new(0, 0), &settings(30, 50, 1.0));

        let points = dots(&surface.calls);
        assert_eq!(points.len(), 50);
        let (inside, outside): (Vec<_>, Vec<_>) =
            points.into_iter().partition(|p| surface.contains(*p));
        assert!(!outside.is_empty(), "a 30px burst at the corner should overshoot");

        let mut painted = super::super::brush::painted_pixels(&surface.inner, RED);
        let mut expected = inside;
        painted.sort_by_key(|p| (p.y, p.x));
        expected.sort_by_key(|p| (p.y, p.x));
        expected.dedup();
        assert_eq!(painted, expected);
    }
}
