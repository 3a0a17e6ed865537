//! Raster surface contract consumed by the drawing tools, plus an `image`-backed implementation.

mod font;
mod rgba;

pub use font::{FontBook, FontError, FontResult};
pub use rgba::RgbaRaster;

use crate::geometry::{Color, ImagePoint, ToolBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Sans,
    Serif,
    Mono,
}

impl FontFamily {
    pub const ALL: [FontFamily; 3] = [Self::Sans, Self::Serif, Self::Mono];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sans => "sans",
            Self::Serif => "serif",
            Self::Mono => "mono",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSpec {
    pub family: FontFamily,
    pub size: u32,
}

impl FontSpec {
    pub const fn new(family: FontFamily, size: u32) -> Self {
        Self { family, size }
    }
}

/// Addressable pixel buffer with the primitive drawing operations the tools issue.
///
/// Every primitive takes image-space coordinates. Pixels that fall outside the
/// surface are dropped silently; no primitive fails for out-of-range geometry.
pub trait RasterSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Returns `None` outside the surface.
    fn pixel(&self, at: ImagePoint) -> Option<Color>;

    fn point(&mut self, at: ImagePoint, color: Color);

    fn line(&mut self, from: ImagePoint, to: ImagePoint, color: Color, width: u32);

    fn ellipse(
        &mut self,
        bounds: ToolBounds,
        outline: Option<Color>,
        fill: Option<Color>,
        width: u32,
    );

    fn polygon(&mut self, points: &[ImagePoint], outline: Option<Color>, fill: Option<Color>);

    fn rectangle(
        &mut self,
        bounds: ToolBounds,
        outline: Option<Color>,
        fill: Option<Color>,
        width: u32,
    );

    /// Replaces the 4-connected region around `seed` whose colors lie within
    /// `threshold` (Euclidean RGBA distance) of the seed color.
    fn flood_fill(&mut self, seed: ImagePoint, color: Color, threshold: f64);

    fn text(&mut self, at: ImagePoint, text: &str, color: Color, font: &FontSpec);

    fn contains(&self, at: ImagePoint) -> bool {
        at.x >= 0
            && at.y >= 0
            && i64::from(at.x) < i64::from(self.width())
            && i64::from(at.y) < i64::from(self.height())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_family_parses_known_names_only() {
        assert_eq!(FontFamily::parse("Serif"), Some(FontFamily::Serif));
        assert_eq!(FontFamily::parse(" mono "), Some(FontFamily::Mono));
        assert_eq!(FontFamily::parse("comic"), None);
    }

    #[test]
    fn contains_rejects_negative_and_edge_coordinates() {
        let raster = RgbaRaster::new(4, 3);
        assert!(raster.contains(ImagePoint::new(0, 0)));
        assert!(raster.contains(ImagePoint::new(3, 2)));
        assert!(!raster.contains(ImagePoint::new(4, 0)));
        assert!(!raster.contains(ImagePoint::new(0, -1)));
    }
}
