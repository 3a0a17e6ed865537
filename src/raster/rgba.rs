use image::{Rgba, RgbaImage};

use super::{FontBook, FontSpec, RasterSurface};
use crate::geometry::{Color, ImagePoint, ToolBounds};

/// `RasterSurface` over an owned `image::RgbaImage`.
///
/// Primitives replace pixels outright (an eraser writing `Color::TRANSPARENT`
/// clears the pixel); only glyph coverage is alpha-blended.
#[derive(Debug, Clone)]
pub struct RgbaRaster {
    image: RgbaImage,
    fonts: FontBook,
}

impl RgbaRaster {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, Rgba(color.to_array())))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            image,
            fonts: FontBook::default(),
        }
    }

    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= i64::from(self.image.width()) || y >= i64::from(self.image.height())
        {
            return;
        }
        // Bounds are checked above, so both casts are lossless.
        self.image
            .put_pixel(x as u32, y as u32, Rgba(color.to_array()));
    }

    fn row_range(&self, top: i64, bottom: i64) -> std::ops::RangeInclusive<i64> {
        top.max(0)..=bottom.min(i64::from(self.image.height()) - 1)
    }

    fn span(&mut self, y: i64, x0: i64, x1: i64, color: Color) {
        if y < 0 || y >= i64::from(self.image.height()) {
            return;
        }
        let start = x0.max(0);
        let end = x1.min(i64::from(self.image.width()) - 1);
        for x in start..=end {
            self.put(x, y, color);
        }
    }

    fn bresenham(&mut self, from: ImagePoint, to: ImagePoint, color: Color) {
        let (mut x0, mut y0) = (i64::from(from.x), i64::from(from.y));
        let (x1, y1) = (i64::from(to.x), i64::from(to.y));
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x0 += sx;
            }
            if doubled <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn fill_polygon(&mut self, points: &[ImagePoint], color: Color) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| i64::from(p.y)).min().unwrap_or(0);
        let max_y = points.iter().map(|p| i64::from(p.y)).max().unwrap_or(-1);

        let mut crossings = Vec::with_capacity(points.len());
        for y in self.row_range(min_y, max_y) {
            let scan = y as f64;
            crossings.clear();
            for (index, a) in points.iter().enumerate() {
                let b = points[(index + 1) % points.len()];
                let (ay, by) = (f64::from(a.y), f64::from(b.y));
                if (ay <= scan && by > scan) || (by <= scan && ay > scan) {
                    let t = (scan - ay) / (by - ay);
                    crossings.push(f64::from(a.x) + t * (f64::from(b.x) - f64::from(a.x)));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for pair in crossings.chunks_exact(2) {
                self.span(y, pair[0].ceil() as i64, pair[1].floor() as i64, color);
            }
        }
    }
}

impl RasterSurface for RgbaRaster {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn pixel(&self, at: ImagePoint) -> Option<Color> {
        let x = u32::try_from(at.x).ok()?;
        let y = u32::try_from(at.y).ok()?;
        self.image
            .get_pixel_checked(x, y)
            .map(|pixel| Color::from_array(pixel.0))
    }

    fn point(&mut self, at: ImagePoint, color: Color) {
        self.put(i64::from(at.x), i64::from(at.y), color);
    }

    fn line(&mut self, from: ImagePoint, to: ImagePoint, color: Color, width: u32) {
        if width <= 1 || from == to {
            self.bresenham(from, to, color);
            return;
        }

        let dx = f64::from(to.x) - f64::from(from.x);
        let dy = f64::from(to.y) - f64::from(from.y);
        let length = dx.hypot(dy);
        let half = f64::from(width) / 2.0;
        let nx = -dy / length * half;
        let ny = dx / length * half;
        let corner = |p: ImagePoint, sx: f64, sy: f64| {
            ImagePoint::new(
                (f64::from(p.x) + sx).round() as i32,
                (f64::from(p.y) + sy).round() as i32,
            )
        };
        let quad = [
            corner(from, nx, ny),
            corner(to, nx, ny),
            corner(to, -nx, -ny),
            corner(from, -nx, -ny),
        ];
        self.polygon(&quad, Some(color), Some(color));
        self.bresenham(from, to, color);
    }

    fn ellipse(
        &mut self,
        bounds: ToolBounds,
        outline: Option<Color>,
        fill: Option<Color>,
        width: u32,
    ) {
        if outline.is_none() && fill.is_none() {
            return;
        }
        let left = i64::from(bounds.left);
        let right = i64::from(bounds.right);
        let cx = (left + right) as f64 / 2.0;
        let cy = (i64::from(bounds.top) + i64::from(bounds.bottom)) as f64 / 2.0;
        let ax = bounds.width() as f64 / 2.0 + 0.5;
        let ay = bounds.height() as f64 / 2.0 + 0.5;
        let stroke = f64::from(width.max(1));
        let (inner_ax, inner_ay) = (ax - stroke, ay - stroke);
        let inside = |x: i64, y: i64, rx: f64, ry: f64| {
            let nx = (x as f64 - cx) / rx;
            let ny = (y as f64 - cy) / ry;
            nx * nx + ny * ny <= 1.0
        };

        let columns = left.max(0)..=right.min(i64::from(self.image.width()) - 1);
        for y in self.row_range(i64::from(bounds.top), i64::from(bounds.bottom)) {
            for x in columns.clone() {
                if !inside(x, y, ax, ay) {
                    continue;
                }
                let in_core = inner_ax > 0.0 && inner_ay > 0.0 && inside(x, y, inner_ax, inner_ay);
                match (outline, fill) {
                    (Some(edge), _) if !in_core => self.put(x, y, edge),
                    (_, Some(interior)) => self.put(x, y, interior),
                    _ => {}
                }
            }
        }
    }

    fn polygon(&mut self, points: &[ImagePoint], outline: Option<Color>, fill: Option<Color>) {
        if let Some(fill) = fill {
            self.fill_polygon(points, fill);
        }
        if let Some(outline) = outline {
            for (index, start) in points.iter().enumerate() {
                let end = points[(index + 1) % points.len()];
                self.bresenham(*start, end, outline);
            }
        }
    }

    fn rectangle(
        &mut self,
        bounds: ToolBounds,
        outline: Option<Color>,
        fill: Option<Color>,
        width: u32,
    ) {
        let (left, top) = (i64::from(bounds.left), i64::from(bounds.top));
        let (right, bottom) = (i64::from(bounds.right), i64::from(bounds.bottom));

        if let Some(fill) = fill {
            for y in self.row_range(top, bottom) {
                self.span(y, left, right, fill);
            }
        }

        let Some(outline) = outline else {
            return;
        };
        for inset in 0..i64::from(width.max(1)) {
            let (l, t, r, b) = (left + inset, top + inset, right - inset, bottom - inset);
            if l > r || t > b {
                break;
            }
            self.span(t, l, r, outline);
            self.span(b, l, r, outline);
            for y in self.row_range(t, b) {
                self.put(l, y, outline);
                self.put(r, y, outline);
            }
        }
    }

    fn flood_fill(&mut self, seed: ImagePoint, color: Color, threshold: f64) {
        let Some(target) = self.pixel(seed) else {
            return;
        };
        if target.distance(color) <= threshold {
            return;
        }

        let width = self.image.width() as usize;
        let height = self.image.height() as usize;
        let mut visited = vec![false; width * height];
        let mut stack = vec![(seed.x as usize, seed.y as usize)];

        while let Some((x, y)) = stack.pop() {
            let index = y * width + x;
            if visited[index] {
                continue;
            }
            visited[index] = true;

            let current = Color::from_array(self.image.get_pixel(x as u32, y as u32).0);
            if current.distance(target) > threshold {
                continue;
            }
            self.image.put_pixel(x as u32, y as u32, Rgba(color.to_array()));

            if x > 0 {
                stack.push((x - 1, y));
            }
            if x + 1 < width {
                stack.push((x + 1, y));
            }
            if y > 0 {
                stack.push((x, y - 1));
            }
            if y + 1 < height {
                stack.push((x, y + 1));
            }
        }
    }

    fn text(&mut self, at: ImagePoint, text: &str, color: Color, font: &FontSpec) {
        if text.is_empty() {
            return;
        }
        if !self.fonts.draw(&mut self.image, at, text, color, font) {
            tracing::debug!(family = font.family.as_str(), "no font loaded; text skipped");
        }
    }
}

/// Source-over blend of `color` scaled by glyph `coverage` onto the pixel at (x, y).
pub(super) fn blend_pixel(image: &mut RgbaImage, x: i64, y: i64, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x >= i64::from(image.width()) || y >= i64::from(image.height()) {
        return;
    }
    let src_a = f32::from(color.a) / 255.0 * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst = image.get_pixel(x as u32, y as u32).0;
    let dst_a = f32::from(dst[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    let blend = |src: u8, dst: u8| {
        let src = f32::from(src) / 255.0;
        let dst = f32::from(dst) / 255.0;
        ((src * src_a + dst * dst_a * (1.0 - src_a)) / out_a * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    image.put_pixel(
        x as u32,
        y as u32,
        Rgba([
            blend(color.r, dst[0]),
            blend(color.g, dst[1]),
            blend(color.b, dst[2]),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);
    const WHITE: Color = Color::new(255, 255, 255);

    fn painted(raster: &RgbaRaster, color: Color) -> Vec<(i32, i32)> {
        let mut hits = Vec::new();
        for y in 0..raster.height() as i32 {
            for x in 0..raster.width() as i32 {
                if raster.pixel(ImagePoint::new(x, y)) == Some(color) {
                    hits.push((x, y));
                }
            }
        }
        hits
    }

    #[test]
    fn point_outside_bounds_is_silently_dropped() {
        let mut raster = RgbaRaster::filled(4, 4, WHITE);
        raster.point(ImagePoint::new(-1, 2), RED);
        raster.point(ImagePoint::new(4, 0), RED);
        assert!(painted(&raster, RED).is_empty());
    }

    #[test]
    fn thin_line_covers_every_step_between_endpoints() {
        let mut raster = RgbaRaster::filled(10, 10, WHITE);
        raster.line(ImagePoint::new(1, 1), ImagePoint::new(8, 1), RED, 1);
        assert_eq!(painted(&raster, RED).len(), 8);
    }

    #[test]
    fn thick_line_is_wider_than_one_pixel() {
        let mut raster = RgbaRaster::filled(20, 20, WHITE);
        raster.line(ImagePoint::new(2, 10), ImagePoint::new(17, 10), RED, 4);
        let hits = painted(&raster, RED);
        let rows = hits.iter().map(|(_, y)| *y).collect::<std::collections::BTreeSet<_>>();
        assert!(rows.len() >= 4, "rows covered: {rows:?}");
    }

    #[test]
    fn rectangle_outline_hits_exact_corners_without_fill() {
        let mut raster = RgbaRaster::filled(64, 40, WHITE);
        raster.rectangle(ToolBounds::new(10, 10, 50, 30), Some(RED), None, 1);
        for corner in [(10, 10), (50, 10), (10, 30), (50, 30)] {
            assert_eq!(raster.pixel(ImagePoint::new(corner.0, corner.1)), Some(RED));
        }
        assert_eq!(raster.pixel(ImagePoint::new(30, 20)), Some(WHITE));
        assert_eq!(raster.pixel(ImagePoint::new(9, 10)), Some(WHITE));
        assert_eq!(raster.pixel(ImagePoint::new(51, 30)), Some(WHITE));
    }

    #[test]
    fn rectangle_partially_outside_is_clipped() {
        let mut raster = RgbaRaster::filled(8, 8, WHITE);
        raster.rectangle(ToolBounds::new(-5, -5, 3, 3), None, Some(RED), 1);
        assert_eq!(painted(&raster, RED).len(), 16);
    }

    #[test]
    fn ellipse_of_single_pixel_box_paints_one_pixel() {
        let mut raster = RgbaRaster::filled(5, 5, WHITE);
        raster.ellipse(ToolBounds::new(2, 2, 2, 2), None, Some(RED), 1);
        assert_eq!(painted(&raster, RED), vec![(2, 2)]);
    }

    #[test]
    fn ellipse_outline_leaves_center_untouched() {
        let mut raster = RgbaRaster::filled(30, 30, WHITE);
        raster.ellipse(ToolBounds::new(5, 5, 25, 25), Some(RED), None, 1);
        assert_eq!(raster.pixel(ImagePoint::new(15, 15)), Some(WHITE));
        assert_eq!(raster.pixel(ImagePoint::new(5, 15)), Some(RED));
        assert_eq!(raster.pixel(ImagePoint::new(15, 25)), Some(RED));
        assert_eq!(raster.pixel(ImagePoint::new(5, 5)), Some(WHITE));
    }

    #[test]
    fn polygon_fill_covers_interior() {
        let mut raster = RgbaRaster::filled(10, 10, WHITE);
        let square = [
            ImagePoint::new(2, 2),
            ImagePoint::new(6, 2),
            ImagePoint::new(6, 6),
            ImagePoint::new(2, 6),
        ];
        raster.polygon(&square, Some(RED), Some(RED));
        assert_eq!(painted(&raster, RED).len(), 25);
    }

    #[test]
    fn flood_fill_stops_at_color_boundary() {
        let mut raster = RgbaRaster::filled(10, 10, WHITE);
        raster.line(ImagePoint::new(5, 0), ImagePoint::new(5, 9), RED, 1);
        let blue = Color::new(0, 0, 255);
        raster.flood_fill(ImagePoint::new(1, 1), blue, 0.0);
        assert_eq!(painted(&raster, blue).len(), 50);
        assert_eq!(raster.pixel(ImagePoint::new(7, 7)), Some(WHITE));
    }

    #[test]
    fn flood_fill_outside_surface_does_nothing() {
        let mut raster = RgbaRaster::filled(4, 4, WHITE);
        raster.flood_fill(ImagePoint::new(10, 10), RED, 0.0);
        assert!(painted(&raster, RED).is_empty());
    }

    #[test]
    fn text_without_fonts_is_a_no_op() {
        let mut raster = RgbaRaster::filled(16, 16, WHITE);
        raster.text(
            ImagePoint::new(1, 1),
            "hi",
            RED,
            &FontSpec::new(super::super::FontFamily::Sans, 12),
        );
        assert!(painted(&raster, RED).is_empty());
    }

    #[test]
    fn blend_pixel_with_full_coverage_replaces_opaque_pixel() {
        let mut image = RgbaImage::from_pixel(2, 2, Rgba(WHITE.to_array()));
        blend_pixel(&mut image, 1, 1, RED, 1.0);
        assert_eq!(image.get_pixel(1, 1).0, RED.to_array());
        blend_pixel(&mut image, 5, 5, RED, 1.0);
    }
}
