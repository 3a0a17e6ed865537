use crate::geometry::{DisplayPoint, ImagePoint};

/// Zoom factor at which pixel-perfect editing, the grid and the pixel highlight engage.
pub const PIXEL_PERFECT_MIN_ZOOM: f64 = 4.0;
/// Fixed offset of the raster's top-left corner inside the canvas widget.
pub const DEFAULT_CANVAS_INSET: f64 = 2.0;
/// Image coordinates closer than this to an integer snap to it instead of flooring.
pub const SNAP_EPSILON: f64 = 1e-6;

const ZOOM_MIN_PERCENT: u16 = 1;
const ZOOM_MAX_PERCENT: u16 = 3200;
const ZOOM_LEVELS_PERCENT: &[u16] = &[
    1, 2, 3, 4, 5, 8, 10, 12, 16, 20, 25, 33, 50, 67, 75, 80, 90, 100, 110, 125, 150, 175, 200,
    250, 300, 400, 500, 600, 800, 1000, 1200, 1600, 2400, 3200,
];

pub fn clamp_zoom_percent(zoom_percent: u16) -> u16 {
    zoom_percent.clamp(ZOOM_MIN_PERCENT, ZOOM_MAX_PERCENT)
}

pub fn next_zoom_in_level(current_zoom_percent: u16) -> u16 {
    ZOOM_LEVELS_PERCENT
        .iter()
        .copied()
        .find(|&level| level > current_zoom_percent)
        .unwrap_or(ZOOM_MAX_PERCENT)
}

pub fn next_zoom_out_level(current_zoom_percent: u16) -> u16 {
    ZOOM_LEVELS_PERCENT
        .iter()
        .rev()
        .copied()
        .find(|&level| level < current_zoom_percent)
        .unwrap_or(ZOOM_MIN_PERCENT)
}

/// Mapping between pointer positions and raster pixels for one zoom/scroll state.
///
/// A controller snapshots the frame when an interaction starts so forward and
/// inverse transforms within that interaction agree exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateFrame {
    zoom_percent: u16,
    inset: f64,
    scroll_x: f64,
    scroll_y: f64,
}

impl Default for CoordinateFrame {
    fn default() -> Self {
        Self::new(100, DEFAULT_CANVAS_INSET)
    }
}

impl CoordinateFrame {
    pub fn new(zoom_percent: u16, inset: f64) -> Self {
        Self {
            zoom_percent: clamp_zoom_percent(zoom_percent),
            inset: if inset.is_finite() { inset } else { DEFAULT_CANVAS_INSET },
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    pub fn with_scroll(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.set_scroll(scroll_x, scroll_y);
        self
    }

    pub const fn zoom_percent(&self) -> u16 {
        self.zoom_percent
    }

    pub fn zoom(&self) -> f64 {
        f64::from(self.zoom_percent) / 100.0
    }

    pub const fn inset(&self) -> f64 {
        self.inset
    }

    pub const fn scroll(&self) -> (f64, f64) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn set_zoom_percent(&mut self, zoom_percent: u16) {
        self.zoom_percent = clamp_zoom_percent(zoom_percent);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_percent = next_zoom_in_level(clamp_zoom_percent(self.zoom_percent));
    }

    pub fn zoom_out(&mut self) {
        self.zoom_percent = next_zoom_out_level(clamp_zoom_percent(self.zoom_percent));
    }

    pub fn set_scroll(&mut self, scroll_x: f64, scroll_y: f64) {
        self.scroll_x = if scroll_x.is_finite() { scroll_x } else { 0.0 };
        self.scroll_y = if scroll_y.is_finite() { scroll_y } else { 0.0 };
    }

    pub fn is_pixel_perfect_zoom(&self) -> bool {
        self.zoom() >= PIXEL_PERFECT_MIN_ZOOM
    }

    /// Widget-relative pointer position to canvas display space (adds the scroll offset).
    pub fn pointer_to_display(&self, x: f64, y: f64) -> DisplayPoint {
        DisplayPoint::new(x + self.scroll_x, y + self.scroll_y)
    }

    pub fn display_to_image(&self, point: DisplayPoint) -> ImagePoint {
        ImagePoint::new(self.axis_to_image(point.x), self.axis_to_image(point.y))
    }

    pub fn pointer_to_image(&self, x: f64, y: f64) -> ImagePoint {
        self.display_to_image(self.pointer_to_display(x, y))
    }

    /// Top-left display corner of image pixel `point`.
    pub fn image_to_display(&self, point: ImagePoint) -> DisplayPoint {
        let zoom = self.zoom();
        DisplayPoint::new(
            f64::from(point.x) * zoom + self.inset,
            f64::from(point.y) * zoom + self.inset,
        )
    }

    /// Display-space box covering image pixel `point`.
    pub fn pixel_display_box(&self, point: ImagePoint) -> (DisplayPoint, DisplayPoint) {
        let corner = self.image_to_display(point);
        let zoom = self.zoom();
        (corner, DisplayPoint::new(corner.x + zoom, corner.y + zoom))
    }

    fn axis_to_image(&self, display: f64) -> i32 {
        let scaled = (display - self.inset) / self.zoom();
        if !scaled.is_finite() {
            return 0;
        }
        let nearest = scaled.round();
        let snapped = if (scaled - nearest).abs() < SNAP_EPSILON {
            nearest
        } else {
            scaled.floor()
        };
        snapped.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_frame_is_actual_size_with_inset() {
        let frame = CoordinateFrame::default();
        assert_eq!(frame.zoom_percent(), 100);
        assert_eq!(frame.inset(), DEFAULT_CANVAS_INSET);
        assert_eq!(frame.scroll(), (0.0, 0.0));
    }

    #[test]
    fn zoom_controls_clamp_to_ladder_ends() {
        let mut frame = CoordinateFrame::default();
        frame.zoom_out();
        assert_eq!(frame.zoom_percent(), 90);

        for _ in 0..100 {
            frame.zoom_out();
        }
        assert_eq!(frame.zoom_percent(), 1);

        for _ in 0..200 {
            frame.zoom_in();
        }
        assert_eq!(frame.zoom_percent(), 3200);

        frame.set_zoom_percent(9000);
        assert_eq!(frame.zoom_percent(), 3200);
        frame.set_zoom_percent(0);
        assert_eq!(frame.zoom_percent(), 1);
    }

    #[test]
    fn zoom_steps_follow_ladder_for_off_ladder_values() {
        let mut frame = CoordinateFrame::default();
        frame.set_zoom_percent(137);
        frame.zoom_in();
        assert_eq!(frame.zoom_percent(), 150);

        frame.set_zoom_percent(137);
        frame.zoom_out();
        assert_eq!(frame.zoom_percent(), 125);
    }

    #[test]
    fn display_to_image_floors_after_removing_inset() {
        let frame = CoordinateFrame::new(400, 2.0);
        assert_eq!(frame.display_to_image(DisplayPoint::new(2.0, 5.9)), ImagePoint::new(0, 0));
        assert_eq!(frame.display_to_image(DisplayPoint::new(6.0, 13.99)), ImagePoint::new(1, 2));
        assert_eq!(frame.display_to_image(DisplayPoint::new(1.0, 0.0)), ImagePoint::new(-1, -1));
    }

    #[test]
    fn scroll_offset_shifts_pointer_before_mapping() {
        let frame = CoordinateFrame::new(200, 2.0).with_scroll(100.0, 40.0);
        assert_eq!(frame.pointer_to_display(0.0, 0.0), DisplayPoint::new(100.0, 40.0));
        assert_eq!(frame.pointer_to_image(2.0, 2.0), ImagePoint::new(50, 20));
    }

    #[test]
    fn pixel_box_spans_one_zoomed_pixel() {
        let frame = CoordinateFrame::new(800, 2.0);
        let (corner, opposite) = frame.pixel_display_box(ImagePoint::new(3, 1));
        assert_eq!(corner, DisplayPoint::new(26.0, 10.0));
        assert_eq!(opposite, DisplayPoint::new(34.0, 18.0));
    }

    #[test]
    fn pixel_perfect_zoom_starts_at_four_x() {
        assert!(!CoordinateFrame::new(300, 2.0).is_pixel_perfect_zoom());
        assert!(CoordinateFrame::new(400, 2.0).is_pixel_perfect_zoom());
    }

    proptest! {
        #[test]
        fn image_display_round_trip_is_exact(
            x in -5000i32..5000,
            y in -5000i32..5000,
            level in 0usize..ZOOM_LEVELS_PERCENT.len(),
            inset in 0.0f64..16.0,
        ) {
            let frame = CoordinateFrame::new(ZOOM_LEVELS_PERCENT[level], inset);
            let point = ImagePoint::new(x, y);
            prop_assert_eq!(frame.display_to_image(frame.image_to_display(point)), point);
        }
    }
}
