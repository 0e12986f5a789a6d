//! Rectangular outline drawn on the finished canvas.
//!
//! The left and top edges run along the true image boundary while the
//! bottom and right edges sit one pixel inside it. The left edge is drawn
//! from (0,0) to (0,H) and clipped, so its last point falls off the canvas.

use image::Rgba;
use imageproc::drawing::draw_line_segment_mut;

use crate::settings::BorderStyle;
use crate::strategy::Canvas;

/// One straight edge of the border, in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSegment {
    pub start: (i32, i32),
    pub end: (i32, i32),
}

impl BorderSegment {
    const fn new(start: (i32, i32), end: (i32, i32)) -> Self {
        Self { start, end }
    }

    fn is_vertical(&self) -> bool {
        self.start.0 == self.end.0
    }

    /// This segment moved `offset` pixels across its own direction
    fn shifted(&self, offset: i32) -> Self {
        let (dx, dy) = if self.is_vertical() { (offset, 0) } else { (0, offset) };
        Self::new(
            (self.start.0.saturating_add(dx), self.start.1.saturating_add(dy)),
            (self.end.0.saturating_add(dx), self.end.1.saturating_add(dy)),
        )
    }
}

/// The four edges for a `width` x `height` canvas: left, top, bottom, right
pub fn border_segments(width: u32, height: u32) -> [BorderSegment; 4] {
    let w = i32::try_from(width).unwrap_or(i32::MAX);
    let h = i32::try_from(height).unwrap_or(i32::MAX);

    [
        BorderSegment::new((0, 0), (0, h)),
        BorderSegment::new((0, 0), (w, 0)),
        BorderSegment::new((0, h - 1), (w, h - 1)),
        BorderSegment::new((w - 1, h - 1), (w - 1, 0)),
    ]
}

/// Perpendicular offsets covered by a stroke of `thickness` centered on a line
pub fn stroke_offsets(thickness: u32) -> std::ops::RangeInclusive<i32> {
    let t = i32::try_from(thickness.max(1)).unwrap_or(i32::MAX);
    -(t / 2)..=t - 1 - t / 2
}

/// Offsets of a `thickness` stroke that can still land on a `width` x
/// `height` canvas; anything further out is fully clipped
pub fn visible_offsets(thickness: u32, width: u32, height: u32) -> std::ops::RangeInclusive<i32> {
    let reach = i32::try_from(width.max(height)).unwrap_or(i32::MAX);
    let offsets = stroke_offsets(thickness);
    (*offsets.start()).max(-reach)..=(*offsets.end()).min(reach)
}

/// Draw the border onto `canvas`; pixels outside the canvas are clipped
pub fn draw_border(canvas: &mut Canvas, style: &BorderStyle) {
    let (width, height) = canvas.dimensions();
    let color = Rgba(style.color.to_rgba());

    for segment in border_segments(width, height) {
        for offset in visible_offsets(style.thickness, width, height) {
            let line = segment.shifted(offset);
            draw_line_segment_mut(
                canvas,
                (line.start.0 as f32, line.start.1 as f32),
                (line.end.0 as f32, line.end.1 as f32),
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrawl_common::Color;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn red(thickness: u32) -> BorderStyle {
        BorderStyle {
            color: Color::RED,
            thickness,
        }
    }

    #[test]
    fn test_segment_coordinates() {
        let [left, top, bottom, right] = border_segments(200, 50);
        assert_eq!(left, BorderSegment::new((0, 0), (0, 50)));
        assert_eq!(top, BorderSegment::new((0, 0), (200, 0)));
        assert_eq!(bottom, BorderSegment::new((0, 49), (200, 49)));
        assert_eq!(right, BorderSegment::new((199, 49), (199, 0)));
    }

    #[test]
    fn test_segment_coordinates_other_sizes() {
        for (w, h) in [(1, 1), (7, 3), (320, 240)] {
            let [left, top, bottom, right] = border_segments(w, h);
            let (w, h) = (w as i32, h as i32);
            assert_eq!((left.start, left.end), ((0, 0), (0, h)));
            assert_eq!((top.start, top.end), ((0, 0), (w, 0)));
            assert_eq!((bottom.start, bottom.end), ((0, h - 1), (w, h - 1)));
            assert_eq!((right.start, right.end), ((w - 1, h - 1), (w - 1, 0)));
        }
    }

    #[test]
    fn test_stroke_offsets() {
        assert_eq!(stroke_offsets(0), 0..=0);
        assert_eq!(stroke_offsets(1), 0..=0);
        assert_eq!(stroke_offsets(2), -1..=0);
        assert_eq!(stroke_offsets(3), -1..=1);
    }

    #[test]
    fn test_visible_offsets_stop_at_canvas() {
        assert_eq!(visible_offsets(3, 200, 50), -1..=1);
        assert_eq!(visible_offsets(1000, 200, 50), -200..=200);
        assert_eq!(visible_offsets(u32::MAX, 7, 3), -7..=7);
    }

    #[test]
    fn test_huge_thickness_fills_canvas() {
        let mut canvas = Canvas::from_pixel(40, 10, WHITE);
        draw_border(&mut canvas, &red(2_000_000_000));
        assert!(canvas.pixels().all(|p| *p == RED));

        let mut canvas = Canvas::from_pixel(40, 10, WHITE);
        draw_border(&mut canvas, &red(u32::MAX));
        assert!(canvas.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_single_pixel_outline() {
        let mut canvas = Canvas::from_pixel(200, 50, WHITE);
        draw_border(&mut canvas, &red(1));

        for y in 0..50 {
            assert_eq!(*canvas.get_pixel(0, y), RED);
            assert_eq!(*canvas.get_pixel(199, y), RED);
        }
        for x in 0..200 {
            assert_eq!(*canvas.get_pixel(x, 0), RED);
            assert_eq!(*canvas.get_pixel(x, 49), RED);
        }

        // Interior untouched
        for y in 1..49 {
            for x in 1..199 {
                assert_eq!(*canvas.get_pixel(x, y), WHITE);
            }
        }
    }

    #[test]
    fn test_thick_outline_grows_inward_on_far_edges() {
        let mut canvas = Canvas::from_pixel(200, 50, WHITE);
        draw_border(&mut canvas, &red(2));

        // Bottom and right strokes straddle the inset line
        assert_eq!(*canvas.get_pixel(100, 48), RED);
        assert_eq!(*canvas.get_pixel(100, 49), RED);
        assert_eq!(*canvas.get_pixel(198, 25), RED);
        assert_eq!(*canvas.get_pixel(199, 25), RED);

        // Left and top strokes lose their outer half to clipping
        assert_eq!(*canvas.get_pixel(0, 25), RED);
        assert_eq!(*canvas.get_pixel(1, 25), WHITE);
        assert_eq!(*canvas.get_pixel(100, 0), RED);
        assert_eq!(*canvas.get_pixel(100, 1), WHITE);

        assert_eq!(*canvas.get_pixel(100, 25), WHITE);
    }
}
