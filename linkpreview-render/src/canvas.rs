//! Raster drawing primitives on an RGBA buffer.
//!
//! Rectangle and ellipse bounds are inclusive on both ends. Everything is
//! clipped to the canvas, so callers may pass coordinates outside it.

use image::{Rgb, Rgba, RgbaImage, imageops};
use rusttype::{Font, Scale, point};

/// Axis-aligned area in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// Reference point of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `(x, y)` is the left edge at the ascender line.
    LeftTop,
    /// `(x, y)` is the horizontal center, halfway between ascender and descender.
    Middle,
    /// `(x, y)` is the right edge on the baseline.
    RightBaseline,
}

/// Font, size, and color of a text run. Without a font nothing is drawn.
#[derive(Clone, Copy)]
pub struct TextStyle<'f> {
    pub font: Option<&'f Font<'static>>,
    pub px: f32,
    pub color: Rgb<u8>,
}

pub struct Canvas {
    img: RgbaImage,
}

fn opaque(c: Rgb<u8>) -> Rgba<u8> {
    Rgba([c[0], c[1], c[2], 255])
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, opaque(background)),
        }
    }

    pub fn width(&self) -> i32 {
        self.img.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.img.height() as i32
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }

    fn put(&mut self, x: i32, y: i32, c: Rgb<u8>) {
        if self.in_bounds(x, y) {
            self.img.put_pixel(x as u32, y as u32, opaque(c));
        }
    }

    fn blend(&mut self, x: i32, y: i32, c: Rgb<u8>, coverage: f32) {
        if !self.in_bounds(x, y) || coverage <= 0.0 {
            return;
        }
        let a = coverage.min(1.0);
        let inv = 1.0 - a;
        let dst = self.img.get_pixel_mut(x as u32, y as u32);
        for i in 0..3 {
            dst.0[i] = (c.0[i] as f32 * a + dst.0[i] as f32 * inv) as u8;
        }
        dst.0[3] = 255;
    }

    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, c: Rgb<u8>) {
        let (x0, x1) = (x0.max(0), x1.min(self.width() - 1));
        let (y0, y1) = (y0.max(0), y1.min(self.height() - 1));
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.put(x, y, c);
            }
        }
    }

    /// Outline drawn inward from the bounds.
    pub fn stroke_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, c: Rgb<u8>, width: i32) {
        for i in 0..width.max(0) {
            self.fill_rect(x0 + i, y0 + i, x1 - i, y0 + i, c);
            self.fill_rect(x0 + i, y1 - i, x1 - i, y1 - i, c);
            self.fill_rect(x0 + i, y0 + i, x0 + i, y1 - i, c);
            self.fill_rect(x1 - i, y0 + i, x1 - i, y1 - i, c);
        }
    }

    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, c: Rgb<u8>, width: i32) {
        let top = y - (width - 1) / 2;
        self.fill_rect(x0.min(x1), top, x0.max(x1), top + width - 1, c);
    }

    pub fn vline(&mut self, x: i32, y0: i32, y1: i32, c: Rgb<u8>, width: i32) {
        let left = x - (width - 1) / 2;
        self.fill_rect(left, y0.min(y1), left + width - 1, y0.max(y1), c);
    }

    pub fn fill_ellipse(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, c: Rgb<u8>) {
        let cx = (x0 + x1) as f32 / 2.0;
        let cy = (y0 + y1) as f32 / 2.0;
        let rx = (x1 - x0) as f32 / 2.0 + 0.5;
        let ry = (y1 - y0) as f32 / 2.0 + 0.5;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = (x as f32 - cx) / rx;
                let dy = (y as f32 - cy) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.put(x, y, c);
                }
            }
        }
    }

    pub fn stroke_rounded_rect(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        radius: i32,
        c: Rgb<u8>,
        width: i32,
    ) {
        let inner_radius = (radius - width).max(0);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let outer = in_rounded_rect(x, y, x0, y0, x1, y1, radius);
                let inner = in_rounded_rect(
                    x,
                    y,
                    x0 + width,
                    y0 + width,
                    x1 - width,
                    y1 - width,
                    inner_radius,
                );
                if outer && !inner {
                    self.put(x, y, c);
                }
            }
        }
    }

    /// Alpha-composite `src` with its top-left corner at `(x, y)`.
    pub fn paste(&mut self, src: &RgbaImage, x: i32, y: i32) {
        imageops::overlay(&mut self.img, src, x as i64, y as i64);
    }

    pub fn draw_text(&mut self, style: &TextStyle<'_>, x: i32, y: i32, anchor: Anchor, text: &str) {
        let Some(font) = style.font else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let scale = Scale::uniform(style.px);
        let vm = font.v_metrics(scale);
        let (left, baseline) = match anchor {
            Anchor::LeftTop => (x as f32, y as f32 + vm.ascent),
            Anchor::Middle => (
                x as f32 - text_width(font, style.px, text) / 2.0,
                y as f32 + (vm.ascent + vm.descent) / 2.0,
            ),
            Anchor::RightBaseline => (x as f32 - text_width(font, style.px, text), y as f32),
        };

        for glyph in font.layout(text, scale, point(left, baseline)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    self.blend(gx as i32 + bb.min.x, gy as i32 + bb.min.y, style.color, v);
                });
            }
        }
    }
}

/// Advance width of `text` at `px`.
pub fn text_width(font: &Font<'static>, px: f32, text: &str) -> f32 {
    let scale = Scale::uniform(px);
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

fn in_rounded_rect(px: i32, py: i32, x0: i32, y0: i32, x1: i32, y1: i32, r: i32) -> bool {
    if px < x0 || px > x1 || py < y0 || py > y1 {
        return false;
    }
    let cx = if px < x0 + r {
        x0 + r
    } else if px > x1 - r {
        x1 - r
    } else {
        return true;
    };
    let cy = if py < y0 + r {
        y0 + r
    } else if py > y1 - r {
        y1 - r
    } else {
        return true;
    };
    let (dx, dy) = (px - cx, py - cy);
    dx * dx + dy * dy <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn px(c: &Canvas, x: u32, y: u32) -> [u8; 3] {
        let p = c.image().get_pixel(x, y);
        [p[0], p[1], p[2]]
    }

    #[test]
    fn fill_rect_is_inclusive_and_clipped() {
        let mut c = Canvas::new(10, 10, WHITE);
        c.fill_rect(-5, -5, 2, 2, RED);
        assert_eq!(px(&c, 0, 0), [255, 0, 0]);
        assert_eq!(px(&c, 2, 2), [255, 0, 0]);
        assert_eq!(px(&c, 3, 3), [255, 255, 255]);
        c.fill_rect(8, 8, 50, 50, RED);
        assert_eq!(px(&c, 9, 9), [255, 0, 0]);
    }

    #[test]
    fn stroke_rect_draws_inward() {
        let mut c = Canvas::new(10, 10, WHITE);
        c.stroke_rect(0, 0, 9, 9, RED, 3);
        assert_eq!(px(&c, 2, 5), [255, 0, 0]);
        assert_eq!(px(&c, 3, 5), [255, 255, 255]);
        assert_eq!(px(&c, 9, 9), [255, 0, 0]);
        assert_eq!(px(&c, 5, 5), [255, 255, 255]);
    }

    #[test]
    fn rounded_corners_stay_clear() {
        let mut c = Canvas::new(40, 40, WHITE);
        c.stroke_rounded_rect(0, 0, 39, 39, 16, RED, 2);
        assert_eq!(px(&c, 0, 0), [255, 255, 255]);
        assert_eq!(px(&c, 20, 0), [255, 0, 0]);
        assert_eq!(px(&c, 20, 20), [255, 255, 255]);
    }

    #[test]
    fn ellipse_fills_center_not_corners() {
        let mut c = Canvas::new(20, 20, WHITE);
        c.fill_ellipse(0, 0, 19, 19, RED);
        assert_eq!(px(&c, 10, 10), [255, 0, 0]);
        assert_eq!(px(&c, 0, 0), [255, 255, 255]);
    }

    #[test]
    fn paste_composites_at_offset() {
        let mut c = Canvas::new(10, 10, WHITE);
        let src = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));
        c.paste(&src, 8, 8);
        assert_eq!(px(&c, 9, 9), [0, 0, 255]);
        assert_eq!(px(&c, 7, 7), [255, 255, 255]);
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut c = Canvas::new(10, 10, WHITE);
        let style = TextStyle {
            font: None,
            px: 12.0,
            color: RED,
        };
        c.draw_text(&style, 0, 0, Anchor::LeftTop, "hello");
        assert!(c.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }
}
