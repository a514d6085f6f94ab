//! Decorative circuit-board panel used when there is no image to show.

use crate::canvas::{Canvas, Rect};
use crate::color::{WHITE, darker};
use image::Rgb;

/// Fill `area` with the circuit pattern in `accent` and return the chip
/// rectangle so callers can label it.
pub fn draw_circuit(canvas: &mut Canvas, area: Rect, accent: Rgb<u8>) -> Rect {
    let Rect { x, y, w, h } = area;
    let line = WHITE;

    canvas.fill_rect(x, y, x + w, y + h, accent);

    let column_step = (w - 160) / 4;

    for i in 0..6 {
        let ly = y + 40 + i * (h / 7);
        canvas.hline(x + 30, x + w - 30, ly, line, 2);
        for j in 0..5 {
            let dx = x + 80 + j * column_step;
            canvas.fill_ellipse(dx - 4, ly - 4, dx + 4, ly + 4, line);
        }
    }

    for i in 0..5 {
        let lx = x + 80 + i * column_step;
        canvas.vline(lx, y + 25, y + h - 25, line, 2);
    }

    let corners = [
        (x + 50, y + 50),
        (x + w - 50, y + 50),
        (x + 50, y + h - 50),
        (x + w - 50, y + h - 50),
    ];
    for (cx, cy) in corners {
        canvas.fill_ellipse(cx - 6, cy - 6, cx + 6, cy + 6, line);
    }

    let chip_w = 140.min(w / 4);
    let chip_h = 90.min(h / 3);
    let chip = Rect::new(x + (w - chip_w) / 2, y + (h - chip_h) / 2, chip_w, chip_h);

    canvas.fill_rect(chip.x, chip.y, chip.x + chip_w, chip.y + chip_h, darker(accent, 30));
    canvas.stroke_rect(chip.x, chip.y, chip.x + chip_w, chip.y + chip_h, line, 3);

    let pin_spacing = chip_w / 7;
    for i in 1..=6 {
        let px = chip.x + pin_spacing * i;
        canvas.vline(px, chip.y - 15, chip.y, line, 2);
        canvas.vline(px, chip.y + chip_h, chip.y + chip_h + 15, line, 2);
    }

    let vpin_spacing = chip_h / 5;
    for i in 1..=4 {
        let py = chip.y + vpin_spacing * i;
        canvas.hline(chip.x - 15, chip.x, py, line, 2);
        canvas.hline(chip.x + chip_w, chip.x + chip_w + 15, py, line, 2);
    }

    chip
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCENT: Rgb<u8> = Rgb([0, 148, 143]);

    #[test]
    fn chip_is_centered_and_capped() {
        let mut canvas = Canvas::new(1200, 630, WHITE);
        let chip = draw_circuit(&mut canvas, Rect::new(660, 0, 540, 630), ACCENT);
        assert_eq!(chip, Rect::new(660 + (540 - 135) / 2, (630 - 90) / 2, 135, 90));
    }

    #[test]
    fn small_slot_chip_scales_down() {
        let mut canvas = Canvas::new(722, 144, WHITE);
        let chip = draw_circuit(&mut canvas, Rect::new(527, 15, 180, 114), ACCENT);
        assert_eq!((chip.w, chip.h), (45, 38));
    }

    #[test]
    fn chip_body_uses_darker_accent() {
        let mut canvas = Canvas::new(1200, 630, WHITE);
        let chip = draw_circuit(&mut canvas, Rect::new(660, 0, 540, 630), ACCENT);
        let (cx, cy) = chip.center();
        let p = canvas.image().get_pixel(cx as u32 + 3, cy as u32 + 5);
        assert_eq!([p[0], p[1], p[2]], [0, 118, 113]);
        let bg = canvas.image().get_pixel(665, 5);
        assert_eq!([bg[0], bg[1], bg[2]], [0, 148, 143]);
    }
}
