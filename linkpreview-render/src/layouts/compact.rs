//! 722×144 strip with text on the left and a small image slot on the right.

use crate::canvas::{Anchor, Canvas, Rect, TextStyle};
use crate::circuit::draw_circuit;
use crate::color::{BLACK, COMPACT_DEFAULT_ACCENT, WHITE, hex};
use crate::fit::{FitPlan, cover_crop, plan_fit, shrink_to_fit};
use crate::fonts::FontBook;
use crate::loader::ImageLoader;
use crate::text::{truncate_with_ellipsis, wrap};
use image::{DynamicImage, Rgb, RgbaImage};
use linkpreview_common::PageMetadata;

pub const WIDTH: u32 = 722;
pub const HEIGHT: u32 = 144;
const PADDING: i32 = 15;

const BACKGROUND: Rgb<u8> = hex(0xf8f5f5);
const BORDER: Rgb<u8> = hex(0xd4a5a5);
const LETTERBOX_FILL: Rgb<u8> = hex(0xf5f5f5);

/// Image slot: 25 % of the width, full inner height, right-aligned.
pub const SLOT: Rect = Rect::new(
    WIDTH as i32 - WIDTH as i32 / 4 - PADDING,
    PADDING,
    WIDTH as i32 / 4,
    HEIGHT as i32 - 2 * PADDING,
);

/// What fills the image slot.
pub enum SlotContent {
    Circuit,
    Image(DynamicImage),
    /// No image URL, or the download failed.
    Placeholder,
}

/// Decide the slot content. A missing URL and a failed download both end
/// up as [`SlotContent::Placeholder`].
pub async fn resolve_slot(meta: &PageMetadata, circuit: bool, loader: &dyn ImageLoader) -> SlotContent {
    if circuit {
        return SlotContent::Circuit;
    }
    let Some(url) = meta.image.as_deref() else {
        return SlotContent::Placeholder;
    };
    match loader.load(url).await {
        Ok(img) => SlotContent::Image(img),
        Err(err) => {
            tracing::warn!(image = %url, error = %err, "could not load image");
            SlotContent::Placeholder
        }
    }
}

pub async fn render(
    meta: &PageMetadata,
    circuit: bool,
    accent: Option<Rgb<u8>>,
    loader: &dyn ImageLoader,
    fonts: &FontBook,
) -> RgbaImage {
    let slot = resolve_slot(meta, circuit, loader).await;
    draw(meta, &slot, accent.unwrap_or(COMPACT_DEFAULT_ACCENT), fonts)
}

fn draw_slot(canvas: &mut Canvas, slot: &SlotContent, accent: Rgb<u8>, fonts: &FontBook) {
    let Rect { x, y, w, h } = SLOT;
    match slot {
        SlotContent::Circuit => {
            draw_circuit(canvas, SLOT, accent);
        }
        SlotContent::Image(img) => match plan_fit(img.width(), img.height(), w as u32, h as u32) {
            FitPlan::Letterbox => {
                tracing::debug!(
                    width = img.width(),
                    height = img.height(),
                    "aspect ratio far from slot; letterboxing"
                );
                let fitted = shrink_to_fit(img, w as u32, h as u32);
                canvas.fill_rect(x, y, x + w, y + h, LETTERBOX_FILL);
                canvas.paste(
                    &fitted,
                    x + (w - fitted.width() as i32) / 2,
                    y + (h - fitted.height() as i32) / 2,
                );
            }
            FitPlan::Crop => {
                let cropped = cover_crop(img, w as u32, h as u32);
                canvas.paste(&cropped, x, y);
            }
        },
        SlotContent::Placeholder => {
            canvas.fill_rect(x, y, x + w, y + h, WHITE);
            canvas.stroke_rect(x, y, x + w, y + h, BORDER, 2);
            let style = TextStyle {
                font: fonts.regular(),
                px: 12.0,
                color: hex(0x666666),
            };
            let (cx, cy) = SLOT.center();
            canvas.draw_text(&style, cx, cy, Anchor::Middle, "No Image");
        }
    }
}

pub fn draw(meta: &PageMetadata, slot: &SlotContent, accent: Rgb<u8>, fonts: &FontBook) -> RgbaImage {
    let mut canvas = Canvas::new(WIDTH, HEIGHT, BACKGROUND);
    let (w, h) = (WIDTH as i32, HEIGHT as i32);
    canvas.stroke_rect(0, 0, w - 1, h - 1, BORDER, 3);

    draw_slot(&mut canvas, slot, accent, fonts);

    let text_width = SLOT.x - PADDING - 10;
    let mut y = PADDING;

    let site = TextStyle {
        font: fonts.regular(),
        px: 10.0,
        color: hex(0x666666),
    };
    canvas.draw_text(&site, PADDING, y, Anchor::LeftTop, &meta.site_name.to_uppercase());
    y += 15;

    let title_style = TextStyle {
        font: fonts.regular(),
        px: 20.0,
        color: BLACK,
    };
    let title = truncate_with_ellipsis(&meta.title, 60, 57);
    let title_lines = wrap(&title, 20.max(text_width as usize / 12));
    let shown = title_lines.len().min(2);
    for (i, line) in title_lines.iter().take(shown).enumerate() {
        canvas.draw_text(&title_style, PADDING, y + i as i32 * 20, Anchor::LeftTop, line);
    }
    y += shown as i32 * 20 + 8;

    if y < h - 40 {
        let desc_style = TextStyle {
            font: fonts.regular(),
            px: 12.0,
            color: hex(0x333333),
        };
        let desc = truncate_with_ellipsis(&meta.description, 80, 77);
        let desc_lines = wrap(&desc, 30.max(text_width as usize / 8));
        let available = 2.min(((h - y - 25).max(0) / 13) as usize);
        for (i, line) in desc_lines.iter().take(available).enumerate() {
            canvas.draw_text(&desc_style, PADDING, y + i as i32 * 13, Anchor::LeftTop, line);
        }
    }

    let domain = TextStyle {
        font: fonts.regular(),
        px: 10.0,
        color: hex(0x0066cc),
    };
    canvas.draw_text(&domain, PADDING, h - PADDING - 12, Anchor::LeftTop, &meta.domain);

    canvas.into_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn rgb(img: &RgbaImage, x: u32, y: u32) -> [u8; 3] {
        let p = img.get_pixel(x, y);
        [p[0], p[1], p[2]]
    }

    fn solid(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([0, 0, 255, 255])))
    }

    #[test]
    fn slot_geometry() {
        assert_eq!(SLOT, Rect::new(527, 15, 180, 114));
    }

    #[test]
    fn border_and_background() {
        let meta = PageMetadata::for_url("https://example.com");
        let out = draw(&meta, &SlotContent::Placeholder, COMPACT_DEFAULT_ACCENT, &FontBook::empty());
        assert_eq!(out.dimensions(), (WIDTH, HEIGHT));
        assert_eq!(rgb(&out, 1, 70), [0xd4, 0xa5, 0xa5]);
        assert_eq!(rgb(&out, 300, 5), [0xf8, 0xf5, 0xf5]);
        // placeholder interior is white, its outline uses the border color
        assert_eq!(rgb(&out, 600, 40), [255, 255, 255]);
        assert_eq!(rgb(&out, 527, 40), [0xd4, 0xa5, 0xa5]);
    }

    #[test]
    fn similar_aspect_crops_to_fill_slot() {
        let meta = PageMetadata::for_url("https://example.com");
        let out = draw(&meta, &SlotContent::Image(solid(300, 200)), COMPACT_DEFAULT_ACCENT, &FontBook::empty());
        assert_eq!(rgb(&out, 527, 15), [0, 0, 255]);
        assert_eq!(rgb(&out, 706, 128), [0, 0, 255]);
    }

    #[test]
    fn extreme_aspect_letterboxes() {
        let meta = PageMetadata::for_url("https://example.com");
        let out = draw(&meta, &SlotContent::Image(solid(400, 100)), COMPACT_DEFAULT_ACCENT, &FontBook::empty());
        // 180×45 strip centered vertically on the letterbox fill
        assert_eq!(rgb(&out, 600, 20), [0xf5, 0xf5, 0xf5]);
        assert_eq!(rgb(&out, 600, 72), [0, 0, 255]);
    }

    #[test]
    fn circuit_slot_uses_accent() {
        let meta = PageMetadata::for_url("https://example.com");
        let out = draw(&meta, &SlotContent::Circuit, Rgb([10, 200, 30]), &FontBook::empty());
        assert_eq!(rgb(&out, 530, 18), [10, 200, 30]);
    }
}
