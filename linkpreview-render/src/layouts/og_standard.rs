//! 1200×630 Open Graph card: text column on the left, image or circuit
//! panel on the right.

use crate::canvas::{Anchor, Canvas, Rect, TextStyle};
use crate::circuit::draw_circuit;
use crate::color::{OG_DEFAULT_ACCENT, WHITE};
use crate::fit::shrink_to_fit;
use crate::fonts::FontBook;
use crate::loader::ImageLoader;
use crate::text::{ellipsize_tail, take_chars, wrap};
use image::{DynamicImage, Rgb, RgbaImage};
use linkpreview_common::PageMetadata;

pub const WIDTH: u32 = 1200;
pub const HEIGHT: u32 = 630;
/// Left 55 % holds the text.
pub const CONTENT_WIDTH: i32 = 660;

const PADDING: i32 = 50;
const INK: Rgb<u8> = Rgb([30, 30, 30]);
const MUTED: Rgb<u8> = Rgb([100, 100, 100]);
const PANEL_FILL: Rgb<u8> = Rgb([245, 245, 245]);
const BORDER: Rgb<u8> = Rgb([220, 220, 220]);

/// What occupies the right-hand panel.
pub enum Panel {
    /// Circuit pattern; `labelled` puts the short site name on the chip.
    Circuit { labelled: bool },
    Image(DynamicImage),
}

pub async fn render(
    meta: &PageMetadata,
    circuit: bool,
    accent: Option<Rgb<u8>>,
    loader: &dyn ImageLoader,
    fonts: &FontBook,
) -> RgbaImage {
    let panel = if circuit {
        Panel::Circuit { labelled: true }
    } else {
        match meta.image.as_deref() {
            Some(url) => match loader.load(url).await {
                Ok(img) => Panel::Image(img),
                Err(err) => {
                    tracing::warn!(image = %url, error = %err, "could not load image; using circuit pattern");
                    Panel::Circuit { labelled: false }
                }
            },
            None => Panel::Circuit { labelled: false },
        }
    };
    draw(meta, &panel, accent.unwrap_or(OG_DEFAULT_ACCENT), fonts)
}

/// Up to four upper-cased characters for the chip label.
pub fn chip_label(site_name: &str) -> String {
    let short = take_chars(site_name, 8).to_uppercase();
    if short.chars().count() > 4 {
        take_chars(&short, 4)
    } else {
        short
    }
}

pub fn draw(meta: &PageMetadata, panel: &Panel, accent: Rgb<u8>, fonts: &FontBook) -> RgbaImage {
    let mut canvas = Canvas::new(WIDTH, HEIGHT, WHITE);
    let (w, h) = (WIDTH as i32, HEIGHT as i32);
    let panel_area = Rect::new(CONTENT_WIDTH, 0, w - CONTENT_WIDTH, h);

    match panel {
        Panel::Circuit { labelled } => {
            let chip = draw_circuit(&mut canvas, panel_area, accent);
            if *labelled {
                let style = TextStyle {
                    font: fonts.bold(),
                    px: 24.0,
                    color: WHITE,
                };
                let (cx, cy) = chip.center();
                canvas.draw_text(&style, cx, cy - 12, Anchor::Middle, &chip_label(&meta.site_name));
            }
        }
        Panel::Image(img) => {
            let fitted = shrink_to_fit(img, panel_area.w as u32, panel_area.h as u32);
            let x = CONTENT_WIDTH + (panel_area.w - fitted.width() as i32) / 2;
            let y = (h - fitted.height() as i32) / 2;
            canvas.fill_rect(CONTENT_WIDTH, 0, w, h, PANEL_FILL);
            canvas.paste(&fitted, x, y);
        }
    }

    canvas.fill_rect(0, 0, 8, h, accent);
    canvas.stroke_rounded_rect(2, 2, w - 2, h - 2, 16, BORDER, 2);

    // Site badge
    let mut y = PADDING + 20;
    canvas.fill_ellipse(PADDING, y, PADDING + 44, y + 44, accent);
    let initial: String = meta
        .site_name
        .chars()
        .next()
        .unwrap_or('U')
        .to_uppercase()
        .collect();
    let icon = TextStyle {
        font: fonts.bold(),
        px: 28.0,
        color: WHITE,
    };
    canvas.draw_text(&icon, PADDING + 22, y + 22, Anchor::Middle, &initial);
    let site = TextStyle {
        font: fonts.bold(),
        px: 18.0,
        color: INK,
    };
    canvas.draw_text(&site, PADDING + 60, y + 10, Anchor::LeftTop, &meta.site_name);
    y += 70;

    let title = TextStyle {
        font: fonts.bold(),
        px: 48.0,
        color: INK,
    };
    for line in wrap(&meta.title, 28).iter().take(3) {
        canvas.draw_text(&title, PADDING, y, Anchor::LeftTop, line);
        y += 58;
    }
    y += 20;

    let desc = TextStyle {
        font: fonts.regular(),
        px: 24.0,
        color: MUTED,
    };
    let desc_lines = wrap(&meta.description, 50);
    for (i, line) in desc_lines.iter().take(4).enumerate() {
        let line = if i == 3 && desc_lines.len() > 4 {
            ellipsize_tail(line)
        } else {
            line.clone()
        };
        canvas.draw_text(&desc, PADDING, y, Anchor::LeftTop, &line);
        y += 32;
    }

    let url = TextStyle {
        font: fonts.regular(),
        px: 16.0,
        color: MUTED,
    };
    canvas.draw_text(&url, PADDING, h - PADDING - 20, Anchor::LeftTop, &meta.domain);

    canvas.into_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chip_label_is_short_upper_case() {
        assert_eq!(chip_label("Edge AI Weekly"), "EDGE");
        assert_eq!(chip_label("acme"), "ACME");
        assert_eq!(chip_label(""), "");
    }

    #[test]
    fn draws_full_card_with_accent_bar() {
        let meta = PageMetadata::for_url("https://example.com");
        let img = draw(
            &meta,
            &Panel::Circuit { labelled: true },
            OG_DEFAULT_ACCENT,
            &FontBook::empty(),
        );
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
        let bar = img.get_pixel(4, 300);
        assert_eq!([bar[0], bar[1], bar[2]], [0, 148, 143]);
    }

    #[test]
    fn image_panel_gets_neutral_fill() {
        let meta = PageMetadata::for_url("https://example.com");
        let tall = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            10,
            630,
            image::Rgba([255, 0, 0, 255]),
        ));
        let img = draw(&meta, &Panel::Image(tall), OG_DEFAULT_ACCENT, &FontBook::empty());
        let fill = img.get_pixel(700, 300);
        assert_eq!([fill[0], fill[1], fill[2]], [245, 245, 245]);
        let center = img.get_pixel(930, 300);
        assert_eq!([center[0], center[1], center[2]], [255, 0, 0]);
    }
}
