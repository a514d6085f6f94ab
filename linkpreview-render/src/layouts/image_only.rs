//! 722×144 strip dominated by a high-quality image.

use crate::canvas::{Anchor, Canvas, TextStyle};
use crate::color::{WHITE, hex};
use crate::fit::scale_exact;
use crate::fonts::FontBook;
use crate::loader::ImageLoader;
use crate::text::{truncate_with_ellipsis, wrap};
use image::{DynamicImage, RgbaImage};
use linkpreview_common::{PageMetadata, PreviewError, Result};

pub const WIDTH: u32 = 722;
pub const HEIGHT: u32 = 144;
/// Left 40 % carries text for square and tall images.
pub const TEXT_COLUMN: u32 = 288;

/// Download the image and draw. Any failure is returned so the caller can
/// fall back to the compact layout.
pub async fn render(
    meta: &PageMetadata,
    loader: &dyn ImageLoader,
    fonts: &FontBook,
) -> Result<RgbaImage> {
    let url = meta
        .image
        .as_deref()
        .ok_or_else(|| PreviewError::Image("record has no image".into()))?;
    let img = loader.load(url).await?;
    tracing::debug!(width = img.width(), height = img.height(), "image-only source");
    Ok(draw(meta, &img, fonts))
}

fn site_label(meta: &PageMetadata) -> String {
    let name = if meta.site_name.trim().is_empty() {
        &meta.domain
    } else {
        &meta.site_name
    };
    name.to_uppercase()
}

pub fn draw(meta: &PageMetadata, img: &DynamicImage, fonts: &FontBook) -> RgbaImage {
    let mut canvas = Canvas::new(WIDTH, HEIGHT, WHITE);
    let (w, h) = (WIDTH as f64, HEIGHT as f64);
    let ratio = img.width() as f64 / img.height().max(1) as f64;
    let site = site_label(meta);
    let site_style = TextStyle {
        font: fonts.regular(),
        px: 10.0,
        color: hex(0x888888),
    };

    if ratio <= 1.0 {
        let image_width = WIDTH - TEXT_COLUMN;
        let (nw, nh) = if ratio > image_width as f64 / h {
            (image_width, (image_width as f64 / ratio) as u32)
        } else {
            ((h * ratio) as u32, HEIGHT)
        };
        let scaled = scale_exact(img, nw, nh);
        let x = TEXT_COLUMN as i32 + (image_width as i32 - scaled.width() as i32) / 2;
        let y = (HEIGHT as i32 - scaled.height() as i32) / 2;
        canvas.paste(&scaled, x, y);

        let title_style = TextStyle {
            font: fonts.regular(),
            px: 16.0,
            color: hex(0x333333),
        };
        let title = truncate_with_ellipsis(&meta.title, 60, 57);
        for (i, line) in wrap(&title, 25).iter().take(4).enumerate() {
            canvas.draw_text(&title_style, 20, 20 + i as i32 * 20, Anchor::LeftTop, line);
        }
        if !site.is_empty() {
            canvas.draw_text(&site_style, 20, HEIGHT as i32 - 25, Anchor::LeftTop, &site);
        }
    } else {
        let (mut nw, mut nh) = (WIDTH, (w / ratio) as u32);
        if nh > HEIGHT {
            nh = HEIGHT;
            nw = (h * ratio) as u32;
        }
        let scaled = scale_exact(img, nw, nh);
        let x = (WIDTH as i32 - scaled.width() as i32) / 2;
        let y = (HEIGHT as i32 - scaled.height() as i32) / 2;
        canvas.paste(&scaled, x, y);

        if !site.is_empty() {
            canvas.draw_text(
                &site_style,
                WIDTH as i32 - 10,
                HEIGHT as i32 - 15,
                Anchor::RightBaseline,
                &site,
            );
        }
    }

    canvas.into_image()
}
