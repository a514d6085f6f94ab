//! Raster composition of link previews and their export to disk.
//!
//! [`render_preview`] picks a layout for a [`PageMetadata`] record, downloads
//! whatever image that layout needs through an [`ImageLoader`] and returns
//! the composed RGBA buffer. The [`export`] module turns it into files.

pub mod canvas;
pub mod circuit;
pub mod color;
pub mod export;
pub mod fit;
pub mod fonts;
pub mod layout;
pub mod layouts;
pub mod loader;
pub mod text;

pub use color::parse_color;
pub use export::{OutputFormat, SavedPreview, save_preview, write_og_json};
pub use fonts::FontBook;
pub use layout::{LayoutKind, select_layout};
pub use loader::{HttpImageLoader, ImageLoader};

use image::{Rgb, RgbaImage};
use linkpreview_common::PageMetadata;

/// Caller choices that shape the rendered preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Force the 1200×630 Open Graph card.
    pub og_size: bool,
    /// Draw the circuit pattern instead of the page image.
    pub circuit: bool,
    /// Accent override; each layout has its own default.
    pub accent: Option<Rgb<u8>>,
}

pub struct Preview {
    /// Layout that actually produced `image`.
    pub kind: LayoutKind,
    pub image: RgbaImage,
}

pub async fn render_preview(
    meta: &PageMetadata,
    opts: &RenderOptions,
    loader: &dyn ImageLoader,
    fonts: &FontBook,
) -> Preview {
    let kind = select_layout(meta, opts.og_size);
    tracing::info!(layout = ?kind, "rendering preview");
    match kind {
        LayoutKind::OgStandard => Preview {
            kind,
            image: layouts::og_standard::render(meta, opts.circuit, opts.accent, loader, fonts).await,
        },
        LayoutKind::ImageOnly => match layouts::image_only::render(meta, loader, fonts).await {
            Ok(image) => Preview { kind, image },
            Err(err) => {
                tracing::warn!(error = %err, "image-only layout failed; using compact layout");
                Preview {
                    kind: LayoutKind::CompactRegular,
                    image: layouts::compact::render(meta, false, None, loader, fonts).await,
                }
            }
        },
        LayoutKind::CompactRegular => Preview {
            kind,
            image: layouts::compact::render(meta, opts.circuit, opts.accent, loader, fonts).await,
        },
    }
}
