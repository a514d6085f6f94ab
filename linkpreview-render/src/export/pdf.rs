use image::{ImageFormat, RgbImage};
use linkpreview_common::{PreviewError, Result};
use printpdf::{Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, RawImage, XObjectTransform};
use std::io::Cursor;
use std::path::Path;

/// Pixels per inch used to place the raster on the page.
const DPI: f32 = 100.0;

fn px_to_mm(px: u32) -> f32 {
    px as f32 * 25.4 / DPI
}

/// Single-page PDF sized to the image at 100 dpi.
pub fn encode_pdf(img: &RgbImage, title: &str) -> Result<Vec<u8>> {
    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, ImageFormat::Png)
        .map_err(|e| PreviewError::Export(format!("encode png for pdf: {e}")))?;

    let mut warnings = Vec::new();
    let raw = RawImage::decode_from_bytes(png.get_ref(), &mut warnings)
        .map_err(|e| PreviewError::Export(format!("pdf image: {e}")))?;

    let mut doc = PdfDocument::new(title);
    let id = doc.add_image(&raw);
    let page = PdfPage::new(
        Mm(px_to_mm(img.width())),
        Mm(px_to_mm(img.height())),
        vec![Op::UseXobject {
            id,
            transform: XObjectTransform {
                dpi: Some(DPI),
                ..Default::default()
            },
        }],
    );
    doc.pages.push(page);

    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), "pdf writer warnings");
    }
    Ok(bytes)
}

pub fn save_pdf(img: &RgbImage, path: &Path) -> Result<()> {
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("link preview");
    let bytes = encode_pdf(img, title)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_follows_pixels() {
        assert!((px_to_mm(100) - 25.4).abs() < 1e-4);
        assert!((px_to_mm(1200) - 304.8).abs() < 1e-3);
    }

    #[test]
    fn produces_pdf_bytes() {
        let img = RgbImage::from_pixel(40, 20, image::Rgb([0, 148, 143]));
        let bytes = encode_pdf(&img, "t").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
