//! Writing previews to disk.

pub mod filename;
pub mod og_json;
pub mod pdf;

pub use filename::{OutputFormat, enforce_extension, json_file_name, output_file_name, sanitize_filename};
pub use og_json::{OgExport, write_og_json};

use image::{DynamicImage, ImageFormat, RgbaImage};
use linkpreview_common::{PreviewError, Result};
use std::path::{Path, PathBuf};

/// Where a preview ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPreview {
    pub path: PathBuf,
    pub format: OutputFormat,
    /// PDF was requested but writing it failed, so a PNG was written instead.
    pub fell_back_to_png: bool,
}

fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    DynamicImage::ImageRgba8(img.clone())
        .to_rgb8()
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| PreviewError::Export(format!("write png {}: {e}", path.display())))
}

/// Save the composed image. A failed PDF write degrades to a PNG beside it.
pub fn save_preview(img: &RgbaImage, path: &Path, format: OutputFormat) -> Result<SavedPreview> {
    match format {
        OutputFormat::Png => {
            save_png(img, path)?;
            tracing::info!(path = %path.display(), "preview saved");
            Ok(SavedPreview {
                path: path.to_path_buf(),
                format,
                fell_back_to_png: false,
            })
        }
        OutputFormat::Pdf => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            match pdf::save_pdf(&rgb, path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "preview saved");
                    Ok(SavedPreview {
                        path: path.to_path_buf(),
                        format,
                        fell_back_to_png: false,
                    })
                }
                Err(err) => {
                    let png_path = path.with_extension("png");
                    tracing::warn!(error = %err, fallback = %png_path.display(), "pdf export failed; saving png");
                    save_png(img, &png_path)?;
                    Ok(SavedPreview {
                        path: png_path,
                        format: OutputFormat::Png,
                        fell_back_to_png: true,
                    })
                }
            }
        }
    }
}
