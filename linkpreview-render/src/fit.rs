//! Scaling an image into a fixed slot.

use image::{DynamicImage, RgbaImage, imageops, imageops::FilterType};

/// Relative aspect deviation above which cropping is avoided.
pub const ASPECT_DEVIATION_THRESHOLD: f64 = 1.5;

/// How an image is fitted into a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPlan {
    /// Scale to cover the slot and center-crop to exactly its size.
    Crop,
    /// Shrink to fit inside the slot and center on a background fill.
    Letterbox,
}

/// `|src_ratio - slot_ratio| / slot_ratio`
pub fn aspect_deviation(src_w: u32, src_h: u32, slot_w: u32, slot_h: u32) -> f64 {
    let src = src_w as f64 / src_h.max(1) as f64;
    let target = slot_w as f64 / slot_h.max(1) as f64;
    (src - target).abs() / target
}

/// ```
/// use linkpreview_render::fit::{plan_fit, FitPlan};
///
/// assert_eq!(plan_fit(300, 200, 180, 114), FitPlan::Crop);
/// assert_eq!(plan_fit(1000, 100, 180, 114), FitPlan::Letterbox);
/// ```
pub fn plan_fit(src_w: u32, src_h: u32, slot_w: u32, slot_h: u32) -> FitPlan {
    if aspect_deviation(src_w, src_h, slot_w, slot_h) > ASPECT_DEVIATION_THRESHOLD {
        FitPlan::Letterbox
    } else {
        FitPlan::Crop
    }
}

/// Shrink to fit within `max_w`×`max_h`, keeping the aspect ratio. Never enlarges.
pub fn shrink_to_fit(img: &DynamicImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = (img.width().max(1), img.height().max(1));
    let scale = (max_w as f64 / w as f64)
        .min(max_h as f64 / h as f64)
        .min(1.0);
    let nw = ((w as f64 * scale).round() as u32).clamp(1, max_w.max(1));
    let nh = ((h as f64 * scale).round() as u32).clamp(1, max_h.max(1));
    if (nw, nh) == (w, h) {
        return img.to_rgba8();
    }
    imageops::resize(&img.to_rgba8(), nw, nh, FilterType::Lanczos3)
}

/// Resize to exactly `w`×`h` regardless of aspect.
pub fn scale_exact(img: &DynamicImage, w: u32, h: u32) -> RgbaImage {
    imageops::resize(&img.to_rgba8(), w.max(1), h.max(1), FilterType::Lanczos3)
}

/// Scale to cover `slot_w`×`slot_h` and center-crop. The result always has
/// exactly the slot dimensions.
pub fn cover_crop(img: &DynamicImage, slot_w: u32, slot_h: u32) -> RgbaImage {
    let (w, h) = (img.width().max(1) as f64, img.height().max(1) as f64);
    let ratio = w / h;
    let target = slot_w as f64 / slot_h as f64;

    let (nw, nh) = if ratio > target {
        (((slot_h as f64 * ratio) as u32).max(slot_w), slot_h)
    } else {
        (slot_w, ((slot_w as f64 / ratio) as u32).max(slot_h))
    };
    let scaled = scale_exact(img, nw, nh);
    let x = (nw - slot_w) / 2;
    let y = (nh - slot_h) / 2;
    imageops::crop_imm(&scaled, x, y, slot_w, slot_h).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255])))
    }

    #[test]
    fn deviation_threshold() {
        // slot ratio 180/114 ≈ 1.579; 400x100 is 4.0 → deviation ≈ 1.53
        assert_eq!(plan_fit(400, 100, 180, 114), FitPlan::Letterbox);
        // 300x200 is 1.5 → deviation ≈ 0.05
        assert_eq!(plan_fit(300, 200, 180, 114), FitPlan::Crop);
        // tall images never exceed the threshold on this side
        assert_eq!(plan_fit(100, 1000, 180, 114), FitPlan::Crop);
    }

    #[test]
    fn crop_fills_slot_exactly() {
        for (w, h) in [(300, 200), (180, 114), (181, 114), (100, 400), (1200, 630)] {
            let out = cover_crop(&solid(w, h), 180, 114);
            assert_eq!(out.dimensions(), (180, 114), "source {w}x{h}");
        }
    }

    #[test]
    fn shrink_never_enlarges() {
        let out = shrink_to_fit(&solid(50, 20), 180, 114);
        assert_eq!(out.dimensions(), (50, 20));
        let out = shrink_to_fit(&solid(400, 100), 180, 114);
        assert_eq!(out.dimensions(), (180, 45));
        let out = shrink_to_fit(&solid(100, 1000), 540, 630);
        assert_eq!(out.dimensions(), (63, 630));
    }
}
