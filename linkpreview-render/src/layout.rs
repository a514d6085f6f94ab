//! Image worthiness scoring and layout selection.

use linkpreview_common::PageMetadata;
use serde::Serialize;

/// Scores at or above this make an image standalone-worthy.
pub const WORTHINESS_THRESHOLD: i32 = 3;

const QUALITY_HINTS: &[&str] = &[
    "blog",
    "featured",
    "hero",
    "banner",
    "cover",
    "social",
    "og-",
    "announcement",
    "press",
    "news",
    "article",
];
const AVOID_HINTS: &[&str] = &[
    "favicon", "icon", "logo", "avatar", "profile", "thumb", "small", "mini", "default",
];
const LARGE_HINTS: &[&str] = &["1200", "1024", "800", "large", "full"];
const SMALL_HINTS: &[&str] = &["32", "64", "128", "150", "small", "thumb"];

/// Heuristic quality score of an image URL.
///
/// ```
/// use linkpreview_render::layout::worthiness_score;
///
/// // quality hint (+2), og:image (+2), descriptive file name (+1)
/// assert_eq!(worthiness_score("https://cdn.example.com/blog/hero-image.jpg", true), 5);
/// // avoid hint (-3)
/// assert_eq!(worthiness_score("https://example.com/logo.png", false), -3);
/// ```
pub fn worthiness_score(image_url: &str, from_og_tag: bool) -> i32 {
    let url = image_url.to_lowercase();
    let contains_any = |hints: &[&str]| hints.iter().any(|h| url.contains(h));

    let mut score = 0;
    if contains_any(QUALITY_HINTS) {
        score += 2;
    }
    if from_og_tag {
        score += 2;
    }
    if contains_any(LARGE_HINTS) {
        score += 1;
    }
    if contains_any(AVOID_HINTS) {
        score -= 3;
    }
    if contains_any(SMALL_HINTS) {
        score -= 2;
    }

    let file_name = url.rsplit('/').next().unwrap_or_default();
    if file_name.chars().count() > 10 && !file_name.starts_with("img") && !file_name.starts_with("pic")
    {
        score += 1;
    }
    score
}

/// Whether the record's image can carry a preview on its own.
pub fn is_standalone_worthy(meta: &PageMetadata) -> bool {
    let Some(url) = meta.image.as_deref().filter(|u| !u.is_empty()) else {
        return false;
    };
    let score = worthiness_score(url, meta.image_from_og_tag());
    tracing::debug!(image = %url, score, threshold = WORTHINESS_THRESHOLD, "image worthiness");
    score >= WORTHINESS_THRESHOLD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// 1200×630 card with text column and image panel.
    OgStandard,
    /// 722×144 strip dominated by the image.
    ImageOnly,
    /// 722×144 strip with text and a small image slot.
    CompactRegular,
}

impl LayoutKind {
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            LayoutKind::OgStandard => (1200, 630),
            LayoutKind::ImageOnly | LayoutKind::CompactRegular => (722, 144),
        }
    }
}

pub fn select_layout(meta: &PageMetadata, og_size: bool) -> LayoutKind {
    if og_size {
        LayoutKind::OgStandard
    } else if is_standalone_worthy(meta) {
        LayoutKind::ImageOnly
    } else {
        LayoutKind::CompactRegular
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkpreview_common::ImageSource;

    fn meta_with(image: Option<&str>, source: ImageSource) -> PageMetadata {
        let mut meta = PageMetadata::for_url("https://example.com/post");
        meta.image = image.map(str::to_string);
        meta.image_source = source;
        meta
    }

    #[test]
    fn scoring_components() {
        // large hint (+1) and a long file name (+1)
        assert_eq!(worthiness_score("https://x.test/1200x630-card.png", false), 2);
        // small hint only: "thumb" is both avoid (-3) and small (-2)
        assert_eq!(worthiness_score("https://x.test/t/thumb.png", false), -5);
        // img-prefixed names get no file-name bonus
        assert_eq!(worthiness_score("https://x.test/img_000000001.jpg", false), 0);
        // case-insensitive
        assert_eq!(
            worthiness_score("https://X.test/BLOG/HERO.JPG", true),
            worthiness_score("https://x.test/blog/hero.jpg", true)
        );
    }

    #[test]
    fn og_size_always_wins() {
        let meta = meta_with(Some("https://x.test/blog/hero-banner.jpg"), ImageSource::OpenGraph);
        assert_eq!(select_layout(&meta, true), LayoutKind::OgStandard);
    }

    #[test]
    fn worthy_og_image_selects_image_only() {
        let meta = meta_with(Some("https://x.test/blog/hero-banner.jpg"), ImageSource::OpenGraph);
        assert_eq!(select_layout(&meta, false), LayoutKind::ImageOnly);
    }

    #[test]
    fn same_url_from_icon_link_is_less_worthy() {
        let url = "https://x.test/news/cover.jpg";
        let og = meta_with(Some(url), ImageSource::OpenGraph);
        let icon = meta_with(Some(url), ImageSource::IconLink);
        assert_eq!(select_layout(&og, false), LayoutKind::ImageOnly);
        assert_eq!(select_layout(&icon, false), LayoutKind::CompactRegular);
    }

    #[test]
    fn missing_image_is_never_worthy() {
        let meta = meta_with(None, ImageSource::None);
        assert!(!is_standalone_worthy(&meta));
        assert_eq!(select_layout(&meta, false), LayoutKind::CompactRegular);
    }

    #[test]
    fn selection_is_deterministic() {
        let meta = meta_with(Some("https://x.test/press/announcement-2024.png"), ImageSource::OpenGraph);
        let first = select_layout(&meta, false);
        for _ in 0..5 {
            assert_eq!(select_layout(&meta, false), first);
        }
    }
}
