//! Common types and utilities shared across linkpreview crates.
//!
//! This crate defines the page metadata record, observability helpers, and
//! the shared error type used throughout the workspace. It stays lightweight
//! so every crate can depend on it without pulling in the HTTP or imaging
//! stacks.
//!
//! # Overview
//!
//! - [`PageMetadata`]: the single record produced per run
//! - [`ImageSource`]: where the preview image URL came from
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`PreviewError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use linkpreview_common::{PageMetadata, NO_TITLE};
//!
//! let meta = PageMetadata::for_url("https://example.com/a");
//! assert_eq!(meta.title, NO_TITLE);
//! assert_eq!(meta.domain, "example.com");
//! assert!(!meta.has_usable_title());
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Title recorded when neither `og:title` nor `<title>` exist.
pub const NO_TITLE: &str = "No Title";

/// Description recorded when no description tag exists.
pub const NO_DESCRIPTION: &str = "No description available";

/// Minimum number of characters for a title to count as real content.
pub const MIN_TITLE_CHARS: usize = 3;

/// Where the preview image URL was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// `<meta property="og:image">`
    OpenGraph,
    /// One of the `<link rel="...icon...">` variants.
    IconLink,
    /// The conventional `/favicon.ico`, confirmed by a probe.
    DefaultFavicon,
    /// Typed in by the user or supplied by a fixed record.
    Manual,
    #[default]
    None,
}

/// Metadata describing one page, consumed by the renderer and the exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    /// Absolute URL of the preview image.
    pub image: Option<String>,
    pub image_source: ImageSource,
    pub site_name: String,
    /// `host[:port]` of the requested URL.
    pub domain: String,
    /// The URL exactly as requested.
    pub full_url: String,
    pub canonical_url: Option<String>,
    /// `og:type`
    pub content_type: Option<String>,
    /// `og:locale`
    pub locale: Option<String>,
}

impl PageMetadata {
    /// An empty record for `url`: sentinel title, default description, and
    /// the domain standing in for the site name.
    pub fn for_url(url: &str) -> Self {
        let domain = domain_of(url);
        Self {
            title: NO_TITLE.to_string(),
            description: NO_DESCRIPTION.to_string(),
            image: None,
            image_source: ImageSource::None,
            site_name: domain.clone(),
            domain,
            full_url: url.to_string(),
            canonical_url: None,
            content_type: None,
            locale: None,
        }
    }

    /// Whether the title looks like real page content.
    pub fn has_usable_title(&self) -> bool {
        is_usable_title(&self.title)
    }

    /// Whether the image URL came from the page's `og:image` tag.
    pub fn image_from_og_tag(&self) -> bool {
        self.image.is_some() && self.image_source == ImageSource::OpenGraph
    }
}

/// A title is usable when it is not the sentinel and has at least
/// [`MIN_TITLE_CHARS`] characters.
pub fn is_usable_title(title: &str) -> bool {
    let trimmed = title.trim();
    trimmed != NO_TITLE && trimmed.chars().count() >= MIN_TITLE_CHARS
}

/// `host[:port]` for a URL string, or an empty string when it has no
/// authority component.
pub fn domain_of(url: &str) -> String {
    let rest = match url.split_once("://") {
        Some((_, rest)) => rest,
        None => return String::new(),
    };
    let authority = rest
        .split(|c| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    // drop userinfo
    authority
        .rsplit_once('@')
        .map(|(_, host)| host)
        .unwrap_or(authority)
        .to_string()
}

/// Error types used across the linkpreview workspace.
#[derive(thiserror::Error, Debug)]
pub enum PreviewError {
    /// The page could not be fetched or returned an unusable response.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The scripted browser failed to capture the page.
    #[error("Browser error: {0}")]
    Browser(#[from] anyhow::Error),

    /// An image could not be downloaded or decoded.
    #[error("Image error: {0}")]
    Image(String),

    /// Writing a PNG, PDF, or JSON file failed.
    #[error("Export error: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The user cancelled or declined manual entry.
    #[error("Cancelled by user")]
    Cancelled,
}

/// Convenient alias for results that use [`PreviewError`].
pub type Result<T> = std::result::Result<T, PreviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_keeps_port_and_drops_path() {
        assert_eq!(domain_of("https://example.com:8080/a/b?c=1"), "example.com:8080");
        assert_eq!(domain_of("http://user:pw@host.test/x"), "host.test");
        assert_eq!(domain_of("not a url"), "");
    }

    #[test]
    fn sentinel_and_short_titles_are_not_usable() {
        assert!(!is_usable_title(NO_TITLE));
        assert!(!is_usable_title(""));
        assert!(!is_usable_title("ab"));
        assert!(is_usable_title("abc"));
        assert!(is_usable_title("Überschrift"));
    }

    #[test]
    fn og_flag_requires_image_and_source() {
        let mut meta = PageMetadata::for_url("https://example.com");
        meta.image_source = ImageSource::OpenGraph;
        assert!(!meta.image_from_og_tag());
        meta.image = Some("https://example.com/og.png".into());
        assert!(meta.image_from_og_tag());
        meta.image_source = ImageSource::IconLink;
        assert!(!meta.image_from_og_tag());
    }
}
