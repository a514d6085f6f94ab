use linkpreview_common::{ImageSource, NO_DESCRIPTION, NO_TITLE, PageMetadata};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Icon links tried in order when the page has no `og:image`.
pub const ICON_SELECTORS: [&str; 4] = [
    r#"link[rel="icon"]"#,
    r#"link[rel="shortcut icon"]"#,
    r#"link[rel="apple-touch-icon"]"#,
    r#"link[rel="apple-touch-icon-precomposed"]"#,
];

/// Parse `html` fetched for `requested_url` into a metadata record.
///
/// Relative image and canonical URLs are resolved against `requested_url`.
/// The `/favicon.ico` probe is not part of parsing; see
/// [`crate::extractor::MetadataExtractor`].
pub fn parse_metadata(html: &str, requested_url: &str) -> PageMetadata {
    let document = Html::parse_document(html);
    let base = Url::parse(requested_url).ok();
    let mut meta = PageMetadata::for_url(requested_url);

    // A present og:title wins even when its content is empty.
    meta.title = match first(&document, r#"meta[property="og:title"]"#) {
        Some(el) => attr_or_empty(el, "content"),
        None => extract_title(&document).unwrap_or_else(|| NO_TITLE.to_string()),
    };

    meta.description = match first(&document, r#"meta[property="og:description"]"#) {
        Some(el) => attr_or_empty(el, "content"),
        None => first(&document, r#"meta[name="description"]"#)
            .map(|el| {
                el.value()
                    .attr("content")
                    .unwrap_or(NO_DESCRIPTION)
                    .trim()
                    .to_string()
            })
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
    };

    if let Some(image) = extract_meta_property(&document, "og:image")
        .and_then(|href| resolve(base.as_ref(), &href))
    {
        meta.image = Some(image);
        meta.image_source = ImageSource::OpenGraph;
    } else if let Some(icon) = extract_icon(&document, base.as_ref()) {
        tracing::debug!(icon = %icon, "using icon link as preview image");
        meta.image = Some(icon);
        meta.image_source = ImageSource::IconLink;
    }

    if let Some(el) = first(&document, r#"meta[property="og:site_name"]"#) {
        meta.site_name = attr_or_empty(el, "content");
    }

    meta.content_type = extract_meta_property(&document, "og:type");
    meta.locale = extract_meta_property(&document, "og:locale");
    meta.canonical_url = first(&document, r#"link[rel="canonical"]"#)
        .and_then(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .and_then(|href| resolve(base.as_ref(), href));

    meta
}

/// First icon link with a non-empty `href`, resolved. Only the first element
/// of each selector is considered.
pub fn extract_icon(document: &Html, base: Option<&Url>) -> Option<String> {
    ICON_SELECTORS.iter().find_map(|sel| {
        let el = first(document, sel)?;
        let href = el.value().attr("href")?.trim();
        if href.is_empty() {
            return None;
        }
        resolve(base, href)
    })
}

fn first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

fn attr_or_empty(el: ElementRef<'_>, attr: &str) -> String {
    el.value().attr(attr).unwrap_or_default().trim().to_string()
}

/// Non-empty content of `<meta property="...">`.
fn extract_meta_property(document: &Html, property: &str) -> Option<String> {
    first(document, &format!(r#"meta[property="{property}"]"#))
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_title(document: &Html) -> Option<String> {
    first(document, "title").map(|el| el.text().collect::<String>().trim().to_string())
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    match base {
        Some(base) => base.join(href).ok().map(|u| u.to_string()),
        None => Url::parse(href).ok().map(|u| u.to_string()),
    }
}
