//! Structured Open Graph / Twitter card export.

use linkpreview_common::{PageMetadata, PreviewError, Result};
use serde::Serialize;
use std::path::Path;

const TWITTER_DESCRIPTION_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OgExport {
    pub open_graph: OpenGraph,
    pub twitter_card: TwitterCard,
    pub metadata: Metadata,
    pub extracted: Extracted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    #[serde(rename = "og:title")]
    pub title: String,
    #[serde(rename = "og:description")]
    pub description: String,
    #[serde(rename = "og:url")]
    pub url: String,
    #[serde(rename = "og:type")]
    pub kind: String,
    #[serde(rename = "og:site_name")]
    pub site_name: String,
    #[serde(rename = "og:image")]
    pub image: Option<String>,
    #[serde(rename = "og:locale")]
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    #[serde(rename = "twitter:card")]
    pub card: String,
    #[serde(rename = "twitter:title")]
    pub title: String,
    #[serde(rename = "twitter:description")]
    pub description: String,
    #[serde(rename = "twitter:image")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extracted {
    pub site_name: String,
    pub domain: String,
}

impl OgExport {
    pub fn from_metadata(meta: &PageMetadata) -> Self {
        Self {
            open_graph: OpenGraph {
                title: meta.title.clone(),
                description: meta.description.clone(),
                url: meta.full_url.clone(),
                kind: meta
                    .content_type
                    .clone()
                    .unwrap_or_else(|| "website".to_string()),
                site_name: meta.site_name.clone(),
                image: meta.image.clone(),
                locale: meta.locale.clone().unwrap_or_else(|| "en_US".to_string()),
            },
            twitter_card: TwitterCard {
                card: "summary_large_image".to_string(),
                title: meta.title.clone(),
                description: meta
                    .description
                    .chars()
                    .take(TWITTER_DESCRIPTION_CHARS)
                    .collect(),
                image: meta.image.clone(),
            },
            metadata: Metadata {
                title: meta.title.clone(),
                description: meta.description.clone(),
                canonical: meta
                    .canonical_url
                    .clone()
                    .unwrap_or_else(|| meta.full_url.clone()),
                domain: meta.domain.clone(),
            },
            extracted: Extracted {
                site_name: meta.site_name.clone(),
                domain: meta.domain.clone(),
            },
        }
    }
}

/// Write the export as pretty-printed UTF-8 JSON and return it.
pub fn write_og_json(meta: &PageMetadata, path: &Path) -> Result<OgExport> {
    let export = OgExport::from_metadata(meta);
    let body = serde_json::to_string_pretty(&export)
        .map_err(|e| PreviewError::Export(format!("serialize og json: {e}")))?;
    std::fs::write(path, body)?;
    tracing::info!(path = %path.display(), "og json written");
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn sample() -> PageMetadata {
        let mut meta = PageMetadata::for_url("https://example.com/a?b=1");
        meta.title = "Título".into();
        meta.description = "d".repeat(250);
        meta.site_name = "Example".into();
        meta
    }

    #[test]
    fn twitter_description_is_truncated_to_200() {
        let export = OgExport::from_metadata(&sample());
        assert_eq!(export.twitter_card.description.chars().count(), 200);
        assert_eq!(export.open_graph.description.chars().count(), 250);
    }

    #[test]
    fn short_description_is_untouched() {
        let mut meta = sample();
        meta.description = "short".into();
        assert_eq!(OgExport::from_metadata(&meta).twitter_card.description, "short");
    }

    #[test]
    fn defaults_and_key_names() {
        let value = serde_json::to_value(OgExport::from_metadata(&sample())).unwrap();
        assert_eq!(value["openGraph"]["og:type"], json!("website"));
        assert_eq!(value["openGraph"]["og:locale"], json!("en_US"));
        assert_eq!(value["openGraph"]["og:image"], Value::Null);
        assert_eq!(value["openGraph"]["og:url"], json!("https://example.com/a?b=1"));
        assert_eq!(value["twitterCard"]["twitter:card"], json!("summary_large_image"));
        assert_eq!(value["metadata"]["canonical"], json!("https://example.com/a?b=1"));
        assert_eq!(value["metadata"]["domain"], json!("example.com"));
        assert_eq!(value["extracted"]["siteName"], json!("Example"));
    }

    #[test]
    fn canonical_link_is_preferred() {
        let mut meta = sample();
        meta.canonical_url = Some("https://example.com/a".into());
        meta.content_type = Some("article".into());
        let export = OgExport::from_metadata(&meta);
        assert_eq!(export.metadata.canonical, "https://example.com/a");
        assert_eq!(export.open_graph.kind, "article");
    }

    #[test]
    fn file_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x_og_data.json");
        write_og_json(&sample(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Título"));
        assert!(text.contains("\n  \"openGraph\""));
    }
}
