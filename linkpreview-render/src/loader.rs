use image::DynamicImage;
use linkpreview_common::{PreviewError, Result};
use linkpreview_http::{HttpClient, RequestOpts};
use std::time::Duration;

/// Source of preview images. Every renderer downloads its own image.
#[async_trait::async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<DynamicImage>;
}

/// Downloads with the browser-like HTTP client and decodes in memory.
pub struct HttpImageLoader {
    http: HttpClient,
    timeout: Duration,
}

impl HttpImageLoader {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> Result<DynamicImage> {
        let opts = RequestOpts {
            timeout: Some(self.timeout),
            ..Default::default()
        };
        let bytes = self
            .http
            .get_bytes(url, opts)
            .await
            .map_err(|e| PreviewError::Image(format!("download {url}: {e}")))?;
        decode(&bytes)
    }
}

/// Decode an in-memory image, rejecting zero-sized results.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(bytes).map_err(|e| PreviewError::Image(e.to_string()))?;
    if img.width() == 0 || img.height() == 0 {
        return Err(PreviewError::Image("image has no pixels".into()));
    }
    tracing::debug!(width = img.width(), height = img.height(), "image decoded");
    Ok(img)
}
