use crate::browser::BrowserCapturer;
use crate::extract::parse_metadata;
use linkpreview_common::{ImageSource, PageMetadata};
use linkpreview_http::{HttpClient, RequestOpts};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Static fetch first, scripted browser second.
///
/// ```no_run
/// # async fn demo() -> Result<(), linkpreview_http::HttpError> {
/// use linkpreview_web::MetadataExtractor;
///
/// let extractor = MetadataExtractor::new(linkpreview_http::HttpClient::browser_like()?);
/// if let Some(meta) = extractor.extract("https://example.com").await {
///     println!("{}", meta.title);
/// }
/// # Ok(()) }
/// ```
pub struct MetadataExtractor {
    http: HttpClient,
    probe_timeout: Duration,
    browser: Option<Arc<dyn BrowserCapturer>>,
}

impl MetadataExtractor {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            probe_timeout: Duration::from_secs(5),
            browser: None,
        }
    }

    /// Budget for the `/favicon.ico` HEAD probe.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_browser(mut self, browser: Arc<dyn BrowserCapturer>) -> Self {
        self.browser = Some(browser);
        self
    }

    /// Run the fallback chain for `url`.
    ///
    /// `None` means nothing could be extracted: the static fetch failed and
    /// the browser was unavailable or failed too.
    pub async fn extract(&self, url: &str) -> Option<PageMetadata> {
        let page = match self.http.get_page(url, RequestOpts::default()).await {
            Ok(page) => page,
            Err(err) => {
                warn!(%url, error = %err, "static fetch failed; site may block automated requests or need JavaScript");
                return self.capture_with_browser(url).await;
            }
        };

        info!(
            final_url = %page.final_url,
            status = %page.status,
            content_length = page.body.len(),
            "static fetch complete"
        );

        let mut meta = parse_metadata(&page.body, url);

        if meta.image.is_none() {
            if let Some(favicon) = default_favicon_url(url) {
                if self.http.exists(&favicon, self.probe_timeout).await {
                    info!(favicon = %favicon, "using default favicon");
                    meta.image = Some(favicon);
                    meta.image_source = ImageSource::DefaultFavicon;
                }
            }
        }

        if !meta.has_usable_title() {
            warn!(%url, title = %meta.title, "no meaningful title extracted; page may be script-rendered");
            match self.capture_with_browser(url).await {
                Some(rendered) if rendered.has_usable_title() => return Some(rendered),
                Some(_) => info!("browser capture found no better title; keeping static result"),
                None => {}
            }
        }

        Some(meta)
    }

    async fn capture_with_browser(&self, url: &str) -> Option<PageMetadata> {
        let Some(browser) = &self.browser else {
            info!("browser fallback not configured");
            return None;
        };
        info!(%url, "attempting browser capture");
        match browser.capture(url).await {
            Ok(capture) => {
                let meta = parse_metadata(&capture.html, url);
                info!(
                    final_url = %capture.final_url,
                    title = %meta.title,
                    "browser capture complete"
                );
                Some(meta)
            }
            Err(err) => {
                warn!(%url, error = %err, "browser capture failed");
                None
            }
        }
    }
}

/// `scheme://host[:port]/favicon.ico` for `url`.
pub fn default_favicon_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}://{}:{}/favicon.ico", parsed.scheme(), host, port),
        None => format!("{}://{}/favicon.ico", parsed.scheme(), host),
    })
}
