use anyhow::Result;
use linkpreview_drivers::{DriverOptions, NavigationBudget, PreviewDriver};

/// Rendered HTML of a page as seen by a real browser.
#[derive(Debug, Clone)]
pub struct PageCapture {
    /// URL the browser ended on.
    pub final_url: String,
    pub html: String,
}

#[async_trait::async_trait]
pub trait BrowserCapturer: Send + Sync {
    async fn capture(&self, url: &str) -> Result<PageCapture>;
}

/// Concrete capturer backed by the fantoccini-based driver.
#[derive(Debug, Clone, Default)]
pub struct FantocciniCapturer {
    pub options: DriverOptions,
    pub budget: NavigationBudget,
}

impl FantocciniCapturer {
    pub fn new(options: DriverOptions, budget: NavigationBudget) -> Self {
        Self { options, budget }
    }
}

#[async_trait::async_trait]
impl BrowserCapturer for FantocciniCapturer {
    async fn capture(&self, url: &str) -> Result<PageCapture> {
        let mut driver = PreviewDriver::connect(&self.options).await?;

        let captured = async {
            let page = driver.goto(url, &self.budget).await?;
            let html = page.get_content().await?;
            let final_url = page.get_url().await.unwrap_or_else(|_| url.to_string());
            Ok::<_, anyhow::Error>(PageCapture { final_url, html })
        }
        .await;

        // Always attempt to close the driver before returning
        if let Err(err) = driver.close().await {
            tracing::debug!(target: "browser.capture", error = %err, "closing webdriver session failed");
        }
        captured
    }
}
