use crate::browser::{
    fingerprint::UserAgentManager,
    stealth::{StealthProfile, StealthScripts},
};
use anyhow::{anyhow, Result};
use fantoccini::Client;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// Time limits for a single page capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationBudget {
    /// First navigation attempt.
    pub first: Duration,
    /// Second attempt, used only when the first one fails.
    pub retry: Duration,
    /// Fixed wait after navigation for late-loading content.
    pub settle: Duration,
}

impl Default for NavigationBudget {
    fn default() -> Self {
        Self {
            first: Duration::from_secs(15),
            retry: Duration::from_secs(10),
            settle: Duration::from_millis(1000),
        }
    }
}

/// A navigated browser tab.
pub struct PreviewPage {
    pub(crate) client: Client,
    pub(crate) stealth_profile: StealthProfile,
    pub(crate) fingerprint_manager: UserAgentManager,
}

impl PreviewPage {
    pub fn new(
        client: Client,
        stealth_profile: StealthProfile,
        fingerprint_manager: UserAgentManager,
    ) -> Self {
        Self {
            client,
            stealth_profile,
            fingerprint_manager,
        }
    }

    /// Navigate to `url` within `budget`, apply stealth scripts, then settle.
    pub async fn goto(&mut self, url: &str, budget: &NavigationBudget) -> Result<()> {
        if let Err(first_err) = self.navigate(url, budget.first).await {
            warn!(
                target: "browser.page",
                %url,
                error = %first_err,
                retry_ms = budget.retry.as_millis() as u64,
                "first navigation failed; retrying with shorter budget"
            );
            self.navigate(url, budget.retry).await?;
        }

        if let Err(err) = self.apply_stealth_and_fingerprint().await {
            // Evasions are best-effort once the document is loaded.
            debug!(target: "browser.page", error = %err, "stealth scripts failed");
        }

        sleep(budget.settle).await;
        Ok(())
    }

    async fn navigate(&self, url: &str, limit: Duration) -> Result<()> {
        match timeout(limit, self.client.goto(url)).await {
            Ok(result) => result.map_err(anyhow::Error::from),
            Err(_) => Err(anyhow!("navigation timed out after {:?}", limit)),
        }
    }

    async fn apply_stealth_and_fingerprint(&mut self) -> Result<()> {
        for script in StealthScripts::for_profile(self.stealth_profile) {
            self.client.execute(script, vec![]).await?;
        }

        if self.stealth_profile == StealthProfile::Maximum {
            let p = self.fingerprint_manager.session_profile();
            self.client
                .execute(
                    &format!(
                        "Object.defineProperty(navigator, 'platform', {{ get: () => '{}' }});",
                        p.platform
                    ),
                    vec![],
                )
                .await?;
        }
        Ok(())
    }

    /// Return the full page HTML source.
    pub async fn get_content(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::from)
    }

    /// Return the current page URL.
    pub async fn get_url(&self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(anyhow::Error::from)
    }
}
