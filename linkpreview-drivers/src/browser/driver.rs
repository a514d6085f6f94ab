use crate::browser::{
    fingerprint::UserAgentManager,
    page::{NavigationBudget, PreviewPage},
    stealth::{build_stealth_arguments, StealthProfile},
};
use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashMap;
use webdriver::capabilities::Capabilities;

/// How to reach and configure the WebDriver session.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub webdriver_url: String,
    pub headless: bool,
    pub stealth: StealthProfile,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            stealth: StealthProfile::Balanced,
        }
    }
}

/// Thin wrapper around a `fantoccini` WebDriver client with stealth helpers.
pub struct PreviewDriver {
    pub client: Client,
    pub user_agent_manager: UserAgentManager,
    pub stealth_profile: StealthProfile,
}

/// Chrome capabilities for `options`, using the session fingerprint.
pub fn chrome_capabilities(
    options: &DriverOptions,
    user_agent_manager: &mut UserAgentManager,
) -> Capabilities {
    let mut caps = Capabilities::new();
    let mut chrome_opts = HashMap::new();

    let mut args = build_stealth_arguments(options.stealth, user_agent_manager.session_profile());
    if options.headless {
        args.push("--headless=new".to_string());
        if !args.iter().any(|a| a == "--disable-gpu") {
            args.push("--disable-gpu".to_string());
        }
    }
    chrome_opts.insert("args".to_string(), json!(args));
    caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
    caps
}

impl PreviewDriver {
    /// Create a new driver connected to a running WebDriver service
    /// (Chromedriver listens on `http://localhost:9515` by default).
    pub async fn connect(options: &DriverOptions) -> Result<Self> {
        let mut user_agent_manager = UserAgentManager::new();
        let caps = chrome_capabilities(options, &mut user_agent_manager);

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .with_context(|| format!("connect to webdriver at {}", options.webdriver_url))?;

        tracing::debug!(
            target: "browser.driver",
            webdriver_url = %options.webdriver_url,
            headless = options.headless,
            stealth = ?options.stealth,
            "webdriver session opened"
        );

        Ok(Self {
            client,
            user_agent_manager,
            stealth_profile: options.stealth,
        })
    }

    /// Navigate to `url` and return a [`PreviewPage`] with stealth scripts applied.
    pub async fn goto(&mut self, url: &str, budget: &NavigationBudget) -> Result<PreviewPage> {
        let mut page = PreviewPage::new(
            self.client.clone(),
            self.stealth_profile,
            self.user_agent_manager.clone(),
        );
        page.goto(url, budget).await?;
        Ok(page)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fingerprint::UserAgentProfile;

    #[test]
    fn headless_capabilities_include_headless_flags_once() {
        let mut manager = UserAgentManager::fixed(UserAgentProfile::mac_chrome());
        let options = DriverOptions {
            stealth: StealthProfile::Maximum,
            ..DriverOptions::default()
        };
        let caps = chrome_capabilities(&options, &mut manager);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
        assert_eq!(args.iter().filter(|a| *a == "--disable-gpu").count(), 1);
    }

    #[test]
    fn headed_capabilities_skip_headless() {
        let mut manager = UserAgentManager::fixed(UserAgentProfile::mac_chrome());
        let options = DriverOptions {
            headless: false,
            ..DriverOptions::default()
        };
        let caps = chrome_capabilities(&options, &mut manager);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless=new"));
    }
}
