use rand::prelude::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Snapshot of user agent, viewport, and locale characteristics.
pub struct UserAgentProfile {
    pub user_agent: String,
    pub viewport: (u32, u32),
    pub platform: String,
    pub languages: Vec<String>,
    pub timezone: String,
}

impl UserAgentProfile {
    /// Desktop Chrome on macOS, the same identity the static fetch presents.
    pub fn mac_chrome() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            viewport: (1440, 900),
            platform: "MacIntel".to_string(),
            languages: vec!["en-US".to_string(), "en".to_string()],
            timezone: "America/Los_Angeles".to_string(),
        }
    }

    pub fn windows_chrome() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            viewport: (1920, 1080),
            platform: "Win32".to_string(),
            languages: vec!["en-US".to_string(), "en".to_string()],
            timezone: "America/New_York".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
/// Picks one plausible desktop profile per browser session.
pub struct UserAgentManager {
    desktop_profiles: Vec<UserAgentProfile>,
    current_session_profile: Option<UserAgentProfile>,
}

impl Default for UserAgentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl UserAgentManager {
    pub fn new() -> Self {
        Self {
            desktop_profiles: vec![
                UserAgentProfile::mac_chrome(),
                UserAgentProfile::windows_chrome(),
            ],
            current_session_profile: None,
        }
    }

    /// Pin the session to a single profile.
    pub fn fixed(profile: UserAgentProfile) -> Self {
        Self {
            desktop_profiles: vec![profile.clone()],
            current_session_profile: Some(profile),
        }
    }

    /// Get (or lazily select) the current session profile.
    pub fn session_profile(&mut self) -> &UserAgentProfile {
        let profiles = &self.desktop_profiles;
        self.current_session_profile.get_or_insert_with(|| {
            profiles
                .choose(&mut rand::thread_rng())
                .cloned()
                .unwrap_or_else(UserAgentProfile::mac_chrome)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_profile_is_sticky() {
        let mut manager = UserAgentManager::new();
        let first = manager.session_profile().clone();
        for _ in 0..10 {
            assert_eq!(manager.session_profile(), &first);
        }
    }

    #[test]
    fn fixed_profile_is_returned() {
        let mut manager = UserAgentManager::fixed(UserAgentProfile::windows_chrome());
        assert_eq!(manager.session_profile().platform, "Win32");
    }
}
