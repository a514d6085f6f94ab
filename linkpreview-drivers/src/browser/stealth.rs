use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Levels of stealth applied to the browser session.
pub enum StealthProfile {
    Lightweight,
    #[default]
    Balanced,
    Maximum,
}

/// Construct Chrome command-line arguments for a given stealth profile
/// and fingerprint.
pub fn build_stealth_arguments(
    profile: StealthProfile,
    user_profile: &super::fingerprint::UserAgentProfile,
) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        "--disable-extensions".to_string(),
        "--disable-plugins-discovery".to_string(),
        format!("--user-agent={}", user_profile.user_agent),
        format!(
            "--window-size={},{}",
            user_profile.viewport.0, user_profile.viewport.1
        ),
        format!("--lang={}", user_profile.languages.join(",")),
    ];
    if profile == StealthProfile::Maximum {
        args.push("--disable-gpu".to_string());
    }
    args
}

/// JavaScript evasions applied after navigation to reduce automation signals.
pub struct StealthScripts;

impl StealthScripts {
    pub fn core_evasions() -> &'static str {
        r#"
            Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
            Object.defineProperty(navigator, 'languages', {
                get: () => ['en-US', 'en']
            });
            if (!window.chrome) window.chrome = { runtime: {} };
        "#
    }

    pub fn webgl_evasions() -> &'static str {
        r#"
            const getParameter = WebGLRenderingContext.prototype.getParameter;
            WebGLRenderingContext.prototype.getParameter = function(parameter) {
                if (parameter === 37445) return 'Intel Inc.';
                if (parameter === 37446) return 'Intel Iris OpenGL Engine';
                return getParameter.call(this, parameter);
            };
        "#
    }

    /// Scripts for `profile`, in execution order. `Maximum` additionally
    /// spoofs `navigator.platform` from the session fingerprint.
    pub fn for_profile(profile: StealthProfile) -> Vec<&'static str> {
        match profile {
            StealthProfile::Lightweight => vec![Self::core_evasions()],
            StealthProfile::Balanced | StealthProfile::Maximum => {
                vec![Self::core_evasions(), Self::webgl_evasions()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fingerprint::UserAgentProfile;

    fn profile() -> UserAgentProfile {
        UserAgentProfile {
            user_agent: "TestAgent/1.0".into(),
            viewport: (1280, 720),
            platform: "Linux x86_64".into(),
            languages: vec!["en-US".into(), "en".into()],
            timezone: "UTC".into(),
        }
    }

    #[test]
    fn arguments_carry_fingerprint() {
        let args = build_stealth_arguments(StealthProfile::Balanced, &profile());
        assert!(args.contains(&"--user-agent=TestAgent/1.0".to_string()));
        assert!(args.contains(&"--window-size=1280,720".to_string()));
        assert!(args.contains(&"--lang=en-US,en".to_string()));
        assert!(!args.iter().any(|a| a == "--disable-gpu"));
    }

    #[test]
    fn maximum_disables_gpu() {
        let args = build_stealth_arguments(StealthProfile::Maximum, &profile());
        assert!(args.iter().any(|a| a == "--disable-gpu"));
        assert!(!args.iter().any(|a| a == "--disable-web-security"));
    }

    #[test]
    fn scripts_grow_with_profile() {
        assert_eq!(StealthScripts::for_profile(StealthProfile::Lightweight).len(), 1);
        assert_eq!(StealthScripts::for_profile(StealthProfile::Balanced).len(), 2);
    }
}
