//! Loader for linkpreview configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are attached; `LINKPREVIEW__`
//! environment variables are attached first by [`PreviewConfigLoader::new`]
//! and then overridden by files, so callers wanting env to win should attach
//! files before calling [`PreviewConfigLoader::with_env`] again.
//! String values may reference `${VAR}` and are expanded recursively.
//!
//! ```yaml
//! output_dir: "~/Pictures/previews"
//! accent_color: "#00948F"
//! fetch:
//!   timeout_secs: 10
//! browser:
//!   enabled: true
//!   webdriver_url: "http://localhost:9515"
//!   stealth: balanced
//! logging:
//!   format: json
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "LINKPREVIEW";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Directory for generated files when `--output-dir` is absent.
    pub output_dir: Option<PathBuf>,
    /// Accent color used when `--color` is absent.
    pub accent_color: Option<String>,
    pub fetch: FetchConfig,
    pub browser: BrowserConfig,
    pub fonts: FontConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub image_timeout_secs: u64,
    /// Extra attempts on 429/5xx/network errors. Zero keeps one attempt per URL.
    pub retries: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            probe_timeout_secs: 5,
            image_timeout_secs: 10,
            retries: 0,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Use a WebDriver session when static extraction looks empty.
    pub enabled: bool,
    pub webdriver_url: String,
    pub headless: bool,
    pub stealth: StealthSetting,
    pub navigation_timeout_secs: u64,
    /// Budget for the second navigation attempt after a timeout.
    pub retry_navigation_timeout_secs: u64,
    /// Wait after navigation for late-loading content.
    pub settle_millis: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            stealth: StealthSetting::Balanced,
            navigation_timeout_secs: 15,
            retry_navigation_timeout_secs: 10,
            settle_millis: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StealthSetting {
    Lightweight,
    #[default]
    Balanced,
    Maximum,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormatSetting,
    pub emit_stderr: bool,
    pub dir: Option<PathBuf>,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormatSetting::Text,
            emit_stderr: true,
            dir: None,
            filter: "info".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    #[default]
    Text,
    Json,
}

/// `<config_dir>/linkpreview/config.yaml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("linkpreview").join("config.yaml"))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct PreviewConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for PreviewConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewConfigLoader {
    /// Start with `LINKPREVIEW__` env overrides and nothing else.
    ///
    /// ```
    /// use linkpreview_config::PreviewConfigLoader;
    ///
    /// let config = PreviewConfigLoader::new()
    ///     .with_yaml_str("accent_color: '#00948F'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.accent_color.as_deref(), Some("#00948F"));
    /// assert_eq!(config.fetch.timeout_secs, 10);
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder().add_source(Self::env_source());
        Self { builder }
    }

    fn env_source() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Re-attach the environment source so it overrides everything added so far.
    pub fn with_env(mut self) -> Self {
        self.builder = self.builder.add_source(Self::env_source());
        self
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be missing, for the per-user default location.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use linkpreview_config::{PreviewConfigLoader, StealthSetting};
    ///
    /// let cfg = PreviewConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// browser:
    ///   enabled: false
    ///   stealth: maximum
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(!cfg.browser.enabled);
    /// assert_eq!(cfg.browser.stealth, StealthSetting::Maximum);
    /// assert_eq!(cfg.browser.settle_millis, 1000);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded before the strongly typed structs
    /// are materialised.
    ///
    /// ```
    /// use linkpreview_config::PreviewConfigLoader;
    /// use std::path::PathBuf;
    ///
    /// unsafe { std::env::set_var("PREVIEW_DOC_DIR", "/srv/previews"); }
    ///
    /// let config = PreviewConfigLoader::new()
    ///     .with_yaml_str("output_dir: \"${PREVIEW_DOC_DIR}/cards\"")
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.output_dir, Some(PathBuf::from("/srv/previews/cards")));
    ///
    /// unsafe { std::env::remove_var("PREVIEW_DOC_DIR"); }
    /// ```
    pub fn load(self) -> Result<PreviewConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: PreviewConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
