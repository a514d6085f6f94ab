//! One run of the tool: metadata, preview, files.

use crate::cli::Cli;
use crate::manual::{Prompter, manual_entry, offer_manual_entry};
use crate::output::resolve_output_dir;
use anyhow::{Context, Result};
use image::Rgb;
use linkpreview_common::PageMetadata;
use linkpreview_config::{BrowserConfig, PreviewConfig, StealthSetting};
use linkpreview_drivers::{DriverOptions, NavigationBudget, StealthProfile};
use linkpreview_http::HttpClient;
use linkpreview_render::export::{json_file_name, output_file_name};
use linkpreview_render::{
    FontBook, HttpImageLoader, ImageLoader, LayoutKind, RenderOptions, SavedPreview, parse_color,
    render_preview, save_preview, write_og_json,
};
use linkpreview_web::{FantocciniCapturer, MetadataExtractor, apply_known_overrides};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Everything a run talks to besides the terminal.
pub struct Services {
    pub extractor: MetadataExtractor,
    pub images: Box<dyn ImageLoader>,
    pub fonts: FontBook,
}

impl Services {
    pub fn from_config(config: &PreviewConfig, no_browser: bool) -> Result<Self> {
        let fetch = &config.fetch;
        let http = HttpClient::with_user_agent(&fetch.user_agent)
            .context("building http client")?
            .with_timeout(Duration::from_secs(fetch.timeout_secs))
            .with_retries(fetch.retries);

        let mut extractor = MetadataExtractor::new(http.clone())
            .with_probe_timeout(Duration::from_secs(fetch.probe_timeout_secs));
        if config.browser.enabled && !no_browser {
            let (options, budget) = browser_settings(&config.browser);
            extractor = extractor.with_browser(Arc::new(FantocciniCapturer::new(options, budget)));
        } else {
            info!("browser fallback disabled");
        }

        let images = HttpImageLoader::new(http)
            .with_timeout(Duration::from_secs(fetch.image_timeout_secs));

        Ok(Self {
            extractor,
            images: Box::new(images),
            fonts: FontBook::load(config.fonts.regular.as_deref(), config.fonts.bold.as_deref()),
        })
    }
}

fn browser_settings(cfg: &BrowserConfig) -> (DriverOptions, NavigationBudget) {
    let stealth = match cfg.stealth {
        StealthSetting::Lightweight => StealthProfile::Lightweight,
        StealthSetting::Balanced => StealthProfile::Balanced,
        StealthSetting::Maximum => StealthProfile::Maximum,
    };
    let options = DriverOptions {
        webdriver_url: cfg.webdriver_url.clone(),
        headless: cfg.headless,
        stealth,
    };
    let budget = NavigationBudget {
        first: Duration::from_secs(cfg.navigation_timeout_secs),
        retry: Duration::from_secs(cfg.retry_navigation_timeout_secs),
        settle: Duration::from_millis(cfg.settle_millis),
    };
    (options, budget)
}

/// `--color` first, then the configured accent. Unparseable values are
/// reported and ignored.
pub fn resolve_accent(flag: Option<&str>, configured: Option<&str>) -> Option<Rgb<u8>> {
    let raw = flag.or(configured)?;
    let parsed = parse_color(raw);
    if parsed.is_none() {
        warn!(color = %raw, "invalid accent color");
        println!("Invalid color '{raw}', using the default accent");
    }
    parsed
}

#[derive(Debug)]
pub struct Report {
    pub layout: LayoutKind,
    pub preview: SavedPreview,
    pub json: Option<PathBuf>,
}

#[derive(Debug)]
pub enum Outcome {
    Saved(Report),
    /// Extraction failed and the user did not accept manual entry.
    Declined,
    /// Input ended or was interrupted during manual entry.
    Cancelled,
}

async fn acquire_metadata(
    cli: &Cli,
    services: &Services,
    prompter: &mut dyn Prompter,
) -> Result<PageMetadata, Outcome> {
    if cli.manual {
        println!("Manual mode: Please provide the metadata manually");
        return manual_entry(&cli.url, prompter).await.ok_or(Outcome::Cancelled);
    }

    println!("Extracting Open Graph data from: {}", cli.url);
    if let Some(meta) = services.extractor.extract(&cli.url).await {
        return Ok(meta);
    }
    if !offer_manual_entry(prompter).await {
        println!("Exiting...");
        return Err(Outcome::Declined);
    }
    manual_entry(&cli.url, prompter).await.ok_or(Outcome::Cancelled)
}

pub async fn generate(
    cli: &Cli,
    config: &PreviewConfig,
    services: &Services,
    prompter: &mut dyn Prompter,
) -> Result<Outcome> {
    let accent = resolve_accent(cli.color.as_deref(), config.accent_color.as_deref());

    let meta = match acquire_metadata(cli, services, prompter).await {
        Ok(meta) => meta,
        Err(outcome) => {
            if matches!(outcome, Outcome::Cancelled) {
                println!("\nOperation cancelled.");
            }
            return Ok(outcome);
        }
    };
    let meta = apply_known_overrides(&cli.url, meta);

    println!("Found: {}", meta.title);
    println!("Generating link preview...");

    let dir = resolve_output_dir(cli.output_dir.as_deref(), config.output_dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let opts = RenderOptions {
        og_size: cli.og_size,
        circuit: cli.circuit,
        accent,
    };
    let preview = render_preview(&meta, &opts, services.images.as_ref(), &services.fonts).await;

    let format = cli.format();
    let file_name = output_file_name(cli.output.as_deref(), &meta.title, format);
    let saved = save_preview(&preview.image, &dir.join(&file_name), format)?;
    if saved.fell_back_to_png {
        println!("PDF export failed, saved PNG to: {}", saved.path.display());
    } else if cli.pdf {
        println!("Link preview PDF saved to: {}", saved.path.display());
    } else {
        println!("Link preview saved to: {}", saved.path.display());
    }

    let json = if cli.json {
        let path = dir.join(json_file_name(&file_name));
        write_og_json(&meta, &path)?;
        println!("OG data JSON saved to: {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(Outcome::Saved(Report {
        layout: preview.kind,
        preview: saved,
        json,
    }))
}
