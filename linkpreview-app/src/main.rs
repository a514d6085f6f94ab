use anyhow::{Context, Result};
use clap::Parser;
use linkpreview_common::observability::{LogConfig, LogFormat, init_logging};
use linkpreview_config::{LogFormatSetting, LoggingConfig, PreviewConfig, PreviewConfigLoader, default_config_path};
use std::path::Path;
use std::process::ExitCode;

mod cli;
mod manual;
mod output;
mod pipeline;

use cli::Cli;
use manual::StdinPrompter;
use pipeline::{Outcome, Services};

fn load_config(explicit: Option<&Path>) -> Result<PreviewConfig> {
    let loader = PreviewConfigLoader::new();
    let loader = match (explicit, default_config_path()) {
        (Some(path), _) => loader.with_file(path),
        (None, Some(path)) => loader.with_optional_file(path),
        (None, None) => loader,
    };
    // env wins over files
    loader
        .with_env()
        .load()
        .context("loading configuration")
}

fn log_config(logging: &LoggingConfig) -> LogConfig {
    LogConfig {
        log_dir: logging.dir.clone(),
        emit_stderr: logging.emit_stderr,
        format: match logging.format {
            LogFormatSetting::Text => LogFormat::Text,
            LogFormatSetting::Json => LogFormat::Json,
        },
        default_filter: logging.filter.clone(),
        ..LogConfig::default()
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let config = load_config(cli.config.as_deref())?;
    let log_path = init_logging(log_config(&config.logging))?;
    tracing::debug!(log = %log_path.display(), url = %cli.url, "starting");

    let services = Services::from_config(&config, cli.no_browser)?;
    let mut prompter = StdinPrompter::new();
    pipeline::generate(&cli, &config, &services, &mut prompter).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = tokio::select! {
        outcome = run(cli) => outcome,
        _ = tokio::signal::ctrl_c() => {
            println!("\nOperation cancelled.");
            // A pending stdin read would keep the runtime from shutting down.
            std::process::exit(1);
        }
    };

    match outcome {
        Ok(Outcome::Saved(report)) => {
            tracing::info!(
                layout = ?report.layout,
                path = %report.preview.path.display(),
                pdf_fallback = report.preview.fell_back_to_png,
                json = ?report.json,
                "done"
            );
            ExitCode::SUCCESS
        }
        Ok(Outcome::Declined | Outcome::Cancelled) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
