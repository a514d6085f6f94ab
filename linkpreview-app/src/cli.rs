use clap::Parser;
use linkpreview_render::OutputFormat;
use std::path::PathBuf;

/// Generate a link preview image from a URL.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:
  linkpreview https://example.com
  linkpreview https://example.com --og-size
  linkpreview https://example.com --circuit --color \"#00948F\"
  linkpreview https://example.com --og-size --circuit --json")]
pub struct Cli {
    /// URL to generate a preview for
    pub url: String,

    /// Output file name (derived from the page title when omitted)
    pub output: Option<String>,

    /// Enter the metadata by hand instead of fetching the page
    #[arg(short, long)]
    pub manual: bool,

    /// Export as PDF instead of PNG
    #[arg(long)]
    pub pdf: bool,

    /// Use the 1200x630 Open Graph card instead of the 722x144 strip
    #[arg(long)]
    pub og_size: bool,

    /// Draw a circuit-board pattern instead of the page image
    #[arg(long)]
    pub circuit: bool,

    /// Accent color, `#RRGGBB` or `r,g,b`
    #[arg(long)]
    pub color: Option<String>,

    /// Also write the Open Graph data as `<name>_og_data.json`
    #[arg(long)]
    pub json: bool,

    /// Directory for generated files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(long, env = "LINKPREVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Never start a WebDriver session
    #[arg(long)]
    pub no_browser: bool,
}

impl Cli {
    pub fn format(&self) -> OutputFormat {
        if self.pdf {
            OutputFormat::Pdf
        } else {
            OutputFormat::Png
        }
    }
}
