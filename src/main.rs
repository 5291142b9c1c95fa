use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use qrstudio::{request, Studio, StudioConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate a QR code and save it as a PNG.
#[derive(Parser, Debug)]
#[command(name = "qrstudio", version, about)]
struct Cli {
    /// Text or URL to encode (empty encodes the placeholder URL)
    #[arg(short, long)]
    text: Option<String>,

    /// Foreground (module) color, any CSS color string
    #[arg(long)]
    fg: Option<String>,

    /// Background color, any CSS color string
    #[arg(long)]
    bg: Option<String>,

    /// Output size in pixels, snapped to steps of 64
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(128..=512))]
    size: Option<u32>,

    /// Quiet zone in modules
    #[arg(long)]
    margin: Option<usize>,

    /// Directory the PNG is written to
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the SVG preview instead of exporting
    #[arg(long)]
    svg: bool,

    /// Do not emit the download confirmation
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn build_config(cli: &Cli) -> Result<StudioConfig> {
    let mut config = match &cli.config {
        Some(path) => StudioConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => StudioConfig::default(),
    };

    if let Some(text) = &cli.text {
        config.content = text.clone();
    }
    if let Some(fg) = &cli.fg {
        config.foreground = fg.clone();
    }
    if let Some(bg) = &cli.bg {
        config.background = bg.clone();
    }
    if let Some(size) = cli.size {
        config.size = request::snap_size(size);
    }
    if let Some(margin) = cli.margin {
        config.margin = margin;
    }
    if let Some(dir) = &cli.out_dir {
        config.output_dir = dir.clone();
    }
    if cli.quiet {
        config.notify = false;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    let studio = Studio::from_config(&config).context("invalid configuration")?;

    if cli.svg {
        match studio.preview_svg() {
            Some(svg) => println!("{}", svg),
            None => bail!(
                "no preview: {}",
                studio.render_error().unwrap_or("nothing rendered")
            ),
        }
        return Ok(());
    }

    match studio.download().await.context("export failed")? {
        Some(report) => {
            let location = report
                .location
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| report.filename.clone());
            println!(
                "{} ({}x{}, {} bytes, sha256 {})",
                location, report.width, report.height, report.png_len, report.sha256
            );
            Ok(())
        }
        None => bail!(
            "nothing exported: {}",
            studio.render_error().unwrap_or("no preview mounted")
        ),
    }
}
