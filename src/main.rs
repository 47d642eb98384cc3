use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resume_page::{SiteConfig, SmokeTest};

#[derive(Parser)]
#[command(name = "resume-smoke")]
#[command(author, version, about = "Smoke test for the resume page")]
struct Cli {
    /// Page to load
    #[arg(default_value = "site/index.html")]
    page: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fake time to wait before checking, in milliseconds
    #[arg(long)]
    wait_ms: Option<i64>,

    /// Viewport size, e.g. 1280x720
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<(f64, f64)>,

    /// Scroll offset to visit after the wait (repeatable)
    #[arg(long = "scroll")]
    scroll: Vec<f64>,
}

fn parse_viewport(raw: &str) -> std::result::Result<(f64, f64), String> {
    let (width, height) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw}"))?;
    let width = width
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid width {width}: {e}"))?;
    let height = height
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid height {height}: {e}"))?;
    Ok((width, height))
}

fn run(cli: Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SiteConfig::default(),
    };
    if let Some(wait_ms) = cli.wait_ms {
        config.smoke.wait_ms = wait_ms;
    }
    if let Some((width, height)) = cli.viewport {
        config.viewport.width = width;
        config.viewport.height = height;
    }
    if !cli.scroll.is_empty() {
        config.smoke.scroll_steps = cli.scroll;
    }
    config.validate()?;

    tracing::info!("starting smoke test of {}", cli.page.display());
    let report = SmokeTest::new(config)
        .run_file(&cli.page)
        .with_context(|| format!("failed to load {}", cli.page.display()))?;
    report.log();
    Ok(report.passed())
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("test failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}
