use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use afm_bridge::cli::{self, Cli, Outcome};
use afm_bridge::config::Config;

fn main() -> anyhow::Result<ExitCode> {
    // Load .env early; ignore if missing.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_required(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    init_logging(cli.verbose, &config);

    let stdout = std::io::stdout();
    match cli::run(&cli, &config, &mut stdout.lock())? {
        Outcome::Success => Ok(ExitCode::SUCCESS),
        Outcome::Mismatch => Ok(ExitCode::FAILURE),
    }
}

/// `-v`/`-vv` win over `AFMB_LOG`, which wins over the config file.
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(cli::LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        1 => EnvFilter::new("afm_bridge=debug"),
        _ => EnvFilter::new("afm_bridge=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
