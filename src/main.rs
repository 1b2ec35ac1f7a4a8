use std::path::PathBuf;
use std::process::ExitCode;

use chaosviz::{ViewerConfig, ViewerError};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "chaosviz",
    version,
    about = "Interactive Lorenz attractor viewer"
)]
struct Cli {
    /// JSON config file; unspecified fields use defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// History length kept per trajectory.
    #[arg(long)]
    max_points: Option<usize>,

    /// Seed for spawn jitter, for reproducible runs.
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Write the effective config to this path and exit.
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chaosviz=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn resolve_config(cli: &Cli) -> Result<ViewerConfig, ViewerError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            ViewerConfig::load(path)?
        }
        None => ViewerConfig::default(),
    };
    if let Some(max_points) = cli.max_points {
        config.max_points = max_points;
    }
    if cli.rng_seed.is_some() {
        config.rng_seed = cli.rng_seed;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = resolve_config(&cli).and_then(|config| match &cli.write_config {
        Some(path) => {
            config.save(path)?;
            tracing::info!(path = %path.display(), "config written");
            Ok(())
        }
        None => chaosviz::run(config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
