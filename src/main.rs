mod app;
mod input;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use petopia::config::{default_log_path, default_settings_path, load_settings, ConfigError};
use petopia::Species;
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "petopia")]
#[command(about = "A magical pet journey in your terminal")]
struct Args {
    /// settings file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed, 0 = random
    #[arg(long)]
    seed: Option<u64>,

    /// divide every interval and the feed cooldown by this factor
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// monochrome output
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// write a log file to the data dir (RUST_LOG filters it)
    #[arg(long, default_value_t = false)]
    log: bool,

    /// adopt this pet right away: Dinno, Monkey or Hippo
    #[arg(long)]
    pet: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.log {
        init_logging(&default_log_path()?)?;
    }

    let settings_path = settings_path(args.config.clone(), default_settings_path)?;
    let mut settings = load_settings(&settings_path);
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if args.no_color {
        settings.enable_color = false;
    }
    let settings = settings.time_scaled(args.time_scale)?;
    let rules = settings
        .rules()
        .with_context(|| format!("invalid settings in {}", settings_path.display()))?;

    let species = match args.pet.as_deref() {
        Some(name) => {
            Some(Species::from_name(name).with_context(|| format!("unknown pet '{name}'"))?)
        }
        None => None,
    };

    app::run(settings, rules, species)
}

/// An explicit `--config` wins; the platform default is only resolved without one.
fn settings_path(
    explicit: Option<PathBuf>,
    fallback: impl FnOnce() -> Result<PathBuf, ConfigError>,
) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path),
        None => fallback(),
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}
