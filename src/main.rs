use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use bird_flop::{GameConfig, app};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML config file (defaults to ./bird-flop.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// seed for the pipe layout
    #[arg(long)]
    seed: Option<u64>,

    /// frames per second, overrides the config
    #[arg(long)]
    fps: Option<u32>,

    /// disable sound
    #[arg(long)]
    mute: bool,

    /// write logs to this file (stdout is the game screen)
    #[arg(long)]
    log: Option<PathBuf>,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let mut config = GameConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(fps) = args.fps {
        config.host.fps = fps;
        config.validate().context("invalid --fps")?;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    app::run(config, seed, args.mute).context("game loop failed")
}
