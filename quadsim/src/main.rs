use anyhow::Result;
use clap::Parser;
use tracing::info;

use quadsim::{apply_overrides, execute, load_config, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = apply_overrides(&args, load_config(args.config.as_deref())?);
    info!(?cfg, "Simulator config loaded");

    execute(&args, &cfg)
}
