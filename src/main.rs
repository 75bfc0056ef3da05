use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fathom::{config::SceneConfig, FathomApp};

#[derive(Parser, Debug)]
#[command(name = "fathom")]
#[command(about = "Underwater 3D scene viewer with orbit, first-person and top-down cameras")]
struct Cli {
    /// Scene configuration (JSON). Defaults to the built-in scene.
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn,naga=warn"),
    )
    .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    if cli.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    log::info!("Assets resolved from {}", config.asset_root.display());
    FathomApp::new(config)?.run()
}
