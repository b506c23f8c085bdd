use anyhow::Result;
use camsync::config::{Args, Config};
use camsync::monitor::Monitor;
use camsync::s3::Uploader;
use clap::Parser;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::load(args)?;

    info!(
        "Starting camsync: directory={}, bucket={}",
        config.watch_dir.display(),
        config.bucket
    );

    let uploader = Uploader::new(&config).await?;
    let monitor = Monitor::new(config, uploader)?;

    monitor.run().await?;

    Ok(())
}
