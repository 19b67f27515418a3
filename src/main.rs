use anyhow::Context;
use log::info;

use shape_studio::{ShapeStudioApp, ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from_env();
    info!(
        "starting {} with assets from {}",
        config.title,
        config.asset_dir.display()
    );

    let app = ShapeStudioApp::new(config).context("failed to set up the event loop")?;
    app.run().context("shape studio stopped with an error")
}
