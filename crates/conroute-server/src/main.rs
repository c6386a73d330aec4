mod api;

use conroute::{Config, Engine};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load_default().unwrap_or_else(|e| {
        warn!(error = %e, "failed to load config, using defaults");
        Config::default()
    });

    let mut engine = Engine::with_config(config.engine.clone());
    engine.bind(&api::Site::new())?;

    info!("Registered {} routes", engine.routes().len());
    for route in engine.routes() {
        info!("  {:<7} {}", route.method, route.path);
    }

    engine.run(&config.address()).await?;
    Ok(())
}
