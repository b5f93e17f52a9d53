//! Stepwise Visualization Server
//!
//! Serves the sorting and pathfinding visualizers. Configured through
//! `STEPWISE_*` environment variables, see [`VisConfig`].

use stepwise_vis::{VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepwise_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = VisConfig::from_env()?;
    tracing::info!(
        addr = %config.api_addr,
        array_size = config.array_size,
        rows = config.grid_rows,
        cols = config.grid_cols,
        "Starting stepwise visualizer"
    );

    let server = VisServer::new(&config)?;
    server.serve().await?;

    Ok(())
}
