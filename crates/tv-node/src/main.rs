//! TrustVote node entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use tv_node::{NodeConfig, NodeRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    tv_telemetry::init_telemetry(&config.telemetry).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  TrustVote Node v{}", env!("CARGO_PKG_VERSION"));
    info!("  Environment: {}", config.env().as_str());
    info!("===========================================");

    let runtime = Arc::new(NodeRuntime::new(config));
    runtime.start();

    let mut server = {
        let runtime = Arc::clone(&runtime);
        tokio::spawn(async move { runtime.serve().await })
    };

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
        }
        result = &mut server => {
            // Server stopped on its own: bind failure or fatal error
            match result {
                Ok(Err(e)) => error!(error = %e, "HTTP server stopped"),
                Err(e) => error!(error = %e, "HTTP server task panicked"),
                Ok(Ok(())) => {}
            }
            runtime.shutdown().await;
            anyhow::bail!("HTTP server exited unexpectedly");
        }
    }

    runtime.shutdown().await;
    server.await.context("HTTP server task panicked")??;

    Ok(())
}
