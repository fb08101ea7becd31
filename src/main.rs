//! Standalone launcher binary: discovers plugins on `DEPLOY_ENGINE_PLUGIN_PATH`
//! (or the configured equivalent), launches them, brokers calls until asked
//! to stop, then shuts everything down in order.

mod cli;
mod config;
mod host;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use cli::Args;
use config::HostConfig;
use host::PluginHost;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = HostConfig::load(&args);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "plugin host exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: HostConfig) -> anyhow::Result<()> {
    let mut host = PluginHost::new(config);
    info!(host_id = host.identity().get().unwrap_or_default(), "starting plugin host");

    let outcome = host.launch().await?;
    info!(
        providers = outcome.maps.providers.len(),
        transformers = outcome.maps.transformers.len(),
        shadowed = outcome.report.shadowed.len(),
        invalid = outcome.report.invalid.len(),
        "launch complete"
    );
    host.track_handles(outcome.handles);

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "unable to listen for shutdown signal, shutting down anyway");
    } else {
        info!("received shutdown signal");
    }

    host.shutdown().await?;
    info!("plugin host stopped");
    Ok(())
}
