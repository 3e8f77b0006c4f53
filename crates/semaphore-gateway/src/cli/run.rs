use semaphore_gateway::{ApiServer, EthersChainClient, GatewayConfig, SemaphoreService};
use semaphore_types::GatewayResult;
use std::sync::Arc;
use tracing::{error, info, warn};

pub async fn run_gateway(config: GatewayConfig) -> GatewayResult<()> {
    config.validate()?;
    info!("Starting Semaphore gateway v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Network: {} (chain {})",
        config.chain.network,
        config.chain.chain_id()
    );

    let client = EthersChainClient::connect(&config.chain).await?;
    let service = SemaphoreService::new(Arc::new(client));

    let server = ApiServer::new(config.api.clone(), service);
    info!("Serving on {}", server.addr());
    server.serve(wait_for_shutdown()).await?;

    info!("Shutdown complete");
    Ok(())
}

pub async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => { info!("Received SIGTERM"); }
                    _ = sigint.recv() => { info!("Received SIGINT"); }
                }
                return;
            }
            _ => warn!("Failed to install signal handlers, falling back to Ctrl+C"),
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C"),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
