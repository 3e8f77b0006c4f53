use super::utils::status_line;
use ethers::utils::format_ether;
use semaphore_gateway::{ChainClient, EthersChainClient, GatewayConfig, SemaphoreService};
use semaphore_types::{GatewayError, GatewayResult};
use std::sync::Arc;

pub async fn run_checks(config: &GatewayConfig) -> GatewayResult<()> {
    println!("\x1b[38;5;46mSemaphore Gateway Diagnostics\x1b[0m");
    println!("\x1b[38;5;245m{}\x1b[0m", "═".repeat(50));

    let mut failed = 0;

    if !status_line("Configuration", config.validate().map(|_| "valid".to_string()).map_err(|e| e.to_string())) {
        return Err(GatewayError::Config("Configuration is invalid".into()));
    }

    let client = match EthersChainClient::connect(&config.chain).await {
        Ok(client) => {
            status_line("RPC", Ok(format!("{} (chain {})", config.chain.endpoint(), client.chain_id())));
            Arc::new(client)
        }
        Err(e) => {
            status_line("RPC", Err(e.to_string()));
            return Err(e);
        }
    };
    let service = SemaphoreService::new(client);

    let account = service.account_overview().await;
    if !status_line(
        "Signer",
        account
            .as_ref()
            .map(|a| format!("{} ({} ETH, block {})", a.address, format_ether(a.balance), a.block_number))
            .map_err(|e| e.to_string()),
    ) {
        failed += 1;
    }

    let counter = service.group_counter().await;
    if !status_line(
        "Group counter",
        counter.map(|c| c.to_string()).map_err(|e| e.to_string()),
    ) {
        failed += 1;
    }

    let verifier = service.verifier().await;
    if !status_line(
        "Verifier",
        verifier.map(|v| v.to_string()).map_err(|e| e.to_string()),
    ) {
        failed += 1;
    }

    println!();
    if failed > 0 {
        return Err(GatewayError::Transport(format!("{} check(s) failed", failed)));
    }
    println!("All checks passed");
    Ok(())
}
