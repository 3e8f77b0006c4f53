mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{init_logging, run_checks, run_gateway, show_config, Cli, Commands};
use semaphore_gateway::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = GatewayConfig::read(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    config
        .apply_env_overrides()
        .context("applying environment overrides")?;

    init_logging(&cli, &config.logging)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_gateway(config).await?,
        Commands::Config => show_config(&config)?,
        Commands::Check => run_checks(&config).await?,
    }

    Ok(())
}
