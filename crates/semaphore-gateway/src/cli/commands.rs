use clap::{Parser, Subcommand};
use semaphore_gateway::config::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "semaphore-gateway")]
#[command(version = BUILD_VERSION)]
#[command(about = "REST gateway for the Semaphore group-membership contract")]
#[command(long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE, help = "Path to config file")]
    pub config: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Write logs to file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the gateway (default)")]
    Run,

    #[command(about = "Print the effective configuration with secrets redacted")]
    Config,

    #[command(about = "Connect to the chain and report account and contract state")]
    Check,
}
