use super::commands::Cli;
use semaphore_gateway::config::LoggingConfig;
use semaphore_types::{GatewayError, GatewayResult};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` wins, then CLI verbosity, then the configured level.
fn filter_directive(cli: &Cli, config: &LoggingConfig) -> String {
    if cli.quiet {
        return "warn".to_string();
    }
    match cli.verbose {
        0 => config.level.to_string(),
        1 => "info,semaphore_gateway=debug".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

pub fn init_logging(cli: &Cli, config: &LoggingConfig) -> GatewayResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(cli, config)));

    let log_file = cli.log_file.as_ref().or(config.file.as_ref());
    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| GatewayError::Config(format!("Failed to open log file {:?}: {}", path, e)))?;
            (BoxMakeWriter::new(std::sync::Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stdout), true),
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if cli.json_logs || config.json {
        registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(ansi)
                    .with_target(cli.verbose >= 2),
            )
            .try_init()
    };

    result.map_err(|e| GatewayError::Config(format!("Failed to initialize logging: {}", e)))
}

pub fn status_line(label: &str, outcome: Result<String, String>) -> bool {
    match outcome {
        Ok(detail) => {
            println!("{:<18} \x1b[38;5;46mOK\x1b[0m  {}", label, detail);
            true
        }
        Err(e) => {
            println!("{:<18} \x1b[38;5;196mFAIL\x1b[0m  {}", label, e);
            false
        }
    }
}
