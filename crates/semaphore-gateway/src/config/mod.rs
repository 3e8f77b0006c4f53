mod api;
mod chain;
mod gateway;
mod logging;
mod types;

pub use api::{ApiConfig, DEFAULT_API_PORT, DEFAULT_BASE_PATH};
pub use chain::ChainConfig;
pub use gateway::{GatewayConfig, RedactedConfig, DEFAULT_CONFIG_FILE};
pub use logging::LoggingConfig;
pub use types::*;
