#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod chain;
pub mod config;
pub mod semaphore;

pub use api::{router, ApiServer, AppState};
pub use chain::{ChainClient, ContractCall, EthersChainClient, StubChainClient};
pub use config::{ApiConfig, ChainConfig, GatewayConfig, LoggingConfig};
pub use semaphore::SemaphoreService;
