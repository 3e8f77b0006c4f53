use super::api::ApiConfig;
use super::chain::ChainConfig;
use super::logging::LoggingConfig;
use super::types::{LogLevel, Network};
use semaphore_types::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "semaphore-gateway.toml";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub chain: ChainConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    pub fn read(path: impl AsRef<Path>) -> GatewayResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::Config(format!("Failed to read config: {}", e)))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> GatewayResult<Self> {
        toml::from_str(contents).map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn apply_env_overrides(&mut self) -> GatewayResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; a present but unparseable value is an error.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> GatewayResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup("NODE_ENV") {
            self.chain.network = parse_var("NODE_ENV", &env, Network::from_str)?;
        }

        if let Some(url) = lookup("RPC_URL") {
            self.chain.rpc_url = Some(url);
        }

        if let Some(key) = lookup("PRIVATE_KEY") {
            self.chain.private_key = key;
        }

        if let Some(address) = lookup("CONTRACT_ADDRESS") {
            self.chain.contract_address = address;
        }

        if let Some(id) = lookup("CHAIN_ID") {
            self.chain.chain_id = Some(parse_var("CHAIN_ID", &id, u64::from_str)?);
        }

        if let Some(n) = lookup("CONFIRMATIONS") {
            self.chain.confirmations = parse_var("CONFIRMATIONS", &n, usize::from_str)?;
        }

        if let Some(secs) = lookup("CONFIRMATION_TIMEOUT_SECS") {
            self.chain.confirmation_timeout_secs =
                parse_var("CONFIRMATION_TIMEOUT_SECS", &secs, u64::from_str)?;
        }

        if let Some(port) = lookup("PORT") {
            self.api.port = parse_var("PORT", &port, u16::from_str)?;
        }

        if let Some(host) = lookup("HOST") {
            self.api.bind_address = parse_var("HOST", &host, IpAddr::from_str)?;
        }

        if let Some(base) = lookup("API_BASE_PATH") {
            self.api.base_path = base;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = parse_var("LOG_LEVEL", &level, LogLevel::from_str)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> GatewayResult<()> {
        self.chain.validate()?;

        if self.api.port == 0 {
            return Err(GatewayError::Config("API port cannot be 0".into()));
        }

        let base = &self.api.base_path;
        if !base.starts_with('/') || base == "/" || base.ends_with('/') {
            return Err(GatewayError::Config(format!(
                "Base path must start with '/', not be '/', and have no trailing '/': {}",
                base
            )));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(GatewayError::Config("Request timeout must be positive".into()));
        }

        if self.api.max_body_size < 1024 {
            return Err(GatewayError::Config(
                "Max body size must be at least 1024 bytes".into(),
            ));
        }

        if self.api.request_timeout_secs <= self.chain.confirmation_timeout_secs {
            warn!(
                "Request timeout ({}s) does not exceed the confirmation timeout ({}s); writes may be cut off",
                self.api.request_timeout_secs, self.chain.confirmation_timeout_secs
            );
        }

        Ok(())
    }

    pub fn api_socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.api.bind_address, self.api.port)
    }

    pub fn redacted(&self) -> RedactedConfig {
        RedactedConfig {
            network: self.chain.network,
            chain_id: self.chain.chain_id(),
            rpc_url: self.chain.endpoint().to_string(),
            contract_address: self.chain.contract_address.clone(),
            private_key_set: !self.chain.private_key.is_empty(),
            confirmations: self.chain.confirmations,
            confirmation_timeout_secs: self.chain.confirmation_timeout_secs,
            api_addr: self.api_socket_addr(),
            base_path: self.api.base_path.clone(),
            request_timeout_secs: self.api.request_timeout_secs,
            cors_enabled: self.api.cors_enabled,
            log_level: self.logging.level,
            log_file: self.logging.file.clone(),
        }
    }
}

fn parse_var<T, E: std::fmt::Display>(
    name: &str,
    value: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> GatewayResult<T> {
    parse(value.trim()).map_err(|e| GatewayError::Config(format!("Invalid {} '{}': {}", name, value, e)))
}

#[derive(Debug)]
pub struct RedactedConfig {
    pub network: Network,
    pub chain_id: u64,
    pub rpc_url: String,
    pub contract_address: String,
    pub private_key_set: bool,
    pub confirmations: usize,
    pub confirmation_timeout_secs: u64,
    pub api_addr: SocketAddr,
    pub base_path: String,
    pub request_timeout_secs: u64,
    pub cors_enabled: bool,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
}

impl std::fmt::Display for RedactedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Semaphore Gateway Configuration")?;
        writeln!(f, "===============================")?;
        writeln!(f, "Network: {} ({}, chain {})", self.network, self.network.chain_name(), self.chain_id)?;
        writeln!(f, "RPC: {}", self.rpc_url)?;
        writeln!(f, "Contract: {}", self.contract_address)?;
        writeln!(f, "Private key: {}", if self.private_key_set { "<redacted>" } else { "<unset>" })?;
        writeln!(f, "Confirmations: {} (timeout {}s)", self.confirmations, self.confirmation_timeout_secs)?;
        writeln!(f, "API: http://{}{}", self.api_addr, self.base_path)?;
        writeln!(f, "Request timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "CORS: {}", if self.cors_enabled { "ON" } else { "OFF" })?;
        writeln!(f, "Log level: {}", self.log_level)?;
        if let Some(file) = &self.log_file {
            writeln!(f, "Log file: {:?}", file)?;
        }
        Ok(())
    }
}
