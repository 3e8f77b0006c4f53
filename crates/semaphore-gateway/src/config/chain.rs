use super::types::Network;
use ethers::types::Address;
use semaphore_types::{GatewayError, GatewayResult, HexAddress};
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub network: Network,
    /// Falls back to the network's public endpoint when unset.
    pub rpc_url: Option<String>,
    #[serde(skip_serializing)]
    pub private_key: String,
    pub contract_address: String,
    /// Overrides the network's chain id.
    pub chain_id: Option<u64>,
    pub confirmations: usize,
    pub confirmation_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            rpc_url: None,
            private_key: String::new(),
            contract_address: String::new(),
            chain_id: None,
            confirmations: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 1_000,
        }
    }
}

impl ChainConfig {
    pub fn chain_id(&self) -> u64 {
        self.chain_id.unwrap_or_else(|| self.network.chain_id())
    }

    pub fn endpoint(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_rpc_url())
    }

    pub fn contract_address(&self) -> GatewayResult<Address> {
        let address = HexAddress::parse(&self.contract_address)
            .map_err(|e| GatewayError::Config(format!("Invalid contract address: {}", e)))?;
        if address.is_zero() {
            return Err(GatewayError::Config("Contract address cannot be zero".into()));
        }
        Ok(address.address())
    }

    pub fn validate(&self) -> GatewayResult<()> {
        let endpoint = self.endpoint();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(GatewayError::Config(format!(
                "RPC URL must be http(s): {}",
                endpoint
            )));
        }

        let key = self
            .private_key
            .strip_prefix("0x")
            .ok_or_else(|| GatewayError::Config("Private key must start with 0x".into()))?;
        if key.len() != 64 || hex::decode(key).is_err() {
            return Err(GatewayError::Config(
                "Private key must be 0x followed by 64 hex characters".into(),
            ));
        }

        self.contract_address()?;

        if self.chain_id == Some(0) {
            return Err(GatewayError::Config("Chain ID cannot be 0".into()));
        }

        if self.confirmations == 0 {
            return Err(GatewayError::Config("Confirmations must be at least 1".into()));
        }

        if self.confirmation_timeout_secs == 0 {
            return Err(GatewayError::Config(
                "Confirmation timeout must be positive".into(),
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(GatewayError::Config("Poll interval must be positive".into()));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ChainConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainConfig")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("contract_address", &self.contract_address)
            .field("chain_id", &self.chain_id)
            .field("confirmations", &self.confirmations)
            .field("confirmation_timeout_secs", &self.confirmation_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}
