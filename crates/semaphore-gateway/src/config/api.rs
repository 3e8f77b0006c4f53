use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

pub const DEFAULT_API_PORT: u16 = 3000;
pub const DEFAULT_BASE_PATH: &str = "/api/v1/semaphore";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    pub base_path: String,
    pub request_timeout_secs: u64,
    pub max_body_size: usize,
    pub cors_enabled: bool,
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_API_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
            request_timeout_secs: 180,
            max_body_size: 1024 * 1024,
            cors_enabled: true,
            cors_origins: vec![],
        }
    }
}
