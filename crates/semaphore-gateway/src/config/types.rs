use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Deployment environment, selecting the default chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Development,
    Production,
    Test,
}

impl Network {
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Development => 11_155_420,
            Network::Production => 10,
            Network::Test => 31_337,
        }
    }

    pub fn chain_name(&self) -> &'static str {
        match self {
            Network::Development => "Optimism Sepolia",
            Network::Production => "Optimism",
            Network::Test => "Local",
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Development => "https://sepolia.optimism.io",
            Network::Production => "https://mainnet.optimism.io",
            Network::Test => "http://127.0.0.1:8545",
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Network::Development),
            "production" | "prod" => Ok(Network::Production),
            "test" => Ok(Network::Test),
            other => Err(format!("Unknown network '{}'", other)),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Development => write!(f, "development"),
            Network::Production => write!(f, "production"),
            Network::Test => write!(f, "test"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("Unknown log level '{}'", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}
