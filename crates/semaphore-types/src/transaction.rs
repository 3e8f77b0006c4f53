use ethers::types::{H256, U256};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Reverted,
}

impl TxStatus {
    /// Maps the receipt status field; anything but `1` counts as reverted.
    pub fn from_receipt_status(status: Option<u64>) -> Self {
        match status {
            Some(1) => TxStatus::Success,
            _ => TxStatus::Reverted,
        }
    }

    pub fn is_reverted(&self) -> bool {
        *self == TxStatus::Reverted
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Success => write!(f, "success"),
            TxStatus::Reverted => write!(f, "reverted"),
        }
    }
}

/// Normalized outcome of a confirmed write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionResult {
    pub tx_hash: H256,
    pub block_number: u64,
    pub gas_used: U256,
    pub status: TxStatus,
}

impl TransactionResult {
    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }

    pub fn hash_hex(&self) -> String {
        format!("{:#x}", self.tx_hash)
    }
}
