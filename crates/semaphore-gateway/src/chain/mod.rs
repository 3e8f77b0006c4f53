mod abi;
mod client;
mod stub;

pub use abi::*;
pub use client::EthersChainClient;
pub use stub::{RecordedCall, StubChainClient, StubFailure, STUB_CHAIN_ID};

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, Bytes, H256, U256};
use semaphore_types::{GatewayResult, TxStatus};

/// A contract function selected by its canonical signature, with ABI-ordered arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct ContractCall {
    pub signature: &'static str,
    pub args: Vec<Token>,
}

impl ContractCall {
    pub fn new(signature: &'static str, args: Vec<Token>) -> Self {
        Self { signature, args }
    }

    pub fn name(&self) -> &'static str {
        self.signature.split('(').next().unwrap_or(self.signature)
    }
}

/// Handle to a submitted, not yet confirmed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingTx {
    pub hash: H256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<H256>,
    pub data: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainReceipt {
    pub hash: H256,
    pub block_number: u64,
    pub gas_used: U256,
    pub status: TxStatus,
    pub logs: Vec<ReceiptLog>,
}

/// Everything the gateway needs from a node: reads, signed writes and confirmations.
#[async_trait]
pub trait ChainClient: Send + Sync {
    fn account(&self) -> Address;

    fn contract_address(&self) -> Address;

    fn chain_id(&self) -> u64;

    async fn read(&self, call: &ContractCall) -> GatewayResult<Vec<Token>>;

    async fn write(&self, call: &ContractCall, value: Option<U256>) -> GatewayResult<PendingTx>;

    async fn wait_for_confirmation(&self, pending: PendingTx) -> GatewayResult<ChainReceipt>;

    /// Balance of `address`, or of the signer when `None`.
    async fn get_balance(&self, address: Option<Address>) -> GatewayResult<U256>;

    async fn get_block_number(&self) -> GatewayResult<u64>;
}
