use crate::chain::{group_created_topic, ChainReceipt};
use ethers::types::{Address, U256};
use semaphore_types::TransactionResult;

pub fn to_transaction_result(receipt: &ChainReceipt) -> TransactionResult {
    TransactionResult {
        tx_hash: receipt.hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
        status: receipt.status,
    }
}

/// Group id carried by the `GroupCreated` event the contract emitted in this receipt.
pub fn created_group_id(receipt: &ChainReceipt, contract: Address) -> Option<U256> {
    let topic = group_created_topic();
    receipt
        .logs
        .iter()
        .filter(|log| log.address == contract)
        .find(|log| log.topics.first() == Some(&topic))
        .and_then(|log| log.topics.get(1))
        .map(|id| U256::from_big_endian(id.as_bytes()))
}
