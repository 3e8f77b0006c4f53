use super::abi::{find_function, group_created_topic, semaphore_abi, GROUP_COUNTER};
use super::{ChainClient, ChainReceipt, ContractCall, PendingTx, ReceiptLog};
use async_trait::async_trait;
use ethers::abi::{ParamType, Token};
use ethers::types::{Address, Bytes, H256, U256};
use parking_lot::Mutex;
use semaphore_types::{GatewayError, GatewayResult, TxStatus};
use std::collections::HashMap;
use std::time::Duration;

pub const STUB_CHAIN_ID: u64 = 31337;
const STUB_GAS_USED: u64 = 84_000;

/// Failure a stub operation should produce instead of its normal result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StubFailure {
    Transport(String),
    Reverted(String),
    Timeout,
}

impl StubFailure {
    fn to_error(&self, context: &str) -> GatewayError {
        match self {
            StubFailure::Transport(msg) => GatewayError::Transport(format!("{} failed: {}", context, msg)),
            StubFailure::Reverted(reason) => GatewayError::Reverted(reason.clone()),
            StubFailure::Timeout => GatewayError::Timeout(format!("{} not confirmed in time", context)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RecordedCall {
    Read(ContractCall),
    Write(ContractCall),
}

struct StubState {
    calls: Vec<RecordedCall>,
    reads: HashMap<&'static str, Vec<Token>>,
    read_failure: Option<StubFailure>,
    write_failure: Option<StubFailure>,
    confirm_failure: Option<StubFailure>,
    confirm_delay: Option<Duration>,
    revert_writes: bool,
    emit_group_created: bool,
    group_counter: U256,
    block_number: u64,
    nonce: u64,
    pending: HashMap<H256, ChainReceipt>,
}

/// In-memory chain that confirms every write immediately.
///
/// Calls are checked against the Semaphore ABI and recorded so tests can
/// assert on the exact signature and argument order that was dispatched.
/// Unscripted reads return zero values of the function's output types,
/// except `groupCounter()` which tracks the groups created so far.
pub struct StubChainClient {
    account: Address,
    contract: Address,
    state: Mutex<StubState>,
}

impl Default for StubChainClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StubChainClient {
    pub fn new() -> Self {
        Self {
            account: Address::from_low_u64_be(0xa11ce),
            contract: Address::from_low_u64_be(0x5e3a),
            state: Mutex::new(StubState {
                calls: Vec::new(),
                reads: HashMap::new(),
                read_failure: None,
                write_failure: None,
                confirm_failure: None,
                confirm_delay: None,
                revert_writes: false,
                emit_group_created: true,
                group_counter: U256::zero(),
                block_number: 100,
                nonce: 0,
                pending: HashMap::new(),
            }),
        }
    }

    pub fn with_read(self, signature: &'static str, tokens: Vec<Token>) -> Self {
        self.set_read(signature, tokens);
        self
    }

    pub fn set_read(&self, signature: &'static str, tokens: Vec<Token>) {
        self.state.lock().reads.insert(signature, tokens);
    }

    pub fn fail_reads(&self, failure: StubFailure) {
        self.state.lock().read_failure = Some(failure);
    }

    pub fn fail_writes(&self, failure: StubFailure) {
        self.state.lock().write_failure = Some(failure);
    }

    pub fn fail_confirmations(&self, failure: StubFailure) {
        self.state.lock().confirm_failure = Some(failure);
    }

    /// Hold every confirmation for `delay` before answering.
    pub fn delay_confirmations(&self, delay: Duration) {
        self.state.lock().confirm_delay = Some(delay);
    }

    /// Confirm writes with a reverted receipt.
    pub fn revert_writes(&self, revert: bool) {
        self.state.lock().revert_writes = revert;
    }

    pub fn omit_group_created_event(&self) {
        self.state.lock().emit_group_created = false;
    }

    pub fn set_group_counter(&self, counter: U256) {
        self.state.lock().group_counter = counter;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn writes(&self) -> Vec<ContractCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Write(call) => Some(call.clone()),
                RecordedCall::Read(_) => None,
            })
            .collect()
    }

    pub fn reads(&self) -> Vec<ContractCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Read(call) => Some(call.clone()),
                RecordedCall::Write(_) => None,
            })
            .collect()
    }

    fn check_encodes(call: &ContractCall) -> GatewayResult<Vec<ParamType>> {
        let abi = semaphore_abi()?;
        let function = find_function(&abi, call.signature)?;
        function
            .encode_input(&call.args)
            .map_err(|e| GatewayError::Internal(format!("Failed to encode {}: {}", call.signature, e)))?;
        Ok(function.outputs.iter().map(|p| p.kind.clone()).collect())
    }
}

fn zero_token(kind: &ParamType) -> Token {
    match kind {
        ParamType::Bool => Token::Bool(false),
        ParamType::Address => Token::Address(Address::zero()),
        _ => Token::Uint(U256::zero()),
    }
}

fn topic_from_uint(value: U256) -> H256 {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    H256::from(buf)
}

#[async_trait]
impl ChainClient for StubChainClient {
    fn account(&self) -> Address {
        self.account
    }

    fn contract_address(&self) -> Address {
        self.contract
    }

    fn chain_id(&self) -> u64 {
        STUB_CHAIN_ID
    }

    async fn read(&self, call: &ContractCall) -> GatewayResult<Vec<Token>> {
        let outputs = Self::check_encodes(call)?;

        let mut state = self.state.lock();
        state.calls.push(RecordedCall::Read(call.clone()));

        if let Some(failure) = &state.read_failure {
            return Err(failure.to_error(call.name()));
        }
        if let Some(tokens) = state.reads.get(call.signature) {
            return Ok(tokens.clone());
        }
        if call.signature == GROUP_COUNTER {
            return Ok(vec![Token::Uint(state.group_counter)]);
        }
        Ok(outputs.iter().map(zero_token).collect())
    }

    async fn write(&self, call: &ContractCall, _value: Option<U256>) -> GatewayResult<PendingTx> {
        Self::check_encodes(call)?;

        let mut state = self.state.lock();
        state.calls.push(RecordedCall::Write(call.clone()));

        if let Some(failure) = &state.write_failure {
            return Err(failure.to_error(call.name()));
        }

        state.nonce += 1;
        state.block_number += 1;
        let hash = H256::from_low_u64_be(state.nonce);

        let status = if state.revert_writes {
            TxStatus::Reverted
        } else {
            TxStatus::Success
        };

        let mut logs = Vec::new();
        if call.name() == "createGroup" && status == TxStatus::Success {
            let group_id = state.group_counter;
            state.group_counter = group_id + 1;
            if state.emit_group_created {
                logs.push(ReceiptLog {
                    address: self.contract,
                    topics: vec![group_created_topic(), topic_from_uint(group_id)],
                    data: Bytes::default(),
                });
            }
        }

        let receipt = ChainReceipt {
            hash,
            block_number: state.block_number,
            gas_used: U256::from(STUB_GAS_USED),
            status,
            logs,
        };
        state.pending.insert(hash, receipt);

        Ok(PendingTx { hash })
    }

    async fn wait_for_confirmation(&self, pending: PendingTx) -> GatewayResult<ChainReceipt> {
        let delay = self.state.lock().confirm_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        if let Some(failure) = &state.confirm_failure {
            return Err(failure.to_error(&format!("Transaction {:#x}", pending.hash)));
        }
        state
            .pending
            .remove(&pending.hash)
            .ok_or_else(|| GatewayError::Transport(format!("Unknown transaction {:#x}", pending.hash)))
    }

    async fn get_balance(&self, _address: Option<Address>) -> GatewayResult<U256> {
        if let Some(failure) = &self.state.lock().read_failure {
            return Err(failure.to_error("getBalance"));
        }
        Ok(U256::exp10(18))
    }

    async fn get_block_number(&self) -> GatewayResult<u64> {
        let state = self.state.lock();
        if let Some(failure) = &state.read_failure {
            return Err(failure.to_error("getBlockNumber"));
        }
        Ok(state.block_number)
    }
}
