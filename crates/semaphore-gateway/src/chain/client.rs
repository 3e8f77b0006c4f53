use super::abi::{find_function, semaphore_abi};
use super::{ChainClient, ChainReceipt, ContractCall, PendingTx, ReceiptLog};
use crate::config::ChainConfig;
use async_trait::async_trait;
use ethers::{
    abi::{Abi, Token},
    middleware::SignerMiddleware,
    providers::{Http, Middleware, MiddlewareError, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{transaction::eip2718::TypedTransaction, Address, TransactionReceipt, TransactionRequest, U256},
};
use semaphore_types::{GatewayError, GatewayResult, TxStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct EthersChainClient {
    provider: Arc<Provider<Http>>,
    signer: Arc<SignerMiddleware<Provider<Http>, LocalWallet>>,
    abi: Abi,
    account: Address,
    contract: Address,
    chain_id: u64,
    confirmations: usize,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl EthersChainClient {
    pub async fn connect(config: &ChainConfig) -> GatewayResult<Self> {
        let chain_id = config.chain_id();
        let contract = config.contract_address()?;
        let poll_interval = Duration::from_millis(config.poll_interval_ms);

        info!("Connecting to RPC: {}", config.endpoint());

        let provider = Provider::<Http>::try_from(config.endpoint())
            .map_err(|e| GatewayError::Config(format!("Failed to create provider: {}", e)))?
            .interval(poll_interval);

        let remote_chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| GatewayError::Transport(format!("Failed to get chain ID: {}", e)))?;

        if remote_chain_id.as_u64() != chain_id {
            return Err(GatewayError::Config(format!(
                "Chain ID mismatch: expected {}, got {}",
                chain_id, remote_chain_id
            )));
        }

        let wallet: LocalWallet = config
            .private_key
            .parse()
            .map_err(|e| GatewayError::Config(format!("Invalid private key: {}", e)))?;
        let wallet = wallet.with_chain_id(chain_id);
        let account = wallet.address();

        let signer = SignerMiddleware::new(provider.clone(), wallet);

        info!("Connected to chain {} as {:?}, contract {:?}", chain_id, account, contract);

        Ok(Self {
            provider: Arc::new(provider),
            signer: Arc::new(signer),
            abi: semaphore_abi()?,
            account,
            contract,
            chain_id,
            confirmations: config.confirmations,
            confirmation_timeout: Duration::from_secs(config.confirmation_timeout_secs),
            poll_interval,
        })
    }

    fn encode(&self, call: &ContractCall) -> GatewayResult<Vec<u8>> {
        find_function(&self.abi, call.signature)?
            .encode_input(&call.args)
            .map_err(|e| GatewayError::Internal(format!("Failed to encode {}: {}", call.signature, e)))
    }
}

#[async_trait]
impl ChainClient for EthersChainClient {
    fn account(&self) -> Address {
        self.account
    }

    fn contract_address(&self) -> Address {
        self.contract
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn read(&self, call: &ContractCall) -> GatewayResult<Vec<Token>> {
        let function = find_function(&self.abi, call.signature)?;
        let data = self.encode(call)?;

        let tx: TypedTransaction = TransactionRequest::new()
            .from(self.account)
            .to(self.contract)
            .data(data)
            .into();

        debug!("eth_call {}", call.signature);
        let output = self
            .provider
            .call(&tx, None)
            .await
            .map_err(|e| classify(call.name(), e))?;

        function
            .decode_output(output.as_ref())
            .map_err(|e| GatewayError::Decode(format!("Failed to decode {} result: {}", call.signature, e)))
    }

    async fn write(&self, call: &ContractCall, value: Option<U256>) -> GatewayResult<PendingTx> {
        let data = self.encode(call)?;

        let mut request = TransactionRequest::new().to(self.contract).data(data);
        if let Some(value) = value {
            request = request.value(value);
        }

        let pending = self
            .signer
            .send_transaction(request, None)
            .await
            .map_err(|e| classify(call.name(), e))?;
        let hash = *pending;

        info!("Submitted {}: {:#x}", call.signature, hash);
        Ok(PendingTx { hash })
    }

    async fn wait_for_confirmation(&self, pending: PendingTx) -> GatewayResult<ChainReceipt> {
        let watcher = PendingTransaction::new(pending.hash, self.provider.as_ref())
            .confirmations(self.confirmations)
            .interval(self.poll_interval);

        let receipt = match tokio::time::timeout(self.confirmation_timeout, watcher).await {
            Ok(Ok(Some(receipt))) => receipt,
            Ok(Ok(None)) => {
                return Err(GatewayError::Transport(format!(
                    "Transaction {:#x} was dropped from the mempool",
                    pending.hash
                )))
            }
            Ok(Err(e)) => {
                return Err(GatewayError::Transport(format!(
                    "Failed to confirm transaction {:#x}: {}",
                    pending.hash, e
                )))
            }
            Err(_) => {
                warn!("Confirmation timed out for {:#x}", pending.hash);
                return Err(GatewayError::Timeout(format!(
                    "Transaction {:#x} not confirmed within {}s, it may still be mined",
                    pending.hash,
                    self.confirmation_timeout.as_secs()
                )));
            }
        };

        Ok(to_chain_receipt(receipt))
    }

    async fn get_balance(&self, address: Option<Address>) -> GatewayResult<U256> {
        let address = address.unwrap_or(self.account);
        self.provider
            .get_balance(address, None)
            .await
            .map_err(|e| GatewayError::Transport(format!("Failed to get balance: {}", e)))
    }

    async fn get_block_number(&self) -> GatewayResult<u64> {
        self.provider
            .get_block_number()
            .await
            .map(|n| n.as_u64())
            .map_err(|e| GatewayError::Transport(format!("Failed to get block number: {}", e)))
    }
}

/// JSON-RPC errors that carry a revert become `Reverted`; everything else is transport.
fn classify<E: MiddlewareError>(context: &str, err: E) -> GatewayError {
    if let Some(rpc) = err.as_error_response() {
        if rpc.message.to_lowercase().contains("revert") {
            return GatewayError::Reverted(rpc.message.clone());
        }
    }
    GatewayError::Transport(format!("{} failed: {}", context, err))
}

fn to_chain_receipt(receipt: TransactionReceipt) -> ChainReceipt {
    ChainReceipt {
        hash: receipt.transaction_hash,
        block_number: receipt.block_number.map(|n| n.as_u64()).unwrap_or_default(),
        gas_used: receipt.gas_used.unwrap_or_default(),
        status: TxStatus::from_receipt_status(receipt.status.map(|s| s.as_u64())),
        logs: receipt
            .logs
            .into_iter()
            .map(|log| ReceiptLog {
                address: log.address,
                topics: log.topics,
                data: log.data,
            })
            .collect(),
    }
}
