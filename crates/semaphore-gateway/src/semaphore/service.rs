use super::calls;
use super::receipt::{created_group_id, to_transaction_result};
use crate::chain::{
    ChainClient, ChainReceipt, ContractCall, GET_GROUP_ADMIN, GET_MERKLE_TREE_DEPTH, GET_MERKLE_TREE_ROOT,
    GET_MERKLE_TREE_SIZE, GROUPS,
};
use ethers::abi::Token;
use ethers::types::{Address, U256};
use semaphore_types::{
    AddMemberRequest, AddMembersRequest, CreateGroupRequest, GatewayError, GatewayResult,
    GroupInfo, HexAddress, MemberQuery, ProofRequest, RemoveMemberRequest, TransactionResult,
    UpdateGroupAdminRequest, UpdateMemberRequest, UpdateMerkleTreeDurationRequest,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedGroup {
    pub group_id: U256,
    pub transaction: TransactionResult,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountOverview {
    pub address: HexAddress,
    pub balance: U256,
    pub block_number: u64,
    pub chain_id: u64,
    pub contract: HexAddress,
}

/// Semaphore operations over a shared chain client.
///
/// Writes submit, wait for confirmation and normalize the receipt. A receipt
/// with a reverted status is returned as a result, not an error, except for
/// `create_group` where no group id can be produced.
#[derive(Clone)]
pub struct SemaphoreService {
    chain: Arc<dyn ChainClient>,
}

impl SemaphoreService {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    async fn submit(&self, call: ContractCall) -> GatewayResult<ChainReceipt> {
        info!("Submitting {}", call.signature);

        let pending = self.chain.write(&call, None).await.map_err(|e| {
            warn!("{} rejected: {}", call.signature, e);
            e
        })?;
        let receipt = self.chain.wait_for_confirmation(pending).await?;

        if receipt.status.is_reverted() {
            warn!("{} reverted on-chain in block {}: {:#x}", call.name(), receipt.block_number, receipt.hash);
        } else {
            info!("{} confirmed in block {}: {:#x}", call.name(), receipt.block_number, receipt.hash);
        }
        Ok(receipt)
    }

    async fn execute(&self, call: ContractCall) -> GatewayResult<TransactionResult> {
        let receipt = self.submit(call).await?;
        Ok(to_transaction_result(&receipt))
    }

    pub async fn create_group(&self, req: &CreateGroupRequest) -> GatewayResult<CreatedGroup> {
        let call = calls::create_group(req)?;
        let receipt = self.submit(call).await?;

        if receipt.status.is_reverted() {
            return Err(GatewayError::domain(500, "Failed to create group"));
        }

        let group_id = created_group_id(&receipt, self.chain.contract_address()).ok_or_else(|| {
            GatewayError::domain(
                500,
                format!("Group creation event missing from transaction {:#x}", receipt.hash),
            )
        })?;

        info!("Created group {}", group_id);
        Ok(CreatedGroup {
            group_id,
            transaction: to_transaction_result(&receipt),
        })
    }

    pub async fn accept_group_admin(&self, group_id: U256) -> GatewayResult<TransactionResult> {
        self.execute(calls::accept_group_admin(group_id)).await
    }

    pub async fn update_group_admin(&self, req: &UpdateGroupAdminRequest) -> GatewayResult<TransactionResult> {
        self.execute(calls::update_group_admin(req)).await
    }

    pub async fn update_merkle_tree_duration(
        &self,
        req: &UpdateMerkleTreeDurationRequest,
    ) -> GatewayResult<TransactionResult> {
        self.execute(calls::update_merkle_tree_duration(req)).await
    }

    pub async fn add_member(&self, req: &AddMemberRequest) -> GatewayResult<TransactionResult> {
        self.execute(calls::add_member(req)).await
    }

    pub async fn add_members(&self, req: &AddMembersRequest) -> GatewayResult<TransactionResult> {
        if req.identity_commitments.is_empty() {
            return Err(GatewayError::invalid_field(
                "identityCommitments",
                "At least one identity commitment is required",
            ));
        }
        self.execute(calls::add_members(req)).await
    }

    pub async fn remove_member(&self, req: &RemoveMemberRequest) -> GatewayResult<TransactionResult> {
        self.execute(calls::remove_member(req)).await
    }

    pub async fn update_member(&self, req: &UpdateMemberRequest) -> GatewayResult<TransactionResult> {
        self.execute(calls::update_member(req)).await
    }

    pub async fn validate_proof(&self, req: &ProofRequest) -> GatewayResult<TransactionResult> {
        self.execute(calls::validate_proof(req.group_id, &req.proof)).await
    }

    pub async fn verify_proof(&self, req: &ProofRequest) -> GatewayResult<bool> {
        let call = calls::verify_proof(req.group_id, &req.proof);
        expect_bool(self.read(call).await?, "verifyProof")
    }

    /// Rebuilds the group snapshot from five concurrent reads.
    pub async fn get_group_info(&self, group_id: U256) -> GatewayResult<GroupInfo> {
        let (admin, depth, root, size, duration) = tokio::try_join!(
            self.read(calls::group_read(GET_GROUP_ADMIN, group_id)),
            self.read(calls::group_read(GET_MERKLE_TREE_DEPTH, group_id)),
            self.read(calls::group_read(GET_MERKLE_TREE_ROOT, group_id)),
            self.read(calls::group_read(GET_MERKLE_TREE_SIZE, group_id)),
            self.read(calls::group_read(GROUPS, group_id)),
        )?;

        let info = GroupInfo {
            id: group_id,
            admin: HexAddress::from_address(expect_address(admin, "getGroupAdmin")?),
            merkle_tree_duration: group_duration(duration)?,
            merkle_tree_depth: expect_uint(depth, "getMerkleTreeDepth")?,
            merkle_tree_root: expect_uint(root, "getMerkleTreeRoot")?,
            merkle_tree_size: expect_uint(size, "getMerkleTreeSize")?,
        };

        if !info.exists() {
            return Err(GatewayError::domain(404, format!("Group {} not found", group_id)));
        }
        Ok(info)
    }

    pub async fn has_member(&self, query: &MemberQuery) -> GatewayResult<bool> {
        expect_bool(self.read(calls::has_member(query)).await?, "hasMember")
    }

    pub async fn index_of(&self, query: &MemberQuery) -> GatewayResult<U256> {
        expect_uint(self.read(calls::index_of(query)).await?, "indexOf")
    }

    pub async fn group_counter(&self) -> GatewayResult<U256> {
        expect_uint(self.read(calls::group_counter()).await?, "groupCounter")
    }

    pub async fn verifier(&self) -> GatewayResult<HexAddress> {
        let address = expect_address(self.read(calls::verifier()).await?, "verifier")?;
        Ok(HexAddress::from_address(address))
    }

    pub async fn account_overview(&self) -> GatewayResult<AccountOverview> {
        let (balance, block_number) = tokio::try_join!(
            self.chain.get_balance(None),
            self.chain.get_block_number(),
        )?;

        Ok(AccountOverview {
            address: HexAddress::from_address(self.chain.account()),
            balance,
            block_number,
            chain_id: self.chain.chain_id(),
            contract: HexAddress::from_address(self.chain.contract_address()),
        })
    }

    async fn read(&self, call: ContractCall) -> GatewayResult<Vec<Token>> {
        debug!("Reading {}", call.signature);
        self.chain.read(&call).await
    }
}

fn single(tokens: Vec<Token>, function: &str) -> GatewayResult<Token> {
    let mut tokens = tokens.into_iter();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => Ok(token),
        _ => Err(GatewayError::Decode(format!("{} returned an unexpected number of values", function))),
    }
}

fn expect_uint(tokens: Vec<Token>, function: &str) -> GatewayResult<U256> {
    single(tokens, function)?
        .into_uint()
        .ok_or_else(|| GatewayError::Decode(format!("{} did not return a uint256", function)))
}

/// `groups(uint256)` returns `(admin, pendingAdmin, merkleTreeDuration)`.
fn group_duration(tokens: Vec<Token>) -> GatewayResult<U256> {
    match <[Token; 3]>::try_from(tokens) {
        Ok([_, _, Token::Uint(duration)]) => Ok(duration),
        _ => Err(GatewayError::Decode("groups did not return (address,address,uint256)".into())),
    }
}

fn expect_bool(tokens: Vec<Token>, function: &str) -> GatewayResult<bool> {
    single(tokens, function)?
        .into_bool()
        .ok_or_else(|| GatewayError::Decode(format!("{} did not return a bool", function)))
}

fn expect_address(tokens: Vec<Token>, function: &str) -> GatewayResult<Address> {
    single(tokens, function)?
        .into_address()
        .ok_or_else(|| GatewayError::Decode(format!("{} did not return an address", function)))
}
