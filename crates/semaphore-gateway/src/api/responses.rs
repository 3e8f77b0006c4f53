use crate::semaphore::{AccountOverview, CreatedGroup};
use ethers::types::U256;
use semaphore_types::{render_uint, GroupInfo, HexAddress, SemaphoreProof, TransactionResult, TxStatus};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub hash: String,
    pub block_number: String,
    pub gas_used: String,
    pub status: TxStatus,
}

impl From<&TransactionResult> for TransactionView {
    fn from(tx: &TransactionResult) -> Self {
        Self {
            hash: tx.hash_hex(),
            block_number: tx.block_number.to_string(),
            gas_used: render_uint(&tx.gas_used),
            status: tx.status,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupData {
    pub group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<HexAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merkle_tree_duration: Option<String>,
    pub transaction: TransactionView,
}

impl CreateGroupData {
    pub fn new(created: &CreatedGroup, admin: Option<HexAddress>, duration: Option<U256>) -> Self {
        Self {
            group_id: render_uint(&created.group_id),
            admin,
            merkle_tree_duration: duration.as_ref().map(render_uint),
            transaction: TransactionView::from(&created.transaction),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTransactionData {
    pub group_id: String,
    pub transaction: TransactionView,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAdminData {
    pub group_id: String,
    pub new_admin: HexAddress,
    pub transaction: TransactionView,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleTreeDurationData {
    pub group_id: String,
    pub new_merkle_tree_duration: String,
    pub transaction: TransactionView,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfoData {
    pub id: String,
    pub admin: HexAddress,
    pub merkle_tree_duration: String,
    pub merkle_tree_depth: String,
    pub merkle_tree_root: String,
    pub merkle_tree_size: String,
}

impl From<GroupInfo> for GroupInfoData {
    fn from(info: GroupInfo) -> Self {
        Self {
            id: render_uint(&info.id),
            admin: info.admin,
            merkle_tree_duration: render_uint(&info.merkle_tree_duration),
            merkle_tree_depth: render_uint(&info.merkle_tree_depth),
            merkle_tree_root: render_uint(&info.merkle_tree_root),
            merkle_tree_size: render_uint(&info.merkle_tree_size),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCounterData {
    pub total_groups: String,
    pub next_group_id: String,
}

impl GroupCounterData {
    /// Group ids start at zero, so the counter is both the count and the next id.
    pub fn new(counter: U256) -> Self {
        Self {
            total_groups: render_uint(&counter),
            next_group_id: render_uint(&counter),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberData {
    pub group_id: String,
    pub identity_commitment: String,
    pub transaction: TransactionView,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembersData {
    pub group_id: String,
    pub count: usize,
    pub identity_commitments: Vec<String>,
    pub transaction: TransactionView,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedMemberData {
    pub group_id: String,
    pub old_identity_commitment: String,
    pub new_identity_commitment: String,
    pub transaction: TransactionView,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HasMemberData {
    pub group_id: String,
    pub identity_commitment: String,
    pub has_member: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexOfData {
    pub group_id: String,
    pub identity_commitment: String,
    pub index: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofSummary {
    pub nullifier: String,
    pub message: String,
    pub scope: String,
}

impl From<&SemaphoreProof> for ProofSummary {
    fn from(proof: &SemaphoreProof) -> Self {
        Self {
            nullifier: render_uint(&proof.nullifier),
            message: render_uint(&proof.message),
            scope: render_uint(&proof.scope),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedProofData {
    pub group_id: String,
    #[serde(flatten)]
    pub proof: ProofSummary,
    pub transaction: TransactionView,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedProofData {
    pub group_id: String,
    pub is_valid: bool,
    pub proof: ProofSummary,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierData {
    pub verifier_address: HexAddress,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    pub address: HexAddress,
    pub balance: String,
    pub block_number: String,
    pub chain_id: u64,
    pub contract_address: HexAddress,
}

impl From<AccountOverview> for AccountData {
    fn from(overview: AccountOverview) -> Self {
        Self {
            address: overview.address,
            balance: render_uint(&overview.balance),
            block_number: overview.block_number.to_string(),
            chain_id: overview.chain_id,
            contract_address: overview.contract,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}
