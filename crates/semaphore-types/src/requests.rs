//! Typed request payloads, produced only by the request validator.

use crate::{HexAddress, SemaphoreProof};
use ethers::types::U256;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateGroupRequest {
    pub admin: Option<HexAddress>,
    pub merkle_tree_duration: Option<U256>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupRef {
    pub group_id: U256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateGroupAdminRequest {
    pub group_id: U256,
    pub new_admin: HexAddress,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateMerkleTreeDurationRequest {
    pub group_id: U256,
    pub new_merkle_tree_duration: U256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddMemberRequest {
    pub group_id: U256,
    pub identity_commitment: U256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddMembersRequest {
    pub group_id: U256,
    pub identity_commitments: Vec<U256>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoveMemberRequest {
    pub group_id: U256,
    pub identity_commitment: U256,
    pub merkle_proof_siblings: Vec<U256>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateMemberRequest {
    pub group_id: U256,
    pub identity_commitment: U256,
    pub new_identity_commitment: U256,
    pub merkle_proof_siblings: Vec<U256>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofRequest {
    pub group_id: U256,
    pub proof: SemaphoreProof,
}

/// Query for `hasMember` and `indexOf`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberQuery {
    pub group_id: U256,
    pub identity_commitment: U256,
}
