//! Projection of validated requests onto Semaphore contract calls.

use crate::chain::*;
use ethers::abi::Token;
use ethers::types::U256;
use semaphore_types::{
    AddMemberRequest, AddMembersRequest, CreateGroupRequest, GatewayError, GatewayResult,
    MemberQuery, RemoveMemberRequest, SemaphoreProof, UpdateGroupAdminRequest,
    UpdateMemberRequest, UpdateMerkleTreeDurationRequest,
};

pub const DURATION_REQUIRES_ADMIN: &str = "merkleTreeDuration requires admin";

/// Picks the `createGroup` overload matching the fields that are present.
pub fn create_group(req: &CreateGroupRequest) -> GatewayResult<ContractCall> {
    match (&req.admin, req.merkle_tree_duration) {
        (Some(admin), Some(duration)) => Ok(ContractCall::new(
            CREATE_GROUP_WITH_ADMIN_AND_DURATION,
            vec![Token::Address(admin.address()), Token::Uint(duration)],
        )),
        (Some(admin), None) => Ok(ContractCall::new(
            CREATE_GROUP_WITH_ADMIN,
            vec![Token::Address(admin.address())],
        )),
        (None, None) => Ok(ContractCall::new(CREATE_GROUP, vec![])),
        (None, Some(_)) => Err(GatewayError::invalid_field(
            "merkleTreeDuration",
            DURATION_REQUIRES_ADMIN,
        )),
    }
}

pub fn accept_group_admin(group_id: U256) -> ContractCall {
    ContractCall::new(ACCEPT_GROUP_ADMIN, vec![Token::Uint(group_id)])
}

pub fn update_group_admin(req: &UpdateGroupAdminRequest) -> ContractCall {
    ContractCall::new(
        UPDATE_GROUP_ADMIN,
        vec![Token::Uint(req.group_id), Token::Address(req.new_admin.address())],
    )
}

pub fn update_merkle_tree_duration(req: &UpdateMerkleTreeDurationRequest) -> ContractCall {
    ContractCall::new(
        UPDATE_GROUP_MERKLE_TREE_DURATION,
        vec![Token::Uint(req.group_id), Token::Uint(req.new_merkle_tree_duration)],
    )
}

pub fn add_member(req: &AddMemberRequest) -> ContractCall {
    ContractCall::new(
        ADD_MEMBER,
        vec![Token::Uint(req.group_id), Token::Uint(req.identity_commitment)],
    )
}

pub fn add_members(req: &AddMembersRequest) -> ContractCall {
    ContractCall::new(
        ADD_MEMBERS,
        vec![Token::Uint(req.group_id), uint_array(&req.identity_commitments)],
    )
}

pub fn remove_member(req: &RemoveMemberRequest) -> ContractCall {
    ContractCall::new(
        REMOVE_MEMBER,
        vec![
            Token::Uint(req.group_id),
            Token::Uint(req.identity_commitment),
            uint_array(&req.merkle_proof_siblings),
        ],
    )
}

pub fn update_member(req: &UpdateMemberRequest) -> ContractCall {
    ContractCall::new(
        UPDATE_MEMBER,
        vec![
            Token::Uint(req.group_id),
            Token::Uint(req.identity_commitment),
            Token::Uint(req.new_identity_commitment),
            uint_array(&req.merkle_proof_siblings),
        ],
    )
}

pub fn validate_proof(group_id: U256, proof: &SemaphoreProof) -> ContractCall {
    ContractCall::new(VALIDATE_PROOF, vec![Token::Uint(group_id), proof_token(proof)])
}

pub fn verify_proof(group_id: U256, proof: &SemaphoreProof) -> ContractCall {
    ContractCall::new(VERIFY_PROOF, vec![Token::Uint(group_id), proof_token(proof)])
}

pub fn has_member(query: &MemberQuery) -> ContractCall {
    ContractCall::new(
        HAS_MEMBER,
        vec![Token::Uint(query.group_id), Token::Uint(query.identity_commitment)],
    )
}

pub fn index_of(query: &MemberQuery) -> ContractCall {
    ContractCall::new(
        INDEX_OF,
        vec![Token::Uint(query.group_id), Token::Uint(query.identity_commitment)],
    )
}

pub fn group_read(signature: &'static str, group_id: U256) -> ContractCall {
    ContractCall::new(signature, vec![Token::Uint(group_id)])
}

pub fn group_counter() -> ContractCall {
    ContractCall::new(GROUP_COUNTER, vec![])
}

pub fn verifier() -> ContractCall {
    ContractCall::new(VERIFIER, vec![])
}

/// `(depth, root, nullifier, message, scope, uint256[8] points)`
fn proof_token(proof: &SemaphoreProof) -> Token {
    Token::Tuple(vec![
        Token::Uint(proof.merkle_tree_depth),
        Token::Uint(proof.merkle_tree_root),
        Token::Uint(proof.nullifier),
        Token::Uint(proof.message),
        Token::Uint(proof.scope),
        Token::FixedArray(proof.points.iter().copied().map(Token::Uint).collect()),
    ])
}

fn uint_array(values: &[U256]) -> Token {
    Token::Array(values.iter().copied().map(Token::Uint).collect())
}
