use ethers::abi::{parse_abi, Abi, Function};
use ethers::types::H256;
use ethers::utils::keccak256;
use semaphore_types::{GatewayError, GatewayResult};

pub const CREATE_GROUP: &str = "createGroup()";
pub const CREATE_GROUP_WITH_ADMIN: &str = "createGroup(address)";
pub const CREATE_GROUP_WITH_ADMIN_AND_DURATION: &str = "createGroup(address,uint256)";
pub const ACCEPT_GROUP_ADMIN: &str = "acceptGroupAdmin(uint256)";
pub const UPDATE_GROUP_ADMIN: &str = "updateGroupAdmin(uint256,address)";
pub const UPDATE_GROUP_MERKLE_TREE_DURATION: &str = "updateGroupMerkleTreeDuration(uint256,uint256)";
pub const ADD_MEMBER: &str = "addMember(uint256,uint256)";
pub const ADD_MEMBERS: &str = "addMembers(uint256,uint256[])";
pub const REMOVE_MEMBER: &str = "removeMember(uint256,uint256,uint256[])";
pub const UPDATE_MEMBER: &str = "updateMember(uint256,uint256,uint256,uint256[])";
pub const VALIDATE_PROOF: &str =
    "validateProof(uint256,(uint256,uint256,uint256,uint256,uint256,uint256[8]))";
pub const VERIFY_PROOF: &str =
    "verifyProof(uint256,(uint256,uint256,uint256,uint256,uint256,uint256[8]))";

pub const GET_GROUP_ADMIN: &str = "getGroupAdmin(uint256)";
pub const GET_MERKLE_TREE_DEPTH: &str = "getMerkleTreeDepth(uint256)";
pub const GET_MERKLE_TREE_ROOT: &str = "getMerkleTreeRoot(uint256)";
pub const GET_MERKLE_TREE_SIZE: &str = "getMerkleTreeSize(uint256)";
pub const GROUPS: &str = "groups(uint256)";
pub const HAS_MEMBER: &str = "hasMember(uint256,uint256)";
pub const INDEX_OF: &str = "indexOf(uint256,uint256)";
pub const GROUP_COUNTER: &str = "groupCounter()";
pub const VERIFIER: &str = "verifier()";

pub const GROUP_CREATED_EVENT: &str = "GroupCreated(uint256)";

const SEMAPHORE_ABI: &[&str] = &[
    "struct SemaphoreProof { uint256 merkleTreeDepth; uint256 merkleTreeRoot; uint256 nullifier; uint256 message; uint256 scope; uint256[8] points; }",
    "function createGroup() external returns (uint256)",
    "function createGroup(address admin) external returns (uint256)",
    "function createGroup(address admin, uint256 merkleTreeDuration) external returns (uint256)",
    "function acceptGroupAdmin(uint256 groupId) external",
    "function updateGroupAdmin(uint256 groupId, address newAdmin) external",
    "function updateGroupMerkleTreeDuration(uint256 groupId, uint256 newMerkleTreeDuration) external",
    "function addMember(uint256 groupId, uint256 identityCommitment) external",
    "function addMembers(uint256 groupId, uint256[] identityCommitments) external",
    "function removeMember(uint256 groupId, uint256 identityCommitment, uint256[] merkleProofSiblings) external",
    "function updateMember(uint256 groupId, uint256 oldIdentityCommitment, uint256 newIdentityCommitment, uint256[] merkleProofSiblings) external",
    "function validateProof(uint256 groupId, SemaphoreProof proof) external",
    "function verifyProof(uint256 groupId, SemaphoreProof proof) external view returns (bool)",
    "function getGroupAdmin(uint256 groupId) external view returns (address)",
    "function getMerkleTreeDepth(uint256 groupId) external view returns (uint256)",
    "function getMerkleTreeRoot(uint256 groupId) external view returns (uint256)",
    "function getMerkleTreeSize(uint256 groupId) external view returns (uint256)",
    "function groups(uint256 groupId) external view returns (address admin, address pendingAdmin, uint256 merkleTreeDuration)",
    "function hasMember(uint256 groupId, uint256 identityCommitment) external view returns (bool)",
    "function indexOf(uint256 groupId, uint256 identityCommitment) external view returns (uint256)",
    "function groupCounter() external view returns (uint256)",
    "function verifier() external view returns (address)",
    "event GroupCreated(uint256 indexed groupId)",
];

pub fn semaphore_abi() -> GatewayResult<Abi> {
    parse_abi(SEMAPHORE_ABI).map_err(|e| GatewayError::Internal(format!("Invalid Semaphore ABI: {}", e)))
}

/// `name(type,...)` with tuples spelled out, as used for overload lookup.
pub fn canonical_signature(function: &Function) -> String {
    let inputs: Vec<String> = function.inputs.iter().map(|p| p.kind.to_string()).collect();
    format!("{}({})", function.name, inputs.join(","))
}

pub fn find_function<'a>(abi: &'a Abi, signature: &str) -> GatewayResult<&'a Function> {
    let name = signature.split('(').next().unwrap_or(signature);
    abi.functions_by_name(name)
        .ok()
        .and_then(|overloads| overloads.iter().find(|f| canonical_signature(f) == signature))
        .ok_or_else(|| GatewayError::Internal(format!("Unknown contract function: {}", signature)))
}

pub fn group_created_topic() -> H256 {
    H256::from(keccak256(GROUP_CREATED_EVENT.as_bytes()))
}
