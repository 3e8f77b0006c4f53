use crate::PROOF_POINTS;
use ethers::types::U256;

/// Groth16 proof material as the Semaphore contract expects it.
///
/// Every field is opaque here; verification happens on-chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SemaphoreProof {
    pub merkle_tree_depth: U256,
    pub merkle_tree_root: U256,
    pub nullifier: U256,
    pub message: U256,
    pub scope: U256,
    pub points: [U256; PROOF_POINTS],
}
