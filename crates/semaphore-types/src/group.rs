use crate::HexAddress;
use ethers::types::U256;

/// Snapshot of a group's on-chain state, rebuilt on every query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupInfo {
    pub id: U256,
    pub admin: HexAddress,
    pub merkle_tree_duration: U256,
    pub merkle_tree_depth: U256,
    pub merkle_tree_root: U256,
    pub merkle_tree_size: U256,
}

impl GroupInfo {
    /// The contract reports the zero address for groups that were never created.
    pub fn exists(&self) -> bool {
        !self.admin.is_zero()
    }
}
