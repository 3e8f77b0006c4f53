#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub const ETH_ADDRESS_SIZE: usize = 20;

/// Field elements in a packed Groth16 proof (a, b, c).
pub const PROOF_POINTS: usize = 8;

pub mod address;
pub mod codec;
pub mod error;
pub mod group;
pub mod proof;
pub mod requests;
pub mod transaction;

pub use address::HexAddress;
pub use codec::{parse_uint, render_uint, render_uints, CodecError};
pub use error::{ErrorKind, FieldViolation, GatewayError, GatewayResult};
pub use group::GroupInfo;
pub use proof::SemaphoreProof;
pub use requests::*;
pub use transaction::{TransactionResult, TxStatus};

pub use ethers::types::{Address, H256, U256};
