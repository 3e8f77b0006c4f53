use crate::codec::CodecError;
use crate::ETH_ADDRESS_SIZE;
use ethers::types::Address;
use ethers::utils::to_checksum;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A 20-byte address that remembers the exact text it was parsed from.
///
/// Equality and hashing only look at the bytes, so `0xAB..` and `0xab..`
/// compare equal while each still renders the way the caller wrote it.
#[derive(Clone)]
pub struct HexAddress {
    address: Address,
    text: String,
}

impl HexAddress {
    pub fn parse(input: &str) -> Result<Self, CodecError> {
        let digits = input.strip_prefix("0x").ok_or(CodecError::MissingPrefix)?;
        if digits.len() != ETH_ADDRESS_SIZE * 2 {
            return Err(CodecError::AddressLength(digits.len()));
        }
        let bytes = hex::decode(digits).map_err(|_| CodecError::NotHex)?;

        Ok(Self {
            address: Address::from_slice(&bytes),
            text: input.to_string(),
        })
    }

    /// Wraps an address read from the chain, rendered in EIP-55 checksum form.
    pub fn from_address(address: Address) -> Self {
        Self {
            address,
            text: to_checksum(&address, None),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_zero(&self) -> bool {
        self.address.is_zero()
    }
}

impl PartialEq for HexAddress {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for HexAddress {}

impl Hash for HexAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl fmt::Debug for HexAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexAddress({})", self.text)
    }
}

impl fmt::Display for HexAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<Address> for HexAddress {
    fn from(address: Address) -> Self {
        Self::from_address(address)
    }
}

impl Serialize for HexAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}
