//! Signer address codec
//!
//! Textual addresses are Base58Check(version || hash160). The account only
//! ever stores the 20-byte hash; strings exist at the edges.

use super::hash::checksum;
use thiserror::Error;

/// Version byte prepended to every address
pub const ADDRESS_VERSION: u8 = 0x00;

/// Length of a binary signer identity
pub const ADDRESS_LEN: usize = 20;

/// Errors converting between textual and binary addresses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid base58 in address {0:?}")]
    InvalidBase58(String),
    #[error("Invalid address length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("Invalid address version: {0:#04x}")]
    InvalidVersion(u8),
    #[error("Address checksum mismatch")]
    ChecksumMismatch,
}

/// Reversible, deterministic mapping between address strings and bytes
pub trait AddressCodec {
    fn string_to_bytes(&self, address: &str) -> Result<Vec<u8>, AddressError>;
    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String, AddressError>;
}

/// Base58Check codec for 20-byte identities
#[derive(Debug, Clone, Copy, Default)]
pub struct Base58Codec;

impl Base58Codec {
    /// Encode a 20-byte identity. Callers must pass `ADDRESS_LEN` bytes.
    pub(crate) fn encode(&self, bytes: &[u8]) -> String {
        let mut address_bytes = Vec::with_capacity(1 + bytes.len() + 4);
        address_bytes.push(ADDRESS_VERSION);
        address_bytes.extend_from_slice(bytes);
        let sum = checksum(&address_bytes);
        address_bytes.extend_from_slice(&sum);
        bs58::encode(address_bytes).into_string()
    }
}

impl AddressCodec for Base58Codec {
    fn string_to_bytes(&self, address: &str) -> Result<Vec<u8>, AddressError> {
        let decoded = bs58::decode(address)
            .into_vec()
            .map_err(|_| AddressError::InvalidBase58(address.to_string()))?;

        if decoded.len() != 1 + ADDRESS_LEN + 4 {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_LEN,
                got: decoded.len().saturating_sub(5),
            });
        }

        let (body, sum) = decoded.split_at(1 + ADDRESS_LEN);
        if checksum(body).as_slice() != sum {
            return Err(AddressError::ChecksumMismatch);
        }
        if body[0] != ADDRESS_VERSION {
            return Err(AddressError::InvalidVersion(body[0]));
        }

        Ok(body[1..].to_vec())
    }

    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String, AddressError> {
        if bytes.len() != ADDRESS_LEN {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_LEN,
                got: bytes.len(),
            });
        }
        Ok(self.encode(bytes))
    }
}
