//! Cryptographic utilities for signer identities
//!
//! This module provides:
//! - SHA-256 / HASH160 hashing
//! - secp256k1 key pairs for generating signer identities
//! - The address codec that maps textual signer addresses to their binary form

pub mod address;
pub mod hash;
pub mod keys;

pub use address::{AddressCodec, AddressError, Base58Codec, ADDRESS_LEN, ADDRESS_VERSION};
pub use hash::{checksum, double_sha256, hash160, sha256};
pub use keys::{public_key_to_address, KeyError, KeyPair};
