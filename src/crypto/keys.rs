//! Signer key management
//!
//! Signers are identified by the HASH160 of their compressed secp256k1
//! public key. Key pairs exist here only so operators can mint new signer
//! identities; approvals are authorized by caller identity, not signatures.

use rand::rngs::OsRng;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use super::address::Base58Codec;
use super::hash::hash160;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Get the public key as a hex string (compressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// Binary signer identity (20 bytes)
    pub fn address_bytes(&self) -> Vec<u8> {
        hash160(&self.public_key.serialize())
    }

    /// Textual signer address
    pub fn address(&self) -> String {
        public_key_to_address(&self.public_key)
    }
}

/// Convert a public key to its Base58Check signer address
pub fn public_key_to_address(public_key: &PublicKey) -> String {
    Base58Codec.encode(&hash160(&public_key.serialize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::AddressCodec;

    #[test]
    fn test_key_pair_generation() {
        let kp = KeyPair::generate();
        assert!(!kp.private_key_hex().is_empty());
        assert_eq!(kp.public_key_hex().len(), 66);
        assert_eq!(kp.address_bytes().len(), 20);
    }

    #[test]
    fn test_key_pair_from_hex() {
        let kp1 = KeyPair::generate();
        let private_hex = kp1.private_key_hex();

        let kp2 = KeyPair::from_private_key_hex(&private_hex).unwrap();
        assert_eq!(kp1.public_key_hex(), kp2.public_key_hex());
        assert_eq!(kp1.address(), kp2.address());
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(matches!(
            KeyPair::from_private_key_hex("zz"),
            Err(KeyError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn test_address_matches_codec() {
        let kp = KeyPair::generate();
        let address = kp.address();
        // Version byte 0x00 encodes to a leading '1'
        assert!(address.starts_with('1'));
        assert_eq!(Base58Codec.string_to_bytes(&address).unwrap(), kp.address_bytes());
        assert_eq!(public_key_to_address(&kp.public_key), address);
    }
}
