//! Signer registry: authorized signers, quorum size and approval window

use super::error::Result;
use super::keys::{
    bytes_key, decode_bool, decode_u64, encode_bool, encode_u64, REQUIRED_SIGNERS_PREFIX,
    SIGNERS_PREFIX, SIGNING_WINDOW_PREFIX,
};
use crate::storage::{KvStore, StorageError};

const SIGNERS_TABLE: &str = "signers";
const WINDOW_TABLE: &str = "signing_window";
const REQUIRED_TABLE: &str = "required_signers";

const WINDOW_KEY: [u8; 1] = [SIGNING_WINDOW_PREFIX];
const REQUIRED_KEY: [u8; 1] = [REQUIRED_SIGNERS_PREFIX];

pub struct SignerRegistry;

impl SignerRegistry {
    pub fn add_signer<S: KvStore + ?Sized>(store: &mut S, signer: &[u8]) -> Result<()> {
        store.set(&bytes_key(SIGNERS_PREFIX, signer), &encode_bool(true))?;
        Ok(())
    }

    /// Absent entries are simply not signers
    pub fn is_signer<S: KvStore + ?Sized>(store: &S, signer: &[u8]) -> Result<bool> {
        match store.get(&bytes_key(SIGNERS_PREFIX, signer))? {
            Some(raw) => Ok(decode_bool(SIGNERS_TABLE, &raw)?),
            None => Ok(false),
        }
    }

    /// Registered signers in key order
    pub fn signers<S: KvStore + ?Sized>(store: &S) -> Result<Vec<Vec<u8>>> {
        let mut signers = Vec::new();
        for (key, value) in store.scan_prefix(&[SIGNERS_PREFIX])? {
            if decode_bool(SIGNERS_TABLE, &value)? {
                signers.push(key[1..].to_vec());
            }
        }
        Ok(signers)
    }

    pub fn set_window<S: KvStore + ?Sized>(store: &mut S, window: u64) -> Result<()> {
        store.set(&WINDOW_KEY, &encode_u64(window))?;
        Ok(())
    }

    pub fn window<S: KvStore + ?Sized>(store: &S) -> Result<u64> {
        Self::read_u64(store, &WINDOW_KEY, WINDOW_TABLE)
    }

    pub fn set_required<S: KvStore + ?Sized>(store: &mut S, required: u64) -> Result<()> {
        store.set(&REQUIRED_KEY, &encode_u64(required))?;
        Ok(())
    }

    pub fn required<S: KvStore + ?Sized>(store: &S) -> Result<u64> {
        Self::read_u64(store, &REQUIRED_KEY, REQUIRED_TABLE)
    }

    fn read_u64<S: KvStore + ?Sized>(store: &S, key: &[u8], table: &'static str) -> Result<u64> {
        let raw = store.get(key)?.ok_or_else(|| StorageError::Corrupt {
            table,
            reason: "not set; account is not initialized".to_string(),
        })?;
        Ok(decode_u64(table, &raw)?)
    }
}
