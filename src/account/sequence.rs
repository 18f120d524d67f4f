//! Proposal id sequence

use super::error::Result;
use super::keys::{decode_u64, encode_u64, SEQUENCE_PREFIX};
use crate::storage::{KvStore, StorageError};

const TABLE: &str = "tx_sequence";
const KEY: [u8; 1] = [SEQUENCE_PREFIX];

/// First id handed out by a fresh account
pub const FIRST_ID: u64 = 1;

/// Persisted, strictly increasing counter
pub struct Sequence;

impl Sequence {
    /// The id the next call to [`Sequence::next`] will return
    pub fn peek<S: KvStore + ?Sized>(store: &S) -> Result<u64> {
        match store.get(&KEY)? {
            Some(raw) => Ok(decode_u64(TABLE, &raw)?),
            None => Ok(FIRST_ID),
        }
    }

    /// Hand out the next id and advance the counter
    pub fn next<S: KvStore + ?Sized>(store: &mut S) -> Result<u64> {
        let id = Self::peek(&*store)?;
        let following = id.checked_add(1).ok_or_else(|| StorageError::Corrupt {
            table: TABLE,
            reason: "sequence exhausted".to_string(),
        })?;
        store.set(&KEY, &encode_u64(following))?;
        Ok(id)
    }
}
