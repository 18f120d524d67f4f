//! Store layout for the account tables
//!
//! Each table owns a one-byte prefix. Integer components are big-endian so
//! a prefix scan walks proposals in id order.

use crate::storage::StorageError;

pub const PENDING_TXS_PREFIX: u8 = 0x00;
pub const SEQUENCE_PREFIX: u8 = 0x01;
pub const APPROVALS_PREFIX: u8 = 0x02;
pub const SIGNERS_PREFIX: u8 = 0x03;
pub const SIGNING_WINDOW_PREFIX: u8 = 0x04;
pub const REQUIRED_SIGNERS_PREFIX: u8 = 0x05;

/// `prefix || id`
pub fn id_key(prefix: u8, id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(9);
    key.push(prefix);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// `prefix || id || suffix`
pub fn pair_key(prefix: u8, id: u64, suffix: &[u8]) -> Vec<u8> {
    let mut key = id_key(prefix, id);
    key.extend_from_slice(suffix);
    key
}

/// `prefix || bytes`
pub fn bytes_key(prefix: u8, bytes: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + bytes.len());
    key.push(prefix);
    key.extend_from_slice(bytes);
    key
}

pub fn encode_u64(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

pub fn decode_u64(table: &'static str, bytes: &[u8]) -> Result<u64, StorageError> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| StorageError::Corrupt {
        table,
        reason: format!("expected 8-byte integer, got {} bytes", bytes.len()),
    })?;
    Ok(u64::from_be_bytes(raw))
}

pub fn encode_bool(value: bool) -> [u8; 1] {
    [value as u8]
}

pub fn decode_bool(table: &'static str, bytes: &[u8]) -> Result<bool, StorageError> {
    match bytes {
        [0] => Ok(false),
        [1] => Ok(true),
        other => Err(StorageError::Corrupt {
            table,
            reason: format!("invalid bool encoding {:?}", other),
        }),
    }
}

/// Decode the `u64` that follows the prefix byte of `key`
pub fn id_from_key(table: &'static str, key: &[u8]) -> Result<u64, StorageError> {
    match key.get(1..9) {
        Some(raw) => decode_u64(table, raw),
        None => Err(StorageError::Corrupt {
            table,
            reason: format!("key too short: {} bytes", key.len()),
        }),
    }
}
