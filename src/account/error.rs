//! Account error taxonomy

use crate::crypto::AddressError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors returned by account operations
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
    #[error("Unauthorized: {0} is not a signer")]
    Unauthorized(String),
    #[error("Transaction not found: {0}")]
    NotFound(u64),
    #[error("Transaction {id} already approved by {signer}")]
    AlreadyApproved { id: u64, signer: String },
    #[error("Transaction {id} expired at height {expires_at} (current height {height})")]
    Expired {
        id: u64,
        height: u64,
        expires_at: u64,
    },
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Result alias for account operations
pub type Result<T> = std::result::Result<T, AccountError>;
