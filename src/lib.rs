//! Multisig Account: a unanimous multi-signature account in Rust
//!
//! This crate provides the decision core of a multisig account:
//! - Signer registry with a configurable approval window
//! - Proposal submission with the initiator's implicit approval
//! - Deduplicated approvals and height-based expiry
//! - Quorum-triggered dispatch to a pluggable executor
//! - Typed tables over an ordered key-value store with atomic commits
//! - Base58Check signer addresses
//!
//! # Example
//!
//! ```rust
//! use multisig_account::account::{CallContext, LoggingExecutor, MultisigAccount, Payload};
//! use multisig_account::crypto::KeyPair;
//! use multisig_account::storage::MemoryStore;
//!
//! let alice = KeyPair::generate();
//! let bob = KeyPair::generate();
//!
//! let mut account = MultisigAccount::new(MemoryStore::new(), LoggingExecutor::new());
//! account.init(&[alice.address(), bob.address()], Some(10)).unwrap();
//!
//! let payload = Payload::new("/bank.MsgSend", b"10 coins to carol".to_vec());
//! let id = account
//!     .submit(&CallContext::new(alice.address_bytes(), 100), payload)
//!     .unwrap();
//!
//! let result = account
//!     .approve(&CallContext::new(bob.address_bytes(), 105), id)
//!     .unwrap();
//! assert!(result.executed);
//! assert_eq!(account.executor().executed().len(), 1);
//! ```

pub mod account;
pub mod cli;
pub mod crypto;
pub mod storage;

// Re-export commonly used types
pub use account::{
    AccountError, AccountMsg, AccountResponse, ApproveResult, CallContext, ExecutionError,
    Executor, LoggingExecutor, MultisigAccount, Payload, PendingView, Proposal,
    DEFAULT_APPROVAL_WINDOW,
};
pub use crypto::{AddressCodec, Base58Codec, KeyPair};
pub use storage::{FileStore, KvStore, MemoryStore, Overlay, StorageConfig};
