//! Unanimous multi-signature account
//!
//! A fixed set of signers jointly authorizes an opaque action: any signer
//! submits it, every other signer must approve it within the approval
//! window, and the final approval dispatches it to an [`Executor`].
//!
//! State lives in typed tables over a [`crate::storage::KvStore`]:
//!
//! | Prefix | Table |
//! |---|---|
//! | `0x00` | pending proposals by id |
//! | `0x01` | id sequence |
//! | `0x02` | approval marks by (id, signer) |
//! | `0x03` | signers |
//! | `0x04` | approval window |
//! | `0x05` | required approvals |
//!
//! # Example
//!
//! ```ignore
//! use multisig_account::account::{CallContext, LoggingExecutor, MultisigAccount, Payload};
//! use multisig_account::storage::MemoryStore;
//!
//! let mut account = MultisigAccount::new(MemoryStore::new(), LoggingExecutor::new());
//! account.init(&[alice_addr, bob_addr], Some(10))?;
//!
//! let id = account.submit(&CallContext::new(alice, 100), payload)?;
//! let result = account.approve(&CallContext::new(bob, 105), id)?;
//! assert!(result.executed);
//! ```

pub mod approvals;
pub mod engine;
pub mod error;
pub mod executor;
pub mod handler;
pub mod keys;
pub mod ledger;
pub mod registry;
pub mod sequence;
pub mod types;

pub use approvals::ApprovalIndex;
pub use engine::MultisigAccount;
pub use error::{AccountError, Result};
pub use executor::{ExecutionError, Executor, LoggingExecutor};
pub use handler::{AccountMsg, AccountResponse, ACCOUNT_TYPE};
pub use ledger::ProposalLedger;
pub use registry::SignerRegistry;
pub use sequence::Sequence;
pub use types::{ApproveResult, CallContext, Payload, PendingView, Proposal};

/// Approval window used when init is given none (in blocks)
pub const DEFAULT_APPROVAL_WINDOW: u64 = 20;

/// Smallest signer set an account accepts
pub const MIN_SIGNERS: usize = 2;
