//! Account data types
//!
//! Everything here is serde-serialisable: proposals are stored as JSON and
//! the request/response types cross the host's transport.

use crate::crypto::{AddressCodec, AddressError};
use serde::{Deserialize, Serialize};

/// Opaque action executed once a proposal reaches quorum
///
/// The account copies it verbatim and never looks inside.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Type identifier understood by the executor
    pub type_url: String,
    /// Encoded message body
    #[serde(with = "hex::serde")]
    pub value: Vec<u8>,
}

impl Payload {
    pub fn new(type_url: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            type_url: type_url.into(),
            value: value.into(),
        }
    }
}

/// An in-flight proposal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Sequence-assigned identifier
    pub id: u64,
    /// Action to execute on quorum
    pub payload: Payload,
    /// Signer addresses in approval order, initiator first
    pub approvers: Vec<String>,
    /// Height at submission
    pub submitted_at: u64,
    /// Last height at which approvals are accepted
    pub expires_at: u64,
    /// Address of the submitting signer
    pub initiator: String,
}

impl Proposal {
    /// Number of approvals collected so far
    pub fn approval_count(&self) -> usize {
        self.approvers.len()
    }

    /// Whether an approval at `height` would be rejected as expired
    pub fn is_expired_at(&self, height: u64) -> bool {
        height > self.expires_at
    }
}

/// Read-only projection returned by `query_pending`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingView {
    pub payload: Payload,
    /// Rebuilt from the approval index, in signer-key order
    pub approvers: Vec<String>,
    pub submitted_at: u64,
    /// `submitted_at` plus the currently configured window
    pub expires_at: u64,
    pub initiator: String,
}

/// Outcome of an approval
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveResult {
    /// Quorum was reached and the payload dispatched
    pub executed: bool,
    /// Set when the executor returned no error (polarity kept as the
    /// account has always reported it)
    pub failed: bool,
}

/// Per-call environment supplied by the host
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    sender: Vec<u8>,
    height: u64,
}

impl CallContext {
    /// Build a context from a binary caller identity
    pub fn new(sender: impl Into<Vec<u8>>, height: u64) -> Self {
        Self {
            sender: sender.into(),
            height,
        }
    }

    /// Build a context from a textual caller address
    pub fn from_address<C: AddressCodec + ?Sized>(
        codec: &C,
        address: &str,
        height: u64,
    ) -> Result<Self, AddressError> {
        Ok(Self::new(codec.string_to_bytes(address)?, height))
    }

    /// Binary identity of the caller
    pub fn sender(&self) -> &[u8] {
        &self.sender
    }

    /// Current block height
    pub fn height(&self) -> u64 {
        self.height
    }
}
