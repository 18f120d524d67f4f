//! Approval index: one mark per (proposal, signer)

use super::error::Result;
use super::keys::{decode_bool, encode_bool, id_key, pair_key, APPROVALS_PREFIX};
use crate::storage::KvStore;

const TABLE: &str = "approvals";

pub struct ApprovalIndex;

impl ApprovalIndex {
    pub fn mark<S: KvStore + ?Sized>(store: &mut S, id: u64, signer: &[u8]) -> Result<()> {
        store.set(&pair_key(APPROVALS_PREFIX, id, signer), &encode_bool(true))?;
        Ok(())
    }

    /// A missing mark means "not yet approved"
    pub fn has_approved<S: KvStore + ?Sized>(store: &S, id: u64, signer: &[u8]) -> Result<bool> {
        match store.get(&pair_key(APPROVALS_PREFIX, id, signer))? {
            Some(raw) => Ok(decode_bool(TABLE, &raw)?),
            None => Ok(false),
        }
    }

    /// Signers holding a truthy mark on `id`, in key order
    pub fn approvers<S: KvStore + ?Sized>(store: &S, id: u64) -> Result<Vec<Vec<u8>>> {
        let prefix = id_key(APPROVALS_PREFIX, id);
        let mut approvers = Vec::new();
        for (key, value) in store.scan_prefix(&prefix)? {
            if decode_bool(TABLE, &value)? {
                approvers.push(key[prefix.len()..].to_vec());
            }
        }
        Ok(approvers)
    }

    /// Remove every mark on `id`
    pub fn clear<S: KvStore + ?Sized>(store: &mut S, id: u64) -> Result<usize> {
        Ok(store.delete_prefix(&id_key(APPROVALS_PREFIX, id))?)
    }
}
