//! Proposal ledger: one JSON record per in-flight proposal

use super::error::{AccountError, Result};
use super::keys::{id_from_key, id_key, PENDING_TXS_PREFIX};
use super::types::Proposal;
use crate::storage::KvStore;

const TABLE: &str = "pending_txs";

pub struct ProposalLedger;

impl ProposalLedger {
    pub fn get<S: KvStore + ?Sized>(store: &S, id: u64) -> Result<Option<Proposal>> {
        match store.get(&id_key(PENDING_TXS_PREFIX, id))? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set<S: KvStore + ?Sized>(store: &mut S, proposal: &Proposal) -> Result<()> {
        let raw = serde_json::to_vec(proposal)?;
        store.set(&id_key(PENDING_TXS_PREFIX, proposal.id), &raw)?;
        Ok(())
    }

    pub fn remove<S: KvStore + ?Sized>(store: &mut S, id: u64) -> Result<()> {
        store.delete(&id_key(PENDING_TXS_PREFIX, id))?;
        Ok(())
    }

    /// Ids of all stored proposals, ascending
    pub fn ids<S: KvStore + ?Sized>(store: &S) -> Result<Vec<u64>> {
        store
            .scan_prefix(&[PENDING_TXS_PREFIX])?
            .into_iter()
            .map(|(key, _)| id_from_key(TABLE, &key).map_err(AccountError::from))
            .collect()
    }
}
