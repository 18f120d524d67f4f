//! Multisig account lifecycle
//!
//! Ties the signer registry, sequence, proposal ledger and approval index
//! together: init, submit, approve (with expiry and quorum-triggered
//! execution) and the read-only queries. Each mutating call runs inside one
//! [`Overlay`] and commits once, so a failed call leaves no trace.

use super::approvals::ApprovalIndex;
use super::error::{AccountError, Result};
use super::executor::Executor;
use super::ledger::ProposalLedger;
use super::registry::SignerRegistry;
use super::sequence::Sequence;
use super::types::{ApproveResult, CallContext, Payload, PendingView, Proposal};
use super::{DEFAULT_APPROVAL_WINDOW, MIN_SIGNERS};
use crate::crypto::{AddressCodec, Base58Codec};
use crate::storage::{KvStore, Overlay};
use std::collections::HashSet;

/// A unanimous multisig account over a key-value store
pub struct MultisigAccount<S, E, C = Base58Codec> {
    store: S,
    executor: E,
    codec: C,
}

impl<S: KvStore, E: Executor> MultisigAccount<S, E, Base58Codec> {
    /// Create an account using the default Base58Check address codec
    pub fn new(store: S, executor: E) -> Self {
        Self::with_codec(store, executor, Base58Codec)
    }
}

impl<S: KvStore, E: Executor, C: AddressCodec> MultisigAccount<S, E, C> {
    /// Create an account with a custom address codec
    pub fn with_codec(store: S, executor: E, codec: C) -> Self {
        Self {
            store,
            executor,
            codec,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Release the underlying store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Configure the signer set and approval window
    ///
    /// Every distinct signer must approve a proposal before it executes.
    /// A `window` of zero or `None` selects [`DEFAULT_APPROVAL_WINDOW`].
    /// Calling this again overwrites the configuration without touching
    /// proposals.
    pub fn init(&mut self, signers: &[String], window: Option<u64>) -> Result<()> {
        if signers.len() < MIN_SIGNERS {
            return Err(AccountError::InvalidConfig(format!(
                "multisig must have at least {} signers, got {}",
                MIN_SIGNERS,
                signers.len()
            )));
        }

        let window = match window {
            Some(w) if w > 0 => w,
            _ => DEFAULT_APPROVAL_WINDOW,
        };

        // Repeated addresses collapse into one signer
        let mut distinct = Vec::with_capacity(signers.len());
        let mut seen = HashSet::with_capacity(signers.len());
        for signer in signers {
            let addr = self.codec.string_to_bytes(signer)?;
            if seen.insert(addr.clone()) {
                distinct.push(addr);
            }
        }

        if distinct.len() < MIN_SIGNERS {
            return Err(AccountError::InvalidConfig(format!(
                "multisig must have at least {} distinct signers, got {}",
                MIN_SIGNERS,
                distinct.len()
            )));
        }

        let mut tx = Overlay::new(&mut self.store);
        SignerRegistry::set_window(&mut tx, window)?;
        SignerRegistry::set_required(&mut tx, distinct.len() as u64)?;
        for addr in &distinct {
            SignerRegistry::add_signer(&mut tx, addr)?;
        }
        tx.commit()?;

        log::info!(
            "Multisig initialized: {}-of-{} signers, window {} blocks",
            distinct.len(),
            distinct.len(),
            window
        );
        Ok(())
    }

    /// Submit a payload for approval; the caller's approval is implied
    pub fn submit(&mut self, ctx: &CallContext, payload: Payload) -> Result<u64> {
        let sender = ctx.sender();
        let mut tx = Overlay::new(&mut self.store);

        if !SignerRegistry::is_signer(&tx, sender)? {
            return Err(AccountError::Unauthorized(describe(&self.codec, sender)));
        }

        let id = Sequence::next(&mut tx)?;
        let sender_str = self.codec.bytes_to_string(sender)?;
        let height = ctx.height();
        let window = SignerRegistry::window(&tx)?;

        let proposal = Proposal {
            id,
            payload,
            approvers: vec![sender_str.clone()],
            submitted_at: height,
            expires_at: height.saturating_add(window),
            initiator: sender_str,
        };

        ProposalLedger::set(&mut tx, &proposal)?;
        ApprovalIndex::mark(&mut tx, id, sender)?;
        tx.commit()?;

        log::info!(
            "Transaction {} submitted by {} at height {}, expires at {}",
            id,
            proposal.initiator,
            proposal.submitted_at,
            proposal.expires_at
        );
        Ok(id)
    }

    /// Record the caller's approval, executing the payload on quorum
    ///
    /// An approval arriving after `expires_at` removes the proposal and
    /// returns [`AccountError::Expired`]; that removal is committed. On
    /// quorum the approval and cleanup are committed first and the executor
    /// runs only once that commit has succeeded.
    pub fn approve(&mut self, ctx: &CallContext, id: u64) -> Result<ApproveResult> {
        let sender = ctx.sender();
        let mut tx = Overlay::new(&mut self.store);

        if !SignerRegistry::is_signer(&tx, sender)? {
            return Err(AccountError::Unauthorized(describe(&self.codec, sender)));
        }

        let mut pending = ProposalLedger::get(&tx, id)?.ok_or(AccountError::NotFound(id))?;

        if ApprovalIndex::has_approved(&tx, id, sender)? {
            return Err(AccountError::AlreadyApproved {
                id,
                signer: describe(&self.codec, sender),
            });
        }

        let height = ctx.height();
        if pending.is_expired_at(height) {
            cleanup(&mut tx, id)?;
            tx.commit()?;
            log::warn!(
                "Transaction {} expired at height {} (now {}), removed",
                id,
                pending.expires_at,
                height
            );
            return Err(AccountError::Expired {
                id,
                height,
                expires_at: pending.expires_at,
            });
        }

        ApprovalIndex::mark(&mut tx, id, sender)?;
        let sender_str = self.codec.bytes_to_string(sender)?;
        log::debug!("Transaction {} approved by {}", id, sender_str);
        pending.approvers.push(sender_str);
        ProposalLedger::set(&mut tx, &pending)?;

        let required = SignerRegistry::required(&tx)?;

        if pending.approvers.len() as u64 == required {
            // State is final before anything runs downstream
            cleanup(&mut tx, id)?;
            tx.commit()?;

            let outcome = self.executor.execute(&pending.payload);
            match &outcome {
                Ok(()) => log::info!("Transaction {} reached quorum and executed", id),
                Err(e) => log::warn!("Transaction {} reached quorum but {}", id, e),
            }

            return Ok(ApproveResult {
                executed: true,
                failed: outcome.is_ok(),
            });
        }

        tx.commit()?;
        Ok(ApproveResult {
            executed: false,
            failed: false,
        })
    }

    /// Inspect an in-flight proposal
    ///
    /// Approvers come from the approval index rather than the cached list,
    /// and `expires_at` uses the window configured now, not at submission.
    pub fn query_pending(&self, id: u64) -> Result<PendingView> {
        let pending = ProposalLedger::get(&self.store, id)?.ok_or(AccountError::NotFound(id))?;

        let approvers = ApprovalIndex::approvers(&self.store, id)?
            .iter()
            .map(|addr| self.codec.bytes_to_string(addr).map_err(AccountError::from))
            .collect::<Result<Vec<_>>>()?;

        let window = SignerRegistry::window(&self.store)?;

        Ok(PendingView {
            payload: pending.payload,
            approvers,
            submitted_at: pending.submitted_at,
            expires_at: pending.submitted_at.saturating_add(window),
            initiator: pending.initiator,
        })
    }

    /// The stored proposal record, if any
    pub fn proposal(&self, id: u64) -> Result<Option<Proposal>> {
        ProposalLedger::get(&self.store, id)
    }

    /// Ids of every in-flight proposal, ascending
    pub fn pending_ids(&self) -> Result<Vec<u64>> {
        ProposalLedger::ids(&self.store)
    }

    /// Registered signer addresses in key order
    pub fn signers(&self) -> Result<Vec<String>> {
        SignerRegistry::signers(&self.store)?
            .iter()
            .map(|addr| self.codec.bytes_to_string(addr).map_err(AccountError::from))
            .collect()
    }

    pub fn is_signer(&self, address: &str) -> Result<bool> {
        let addr = self.codec.string_to_bytes(address)?;
        SignerRegistry::is_signer(&self.store, &addr)
    }

    pub fn required_approvals(&self) -> Result<u64> {
        SignerRegistry::required(&self.store)
    }

    pub fn approval_window(&self) -> Result<u64> {
        SignerRegistry::window(&self.store)
    }
}

/// Remove a proposal and all of its approval marks
fn cleanup<T: KvStore + ?Sized>(store: &mut T, id: u64) -> Result<()> {
    ProposalLedger::remove(store, id)?;
    let marks = ApprovalIndex::clear(store, id)?;
    log::debug!("Cleaned up transaction {} ({} approval marks)", id, marks);
    Ok(())
}

/// Render a caller identity for error messages
fn describe<C: AddressCodec>(codec: &C, sender: &[u8]) -> String {
    codec
        .bytes_to_string(sender)
        .unwrap_or_else(|_| hex::encode(sender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::ExecutionError;
    use crate::storage::{MemoryStore, StorageError, WriteOp};
    use std::collections::BTreeSet;

    /// Executor that records payloads and fails when told to
    #[derive(Default)]
    struct MockExecutor {
        calls: Vec<Payload>,
        fail: bool,
    }

    impl Executor for MockExecutor {
        fn execute(&mut self, payload: &Payload) -> std::result::Result<(), ExecutionError> {
            self.calls.push(payload.clone());
            if self.fail {
                Err(ExecutionError("downstream rejected".to_string()))
            } else {
                Ok(())
            }
        }
    }

    type TestAccount = MultisigAccount<MemoryStore, MockExecutor>;

    fn addr(n: u8) -> String {
        Base58Codec.bytes_to_string(&[n; 20]).unwrap()
    }

    fn ctx(n: u8, height: u64) -> CallContext {
        CallContext::new(vec![n; 20], height)
    }

    fn payload() -> Payload {
        Payload::new("/bank.MsgSend", b"send 10 to carol".to_vec())
    }

    /// Signers A=1, B=2, C=3 with a 10-block window
    fn setup() -> TestAccount {
        let mut account = MultisigAccount::new(MemoryStore::new(), MockExecutor::default());
        account
            .init(&[addr(1), addr(2), addr(3)], Some(10))
            .unwrap();
        account
    }

    fn approver_set(list: &[String]) -> BTreeSet<String> {
        list.iter().cloned().collect()
    }

    #[test]
    fn test_init_requires_two_signers() {
        let mut account = MultisigAccount::new(MemoryStore::new(), MockExecutor::default());

        assert!(matches!(
            account.init(&[], None),
            Err(AccountError::InvalidConfig(_))
        ));
        assert!(matches!(
            account.init(&[addr(1)], None),
            Err(AccountError::InvalidConfig(_))
        ));
        assert!(account.store().is_empty());
    }

    #[test]
    fn test_init_configures_unanimity() {
        let account = setup();
        assert_eq!(account.required_approvals().unwrap(), 3);
        assert_eq!(account.signers().unwrap().len(), 3);
        assert_eq!(account.approval_window().unwrap(), 10);
        assert!(account.is_signer(&addr(2)).unwrap());
        assert!(!account.is_signer(&addr(9)).unwrap());
    }

    #[test]
    fn test_init_default_window() {
        let mut account = MultisigAccount::new(MemoryStore::new(), MockExecutor::default());
        account.init(&[addr(1), addr(2)], None).unwrap();
        assert_eq!(account.approval_window().unwrap(), DEFAULT_APPROVAL_WINDOW);

        account.init(&[addr(1), addr(2)], Some(0)).unwrap();
        assert_eq!(account.approval_window().unwrap(), 20);
    }

    #[test]
    fn test_init_bad_address_is_all_or_nothing() {
        let mut account = MultisigAccount::new(MemoryStore::new(), MockExecutor::default());
        let result = account.init(&[addr(1), "not-an-address".to_string()], Some(5));

        assert!(matches!(result, Err(AccountError::InvalidAddress(_))));
        assert!(account.store().is_empty());
    }

    #[test]
    fn test_init_needs_two_distinct_signers() {
        let mut account = MultisigAccount::new(MemoryStore::new(), MockExecutor::default());
        let result = account.init(&[addr(1), addr(1)], None);

        assert!(matches!(result, Err(AccountError::InvalidConfig(_))));
        assert!(account.store().is_empty());
    }

    #[test]
    fn test_init_collapses_repeated_signers() {
        let mut account = MultisigAccount::new(MemoryStore::new(), MockExecutor::default());
        account
            .init(&[addr(1), addr(1), addr(2)], Some(10))
            .unwrap();

        assert_eq!(account.signers().unwrap().len(), 2);
        assert_eq!(account.required_approvals().unwrap(), 2);

        // Quorum is reachable with the two distinct signers
        let id = account.submit(&ctx(1, 100), payload()).unwrap();
        let result = account.approve(&ctx(2, 101), id).unwrap();
        assert!(result.executed);
        assert_eq!(account.executor().calls.len(), 1);
    }

    #[test]
    fn test_submit_by_non_signer() {
        let mut account = setup();
        let before = account.store().clone();

        let result = account.submit(&ctx(9, 100), payload());
        assert!(matches!(result, Err(AccountError::Unauthorized(_))));
        assert_eq!(account.store(), &before);
        assert!(account.pending_ids().unwrap().is_empty());
    }

    #[test]
    fn test_submit_records_initiator_approval() {
        let mut account = setup();
        let id = account.submit(&ctx(1, 100), payload()).unwrap();
        assert_eq!(id, 1);

        let proposal = account.proposal(id).unwrap().unwrap();
        assert_eq!(proposal.approvers, vec![addr(1)]);
        assert_eq!(proposal.initiator, addr(1));
        assert_eq!(proposal.submitted_at, 100);
        assert_eq!(proposal.expires_at, 110);
        assert_eq!(proposal.payload, payload());

        assert_eq!(
            ApprovalIndex::approvers(account.store(), id).unwrap(),
            vec![vec![1u8; 20]]
        );
        assert!(account.executor().calls.is_empty());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut account = setup();
        let first = account.submit(&ctx(1, 100), payload()).unwrap();
        account.approve(&ctx(2, 101), first).unwrap();
        account.approve(&ctx(3, 102), first).unwrap();

        let second = account.submit(&ctx(2, 103), payload()).unwrap();
        assert_eq!(second, first + 1);
        assert_eq!(account.pending_ids().unwrap(), vec![second]);
    }

    #[test]
    fn test_approve_rejects_unauthorized_and_missing() {
        let mut account = setup();
        let id = account.submit(&ctx(1, 100), payload()).unwrap();

        assert!(matches!(
            account.approve(&ctx(9, 101), id),
            Err(AccountError::Unauthorized(_))
        ));
        assert!(matches!(
            account.approve(&ctx(2, 101), 42),
            Err(AccountError::NotFound(42))
        ));
    }

    #[test]
    fn test_duplicate_approval() {
        let mut account = setup();
        let id = account.submit(&ctx(1, 100), payload()).unwrap();

        // Initiator already approved at submission
        assert!(matches!(
            account.approve(&ctx(1, 101), id),
            Err(AccountError::AlreadyApproved { .. })
        ));

        account.approve(&ctx(2, 101), id).unwrap();
        assert!(matches!(
            account.approve(&ctx(2, 102), id),
            Err(AccountError::AlreadyApproved { .. })
        ));
        assert_eq!(account.proposal(id).unwrap().unwrap().approval_count(), 2);
    }

    #[test]
    fn test_three_signer_scenario() {
        let mut account = setup();

        let id = account.submit(&ctx(1, 100), payload()).unwrap();
        assert_eq!(id, 1);
        assert_eq!(account.query_pending(id).unwrap().expires_at, 110);

        let result = account.approve(&ctx(2, 105), id).unwrap();
        assert!(!result.executed);
        assert_eq!(
            account.proposal(id).unwrap().unwrap().approvers,
            vec![addr(1), addr(2)]
        );

        let result = account.approve(&ctx(3, 107), id).unwrap();
        assert!(result.executed);
        assert!(result.failed);
        assert_eq!(account.executor().calls, vec![payload()]);

        assert!(matches!(
            account.query_pending(id),
            Err(AccountError::NotFound(1))
        ));
        assert!(ApprovalIndex::approvers(account.store(), id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_execution_failure_still_cleans_up() {
        let mut account = setup();
        let id = account.submit(&ctx(1, 100), payload()).unwrap();
        account.approve(&ctx(2, 101), id).unwrap();

        account.executor.fail = true;
        let result = account.approve(&ctx(3, 102), id).unwrap();

        assert!(result.executed);
        assert!(!result.failed);
        assert_eq!(account.executor().calls.len(), 1);
        assert!(account.proposal(id).unwrap().is_none());
        assert!(ApprovalIndex::approvers(account.store(), id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_approval_on_last_valid_height() {
        let mut account = setup();
        let id = account.submit(&ctx(1, 100), payload()).unwrap();

        let result = account.approve(&ctx(2, 110), id).unwrap();
        assert!(!result.executed);
    }

    #[test]
    fn test_expired_approval_cleans_up() {
        let mut account = setup();
        let id = account.submit(&ctx(1, 100), payload()).unwrap();

        let result = account.approve(&ctx(2, 111), id);
        assert!(matches!(
            result,
            Err(AccountError::Expired {
                id: 1,
                height: 111,
                expires_at: 110
            })
        ));

        assert!(matches!(
            account.query_pending(id),
            Err(AccountError::NotFound(1))
        ));
        assert!(ApprovalIndex::approvers(account.store(), id)
            .unwrap()
            .is_empty());
        assert!(account.executor().calls.is_empty());
    }

    #[test]
    fn test_expiry_leaves_other_proposals() {
        let mut account = setup();
        let old = account.submit(&ctx(1, 100), payload()).unwrap();
        let fresh = account.submit(&ctx(2, 108), payload()).unwrap();

        assert!(account.approve(&ctx(3, 115), old).is_err());
        assert_eq!(account.pending_ids().unwrap(), vec![fresh]);
        assert_eq!(
            account.query_pending(fresh).unwrap().approvers,
            vec![addr(2)]
        );
    }

    #[test]
    fn test_query_matches_cached_approvers() {
        let mut account = setup();
        let id = account.submit(&ctx(3, 100), payload()).unwrap();

        let check = |account: &TestAccount| {
            let view = account.query_pending(id).unwrap();
            let cached = account.proposal(id).unwrap().unwrap();
            assert_eq!(approver_set(&view.approvers), approver_set(&cached.approvers));
        };

        check(&account);
        account.approve(&ctx(1, 101), id).unwrap();
        check(&account);

        let view = account.query_pending(id).unwrap();
        assert_eq!(view.initiator, addr(3));
        assert_eq!(view.payload, payload());
        assert_eq!(view.submitted_at, 100);
    }

    #[test]
    fn test_query_reports_live_window() {
        let mut account = setup();
        let id = account.submit(&ctx(1, 100), payload()).unwrap();

        // Re-running init widens the window for reads only; enforcement
        // still uses the expiry stored at submission.
        account
            .init(&[addr(1), addr(2), addr(3)], Some(50))
            .unwrap();

        assert_eq!(account.query_pending(id).unwrap().expires_at, 150);
        assert_eq!(account.proposal(id).unwrap().unwrap().expires_at, 110);
        assert!(matches!(
            account.approve(&ctx(2, 111), id),
            Err(AccountError::Expired { .. })
        ));
    }

    #[test]
    fn test_two_of_two_executes_on_second_approval() {
        let mut account = MultisigAccount::new(MemoryStore::new(), MockExecutor::default());
        account.init(&[addr(1), addr(2)], None).unwrap();

        let id = account.submit(&ctx(2, 1), payload()).unwrap();
        let result = account.approve(&ctx(1, 21), id).unwrap();

        assert!(result.executed);
        assert_eq!(account.executor().calls.len(), 1);
        assert!(account.pending_ids().unwrap().is_empty());
    }

    /// Memory store whose next batch commit can be made to fail
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_next_batch: bool,
    }

    impl KvStore for FlakyStore {
        fn get(&self, key: &[u8]) -> std::result::Result<Option<Vec<u8>>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &[u8], value: &[u8]) -> std::result::Result<(), StorageError> {
            self.inner.set(key, value)
        }

        fn delete(&mut self, key: &[u8]) -> std::result::Result<(), StorageError> {
            self.inner.delete(key)
        }

        fn scan_prefix(
            &self,
            prefix: &[u8],
        ) -> std::result::Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
            self.inner.scan_prefix(prefix)
        }

        fn write_batch(&mut self, batch: Vec<WriteOp>) -> std::result::Result<(), StorageError> {
            if self.fail_next_batch {
                self.fail_next_batch = false;
                return Err(StorageError::InvalidData("disk full".to_string()));
            }
            self.inner.write_batch(batch)
        }
    }

    fn flaky_account(signers: &[String]) -> MultisigAccount<FlakyStore, MockExecutor> {
        let mut account = MultisigAccount::new(FlakyStore::default(), MockExecutor::default());
        account.init(signers, Some(10)).unwrap();
        account
    }

    #[test]
    fn test_failed_commit_on_submit_changes_nothing() {
        let mut account = flaky_account(&[addr(1), addr(2)]);
        let before = account.store().inner.clone();

        account.store.fail_next_batch = true;
        assert!(matches!(
            account.submit(&ctx(1, 100), payload()),
            Err(AccountError::Storage(_))
        ));

        assert_eq!(account.store().inner, before);
        assert!(account.pending_ids().unwrap().is_empty());
        assert_eq!(Sequence::peek(account.store()).unwrap(), 1);

        assert_eq!(account.submit(&ctx(1, 100), payload()).unwrap(), 1);
    }

    #[test]
    fn test_failed_commit_on_approval_changes_nothing() {
        let mut account = flaky_account(&[addr(1), addr(2), addr(3)]);
        let id = account.submit(&ctx(1, 100), payload()).unwrap();
        let before = account.store().inner.clone();

        account.store.fail_next_batch = true;
        assert!(account.approve(&ctx(2, 101), id).is_err());

        assert_eq!(account.store().inner, before);
        assert_eq!(
            ApprovalIndex::approvers(account.store(), id).unwrap(),
            vec![vec![1u8; 20]]
        );
        assert_eq!(account.proposal(id).unwrap().unwrap().approvers, vec![addr(1)]);
        assert_eq!(Sequence::peek(account.store()).unwrap(), 2);

        let result = account.approve(&ctx(2, 102), id).unwrap();
        assert!(!result.executed);
        assert_eq!(account.proposal(id).unwrap().unwrap().approval_count(), 2);
    }

    #[test]
    fn test_failed_commit_on_quorum_does_not_execute() {
        let mut account = flaky_account(&[addr(1), addr(2)]);
        let id = account.submit(&ctx(1, 100), payload()).unwrap();
        let before = account.store().inner.clone();

        account.store.fail_next_batch = true;
        assert!(matches!(
            account.approve(&ctx(2, 101), id),
            Err(AccountError::Storage(_))
        ));

        assert!(account.executor().calls.is_empty());
        assert_eq!(account.store().inner, before);
        assert_eq!(account.pending_ids().unwrap(), vec![id]);
        assert!(!ApprovalIndex::has_approved(account.store(), id, &[2u8; 20]).unwrap());

        let result = account.approve(&ctx(2, 102), id).unwrap();
        assert!(result.executed);
        assert_eq!(account.executor().calls, vec![payload()]);
        assert!(account.pending_ids().unwrap().is_empty());

        assert!(matches!(
            account.approve(&ctx(2, 103), id),
            Err(AccountError::NotFound(_))
        ));
        assert_eq!(account.executor().calls.len(), 1);
    }
}
