//! CLI commands for the multisig account
//!
//! Each command opens the account from the data directory, runs one
//! operation and lets the file store persist the committed state.

use crate::account::{AccountError, CallContext, LoggingExecutor, MultisigAccount, Payload};
use crate::crypto::KeyPair;
use crate::storage::{FileStore, StorageConfig};
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub account: MultisigAccount<FileStore, LoggingExecutor>,
}

impl AppState {
    /// Open the account stored under `data_dir`
    pub fn new(data_dir: &Path) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.to_path_buf(),
            ..Default::default()
        };
        let store = FileStore::open(storage_config)?;

        Ok(Self {
            account: MultisigAccount::new(store, LoggingExecutor::new()),
        })
    }

    fn context(&self, address: &str, height: u64) -> CliResult<CallContext> {
        Ok(CallContext::from_address(
            self.account.codec(),
            address,
            height,
        )?)
    }
}

/// Generate a new signer identity, or show the one behind an existing key
pub fn cmd_keygen(from_hex: Option<&str>) -> CliResult<KeyPair> {
    let key_pair = match from_hex {
        Some(hex_key) => KeyPair::from_private_key_hex(hex_key)?,
        None => KeyPair::generate(),
    };

    if from_hex.is_some() {
        println!("🔐 Signer identity");
    } else {
        println!("🔐 New signer identity");
    }
    println!("   📍 Address: {}", key_pair.address());
    println!("   🔑 Public Key: {}", key_pair.public_key_hex());
    if from_hex.is_none() {
        println!("   🗝️  Private Key: {}", key_pair.private_key_hex());
        println!("\n   ⚠️  Store the private key somewhere safe; it is not saved.");
    }

    Ok(key_pair)
}

/// Configure the signer set
pub fn cmd_init(state: &mut AppState, signers: &[String], window: Option<u64>) -> CliResult<()> {
    state.account.init(signers, window)?;

    println!("✅ Multisig account initialized!");
    println!(
        "   👥 Signers ({} required):",
        state.account.required_approvals()?
    );
    for signer in state.account.signers()? {
        println!("   └─ {}", signer);
    }
    println!(
        "   ⏳ Approval window: {} blocks",
        state.account.approval_window()?
    );

    Ok(())
}

/// Submit a new proposal
pub fn cmd_submit(
    state: &mut AppState,
    from: &str,
    height: u64,
    type_url: &str,
    value_hex: &str,
) -> CliResult<u64> {
    let value = hex::decode(value_hex)?;
    let ctx = state.context(from, height)?;
    let id = state.account.submit(&ctx, Payload::new(type_url, value))?;

    println!("📝 Transaction {} submitted by {}", id, from);
    if let Some(proposal) = state.account.proposal(id)? {
        println!("   ⏳ Expires at block {}", proposal.expires_at);
        println!(
            "   ✍️  Approvals: {}/{}",
            proposal.approval_count(),
            state.account.required_approvals()?
        );
    }

    Ok(id)
}

/// Approve a proposal
pub fn cmd_approve(state: &mut AppState, from: &str, height: u64, id: u64) -> CliResult<()> {
    let ctx = state.context(from, height)?;

    match state.account.approve(&ctx, id) {
        Ok(result) if result.executed => {
            println!("🚀 Transaction {} reached quorum and was dispatched", id);
            println!("   executed: {}, failed: {}", result.executed, result.failed);
        }
        Ok(_) => {
            let proposal = state.account.proposal(id)?;
            let count = proposal.map(|p| p.approval_count()).unwrap_or_default();
            println!("✍️  Approval recorded for transaction {}", id);
            println!(
                "   Approvals: {}/{}",
                count,
                state.account.required_approvals()?
            );
        }
        Err(e @ AccountError::Expired { .. }) => {
            println!("⌛ Transaction {} expired and was removed", id);
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// Show a pending proposal
pub fn cmd_query(state: &AppState, id: u64) -> CliResult<()> {
    let view = state.account.query_pending(id)?;

    println!("📄 Transaction {}", id);
    println!("   Type: {}", view.payload.type_url);
    println!("   Value: {}", hex::encode(&view.payload.value));
    println!("   Initiated by: {}", view.initiator);
    println!("   Submitted at block: {}", view.submitted_at);
    println!("   Expires at block: {}", view.expires_at);
    println!("   Approvals:");
    for approver in &view.approvers {
        println!("   └─ {}", approver);
    }

    Ok(())
}

/// List pending proposals
pub fn cmd_list(state: &AppState) -> CliResult<()> {
    let ids = state.account.pending_ids()?;

    if ids.is_empty() {
        println!("📭 No pending transactions.");
        return Ok(());
    }

    let required = state.account.required_approvals()?;
    println!("📋 Pending transactions ({}):", ids.len());
    for id in ids {
        if let Some(proposal) = state.account.proposal(id)? {
            println!(
                "   {} - {} ({}/{} approvals, expires at {})",
                id,
                proposal.payload.type_url,
                proposal.approval_count(),
                required,
                proposal.expires_at
            );
        }
    }

    Ok(())
}
