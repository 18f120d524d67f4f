//! Message routing for hosts that deliver requests as serialized messages

use super::engine::MultisigAccount;
use super::error::Result;
use super::executor::Executor;
use super::types::{CallContext, Payload, PendingView};
use crate::crypto::AddressCodec;
use crate::storage::KvStore;
use serde::{Deserialize, Serialize};

/// Name this account type registers under
pub const ACCOUNT_TYPE: &str = "mutisigcosmoverse";

/// Requests accepted by the account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountMsg {
    Init {
        signers: Vec<String>,
        #[serde(default)]
        signing_window: u64,
    },
    SubmitTx {
        transaction: Payload,
    },
    ApproveTx {
        transaction_id: u64,
    },
    QueryPendingTx {
        transaction_id: u64,
    },
}

/// Responses, one variant per request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountResponse {
    Init,
    SubmitTx { transaction_id: u64 },
    ApproveTx { executed: bool, failed: bool },
    QueryPendingTx(PendingView),
}

impl<S: KvStore, E: Executor, C: AddressCodec> MultisigAccount<S, E, C> {
    /// Route a message to its handler
    pub fn handle(&mut self, ctx: &CallContext, msg: AccountMsg) -> Result<AccountResponse> {
        match msg {
            AccountMsg::Init {
                signers,
                signing_window,
            } => {
                self.init(&signers, Some(signing_window))?;
                Ok(AccountResponse::Init)
            }
            AccountMsg::SubmitTx { transaction } => {
                let transaction_id = self.submit(ctx, transaction)?;
                Ok(AccountResponse::SubmitTx { transaction_id })
            }
            AccountMsg::ApproveTx { transaction_id } => {
                let result = self.approve(ctx, transaction_id)?;
                Ok(AccountResponse::ApproveTx {
                    executed: result.executed,
                    failed: result.failed,
                })
            }
            AccountMsg::QueryPendingTx { transaction_id } => Ok(AccountResponse::QueryPendingTx(
                self.query_pending(transaction_id)?,
            )),
        }
    }
}
