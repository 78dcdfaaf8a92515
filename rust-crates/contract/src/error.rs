use crate::{
    ledger_store::StorageError,
    types::{
        AccountId,
        Balance,
    },
};
use thiserror::Error;

/// Contract-level failures. Every variant is a fail-closed rejection: the
/// operation that returned it has not mutated any ledger or pending-bet
/// state.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("attach a non-zero deposit to open a bet")]
    InvalidDeposit,

    #[error("account {account} already has a pending bet")]
    DuplicatePendingBet { account: AccountId },

    #[error("no pending bet for account {account}")]
    NoPendingBet { account: AccountId },

    #[error("account {caller} is not authorized for this call")]
    Unauthorized { caller: AccountId },

    #[error("account {account} has nothing to withdraw")]
    NothingToWithdraw { account: AccountId },

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure of the host value-transfer primitive. The withdrawable balance is
/// already zeroed and persisted by the time this can occur.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("transfer of {amount} to {to} failed: {reason}")]
    Failed {
        to: AccountId,
        amount: Balance,
        reason: String,
    },
}
