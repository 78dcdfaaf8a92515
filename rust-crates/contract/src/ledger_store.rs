use crate::{
    ledger::{
        PendingBet,
        UserLedger,
    },
    types::{
        AccountId,
        Balance,
    },
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("failed to encode or decode stored record: {0}")]
    Codec(String),
}

/// Persistent state behind the settlement contract: account ledgers, pending
/// bets, and the single-slot contract metadata (house balance, oracle).
pub trait LedgerStore {
    fn ledger(&self, account: &AccountId) -> Result<Option<UserLedger>, StorageError>;

    fn set_ledger(
        &mut self,
        account: &AccountId,
        ledger: &UserLedger,
    ) -> Result<(), StorageError>;

    fn pending_bet(
        &self,
        account: &AccountId,
    ) -> Result<Option<PendingBet>, StorageError>;

    fn set_pending_bet(
        &mut self,
        account: &AccountId,
        bet: &PendingBet,
    ) -> Result<(), StorageError>;

    fn remove_pending_bet(&mut self, account: &AccountId) -> Result<(), StorageError>;

    /// Aggregate forfeited to the house across all accounts.
    fn house_balance(&self) -> Result<Balance, StorageError>;

    fn set_house_balance(&mut self, balance: Balance) -> Result<(), StorageError>;

    fn oracle_account(&self) -> Result<Option<AccountId>, StorageError>;

    fn set_oracle_account(&mut self, account: &AccountId) -> Result<(), StorageError>;

    /// Number of accounts with a ledger record.
    fn total_accounts(&self) -> Result<u64, StorageError>;
}
