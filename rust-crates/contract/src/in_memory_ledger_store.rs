use crate::{
    ledger::{
        PendingBet,
        UserLedger,
    },
    ledger_store::{
        LedgerStore,
        StorageError,
    },
    types::{
        AccountId,
        Balance,
    },
};
use std::collections::HashMap;

/// HashMap-backed store for tests and the in-process transport.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLedgerStore {
    ledgers: HashMap<AccountId, UserLedger>,
    pending_bets: HashMap<AccountId, PendingBet>,
    house_balance: Balance,
    oracle_account: Option<AccountId>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn ledger(&self, account: &AccountId) -> Result<Option<UserLedger>, StorageError> {
        Ok(self.ledgers.get(account).cloned())
    }

    fn set_ledger(
        &mut self,
        account: &AccountId,
        ledger: &UserLedger,
    ) -> Result<(), StorageError> {
        self.ledgers.insert(account.clone(), ledger.clone());
        Ok(())
    }

    fn pending_bet(
        &self,
        account: &AccountId,
    ) -> Result<Option<PendingBet>, StorageError> {
        Ok(self.pending_bets.get(account).cloned())
    }

    fn set_pending_bet(
        &mut self,
        account: &AccountId,
        bet: &PendingBet,
    ) -> Result<(), StorageError> {
        self.pending_bets.insert(account.clone(), bet.clone());
        Ok(())
    }

    fn remove_pending_bet(&mut self, account: &AccountId) -> Result<(), StorageError> {
        self.pending_bets.remove(account);
        Ok(())
    }

    fn house_balance(&self) -> Result<Balance, StorageError> {
        Ok(self.house_balance)
    }

    fn set_house_balance(&mut self, balance: Balance) -> Result<(), StorageError> {
        self.house_balance = balance;
        Ok(())
    }

    fn oracle_account(&self) -> Result<Option<AccountId>, StorageError> {
        Ok(self.oracle_account.clone())
    }

    fn set_oracle_account(&mut self, account: &AccountId) -> Result<(), StorageError> {
        self.oracle_account = Some(account.clone());
        Ok(())
    }

    fn total_accounts(&self) -> Result<u64, StorageError> {
        Ok(self.ledgers.len() as u64)
    }
}
