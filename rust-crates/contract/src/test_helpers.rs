//! Shared fixtures for unit and integration tests.

use crate::{
    contract::{
        CallContext,
        SettlementContract,
        TransferSink,
    },
    error::TransferError,
    in_memory_ledger_store::InMemoryLedgerStore,
    types::{
        AccountId,
        Balance,
    },
};

pub const TEST_BLOCK_HEIGHT: u64 = 100;

/// Records outbound transfers instead of moving funds.
#[derive(Debug, Default)]
pub struct RecordingTransferSink {
    pub transfers: Vec<(AccountId, Balance)>,
}

impl TransferSink for RecordingTransferSink {
    fn transfer(
        &mut self,
        to: &AccountId,
        amount: Balance,
    ) -> Result<(), TransferError> {
        self.transfers.push((to.clone(), amount));
        Ok(())
    }
}

/// Always fails, for exercising the zero-before-transfer ordering.
#[derive(Debug, Default)]
pub struct FailingTransferSink;

impl TransferSink for FailingTransferSink {
    fn transfer(
        &mut self,
        to: &AccountId,
        amount: Balance,
    ) -> Result<(), TransferError> {
        Err(TransferError::Failed {
            to: to.clone(),
            amount,
            reason: "sink offline".to_string(),
        })
    }
}

pub fn owner() -> AccountId {
    AccountId::from("house.testnet")
}

pub fn oracle() -> AccountId {
    AccountId::from("oracle.testnet")
}

pub fn alice() -> AccountId {
    AccountId::from("alice.testnet")
}

pub fn test_contract() -> SettlementContract<InMemoryLedgerStore> {
    SettlementContract::new(InMemoryLedgerStore::new(), owner(), oracle())
        .expect("in-memory store cannot fail")
}

pub fn call_ctx(caller: &AccountId) -> CallContext {
    CallContext::new(caller.clone(), TEST_BLOCK_HEIGHT)
}

pub fn deposit_ctx(caller: &AccountId, amount: Balance) -> CallContext {
    CallContext::with_deposit(caller.clone(), amount, TEST_BLOCK_HEIGHT)
}
