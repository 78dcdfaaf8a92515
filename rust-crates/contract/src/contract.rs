use crate::{
    error::{
        SettlementError,
        TransferError,
    },
    events::{
        BetLostEvent,
        BetOpenedEvent,
        BetWonEvent,
        ContractEvent,
        OracleChangedEvent,
        WithdrawalExecutedEvent,
    },
    ledger::{
        PendingBet,
        UserLedger,
    },
    ledger_store::LedgerStore,
    types::{
        AccountId,
        Balance,
        Outcome,
    },
};
use tracing::info;

/// Host call environment for one contract invocation: who called, what value
/// was attached, and the height the call executes at. The host platform runs
/// each call to completion as a single atomic unit, so the contract performs
/// no locking of its own.
#[derive(Clone, Debug)]
pub struct CallContext {
    pub caller: AccountId,
    pub attached_deposit: Balance,
    pub block_height: u64,
}

impl CallContext {
    pub fn new(caller: AccountId, block_height: u64) -> Self {
        Self {
            caller,
            attached_deposit: 0,
            block_height,
        }
    }

    pub fn with_deposit(
        caller: AccountId,
        attached_deposit: Balance,
        block_height: u64,
    ) -> Self {
        Self {
            caller,
            attached_deposit,
            block_height,
        }
    }
}

/// The host value-transfer primitive used by `withdraw`. Failure handling of
/// the transfer leg lives behind this seam; the contract only guarantees the
/// withdrawable balance is zeroed and persisted before `transfer` runs.
pub trait TransferSink {
    fn transfer(
        &mut self,
        to: &AccountId,
        amount: Balance,
    ) -> Result<(), TransferError>;
}

/// Bet-escrow settlement contract: one pending bet per account, payouts
/// bounded by the escrowed amount, withdrawals zeroed before transfer.
///
/// Every operation validates its preconditions before the first write, so an
/// error return means no ledger or pending-bet state changed.
pub struct SettlementContract<S> {
    store: S,
    owner: AccountId,
}

impl<S: LedgerStore> SettlementContract<S> {
    /// Wraps `store`, seeding the oracle slot if the store has never held
    /// one. Reopening an existing store keeps its oracle.
    pub fn new(
        store: S,
        owner: AccountId,
        oracle: AccountId,
    ) -> Result<Self, SettlementError> {
        let mut store = store;
        if store.oracle_account()?.is_none() {
            store.set_oracle_account(&oracle)?;
        }
        Ok(Self { store, owner })
    }

    /// Opens a bet for the caller, escrowing the attached deposit.
    pub fn open_bet(
        &mut self,
        ctx: &CallContext,
        game_id: impl Into<String>,
    ) -> Result<ContractEvent, SettlementError> {
        if ctx.attached_deposit == 0 {
            return Err(SettlementError::InvalidDeposit);
        }
        if self.store.pending_bet(&ctx.caller)?.is_some() {
            return Err(SettlementError::DuplicatePendingBet {
                account: ctx.caller.clone(),
            });
        }

        let bet = PendingBet {
            game_id: game_id.into(),
            amount: ctx.attached_deposit,
            opened_at: ctx.block_height,
        };
        self.store.set_pending_bet(&ctx.caller, &bet)?;
        // Ledger is created lazily so the account appears in stats from its
        // first bet onward.
        if self.store.ledger(&ctx.caller)?.is_none() {
            self.store.set_ledger(&ctx.caller, &UserLedger::default())?;
        }

        info!(
            account = %ctx.caller,
            game_id = %bet.game_id,
            amount = bet.amount,
            "bet opened"
        );
        Ok(ContractEvent::BetOpened(BetOpenedEvent {
            account: ctx.caller.clone(),
            game_id: bet.game_id,
            amount: bet.amount,
            block_height: bet.opened_at,
        }))
    }

    /// Settles the caller's own pending bet.
    pub fn resolve_game(
        &mut self,
        ctx: &CallContext,
        outcome: Outcome,
    ) -> Result<ContractEvent, SettlementError> {
        self.settle(&ctx.caller, outcome)
    }

    /// Oracle-gated settlement on behalf of `target`. The payout is still
    /// bounded by the target's escrowed pending bet; an oracle cannot credit
    /// an account that has nothing open.
    pub fn resolve_for(
        &mut self,
        ctx: &CallContext,
        target: &AccountId,
        outcome: Outcome,
    ) -> Result<ContractEvent, SettlementError> {
        let oracle = self.store.oracle_account()?;
        if oracle.as_ref() != Some(&ctx.caller) {
            return Err(SettlementError::Unauthorized {
                caller: ctx.caller.clone(),
            });
        }
        self.settle(target, outcome)
    }

    fn settle(
        &mut self,
        account: &AccountId,
        outcome: Outcome,
    ) -> Result<ContractEvent, SettlementError> {
        let pending = self.store.pending_bet(account)?.ok_or_else(|| {
            SettlementError::NoPendingBet {
                account: account.clone(),
            }
        })?;
        let mut ledger = self.store.ledger(account)?.unwrap_or_default();
        ledger.total_bet = ledger.total_bet.saturating_add(pending.amount);

        let event = match outcome {
            Outcome::Won(multiplier) => {
                let winnings = multiplier.winnings(pending.amount);
                ledger.total_won = ledger.total_won.saturating_add(winnings);
                ledger.withdrawable_balance =
                    ledger.withdrawable_balance.saturating_add(winnings);
                info!(
                    account = %account,
                    game_id = %pending.game_id,
                    amount = pending.amount,
                    %multiplier,
                    winnings,
                    "bet settled as win"
                );
                ContractEvent::BetWon(BetWonEvent {
                    account: account.clone(),
                    game_id: pending.game_id.clone(),
                    amount: pending.amount,
                    multiplier,
                    winnings,
                })
            }
            Outcome::Lost => {
                ledger.total_lost = ledger.total_lost.saturating_add(pending.amount);
                let house =
                    self.store.house_balance()?.saturating_add(pending.amount);
                self.store.set_house_balance(house)?;
                info!(
                    account = %account,
                    game_id = %pending.game_id,
                    amount = pending.amount,
                    "bet settled as loss"
                );
                ContractEvent::BetLost(BetLostEvent {
                    account: account.clone(),
                    game_id: pending.game_id.clone(),
                    amount: pending.amount,
                })
            }
        };

        self.store.remove_pending_bet(account)?;
        self.store.set_ledger(account, &ledger)?;
        Ok(event)
    }

    /// Moves the caller's withdrawable balance out through `sink`.
    ///
    /// Ordering is a hard invariant: the balance is zeroed and persisted
    /// before the outbound transfer is initiated, so a reentrant call can
    /// never observe a nonzero balance for funds already in flight.
    pub fn withdraw(
        &mut self,
        ctx: &CallContext,
        sink: &mut impl TransferSink,
    ) -> Result<ContractEvent, SettlementError> {
        let mut ledger = self.store.ledger(&ctx.caller)?.ok_or_else(|| {
            SettlementError::NothingToWithdraw {
                account: ctx.caller.clone(),
            }
        })?;
        let amount = ledger.withdrawable_balance;
        if amount == 0 {
            return Err(SettlementError::NothingToWithdraw {
                account: ctx.caller.clone(),
            });
        }

        ledger.withdrawable_balance = 0;
        self.store.set_ledger(&ctx.caller, &ledger)?;
        sink.transfer(&ctx.caller, amount)?;

        info!(account = %ctx.caller, amount, "withdrawal executed");
        Ok(ContractEvent::WithdrawalExecuted(WithdrawalExecutedEvent {
            account: ctx.caller.clone(),
            amount,
        }))
    }

    /// Replaces the authorized oracle identity. Owner only.
    pub fn set_oracle_account(
        &mut self,
        ctx: &CallContext,
        oracle: AccountId,
    ) -> Result<ContractEvent, SettlementError> {
        if ctx.caller != self.owner {
            return Err(SettlementError::Unauthorized {
                caller: ctx.caller.clone(),
            });
        }
        let previous = self
            .store
            .oracle_account()?
            .unwrap_or_else(|| self.owner.clone());
        self.store.set_oracle_account(&oracle)?;

        info!(previous = %previous, current = %oracle, "oracle account changed");
        Ok(ContractEvent::OracleChanged(OracleChangedEvent {
            previous,
            current: oracle,
        }))
    }

    pub fn user_stats(
        &self,
        account: &AccountId,
    ) -> Result<Option<UserLedger>, SettlementError> {
        Ok(self.store.ledger(account)?)
    }

    pub fn pending_bet(
        &self,
        account: &AccountId,
    ) -> Result<Option<PendingBet>, SettlementError> {
        Ok(self.store.pending_bet(account)?)
    }

    pub fn contract_total_losses(&self) -> Result<Balance, SettlementError> {
        Ok(self.store.house_balance()?)
    }

    pub fn oracle_account(&self) -> Result<AccountId, SettlementError> {
        Ok(self
            .store
            .oracle_account()?
            .unwrap_or_else(|| self.owner.clone()))
    }

    pub fn total_users(&self) -> Result<u64, SettlementError> {
        Ok(self.store.total_accounts()?)
    }
}
