use crate::types::{
    AccountId,
    Balance,
    Multiplier,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Audit record emitted by every successful mutating contract call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    BetOpened(BetOpenedEvent),
    BetWon(BetWonEvent),
    BetLost(BetLostEvent),
    WithdrawalExecuted(WithdrawalExecutedEvent),
    OracleChanged(OracleChangedEvent),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetOpenedEvent {
    pub account: AccountId,
    pub game_id: String,
    pub amount: Balance,
    pub block_height: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetWonEvent {
    pub account: AccountId,
    pub game_id: String,
    pub amount: Balance,
    pub multiplier: Multiplier,
    pub winnings: Balance,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLostEvent {
    pub account: AccountId,
    pub game_id: String,
    pub amount: Balance,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalExecutedEvent {
    pub account: AccountId,
    pub amount: Balance,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleChangedEvent {
    pub previous: AccountId,
    pub current: AccountId,
}
