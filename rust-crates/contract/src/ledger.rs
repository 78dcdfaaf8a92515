use crate::types::Balance;
use serde::{
    Deserialize,
    Serialize,
};

/// Per-account betting totals. Created lazily on first interaction and never
/// deleted; the cumulative fields only grow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLedger {
    pub total_bet: Balance,
    pub total_won: Balance,
    pub total_lost: Balance,
    pub withdrawable_balance: Balance,
}

/// The escrowed-but-unresolved wager for one account. At most one exists per
/// account; settlement consumes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBet {
    pub game_id: String,
    pub amount: Balance,
    /// Block height at which the bet was opened, kept for audit trails and
    /// timeout tooling.
    pub opened_at: u64,
}
