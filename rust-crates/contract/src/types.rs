use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;

/// Human-readable account identifier, e.g. `alice.testnet`.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Amounts in the smallest on-chain unit.
pub type Balance = u128;

/// Win multiplier with two decimal places of precision, stored as hundredths.
/// `Multiplier::from_hundredths(250)` is a 2.5x payout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiplier(u32);

impl Multiplier {
    pub fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    /// Converts a boundary-supplied float, flooring to hundredths. Returns
    /// `None` for values that cannot represent a payout multiplier.
    pub fn from_float(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let hundredths = (value * 100.0).floor();
        if hundredths > u32::MAX as f64 {
            return None;
        }
        Some(Self(hundredths as u32))
    }

    pub fn hundredths(self) -> u32 {
        self.0
    }

    /// Payout for `amount`: floor(amount * hundredths / 100), all in integer
    /// arithmetic so results are reproducible bit for bit.
    pub fn winnings(self, amount: Balance) -> Balance {
        amount.saturating_mul(self.0 as Balance) / 100
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}x", self.0 / 100, self.0 % 100)
    }
}

/// Outcome of a finished game round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won(Multiplier),
    Lost,
}
