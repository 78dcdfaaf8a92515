pub mod contract;

pub mod error;

pub mod events;

pub mod in_memory_ledger_store;

pub mod ledger;

pub mod ledger_store;

pub mod sled_ledger_store;

pub mod test_helpers;

pub mod types;

pub use contract::{
    CallContext,
    SettlementContract,
    TransferSink,
};
pub use error::{
    SettlementError,
    TransferError,
};
pub use events::ContractEvent;
pub use ledger::{
    PendingBet,
    UserLedger,
};
pub use ledger_store::{
    LedgerStore,
    StorageError,
};
pub use types::{
    AccountId,
    Balance,
    Multiplier,
    Outcome,
};
