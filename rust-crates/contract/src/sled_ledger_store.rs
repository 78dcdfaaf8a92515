// Sled-backed persistence for ledgers, pending bets, and contract metadata.
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
use serde::{
    Serialize,
    de::DeserializeOwned,
};
use sled::{
    Config,
    Db,
    Tree,
};
use std::path::Path;

const HOUSE_BALANCE_KEY: &[u8] = b"house_balance";
const ORACLE_ACCOUNT_KEY: &[u8] = b"oracle_account";

#[derive(Clone)]
pub struct SledLedgerStore {
    ledger_tree: Tree,
    pending_tree: Tree,
    meta_tree: Tree,
}

impl SledLedgerStore {
    pub fn new(db: &Db) -> Result<Self, StorageError> {
        let ledger_tree = open_tree(db, "ledgers")?;
        let pending_tree = open_tree(db, "pending_bets")?;
        let meta_tree = open_tree(db, "contract_meta")?;

        Ok(Self {
            ledger_tree,
            pending_tree,
            meta_tree,
        })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let config = Config::default().path(path);
        let db = config.open().map_err(backend)?;
        Self::new(&db)
    }

    fn account_key(account: &AccountId) -> &[u8] {
        account.as_str().as_bytes()
    }

    fn read<T: DeserializeOwned>(
        tree: &Tree,
        key: &[u8],
    ) -> Result<Option<T>, StorageError> {
        let value = match tree.get(key).map_err(backend)? {
            Some(value) => value,
            None => return Ok(None),
        };
        let record = deserialize(value.as_ref())?;
        Ok(Some(record))
    }

    fn write<T: Serialize>(
        tree: &Tree,
        key: &[u8],
        value: &T,
    ) -> Result<(), StorageError> {
        let bytes = serialize(value)?;
        tree.insert(key, bytes).map_err(backend)?;
        tree.flush().map_err(backend)?;
        Ok(())
    }
}

impl LedgerStore for SledLedgerStore {
    fn ledger(&self, account: &AccountId) -> Result<Option<UserLedger>, StorageError> {
        Self::read(&self.ledger_tree, Self::account_key(account))
    }

    fn set_ledger(
        &mut self,
        account: &AccountId,
        ledger: &UserLedger,
    ) -> Result<(), StorageError> {
        Self::write(&self.ledger_tree, Self::account_key(account), ledger)
    }

    fn pending_bet(
        &self,
        account: &AccountId,
    ) -> Result<Option<PendingBet>, StorageError> {
        Self::read(&self.pending_tree, Self::account_key(account))
    }

    fn set_pending_bet(
        &mut self,
        account: &AccountId,
        bet: &PendingBet,
    ) -> Result<(), StorageError> {
        Self::write(&self.pending_tree, Self::account_key(account), bet)
    }

    fn remove_pending_bet(&mut self, account: &AccountId) -> Result<(), StorageError> {
        self.pending_tree
            .remove(Self::account_key(account))
            .map_err(backend)?;
        self.pending_tree.flush().map_err(backend)?;
        Ok(())
    }

    fn house_balance(&self) -> Result<Balance, StorageError> {
        let balance: Option<Balance> = Self::read(&self.meta_tree, HOUSE_BALANCE_KEY)?;
        Ok(balance.unwrap_or(0))
    }

    fn set_house_balance(&mut self, balance: Balance) -> Result<(), StorageError> {
        Self::write(&self.meta_tree, HOUSE_BALANCE_KEY, &balance)
    }

    fn oracle_account(&self) -> Result<Option<AccountId>, StorageError> {
        Self::read(&self.meta_tree, ORACLE_ACCOUNT_KEY)
    }

    fn set_oracle_account(&mut self, account: &AccountId) -> Result<(), StorageError> {
        Self::write(&self.meta_tree, ORACLE_ACCOUNT_KEY, account)
    }

    fn total_accounts(&self) -> Result<u64, StorageError> {
        Ok(self.ledger_tree.len() as u64)
    }
}

fn open_tree(db: &Db, name: &str) -> Result<Tree, StorageError> {
    db.open_tree(name)
        .map_err(|e| StorageError::Backend(format!("open {name} tree: {e}")))
}

fn backend(error: sled::Error) -> StorageError {
    StorageError::Backend(error.to_string())
}

fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(value).map_err(|e| StorageError::Codec(e.to_string()))
}

fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StorageError> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::Codec(e.to_string()))
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::SledLedgerStore;
    use crate::{
        ledger::{
            PendingBet,
            UserLedger,
        },
        ledger_store::LedgerStore,
        types::AccountId,
    };
    use tempdir::TempDir;

    fn sled_db(temp_dir: &TempDir) -> sled::Db {
        sled::Config::default()
            .path(temp_dir.path())
            .open()
            .expect("open sled db")
    }

    #[test]
    fn sut__when_writing_ledger_then_read_returns_it() {
        // given
        let temp_dir = TempDir::new("sled_ledger_store").unwrap();
        let db = sled_db(&temp_dir);
        let mut store = SledLedgerStore::new(&db).unwrap();
        let account = AccountId::from("alice.testnet");
        let ledger = UserLedger {
            total_bet: 500,
            total_won: 250,
            total_lost: 250,
            withdrawable_balance: 250,
        };

        // when
        store.set_ledger(&account, &ledger).unwrap();

        // then
        let loaded = store.ledger(&account).unwrap().expect("ledger exists");
        assert_eq!(loaded, ledger);
        assert_eq!(store.total_accounts().unwrap(), 1);
    }

    #[test]
    fn sut__when_account_is_unknown_then_reads_return_none() {
        // given
        let temp_dir = TempDir::new("sled_ledger_store_missing").unwrap();
        let db = sled_db(&temp_dir);
        let store = SledLedgerStore::new(&db).unwrap();
        let account = AccountId::from("nobody.testnet");

        // then
        assert!(store.ledger(&account).unwrap().is_none());
        assert!(store.pending_bet(&account).unwrap().is_none());
        assert_eq!(store.house_balance().unwrap(), 0);
        assert!(store.oracle_account().unwrap().is_none());
    }

    #[test]
    fn sut__when_removing_pending_bet_then_it_is_gone() {
        // given
        let temp_dir = TempDir::new("sled_ledger_store_pending").unwrap();
        let db = sled_db(&temp_dir);
        let mut store = SledLedgerStore::new(&db).unwrap();
        let account = AccountId::from("alice.testnet");
        let bet = PendingBet {
            game_id: "mines-17".to_string(),
            amount: 1_000,
            opened_at: 42,
        };
        store.set_pending_bet(&account, &bet).unwrap();
        assert_eq!(store.pending_bet(&account).unwrap(), Some(bet));

        // when
        store.remove_pending_bet(&account).unwrap();

        // then
        assert!(store.pending_bet(&account).unwrap().is_none());
    }

    #[test]
    fn sut__when_reopened_then_state_persists() {
        // given
        let temp_dir = TempDir::new("sled_ledger_store_reopen").unwrap();
        let account = AccountId::from("alice.testnet");
        let oracle = AccountId::from("oracle.testnet");
        {
            let mut store = SledLedgerStore::open(temp_dir.path()).unwrap();
            store.set_house_balance(9_000).unwrap();
            store.set_oracle_account(&oracle).unwrap();
            store
                .set_ledger(&account, &UserLedger {
                    total_bet: 100,
                    ..UserLedger::default()
                })
                .unwrap();
        }

        // when
        let store = SledLedgerStore::open(temp_dir.path()).unwrap();

        // then
        assert_eq!(store.house_balance().unwrap(), 9_000);
        assert_eq!(store.oracle_account().unwrap(), Some(oracle));
        assert_eq!(
            store.ledger(&account).unwrap().map(|l| l.total_bet),
            Some(100)
        );
    }
}
