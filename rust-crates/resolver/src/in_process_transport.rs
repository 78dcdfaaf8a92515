use crate::transport::{
    ResolveCall,
    ResolveTransport,
    SubmitOutcome,
    TransportError,
};
use housebook_contract::{
    AccountId,
    CallContext,
    LedgerStore,
    Outcome,
    SettlementContract,
    SettlementError,
};
use sha2::{
    Digest,
    Sha256,
};
use std::sync::{
    Arc,
    Mutex,
    atomic::{
        AtomicU64,
        Ordering,
    },
};
use url::Url;

/// Drives a settlement contract living in the same process, instead of
/// crossing the network. Used in local mode and by tests; behaves like the
/// RPC transport from the client's point of view, including the benign
/// classification of already-settled bets.
pub struct InProcessTransport<S> {
    contract: Arc<Mutex<SettlementContract<S>>>,
    oracle: AccountId,
    height: Arc<AtomicU64>,
}

impl<S> Clone for InProcessTransport<S> {
    fn clone(&self) -> Self {
        Self {
            contract: self.contract.clone(),
            oracle: self.oracle.clone(),
            height: self.height.clone(),
        }
    }
}

impl<S: LedgerStore> InProcessTransport<S> {
    pub fn new(
        contract: Arc<Mutex<SettlementContract<S>>>,
        oracle: AccountId,
    ) -> Self {
        Self {
            contract,
            oracle,
            height: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn contract(&self) -> Arc<Mutex<SettlementContract<S>>> {
        self.contract.clone()
    }
}

impl<S: LedgerStore> ResolveTransport for InProcessTransport<S> {
    async fn submit_resolve(
        &self,
        _endpoint: &Url,
        call: &ResolveCall,
    ) -> Result<SubmitOutcome, TransportError> {
        let outcome = if call.won {
            Outcome::Won(call.multiplier)
        } else {
            Outcome::Lost
        };
        let height = self.height.fetch_add(1, Ordering::SeqCst);
        let ctx = CallContext::new(self.oracle.clone(), height);

        let result = {
            let mut contract = self.contract.lock().map_err(|_| {
                TransportError::Unavailable("contract lock poisoned".to_string())
            })?;
            contract.resolve_for(&ctx, &call.account, outcome)
        };

        match result {
            Ok(_) => Ok(SubmitOutcome::Committed {
                transaction_hash: pseudo_hash(call, height),
            }),
            Err(SettlementError::NoPendingBet { .. }) => {
                Ok(SubmitOutcome::AlreadySettled)
            }
            Err(other) => Err(TransportError::Rejected(other.to_string())),
        }
    }
}

fn pseudo_hash(call: &ResolveCall, height: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(call.game_id.as_bytes());
    hasher.update(call.account.as_str().as_bytes());
    hasher.update(height.to_be_bytes());
    format!("{:x}", hasher.finalize())
}
