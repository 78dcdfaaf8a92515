use housebook_contract::{
    AccountId,
    Multiplier,
};
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;
use url::Url;

/// A settlement call ready for submission against one endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveCall {
    pub game_id: String,
    pub account: AccountId,
    pub won: bool,
    pub multiplier: Multiplier,
}

/// Terminal result of one submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The transaction was accepted and committed.
    Committed { transaction_hash: String },
    /// The target bet was already settled (or never existed). Treated as
    /// success so a retried resolution cannot double-apply or fail spuriously.
    AlreadySettled,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("endpoint unavailable: {0}")]
    Unavailable(String),

    #[error("endpoint rate limited the request")]
    RateLimited,

    #[error("resolve call rejected: {0}")]
    Rejected(String),

    /// The response could not be classified as committed, benign duplicate,
    /// or hard failure. The raw body is kept for diagnostics.
    #[error("unclassifiable response from endpoint: {raw}")]
    Ambiguous { raw: String },
}

/// One way of getting a resolve call onto the chain. The retry/fallback
/// policy lives in [`crate::client::ResolverClient`]; transports only submit
/// and classify.
pub trait ResolveTransport {
    fn submit_resolve(
        &self,
        endpoint: &Url,
        call: &ResolveCall,
    ) -> impl Future<Output = Result<SubmitOutcome, TransportError>>;
}
