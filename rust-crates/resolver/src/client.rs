use crate::transport::{
    ResolveCall,
    ResolveTransport,
    SubmitOutcome,
    TransportError,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::time::Duration;
use tokio::time;
use tracing::warn;
use url::Url;

/// Per-attempt bounds for the endpoint walk. Attempts are strictly
/// sequential, so the overall operation is bounded by the sum of per-attempt
/// timeouts (plus backoffs); callers wanting a tighter bound wrap the call in
/// their own deadline.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub attempt_timeout: Duration,
    pub rate_limit_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(30),
            rate_limit_backoff: Duration::from_secs(5),
        }
    }
}

/// Result surfaced to game-outcome producers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveGameResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    pub message: String,
}

/// Walks an ordered list of candidate endpoints until one accepts the
/// resolve call. Idempotence comes from the contract: a benign
/// already-settled answer counts as success and stops the walk.
pub struct ResolverClient<T> {
    transport: T,
    endpoints: Vec<Url>,
    policy: RetryPolicy,
}

impl<T: ResolveTransport> ResolverClient<T> {
    pub fn new(transport: T, endpoints: Vec<Url>) -> Self {
        Self::with_policy(transport, endpoints, RetryPolicy::default())
    }

    pub fn with_policy(
        transport: T,
        endpoints: Vec<Url>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            endpoints,
            policy,
        }
    }

    pub async fn resolve_game(&self, call: &ResolveCall) -> ResolveGameResponse {
        let mut last_error = String::from("no endpoints configured");

        for endpoint in &self.endpoints {
            let attempt = time::timeout(
                self.policy.attempt_timeout,
                self.transport.submit_resolve(endpoint, call),
            )
            .await;

            match attempt {
                Ok(Ok(SubmitOutcome::Committed { transaction_hash })) => {
                    return ResolveGameResponse {
                        success: true,
                        transaction_hash: Some(transaction_hash),
                        message: format!("Game {} resolved", call.game_id),
                    };
                }
                Ok(Ok(SubmitOutcome::AlreadySettled)) => {
                    return ResolveGameResponse {
                        success: true,
                        transaction_hash: None,
                        message: format!(
                            "Game {} was already settled",
                            call.game_id
                        ),
                    };
                }
                Ok(Err(TransportError::RateLimited)) => {
                    warn!(%endpoint, "rate limited; backing off before next attempt");
                    last_error = TransportError::RateLimited.to_string();
                    time::sleep(self.policy.rate_limit_backoff).await;
                }
                Ok(Err(error)) => {
                    warn!(%endpoint, %error, "resolve attempt failed");
                    last_error = error.to_string();
                }
                Err(_elapsed) => {
                    warn!(%endpoint, "resolve attempt timed out");
                    last_error = format!(
                        "endpoint {endpoint} timed out after {:?}",
                        self.policy.attempt_timeout
                    );
                }
            }
        }

        ResolveGameResponse {
            success: false,
            transaction_hash: None,
            message: last_error,
        }
    }
}
