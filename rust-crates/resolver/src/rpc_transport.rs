// Structured RPC submission of resolve calls. Classification works on typed
// response fields, never on free-text log output.
use crate::{
    signer::TransactionSigner,
    transport::{
        ResolveCall,
        ResolveTransport,
        SubmitOutcome,
        TransportError,
    },
};
use housebook_contract::AccountId;
use reqwest::StatusCode;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    sync::atomic::{
        AtomicU64,
        Ordering,
    },
    time::Duration,
};
use url::Url;

const RESOLVE_METHOD: &str = "resolve_game";

pub struct RpcTransport {
    http: reqwest::Client,
    signer: TransactionSigner,
    contract_account: AccountId,
    nonce: AtomicU64,
}

impl RpcTransport {
    pub fn new(
        signer: TransactionSigner,
        contract_account: AccountId,
        request_timeout: Duration,
    ) -> crate::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            http,
            signer,
            contract_account,
            nonce: AtomicU64::new(1),
        })
    }

    fn signed_transaction(
        &self,
        call: &ResolveCall,
        nonce: u64,
    ) -> Result<SignedTransaction, TransportError> {
        let body = TransactionBody {
            signer_account: self.signer.account().clone(),
            receiver_account: self.contract_account.clone(),
            method: RESOLVE_METHOD.to_string(),
            args: ResolveArgs {
                account_id: call.account.clone(),
                game_id: call.game_id.clone(),
                won: call.won,
                multiplier: call.multiplier.hundredths(),
            },
            nonce,
        };
        // Canonical payload is the serialized body itself; the signature
        // covers its SHA-256 digest.
        let payload = serde_json::to_vec(&body)
            .map_err(|e| TransportError::Rejected(format!("encode transaction: {e}")))?;
        Ok(SignedTransaction {
            public_key: self.signer.public_key_hex(),
            signature: self.signer.sign_hex(&payload),
            body,
        })
    }
}

impl ResolveTransport for RpcTransport {
    async fn submit_resolve(
        &self,
        endpoint: &Url,
        call: &ResolveCall,
    ) -> Result<SubmitOutcome, TransportError> {
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let transaction = self.signed_transaction(call, nonce)?;

        let response = self
            .http
            .post(endpoint.clone())
            .json(&transaction)
            .send()
            .await
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;
        classify_response(status, &body)
    }
}

#[derive(Serialize)]
struct SignedTransaction {
    #[serde(flatten)]
    body: TransactionBody,
    public_key: String,
    signature: String,
}

#[derive(Serialize)]
struct TransactionBody {
    signer_account: AccountId,
    receiver_account: AccountId,
    method: String,
    args: ResolveArgs,
    nonce: u64,
}

#[derive(Serialize)]
struct ResolveArgs {
    account_id: AccountId,
    game_id: String,
    won: bool,
    /// Fixed-point hundredths, matching the contract's payout arithmetic.
    multiplier: u32,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    result: Option<SubmitResult>,
    #[serde(default)]
    error: Option<SubmitError>,
}

#[derive(Deserialize)]
struct SubmitResult {
    transaction_hash: String,
}

#[derive(Deserialize)]
struct SubmitError {
    kind: SubmitErrorKind,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum SubmitErrorKind {
    NoPendingBet,
    AlreadySettled,
    Unauthorized,
    RateLimited,
    #[serde(other)]
    Other,
}

fn classify_response(
    status: StatusCode,
    body: &str,
) -> Result<SubmitOutcome, TransportError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(TransportError::RateLimited);
    }
    if status.is_server_error() {
        return Err(TransportError::Unavailable(format!(
            "endpoint responded with {status}"
        )));
    }

    let parsed: SubmitResponse = serde_json::from_str(body).map_err(|_| {
        TransportError::Ambiguous {
            raw: truncate(body),
        }
    })?;

    if let Some(result) = parsed.result {
        return Ok(SubmitOutcome::Committed {
            transaction_hash: result.transaction_hash,
        });
    }
    match parsed.error {
        Some(error) => match error.kind {
            // A retry landing on a settled (or never-opened) bet is benign:
            // the chain-level state is already what the caller wanted.
            SubmitErrorKind::NoPendingBet | SubmitErrorKind::AlreadySettled => {
                Ok(SubmitOutcome::AlreadySettled)
            }
            SubmitErrorKind::RateLimited => Err(TransportError::RateLimited),
            SubmitErrorKind::Unauthorized | SubmitErrorKind::Other => {
                Err(TransportError::Rejected(
                    error.message.unwrap_or_else(|| format!("{:?}", error.kind)),
                ))
            }
        },
        None => Err(TransportError::Ambiguous {
            raw: truncate(body),
        }),
    }
}

fn truncate(body: &str) -> String {
    const MAX: usize = 512;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn classify_response__committed_result_yields_transaction_hash() {
        // given
        let body = r#"{"result":{"transaction_hash":"8kfCmP"}}"#;

        // when
        let outcome = classify_response(StatusCode::OK, body).unwrap();

        // then
        assert_eq!(
            outcome,
            SubmitOutcome::Committed {
                transaction_hash: "8kfCmP".to_string()
            }
        );
    }

    #[test]
    fn classify_response__no_pending_bet_is_benign() {
        let body = r#"{"error":{"kind":"NO_PENDING_BET","message":"no pending bet for alice.testnet"}}"#;
        let outcome = classify_response(StatusCode::OK, body).unwrap();
        assert_eq!(outcome, SubmitOutcome::AlreadySettled);
    }

    #[test]
    fn classify_response__already_settled_is_benign() {
        let body = r#"{"error":{"kind":"ALREADY_SETTLED"}}"#;
        let outcome = classify_response(StatusCode::OK, body).unwrap();
        assert_eq!(outcome, SubmitOutcome::AlreadySettled);
    }

    #[test]
    fn classify_response__rate_limit_status_is_transient() {
        let result = classify_response(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(result, Err(TransportError::RateLimited)));
    }

    #[test]
    fn classify_response__server_error_is_unavailable() {
        let result = classify_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(result, Err(TransportError::Unavailable(_))));
    }

    #[test]
    fn classify_response__unknown_error_kind_is_rejected() {
        let body = r#"{"error":{"kind":"OUT_OF_GAS","message":"gas exceeded"}}"#;
        let result = classify_response(StatusCode::OK, body);
        match result {
            Err(TransportError::Rejected(message)) => {
                assert_eq!(message, "gas exceeded")
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn classify_response__unparsable_body_is_ambiguous_and_keeps_raw() {
        // given
        let body = "<html>gateway error</html>";

        // when
        let result = classify_response(StatusCode::OK, body);

        // then
        match result {
            Err(TransportError::Ambiguous { raw }) => assert_eq!(raw, body),
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn classify_response__empty_object_is_ambiguous() {
        let result = classify_response(StatusCode::OK, "{}");
        assert!(matches!(result, Err(TransportError::Ambiguous { .. })));
    }
}
