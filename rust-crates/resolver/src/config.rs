use crate::client::RetryPolicy;
use anyhow::{
    Context,
    Result,
    anyhow,
};
use deployments::DeploymentRecord;
use housebook_contract::AccountId;
use std::{
    path::PathBuf,
    time::Duration,
};
use url::Url;

pub const DEFAULT_LEDGER_DB_PATH: &str = "housebook_ledger_data";

/// How the resolver reaches the settlement contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TransportKind {
    /// Submit signed transactions to the configured RPC endpoints.
    Rpc,
    /// Drive an in-process contract backed by a local ledger database.
    Local,
}

/// Everything the resolver process needs, assembled from the deployment
/// record plus CLI overrides. The signing credential is loaded separately by
/// [`crate::keys::load_resolver_key`].
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    pub contract_account: AccountId,
    pub resolver_account: AccountId,
    pub rpc_endpoints: Vec<Url>,
    pub transport: TransportKind,
    pub ledger_db_path: PathBuf,
    pub policy: RetryPolicy,
}

impl ResolverConfig {
    pub fn from_record(
        record: &DeploymentRecord,
        transport: TransportKind,
    ) -> Result<Self> {
        let rpc_endpoints = parse_endpoints(&record.rpc_endpoints)?;
        if rpc_endpoints.is_empty() && transport == TransportKind::Rpc {
            return Err(anyhow!(
                "Deployment record for {} lists no RPC endpoints",
                record.contract_account
            ));
        }
        // The resolver signs as the contract's oracle unless the record pins
        // a dedicated resolver account.
        let resolver_account = record
            .resolver_account
            .clone()
            .unwrap_or_else(|| record.oracle_account.clone());

        Ok(Self {
            contract_account: AccountId::new(record.contract_account.clone()),
            resolver_account: AccountId::new(resolver_account),
            rpc_endpoints,
            transport,
            ledger_db_path: record
                .ledger_db_path
                .clone()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_DB_PATH)),
            policy: RetryPolicy::default(),
        })
    }

    pub fn with_timeouts(
        mut self,
        attempt_timeout_secs: Option<u64>,
        rate_limit_backoff_secs: Option<u64>,
    ) -> Self {
        if let Some(secs) = attempt_timeout_secs {
            self.policy.attempt_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = rate_limit_backoff_secs {
            self.policy.rate_limit_backoff = Duration::from_secs(secs);
        }
        self
    }

    pub fn override_endpoints(mut self, endpoints: Vec<Url>) -> Self {
        if !endpoints.is_empty() {
            self.rpc_endpoints = endpoints;
        }
        self
    }
}

fn parse_endpoints(raw: &[String]) -> Result<Vec<Url>> {
    raw.iter()
        .map(|entry| {
            Url::parse(entry)
                .with_context(|| format!("invalid RPC endpoint URL '{entry}'"))
        })
        .collect()
}
