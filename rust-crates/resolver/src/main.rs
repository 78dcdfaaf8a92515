use anyhow::{
    Context,
    anyhow,
};
use clap::{
    ArgGroup,
    Parser,
};
use deployments::{
    DeploymentEnv,
    DeploymentStore,
};
use housebook_contract::{
    SettlementContract,
    sled_ledger_store::SledLedgerStore,
};
use resolver::{
    client::ResolverClient,
    config::{
        ResolverConfig,
        TransportKind,
    },
    in_process_transport::InProcessTransport,
    init_tracing,
    keys::load_resolver_key,
    rpc_transport::RpcTransport,
    service::ResolveApi,
    signer::TransactionSigner,
    transport::ResolveTransport,
};
use std::sync::{
    Arc,
    Mutex,
};
use url::Url;

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    group(
        ArgGroup::new("network")
            .args(["local", "dev", "test"])
            .required(true)
    )
)]
struct Args {
    /// Port for the inbound resolve API; an ephemeral port is chosen if
    /// omitted.
    #[arg(short, long)]
    port: Option<u16>,

    /// How resolve calls reach the contract.
    #[arg(long, value_enum, default_value = "rpc")]
    transport: TransportKind,

    /// Encrypted keystore holding the resolver signing key.
    #[arg(long)]
    keystore: Option<String>,

    /// Override the deployment record's RPC endpoints (ordered, repeatable).
    #[arg(long = "endpoint")]
    endpoints: Vec<Url>,

    /// Contract account, used to bootstrap a deployment record when none is
    /// stored for the selected network.
    #[arg(long)]
    contract_account: Option<String>,

    /// Oracle account for a bootstrapped deployment record; required
    /// together with --contract-account.
    #[arg(long)]
    oracle_account: Option<String>,

    #[arg(long)]
    attempt_timeout_secs: Option<u64>,

    #[arg(long)]
    rate_limit_backoff_secs: Option<u64>,

    #[arg(short, long, default_value = "false")]
    tracing: bool,

    #[arg(long)]
    local: bool,

    #[arg(long)]
    dev: bool,

    #[arg(long)]
    test: bool,
}

async fn wait_for_interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(_) => {
            tracing::info!("Received interrupt, exiting");
        }
        Err(_) => {
            tracing::warn!("Received interrupt error, exiting anyway");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.tracing {
        init_tracing();
    }

    let (deployment_env, network_label) = if args.local {
        (DeploymentEnv::Local, "local")
    } else if args.dev {
        (DeploymentEnv::Dev, "dev")
    } else {
        (DeploymentEnv::Test, "test")
    };
    let store =
        DeploymentStore::new(deployment_env).context("opening deployments store")?;
    let record = match store.load().context("loading deployment record")? {
        Some(record) => record,
        None => {
            let (Some(contract_account), Some(oracle_account)) =
                (args.contract_account.clone(), args.oracle_account.clone())
            else {
                return Err(anyhow!(
                    "No deployment record found for {network_label}; pass --contract-account and --oracle-account to bootstrap one"
                ));
            };
            let endpoints = args
                .endpoints
                .iter()
                .map(|url| url.to_string())
                .collect();
            deployments::record_deployment(
                deployment_env,
                &contract_account,
                &oracle_account,
                endpoints,
            )
            .context("bootstrapping deployment record")?;
            tracing::info!("Bootstrapped deployment record for {network_label}");
            store
                .load()
                .context("reloading deployment record")?
                .ok_or_else(|| anyhow!("deployment record was not persisted"))?
        }
    };
    tracing::info!(
        "Using deployment record for contract {} (oracle {}, {} endpoint(s))",
        record.contract_account,
        record.oracle_account,
        record.rpc_endpoints.len()
    );

    let config = ResolverConfig::from_record(&record, args.transport)?
        .override_endpoints(args.endpoints.clone())
        .with_timeouts(args.attempt_timeout_secs, args.rate_limit_backoff_secs);

    match config.transport {
        TransportKind::Rpc => {
            let key = load_resolver_key(args.keystore.as_deref())?;
            let signer =
                TransactionSigner::new(key, config.resolver_account.clone());
            let transport = RpcTransport::new(
                signer,
                config.contract_account.clone(),
                config.policy.attempt_timeout,
            )?;
            run(transport, config, args.port).await
        }
        TransportKind::Local => {
            let ledger_store = SledLedgerStore::open(&config.ledger_db_path)
                .map_err(|e| anyhow!("opening ledger database: {e}"))?;
            let contract = SettlementContract::new(
                ledger_store,
                config.contract_account.clone(),
                config.resolver_account.clone(),
            )
            .map_err(|e| anyhow!("initializing settlement contract: {e}"))?;
            let transport = InProcessTransport::new(
                Arc::new(Mutex::new(contract)),
                config.resolver_account.clone(),
            );
            run(transport, config, args.port).await
        }
    }
}

async fn run<T>(
    transport: T,
    config: ResolverConfig,
    port: Option<u16>,
) -> anyhow::Result<()>
where
    T: ResolveTransport + Send + Sync + 'static,
{
    let endpoints = if config.rpc_endpoints.is_empty() {
        // The in-process transport ignores the endpoint argument, but the
        // client walk still needs one entry to attempt.
        vec![Url::parse("local://in-process").expect("static url parses")]
    } else {
        config.rpc_endpoints.clone()
    };
    let client = ResolverClient::with_policy(transport, endpoints, config.policy);
    let api = ResolveApi::new(port, client).await?;
    tracing::info!(
        "Resolver for contract {} ready at {}",
        config.contract_account,
        api.base_url()
    );

    wait_for_interrupt().await;
    Ok(())
}
