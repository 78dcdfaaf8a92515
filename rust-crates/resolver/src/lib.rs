pub mod client;

pub mod config;

pub mod in_process_transport;

pub mod keys;

pub mod rpc_transport;

pub mod service;

pub mod signer;

pub mod transport;

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

pub fn init_tracing() {
    use tracing_subscriber::{
        EnvFilter,
        fmt,
    };

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
