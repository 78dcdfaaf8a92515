use anyhow::{
    Context,
    Result,
    anyhow,
};
use chrono::Utc;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

pub const DEPLOYMENTS_ROOT: &str = ".deployments";
const DEPLOYMENTS_FILE: &str = "deployments.json";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeploymentEnv {
    Dev,
    Test,
    Local,
}

impl DeploymentEnv {
    pub fn dir_name(self) -> &'static str {
        match self {
            DeploymentEnv::Dev => "dev",
            DeploymentEnv::Test => "test",
            DeploymentEnv::Local => "local",
        }
    }
}

impl fmt::Display for DeploymentEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeploymentEnv::Dev => "Devnet",
            DeploymentEnv::Test => "Testnet",
            DeploymentEnv::Local => "Local",
        };
        write!(f, "{name}")
    }
}

/// Where one deployed settlement contract lives and how to reach it: the
/// contract and oracle accounts plus the ordered list of RPC endpoints the
/// resolver should try.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub deployed_at: String,
    pub contract_account: String,
    pub oracle_account: String,
    /// Tried in order; first healthy endpoint wins.
    pub rpc_endpoints: Vec<String>,
    #[serde(default)]
    pub resolver_account: Option<String>,
    #[serde(default)]
    pub ledger_db_path: Option<String>,
}

#[derive(Debug)]
pub struct DeploymentStore {
    path: PathBuf,
}

impl DeploymentStore {
    pub fn new(env: DeploymentEnv) -> Result<Self> {
        Self::new_at(Path::new(DEPLOYMENTS_ROOT), env)
    }

    pub fn new_at(root: &Path, env: DeploymentEnv) -> Result<Self> {
        let path = ensure_store(root, env)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<DeploymentRecord>> {
        read_record(&self.path)
    }

    pub fn save(&self, record: DeploymentRecord) -> Result<()> {
        write_record(&self.path, &record)
    }
}

pub fn ensure_structure() -> Result<()> {
    for env in [
        DeploymentEnv::Dev,
        DeploymentEnv::Test,
        DeploymentEnv::Local,
    ] {
        let _ = ensure_store(Path::new(DEPLOYMENTS_ROOT), env)?;
    }
    Ok(())
}

fn ensure_store(root: &Path, env: DeploymentEnv) -> Result<PathBuf> {
    let env_dir = root.join(env.dir_name());
    if !env_dir.exists() {
        fs::create_dir_all(&env_dir).with_context(|| {
            format!("Failed to create {}/{} directory", root.display(), env.dir_name())
        })?;
    }

    Ok(env_dir.join(DEPLOYMENTS_FILE))
}

fn read_record(path: impl AsRef<Path>) -> Result<Option<DeploymentRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read(path).context("Failed to read deployment record")?;
    if data.is_empty() || data.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<DeploymentRecord>(&data)
        .map(Some)
        .map_err(|e| anyhow!("Failed to parse deployment record JSON: {e}"))
}

fn write_record(path: impl AsRef<Path>, record: &DeploymentRecord) -> Result<()> {
    let json = serde_json::to_vec_pretty(record)
        .context("Failed to serialize deployment record")?;
    fs::write(path.as_ref(), json).context("Failed to write deployment record")?;
    Ok(())
}

pub fn record_deployment(
    env: DeploymentEnv,
    contract_account: impl AsRef<str>,
    oracle_account: impl AsRef<str>,
    rpc_endpoints: Vec<String>,
) -> Result<()> {
    let store = DeploymentStore::new(env)?;
    let record = DeploymentRecord {
        deployed_at: Utc::now().to_rfc3339(),
        contract_account: contract_account.as_ref().to_string(),
        oracle_account: oracle_account.as_ref().to_string(),
        rpc_endpoints,
        resolver_account: None,
        ledger_db_path: None,
    };
    store.save(record)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use tempdir::TempDir;

    fn sample_record() -> DeploymentRecord {
        DeploymentRecord {
            deployed_at: Utc::now().to_rfc3339(),
            contract_account: "game-v0.testnet".to_string(),
            oracle_account: "oracle.testnet".to_string(),
            rpc_endpoints: vec![
                "https://rpc.testnet.example.org".to_string(),
                "https://rpc.backup.example.org".to_string(),
            ],
            resolver_account: Some("resolver-v0.testnet".to_string()),
            ledger_db_path: None,
        }
    }

    #[test]
    fn store__when_empty_then_load_returns_none() {
        // given
        let temp_dir = TempDir::new("deployments").unwrap();
        let store =
            DeploymentStore::new_at(temp_dir.path(), DeploymentEnv::Local).unwrap();

        // then
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn store__round_trips_record() {
        // given
        let temp_dir = TempDir::new("deployments_roundtrip").unwrap();
        let store =
            DeploymentStore::new_at(temp_dir.path(), DeploymentEnv::Test).unwrap();
        let record = sample_record();

        // when
        store.save(record.clone()).unwrap();

        // then
        let loaded = store.load().unwrap().expect("record saved");
        assert_eq!(loaded.contract_account, record.contract_account);
        assert_eq!(loaded.rpc_endpoints, record.rpc_endpoints);
        assert_eq!(loaded.resolver_account, record.resolver_account);
    }

    #[test]
    fn store__environments_are_isolated() {
        // given
        let temp_dir = TempDir::new("deployments_envs").unwrap();
        let local =
            DeploymentStore::new_at(temp_dir.path(), DeploymentEnv::Local).unwrap();
        let test =
            DeploymentStore::new_at(temp_dir.path(), DeploymentEnv::Test).unwrap();

        // when
        local.save(sample_record()).unwrap();

        // then
        assert!(local.load().unwrap().is_some());
        assert!(test.load().unwrap().is_none());
    }
}
