use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::Level;
use veil_storage::DEFAULT_SNAPSHOT_RETENTION;
use veil_types::keys::{ProviderId, WalletKey};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub id: ProviderId,
    /// Hex-encoded ed25519 public key.
    pub public_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GenesisConfig {
    /// Hex-encoded wallet key of the initial admin.
    pub admin: Option<String>,
    pub providers: Vec<ProviderConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NodeConfig {
    pub data_dir: String,
    pub log_level: String,
    /// Hex, passed through to snapshots untouched.
    pub contract_address: String,
    /// Number of recent snapshots kept on disk.
    pub snapshot_retention: u64,
    pub genesis: GenesisConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            log_level: "info".to_string(),
            contract_address: String::new(),
            snapshot_retention: DEFAULT_SNAPSHOT_RETENTION,
            genesis: GenesisConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn level(&self) -> Result<Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow!("Invalid log level: {}", self.log_level))
    }

    pub fn contract_address_bytes(&self) -> Result<Vec<u8>> {
        hex::decode(self.contract_address.trim_start_matches("0x")).context("decoding contract_address")
    }
}

impl GenesisConfig {
    pub fn admin_key(&self) -> Result<Option<WalletKey>> {
        self.admin
            .as_deref()
            .map(|s| WalletKey::from_hex(s).context("decoding genesis admin"))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: NodeConfig = serde_json::from_str(
            r#"{ "log_level": "debug", "genesis": { "providers": [ { "id": 1, "public_key": "00" } ] } }"#,
        )
        .unwrap();
        assert_eq!(cfg.data_dir, "./data");
        assert_eq!(cfg.snapshot_retention, DEFAULT_SNAPSHOT_RETENTION);
        assert_eq!(cfg.level().unwrap(), Level::DEBUG);
        assert_eq!(cfg.genesis.providers.len(), 1);
        assert!(cfg.genesis.admin_key().unwrap().is_none());
        assert!(cfg.contract_address_bytes().unwrap().is_empty());
    }

    #[test]
    fn bad_values_are_reported() {
        let cfg = NodeConfig {
            log_level: "loud".to_string(),
            contract_address: "zz".to_string(),
            genesis: GenesisConfig {
                admin: Some("1234".to_string()),
                providers: Vec::new(),
            },
            ..NodeConfig::default()
        };
        assert!(cfg.level().is_err());
        assert!(cfg.contract_address_bytes().is_err());
        assert!(cfg.genesis.admin_key().is_err());
    }

    #[test]
    fn snapshot_retention_is_configurable() {
        let cfg: NodeConfig = serde_json::from_str(r#"{ "snapshot_retention": 8 }"#).unwrap();
        assert_eq!(cfg.snapshot_retention, 8);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn missing_file_is_default() {
        let cfg = NodeConfig::load(Path::new("/nonexistent/veil-node.json")).unwrap();
        assert_eq!(cfg, NodeConfig::default());
    }
}
