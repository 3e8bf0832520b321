//! Configuration management for stacks-basics
//!
//! Looked up in order: `stacks-basics.toml` in the working directory,
//! `~/.stacks-basics/config.toml`, then built-in defaults. Every section
//! and field is optional. `STACKS_API_URL` and `STACKS_SENDER_KEY` take
//! precedence over the file.

use crate::address::{PrincipalData, StacksAddress};
use crate::api::Configuration;
use crate::crypto::StacksPrivateKey;
use crate::error::{Result, StacksError};
use crate::network::StacksNetwork;
use crate::transaction::MEMO_LENGTH;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "stacks-basics.toml";
pub const ENV_API_URL: &str = "STACKS_API_URL";
pub const ENV_SENDER_KEY: &str = "STACKS_SENDER_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub account: AccountConfig,
    pub transfer: TransferConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub name: StacksNetwork,
    /// Overrides the network's hosted API
    pub api_url: Option<String>,
    /// Request timeout in humantime form, e.g. `"30s"`
    pub timeout: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: StacksNetwork::Testnet,
            api_url: None,
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Account inspected by `stacks-accounts`
    pub address: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            address: default_account_address(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Hex private key, 66 chars with the trailing `01` for compressed keys
    pub sender_key: String,
    pub recipient: String,
    pub amount: u64,
    pub fee: u64,
    pub nonce: u64,
    pub memo: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            sender_key: default_sender_key(),
            recipient: default_recipient(),
            amount: 1_000_000,
            fee: 2000,
            nonce: 0,
            memo: "hello world".to_string(),
        }
    }
}

fn default_timeout() -> String {
    "30s".to_string()
}

fn default_account_address() -> String {
    "ST0ANAYPAZ5A77ET8Q7V3NJ3S4WQ30TC2WCSQSS4".to_string()
}

fn default_sender_key() -> String {
    "edf9aee84d9b7abc145504dde6726c64f369d37ee34ded868fabd876c26570bc01".to_string()
}

fn default_recipient() -> String {
    "SP3FGQ8Z7JY9BWYZ5WM53E0M9NK7WHJF0691NZ159".to_string()
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides through `lookup`, normally
    /// `std::env::var(..).ok()`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            debug!("API URL overridden by {}", ENV_API_URL);
            self.network.api_url = Some(url);
        }
        if let Some(key) = lookup(ENV_SENDER_KEY).filter(|v| !v.trim().is_empty()) {
            debug!("Sender key overridden by {}", ENV_SENDER_KEY);
            self.transfer.sender_key = key;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.network.api_url {
            if url.trim().is_empty() {
                return Err(StacksError::ConfigError(
                    "network.api_url must not be empty".to_string(),
                ));
            }
        }
        self.timeout()?;
        self.account_address()?;
        self.recipient()?;
        if self.transfer.memo.len() > MEMO_LENGTH {
            return Err(StacksError::ConfigError(format!(
                "transfer.memo is {} bytes, at most {} allowed",
                self.transfer.memo.len(),
                MEMO_LENGTH
            )));
        }
        Ok(())
    }

    pub fn network(&self) -> StacksNetwork {
        self.network.name
    }

    pub fn api_url(&self) -> &str {
        self.network
            .api_url
            .as_deref()
            .unwrap_or_else(|| self.network.name.default_api_url())
    }

    pub fn timeout(&self) -> Result<Duration> {
        humantime::parse_duration(self.network.timeout.trim()).map_err(|e| {
            StacksError::ConfigError(format!(
                "network.timeout '{}': {}",
                self.network.timeout, e
            ))
        })
    }

    pub fn api_configuration(&self) -> Result<Configuration> {
        Ok(Configuration::new(self.api_url()).with_timeout(self.timeout()?))
    }

    pub fn account_address(&self) -> Result<StacksAddress> {
        self.account.address.parse().map_err(|e| {
            StacksError::ConfigError(format!("account.address: {}", e))
        })
    }

    pub fn recipient(&self) -> Result<PrincipalData> {
        self.transfer.recipient.parse().map_err(|e| {
            StacksError::ConfigError(format!("transfer.recipient: {}", e))
        })
    }

    /// Parsed only on demand so that read-only commands never need a key.
    pub fn sender_key(&self) -> Result<StacksPrivateKey> {
        StacksPrivateKey::from_hex(&self.transfer.sender_key)
            .map_err(|e| StacksError::ConfigError(format!("transfer.sender_key: {}", e)))
    }
}

/// `~/.stacks-basics/config.toml`
pub fn get_user_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stacks-basics")
        .join("config.toml")
}

/// Reads one config file; a missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(e.into()),
    };
    debug!("Loading configuration from {}", path.display());
    Config::from_toml_str(&contents)
}

/// Loads the first config file found, then applies environment overrides.
pub fn load_config() -> Result<Config> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    let path = if local.exists() {
        local
    } else {
        get_user_config_path()
    };

    let mut config = load_config_from(&path)?;
    config.apply_env_overrides(|name| std::env::var(name).ok());
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_mirror_example_scripts() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.network(), StacksNetwork::Testnet);
        assert_eq!(config.api_url(), "https://stacks-node-api.testnet.stacks.co");
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(30));
        assert_eq!(
            config.account_address().unwrap().to_string(),
            "ST0ANAYPAZ5A77ET8Q7V3NJ3S4WQ30TC2WCSQSS4"
        );
        assert_eq!(config.transfer.amount, 1_000_000);
        assert_eq!(config.transfer.fee, 2000);
        assert_eq!(config.transfer.memo, "hello world");
        assert!(config.sender_key().unwrap().is_compressed());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [network]
            name = "mainnet"
            timeout = "5s"

            [transfer]
            amount = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.network(), StacksNetwork::Mainnet);
        assert_eq!(config.api_url(), "https://stacks-node-api.mainnet.stacks.co");
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(5));
        assert_eq!(config.transfer.amount, 42);
        assert_eq!(config.transfer.fee, 2000);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_address = Config::from_toml_str("[account]\naddress = \"SJ2FYQ8Z7JY9BWYZ5WM53SKR6CK7WHJF0691NZ942\"\n");
        assert!(matches!(bad_address, Err(StacksError::ConfigError(_))));

        let long_memo = Config::from_toml_str(&format!("[transfer]\nmemo = \"{}\"\n", "m".repeat(35)));
        assert!(matches!(long_memo, Err(StacksError::ConfigError(_))));

        let empty_url = Config::from_toml_str("[network]\napi_url = \" \"\n");
        assert!(matches!(empty_url, Err(StacksError::ConfigError(_))));

        let bad_timeout = Config::from_toml_str("[network]\ntimeout = \"soon\"\n");
        assert!(matches!(bad_timeout, Err(StacksError::ConfigError(_))));

        let bad_network = Config::from_toml_str("[network]\nname = \"regtest\"\n");
        assert!(bad_network.is_err());
    }

    #[test]
    fn test_load_from_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[network]\napi_url = \"http://localhost:3999\"\n\n[transfer]\nnonce = 7\n",
        )?;

        let config = load_config_from(&path)?;
        assert_eq!(config.api_url(), "http://localhost:3999");
        assert_eq!(config.transfer.nonce, 7);

        let missing = load_config_from(&dir.path().join("absent.toml"))?;
        assert_eq!(missing.transfer.nonce, 0);
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://127.0.0.1:20443"),
            (ENV_SENDER_KEY, ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_overrides(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.api_url(), "http://127.0.0.1:20443");
        // empty values are ignored
        assert_eq!(config.transfer.sender_key, default_sender_key());

        let api = config.api_configuration().unwrap();
        assert_eq!(api.base_path, "http://127.0.0.1:20443");
    }
}
