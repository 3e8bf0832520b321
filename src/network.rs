//! Mainnet / testnet parameters

use crate::address::{
    C32_ADDRESS_VERSION_MAINNET_MULTISIG, C32_ADDRESS_VERSION_MAINNET_SINGLESIG,
    C32_ADDRESS_VERSION_TESTNET_MULTISIG, C32_ADDRESS_VERSION_TESTNET_SINGLESIG,
};
use crate::error::StacksError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAINNET_API_URL: &str = "https://stacks-node-api.mainnet.stacks.co";
pub const TESTNET_API_URL: &str = "https://stacks-node-api.testnet.stacks.co";

pub const CHAIN_ID_MAINNET: u32 = 0x0000_0001;
pub const CHAIN_ID_TESTNET: u32 = 0x8000_0000;

/// First byte of every serialized transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TransactionVersion {
    Mainnet = 0x00,
    Testnet = 0x80,
}

impl TransactionVersion {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(TransactionVersion::Mainnet),
            0x80 => Some(TransactionVersion::Testnet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StacksNetwork {
    Mainnet,
    #[default]
    Testnet,
}

impl StacksNetwork {
    pub fn transaction_version(&self) -> TransactionVersion {
        match self {
            StacksNetwork::Mainnet => TransactionVersion::Mainnet,
            StacksNetwork::Testnet => TransactionVersion::Testnet,
        }
    }

    pub fn chain_id(&self) -> u32 {
        match self {
            StacksNetwork::Mainnet => CHAIN_ID_MAINNET,
            StacksNetwork::Testnet => CHAIN_ID_TESTNET,
        }
    }

    pub fn single_sig_address_version(&self) -> u8 {
        match self {
            StacksNetwork::Mainnet => C32_ADDRESS_VERSION_MAINNET_SINGLESIG,
            StacksNetwork::Testnet => C32_ADDRESS_VERSION_TESTNET_SINGLESIG,
        }
    }

    pub fn multi_sig_address_version(&self) -> u8 {
        match self {
            StacksNetwork::Mainnet => C32_ADDRESS_VERSION_MAINNET_MULTISIG,
            StacksNetwork::Testnet => C32_ADDRESS_VERSION_TESTNET_MULTISIG,
        }
    }

    /// Default Stacks Blockchain API base path for this network.
    pub fn default_api_url(&self) -> &'static str {
        match self {
            StacksNetwork::Mainnet => MAINNET_API_URL,
            StacksNetwork::Testnet => TESTNET_API_URL,
        }
    }

    /// Network an address version belongs to, if it is a known one.
    pub fn from_address_version(version: u8) -> Option<Self> {
        match version {
            C32_ADDRESS_VERSION_MAINNET_SINGLESIG | C32_ADDRESS_VERSION_MAINNET_MULTISIG => {
                Some(StacksNetwork::Mainnet)
            }
            C32_ADDRESS_VERSION_TESTNET_SINGLESIG | C32_ADDRESS_VERSION_TESTNET_MULTISIG => {
                Some(StacksNetwork::Testnet)
            }
            _ => None,
        }
    }

    pub fn from_transaction_version(version: TransactionVersion) -> Self {
        match version {
            TransactionVersion::Mainnet => StacksNetwork::Mainnet,
            TransactionVersion::Testnet => StacksNetwork::Testnet,
        }
    }
}

impl fmt::Display for StacksNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StacksNetwork::Mainnet => write!(f, "mainnet"),
            StacksNetwork::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for StacksNetwork {
    type Err = StacksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(StacksNetwork::Mainnet),
            "testnet" => Ok(StacksNetwork::Testnet),
            other => Err(StacksError::ConfigError(format!(
                "Unknown network '{}', expected mainnet or testnet",
                other
            ))),
        }
    }
}
