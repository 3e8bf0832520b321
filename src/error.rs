//! Error types for stacks-basics

use std::fmt;

#[derive(Debug, Clone)]
pub enum StacksError {
    NetworkError(String),
    ApiError { status: u16, body: String },
    BroadcastRejected { reason: String, txid: Option<String> },
    InvalidAddress(String),
    InvalidPrincipal(String),
    CryptoError(String),
    InvalidTransaction(String),
    DeserializationError(String),
    InvalidTxid(String),
    FaucetUnavailable(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for StacksError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StacksError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            StacksError::ApiError { status, body } => {
                write!(f, "API error (HTTP {}): {}", status, body)
            }
            StacksError::BroadcastRejected { reason, txid } => match txid {
                Some(txid) => write!(f, "Transaction {} rejected: {}", txid, reason),
                None => write!(f, "Transaction rejected: {}", reason),
            },
            StacksError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            StacksError::InvalidPrincipal(msg) => write!(f, "Invalid principal: {}", msg),
            StacksError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            StacksError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {}", msg),
            StacksError::DeserializationError(msg) => {
                write!(f, "Failed to decode transaction: {}", msg)
            }
            StacksError::InvalidTxid(msg) => write!(f, "Invalid txid: {}", msg),
            StacksError::FaucetUnavailable(msg) => write!(f, "Faucet unavailable: {}", msg),
            StacksError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            StacksError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for StacksError {}

impl From<std::io::Error> for StacksError {
    fn from(err: std::io::Error) -> Self {
        StacksError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for StacksError {
    fn from(err: reqwest::Error) -> Self {
        StacksError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for StacksError {
    fn from(err: serde_json::Error) -> Self {
        StacksError::NetworkError(format!("Malformed response: {}", err))
    }
}

impl From<toml::de::Error> for StacksError {
    fn from(err: toml::de::Error) -> Self {
        StacksError::ConfigError(err.to_string())
    }
}

impl From<hex::FromHexError> for StacksError {
    fn from(err: hex::FromHexError) -> Self {
        StacksError::DeserializationError(format!("Invalid hex: {}", err))
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, StacksError>;
