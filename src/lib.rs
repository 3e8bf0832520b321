//! stacks-basics - account queries and STX transfers against the Stacks
//! Blockchain API
//!
//! # Architecture
//!
//! ## Encoding & Cryptography
//! - [`c32`] - c32check encoding used by Stacks addresses
//! - [`crypto`] - secp256k1 keys, recoverable signatures, hashes
//! - [`address`] - addresses and principals
//! - [`network`] - mainnet / testnet parameters
//!
//! ## Transactions
//! - [`transaction`] - STX transfer construction, wire codec, signing
//!
//! ## API Client
//! - [`api`] - HTTP client for the account, faucet, fee and transaction endpoints
//!
//! ## Flows
//! - [`flows`] - `AccountQueryFlow` and `TransferFlow`
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - CLI utilities

#![forbid(unsafe_code)]

// ============================================================================
// Encoding & Cryptography
// ============================================================================
pub mod address;
pub mod c32;
pub mod crypto;
pub mod network;

// ============================================================================
// Transactions
// ============================================================================
pub mod transaction;

// ============================================================================
// API Client
// ============================================================================
pub mod api;

// ============================================================================
// Flows
// ============================================================================
pub mod flows;

// ============================================================================
// Configuration & Utilities
// ============================================================================
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;

pub use error::{Result, StacksError};
