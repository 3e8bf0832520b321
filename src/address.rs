//! Stacks addresses and principals

use crate::c32::{c32check_decode, c32check_encode};
use crate::crypto::{StacksPrivateKey, StacksPublicKey};
use crate::error::StacksError;
use crate::network::StacksNetwork;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const C32_ADDRESS_VERSION_MAINNET_SINGLESIG: u8 = 22;
pub const C32_ADDRESS_VERSION_MAINNET_MULTISIG: u8 = 20;
pub const C32_ADDRESS_VERSION_TESTNET_SINGLESIG: u8 = 26;
pub const C32_ADDRESS_VERSION_TESTNET_MULTISIG: u8 = 21;

/// Maximum length of a contract name in a contract principal.
pub const MAX_CONTRACT_NAME_LENGTH: usize = 128;

/// An account address: a c32 version digit and a hash160.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StacksAddress {
    version: u8,
    hash160: [u8; 20],
}

impl StacksAddress {
    pub fn new(version: u8, hash160: [u8; 20]) -> Result<Self, StacksError> {
        if version >= 32 {
            return Err(StacksError::InvalidAddress(format!(
                "Address version {} is out of range",
                version
            )));
        }
        Ok(StacksAddress { version, hash160 })
    }

    /// Single-sig (P2PKH) address of a public key on the given network.
    pub fn from_public_key(public_key: &StacksPublicKey, network: StacksNetwork) -> Self {
        StacksAddress {
            version: network.single_sig_address_version(),
            hash160: public_key.hash160(),
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn hash160(&self) -> &[u8; 20] {
        &self.hash160
    }

    /// Network implied by the version byte, if it is a standard one.
    pub fn network(&self) -> Option<StacksNetwork> {
        StacksNetwork::from_address_version(self.version)
    }

    pub fn is_testnet(&self) -> bool {
        self.network() == Some(StacksNetwork::Testnet)
    }
}

/// Address derived from a private key, e.g. to print the sender of a transfer.
pub fn get_address_from_private_key(key: &StacksPrivateKey, network: StacksNetwork) -> StacksAddress {
    StacksAddress::from_public_key(&key.public_key(), network)
}

impl fmt::Display for StacksAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // version is range-checked on construction so encoding cannot fail
        let encoded = c32check_encode(self.version, &self.hash160).map_err(|_| fmt::Error)?;
        write!(f, "S{}", encoded)
    }
}

impl FromStr for StacksAddress {
    type Err = StacksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let body = s
            .strip_prefix('S')
            .ok_or_else(|| StacksError::InvalidAddress(format!("'{}' does not start with S", s)))?;

        let (version, payload) = c32check_decode(body)?;
        let hash160: [u8; 20] = payload.as_slice().try_into().map_err(|_| {
            StacksError::InvalidAddress(format!(
                "'{}' carries {} bytes, expected 20",
                s,
                payload.len()
            ))
        })?;

        StacksAddress::new(version, hash160)
    }
}

impl Serialize for StacksAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StacksAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Recipient of a token transfer: an account, or a contract deployed by one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrincipalData {
    Standard(StacksAddress),
    Contract {
        address: StacksAddress,
        name: String,
    },
}

impl PrincipalData {
    pub fn contract(address: StacksAddress, name: &str) -> Result<Self, StacksError> {
        validate_contract_name(name)?;
        Ok(PrincipalData::Contract {
            address,
            name: name.to_string(),
        })
    }

    pub fn address(&self) -> &StacksAddress {
        match self {
            PrincipalData::Standard(address) => address,
            PrincipalData::Contract { address, .. } => address,
        }
    }
}

impl From<StacksAddress> for PrincipalData {
    fn from(address: StacksAddress) -> Self {
        PrincipalData::Standard(address)
    }
}

pub fn validate_contract_name(name: &str) -> Result<(), StacksError> {
    if name.is_empty() || name.len() > MAX_CONTRACT_NAME_LENGTH {
        return Err(StacksError::InvalidPrincipal(format!(
            "Contract name must be 1 to {} bytes, got {}",
            MAX_CONTRACT_NAME_LENGTH,
            name.len()
        )));
    }

    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_valid = chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !starts_with_letter || !rest_valid {
        return Err(StacksError::InvalidPrincipal(format!(
            "Invalid contract name '{}'",
            name
        )));
    }

    Ok(())
}

impl fmt::Display for PrincipalData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalData::Standard(address) => write!(f, "{}", address),
            PrincipalData::Contract { address, name } => write!(f, "{}.{}", address, name),
        }
    }
}

impl FromStr for PrincipalData {
    type Err = StacksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('.') {
            Some((address, name)) => PrincipalData::contract(address.parse()?, name),
            None => Ok(PrincipalData::Standard(s.parse()?)),
        }
    }
}
