//! Transaction types for Stacks token transfers
use crate::address::PrincipalData;
use crate::crypto::{sha512_256, MessageSignature};
use crate::error::StacksError;
use crate::network::{StacksNetwork, TransactionVersion};
use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Memo field length on the wire; shorter memos are zero-padded.
pub const MEMO_LENGTH: usize = 34;

/// Authorization type byte for an origin-paid transaction.
pub const AUTH_TYPE_STANDARD: u8 = 0x04;

/// Transaction id: SHA-512/256 of the serialized transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Txid(pub [u8; 32]);

impl Txid {
    pub fn from_tx_bytes(bytes: &[u8]) -> Self {
        Txid(sha512_256(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Txid({})", self)
    }
}

impl FromStr for Txid {
    type Err = StacksError;

    /// Accepts 64 hex characters with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_matches('"');
        let hex_str = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(hex_str)
            .map_err(|e| StacksError::InvalidTxid(format!("'{}': {}", s, e)))?;
        let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            StacksError::InvalidTxid(format!("'{}' is {} bytes, expected 32", s, bytes.len()))
        })?;
        Ok(Txid(bytes))
    }
}

impl Serialize for Txid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Txid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Where the transaction may be mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AnchorMode {
    OnChainOnly = 0x01,
    OffChainOnly = 0x02,
    #[default]
    Any = 0x03,
}

impl AnchorMode {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(AnchorMode::OnChainOnly),
            0x02 => Some(AnchorMode::OffChainOnly),
            0x03 => Some(AnchorMode::Any),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PostConditionMode {
    Allow = 0x01,
    #[default]
    Deny = 0x02,
}

impl PostConditionMode {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(PostConditionMode::Allow),
            0x02 => Some(PostConditionMode::Deny),
            _ => None,
        }
    }
}

/// Single-signature hash modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HashMode {
    P2PKH = 0x00,
    P2WPKH = 0x02,
}

impl HashMode {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(HashMode::P2PKH),
            0x02 => Some(HashMode::P2WPKH),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyEncoding {
    Compressed = 0x00,
    Uncompressed = 0x01,
}

impl KeyEncoding {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(KeyEncoding::Compressed),
            0x01 => Some(KeyEncoding::Uncompressed),
            _ => None,
        }
    }

    pub fn is_compressed(&self) -> bool {
        *self == KeyEncoding::Compressed
    }
}

/// Who pays, and the proof that they agreed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendingCondition {
    pub hash_mode: HashMode,
    pub signer: [u8; 20],
    pub nonce: u64,
    pub fee: u64,
    pub key_encoding: KeyEncoding,
    pub signature: MessageSignature,
}

impl SpendingCondition {
    /// Copy with the fields a signature cannot commit to zeroed out.
    pub fn cleared(&self) -> Self {
        SpendingCondition {
            nonce: 0,
            fee: 0,
            signature: MessageSignature::empty(),
            ..self.clone()
        }
    }
}

/// Fixed-size memo attached to a token transfer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Memo(pub [u8; MEMO_LENGTH]);

impl Memo {
    pub fn new(text: &str) -> Result<Self, StacksError> {
        let bytes = text.as_bytes();
        if bytes.len() > MEMO_LENGTH {
            return Err(StacksError::InvalidTransaction(format!(
                "Memo exceeds maximum length of {} bytes",
                MEMO_LENGTH
            )));
        }
        let mut memo = [0u8; MEMO_LENGTH];
        memo[..bytes.len()].copy_from_slice(bytes);
        Ok(Memo(memo))
    }

    pub fn empty() -> Self {
        Memo([0u8; MEMO_LENGTH])
    }

    /// Memo text with the zero padding stripped.
    pub fn as_text(&self) -> String {
        let end = self
            .0
            .iter()
            .rposition(|b| *b != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Debug for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Memo({:?})", self.as_text())
    }
}

/// STX token transfer payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransferPayload {
    pub recipient: PrincipalData,
    /// Amount in micro-STX
    pub amount: u64,
    pub memo: Memo,
}

/// A complete Stacks transaction carrying a token transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StacksTransaction {
    pub version: TransactionVersion,
    pub chain_id: u32,
    pub auth: SpendingCondition,
    pub anchor_mode: AnchorMode,
    pub post_condition_mode: PostConditionMode,
    pub payload: TokenTransferPayload,
}

impl StacksTransaction {
    pub fn network(&self) -> StacksNetwork {
        StacksNetwork::from_transaction_version(self.version)
    }

    pub fn nonce(&self) -> u64 {
        self.auth.nonce
    }

    pub fn fee(&self) -> u64 {
        self.auth.fee
    }

    pub fn memo(&self) -> String {
        self.payload.memo.as_text()
    }

    pub fn is_signed(&self) -> bool {
        !self.auth.signature.is_empty()
    }

    pub fn txid(&self) -> Txid {
        Txid::from_tx_bytes(&self.serialize())
    }

    /// Txid of this transaction with nonce, fee and signature cleared.
    pub fn initial_sighash(&self) -> [u8; 32] {
        let mut cleared = self.clone();
        cleared.auth = self.auth.cleared();
        cleared.txid().0
    }

    /// The hash the origin actually signs: the initial sighash bound to
    /// the authorization type, fee and nonce.
    pub fn presign_sighash(&self) -> [u8; 32] {
        let mut message = [0u8; 32 + 1 + 8 + 8];
        message[..32].copy_from_slice(&self.initial_sighash());
        message[32] = AUTH_TYPE_STANDARD;
        BigEndian::write_u64(&mut message[33..41], self.auth.fee);
        BigEndian::write_u64(&mut message[41..], self.auth.nonce);
        sha512_256(&message)
    }
}
