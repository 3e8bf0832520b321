//! Consensus wire format for token-transfer transactions
//!
//! All integers are big-endian. Only what a single-sig STX transfer
//! uses is supported: standard authorization, no post conditions and a
//! token-transfer payload.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::address::{validate_contract_name, PrincipalData, StacksAddress};
use crate::crypto::{MessageSignature, RECOVERABLE_SIGNATURE_SIZE};
use crate::error::StacksError;
use crate::network::TransactionVersion;
use crate::transaction::types::{
    AnchorMode, HashMode, KeyEncoding, Memo, PostConditionMode, SpendingCondition,
    StacksTransaction, TokenTransferPayload, AUTH_TYPE_STANDARD, MEMO_LENGTH,
};

pub const PAYLOAD_TYPE_TOKEN_TRANSFER: u8 = 0x00;
pub const PRINCIPAL_TYPE_STANDARD: u8 = 0x05;
pub const PRINCIPAL_TYPE_CONTRACT: u8 = 0x06;

/// Serialization of types that appear inside a transaction.
///
/// Writing can only fail if the underlying writer fails; every value
/// reachable through the public constructors has a valid encoding.
pub trait StacksMessageCodec: Sized {
    fn consensus_serialize<W: Write>(&self, writer: &mut W) -> io::Result<()>;

    fn consensus_deserialize<R: Read>(reader: &mut R) -> Result<Self, StacksError>;

    fn serialize_to_vec(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        // writes into a Vec never fail
        let _ = self.consensus_serialize(&mut bytes);
        bytes
    }
}

fn read_failed(what: &'static str) -> impl FnOnce(io::Error) -> StacksError {
    move |e| StacksError::DeserializationError(format!("reading {}: {}", what, e))
}

fn unknown(what: &str, byte: u8) -> StacksError {
    StacksError::DeserializationError(format!("unknown {} 0x{:02x}", what, byte))
}

impl StacksMessageCodec for SpendingCondition {
    fn consensus_serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.hash_mode as u8)?;
        writer.write_all(&self.signer)?;
        writer.write_u64::<BigEndian>(self.nonce)?;
        writer.write_u64::<BigEndian>(self.fee)?;
        writer.write_u8(self.key_encoding as u8)?;
        writer.write_all(&self.signature.0)
    }

    fn consensus_deserialize<R: Read>(reader: &mut R) -> Result<Self, StacksError> {
        let hash_mode_byte = reader.read_u8().map_err(read_failed("hash mode"))?;
        let hash_mode =
            HashMode::from_u8(hash_mode_byte).ok_or_else(|| unknown("hash mode", hash_mode_byte))?;
        let mut signer = [0u8; 20];
        reader.read_exact(&mut signer).map_err(read_failed("signer"))?;
        let nonce = reader.read_u64::<BigEndian>().map_err(read_failed("nonce"))?;
        let fee = reader.read_u64::<BigEndian>().map_err(read_failed("fee"))?;
        let encoding_byte = reader.read_u8().map_err(read_failed("key encoding"))?;
        let key_encoding = KeyEncoding::from_u8(encoding_byte)
            .ok_or_else(|| unknown("key encoding", encoding_byte))?;
        let mut signature = [0u8; RECOVERABLE_SIGNATURE_SIZE];
        reader
            .read_exact(&mut signature)
            .map_err(read_failed("signature"))?;

        if hash_mode == HashMode::P2WPKH && !key_encoding.is_compressed() {
            return Err(StacksError::DeserializationError(
                "P2WPKH requires a compressed public key".to_string(),
            ));
        }

        Ok(SpendingCondition {
            hash_mode,
            signer,
            nonce,
            fee,
            key_encoding,
            signature: MessageSignature(signature),
        })
    }
}

impl StacksMessageCodec for StacksAddress {
    fn consensus_serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.version())?;
        writer.write_all(self.hash160())
    }

    fn consensus_deserialize<R: Read>(reader: &mut R) -> Result<Self, StacksError> {
        let version = reader.read_u8().map_err(read_failed("address version"))?;
        let mut hash160 = [0u8; 20];
        reader
            .read_exact(&mut hash160)
            .map_err(read_failed("address hash"))?;
        StacksAddress::new(version, hash160)
            .map_err(|e| StacksError::DeserializationError(e.to_string()))
    }
}

impl StacksMessageCodec for PrincipalData {
    fn consensus_serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            PrincipalData::Standard(address) => {
                writer.write_u8(PRINCIPAL_TYPE_STANDARD)?;
                address.consensus_serialize(writer)
            }
            PrincipalData::Contract { address, name } => {
                writer.write_u8(PRINCIPAL_TYPE_CONTRACT)?;
                address.consensus_serialize(writer)?;
                // name length is bounded by validate_contract_name
                writer.write_u8(name.len() as u8)?;
                writer.write_all(name.as_bytes())
            }
        }
    }

    fn consensus_deserialize<R: Read>(reader: &mut R) -> Result<Self, StacksError> {
        let principal_type = reader.read_u8().map_err(read_failed("principal type"))?;
        match principal_type {
            PRINCIPAL_TYPE_STANDARD => Ok(PrincipalData::Standard(
                StacksAddress::consensus_deserialize(reader)?,
            )),
            PRINCIPAL_TYPE_CONTRACT => {
                let address = StacksAddress::consensus_deserialize(reader)?;
                let len = reader.read_u8().map_err(read_failed("contract name length"))? as usize;
                let mut name = vec![0u8; len];
                reader
                    .read_exact(&mut name)
                    .map_err(read_failed("contract name"))?;
                let name = String::from_utf8(name).map_err(|_| {
                    StacksError::DeserializationError("contract name is not UTF-8".to_string())
                })?;
                validate_contract_name(&name)
                    .map_err(|e| StacksError::DeserializationError(e.to_string()))?;
                Ok(PrincipalData::Contract { address, name })
            }
            other => Err(unknown("principal type", other)),
        }
    }
}

impl StacksMessageCodec for TokenTransferPayload {
    fn consensus_serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(PAYLOAD_TYPE_TOKEN_TRANSFER)?;
        self.recipient.consensus_serialize(writer)?;
        writer.write_u64::<BigEndian>(self.amount)?;
        writer.write_all(&self.memo.0)
    }

    fn consensus_deserialize<R: Read>(reader: &mut R) -> Result<Self, StacksError> {
        let payload_type = reader.read_u8().map_err(read_failed("payload type"))?;
        if payload_type != PAYLOAD_TYPE_TOKEN_TRANSFER {
            return Err(unknown("payload type", payload_type));
        }
        let recipient = PrincipalData::consensus_deserialize(reader)?;
        let amount = reader.read_u64::<BigEndian>().map_err(read_failed("amount"))?;
        let mut memo = [0u8; MEMO_LENGTH];
        reader.read_exact(&mut memo).map_err(read_failed("memo"))?;
        Ok(TokenTransferPayload {
            recipient,
            amount,
            memo: Memo(memo),
        })
    }
}

impl StacksMessageCodec for StacksTransaction {
    fn consensus_serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.version as u8)?;
        writer.write_u32::<BigEndian>(self.chain_id)?;
        writer.write_u8(AUTH_TYPE_STANDARD)?;
        self.auth.consensus_serialize(writer)?;
        writer.write_u8(self.anchor_mode as u8)?;
        writer.write_u8(self.post_condition_mode as u8)?;
        // no post conditions
        writer.write_u32::<BigEndian>(0)?;
        self.payload.consensus_serialize(writer)
    }

    fn consensus_deserialize<R: Read>(reader: &mut R) -> Result<Self, StacksError> {
        let version_byte = reader.read_u8().map_err(read_failed("version"))?;
        let version = TransactionVersion::from_u8(version_byte)
            .ok_or_else(|| unknown("transaction version", version_byte))?;
        let chain_id = reader.read_u32::<BigEndian>().map_err(read_failed("chain id"))?;

        let auth_type = reader.read_u8().map_err(read_failed("auth type"))?;
        if auth_type != AUTH_TYPE_STANDARD {
            return Err(unknown("auth type", auth_type));
        }
        let auth = SpendingCondition::consensus_deserialize(reader)?;

        let anchor_byte = reader.read_u8().map_err(read_failed("anchor mode"))?;
        let anchor_mode =
            AnchorMode::from_u8(anchor_byte).ok_or_else(|| unknown("anchor mode", anchor_byte))?;
        let mode_byte = reader.read_u8().map_err(read_failed("post condition mode"))?;
        let post_condition_mode = PostConditionMode::from_u8(mode_byte)
            .ok_or_else(|| unknown("post condition mode", mode_byte))?;

        let post_conditions = reader
            .read_u32::<BigEndian>()
            .map_err(read_failed("post condition count"))?;
        if post_conditions != 0 {
            return Err(StacksError::DeserializationError(format!(
                "{} post conditions present, only empty lists are supported",
                post_conditions
            )));
        }

        let payload = TokenTransferPayload::consensus_deserialize(reader)?;

        Ok(StacksTransaction {
            version,
            chain_id,
            auth,
            anchor_mode,
            post_condition_mode,
            payload,
        })
    }
}

impl StacksTransaction {
    pub fn serialize(&self) -> Vec<u8> {
        self.serialize_to_vec()
    }

    pub fn serialize_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    /// Decodes a complete transaction, rejecting trailing bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, StacksError> {
        let mut reader = bytes;
        let tx = Self::consensus_deserialize(&mut reader)?;
        if !reader.is_empty() {
            return Err(StacksError::DeserializationError(format!(
                "{} trailing bytes after transaction",
                reader.len()
            )));
        }
        Ok(tx)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, StacksError> {
        let hex_str = hex_str.trim();
        let bytes = hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str))?;
        Self::deserialize(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transaction() -> StacksTransaction {
        StacksTransaction {
            version: TransactionVersion::Testnet,
            chain_id: 0x8000_0000,
            auth: SpendingCondition {
                hash_mode: HashMode::P2PKH,
                signer: [0x11; 20],
                nonce: 7,
                fee: 180,
                key_encoding: KeyEncoding::Compressed,
                signature: MessageSignature([0x22; RECOVERABLE_SIGNATURE_SIZE]),
            },
            anchor_mode: AnchorMode::Any,
            post_condition_mode: PostConditionMode::Deny,
            payload: TokenTransferPayload {
                recipient: "SP3FGQ8Z7JY9BWYZ5WM53E0M9NK7WHJF0691NZ159.hello-world"
                    .parse()
                    .unwrap(),
                amount: 42,
                memo: Memo::new("memo").unwrap(),
            },
        }
    }

    #[test]
    fn test_contract_principal_transaction_decodes() {
        let tx = sample_transaction();
        let bytes = tx.serialize();
        // 180 bytes for a standard recipient, plus name length and name
        assert_eq!(bytes.len(), 180 + 1 + "hello-world".len());
        assert_eq!(StacksTransaction::deserialize(&bytes).unwrap(), tx);
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        let mut bytes = sample_transaction().serialize();
        bytes.push(0);
        let err = StacksTransaction::deserialize(&bytes).unwrap_err();
        assert!(err.to_string().contains("trailing"));
    }

    #[test]
    fn test_rejects_truncated_input() {
        let bytes = sample_transaction().serialize();
        let err = StacksTransaction::deserialize(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(err.to_string().contains("memo"));
    }

    #[test]
    fn test_integer_fields_are_big_endian() {
        let bytes = sample_transaction().serialize();
        assert_eq!(&bytes[1..5], &[0x80, 0x00, 0x00, 0x00]);
        // version(1) chain(4) auth type(1) hash mode(1) signer(20)
        let nonce_offset = 1 + 4 + 1 + 1 + 20;
        assert_eq!(&bytes[nonce_offset..nonce_offset + 8], &7u64.to_be_bytes());
        assert_eq!(
            &bytes[nonce_offset + 8..nonce_offset + 16],
            &180u64.to_be_bytes()
        );
    }

    #[test]
    fn test_truncated_integer_names_the_field() {
        let bytes = sample_transaction().serialize();
        let nonce_offset = 1 + 4 + 1 + 1 + 20;
        let err = StacksTransaction::deserialize(&bytes[..nonce_offset + 3]).unwrap_err();
        assert!(matches!(err, StacksError::DeserializationError(_)));
        assert!(err.to_string().contains("reading nonce"));
    }

    #[test]
    fn test_rejects_unknown_tags() {
        let mut bytes = sample_transaction().serialize();
        bytes[0] = 0x42;
        assert!(StacksTransaction::deserialize(&bytes)
            .unwrap_err()
            .to_string()
            .contains("transaction version"));

        let mut bytes = sample_transaction().serialize();
        bytes[5] = 0x05;
        assert!(StacksTransaction::deserialize(&bytes)
            .unwrap_err()
            .to_string()
            .contains("auth type"));
    }

    #[test]
    fn test_rejects_post_conditions() {
        let mut bytes = sample_transaction().serialize();
        // version(1) chain(4) auth type(1) condition(103) anchor(1) mode(1)
        let count_offset = 1 + 4 + 1 + 103 + 1 + 1;
        bytes[count_offset + 3] = 1;
        let err = StacksTransaction::deserialize(&bytes).unwrap_err();
        assert!(err.to_string().contains("post conditions"));
    }
}
