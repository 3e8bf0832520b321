//! Cryptographic primitives for Stacks keys and transaction signatures

use crate::error::StacksError;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use ripemd::Ripemd160;
use secp256k1::{
    constants::SECRET_KEY_SIZE,
    ecdsa::{RecoverableSignature, RecoveryId},
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use sha2::{Digest, Sha256, Sha512_256};
use std::fmt;

/// A thread-safe, lazily initialized Secp256k1 context.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Size of a recoverable signature on the wire: recovery id, r, s.
pub const RECOVERABLE_SIGNATURE_SIZE: usize = 65;

/// Suffix byte marking a private key whose public key is used compressed.
const COMPRESSED_KEY_SUFFIX: u8 = 0x01;

/// RIPEMD-160 of SHA-256, the 20-byte hash behind every Stacks address.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

/// SHA-512/256, used for txids and sighashes.
pub fn sha512_256(data: &[u8]) -> [u8; 32] {
    Sha512_256::digest(data).into()
}

/// Double SHA-256, used for c32check checksums.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

/// A secp256k1 signing key plus the flag telling whether its public key
/// is committed to in compressed form.
#[derive(Clone, PartialEq, Eq)]
pub struct StacksPrivateKey {
    secret_key: SecretKey,
    compressed: bool,
}

impl fmt::Debug for StacksPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StacksPrivateKey")
            .field("secret_key", &"<redacted>")
            .field("compressed", &self.compressed)
            .finish()
    }
}

impl StacksPrivateKey {
    /// Generates a new random key using the OS random number generator.
    /// Generated keys always use compressed public keys.
    pub fn generate() -> Self {
        StacksPrivateKey {
            secret_key: SecretKey::new(&mut OsRng),
            compressed: true,
        }
    }

    pub fn from_secret_key(secret_key: SecretKey, compressed: bool) -> Self {
        StacksPrivateKey {
            secret_key,
            compressed,
        }
    }

    /// Parses raw key bytes: 32 bytes for an uncompressed key, or 33 bytes
    /// ending in `0x01` for a compressed one.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, StacksError> {
        let (key_bytes, compressed) = match bytes.len() {
            SECRET_KEY_SIZE => (bytes, false),
            33 if bytes[SECRET_KEY_SIZE] == COMPRESSED_KEY_SUFFIX => {
                (&bytes[..SECRET_KEY_SIZE], true)
            }
            33 => {
                return Err(StacksError::CryptoError(format!(
                    "Compressed private key must end in 01, got {:02x}",
                    bytes[SECRET_KEY_SIZE]
                )))
            }
            len => {
                return Err(StacksError::CryptoError(format!(
                    "Private key must be {} or {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    SECRET_KEY_SIZE + 1,
                    len
                )))
            }
        };

        let secret_key = SecretKey::from_slice(key_bytes)
            .map_err(|e| StacksError::CryptoError(format!("Invalid secret key bytes: {}", e)))?;

        Ok(Self::from_secret_key(secret_key, compressed))
    }

    /// Parses the hex string form, e.g. `edf9...70bc01`.
    pub fn from_hex(hex_str: &str) -> Result<Self, StacksError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| StacksError::CryptoError(format!("Invalid private key hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    /// Hex string form, with the `01` suffix for compressed keys.
    pub fn to_hex(&self) -> String {
        let mut bytes = self.secret_key.secret_bytes().to_vec();
        if self.compressed {
            bytes.push(COMPRESSED_KEY_SUFFIX);
        }
        hex::encode(bytes)
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn public_key(&self) -> StacksPublicKey {
        StacksPublicKey {
            key: PublicKey::from_secret_key(&SECP256K1_CONTEXT, &self.secret_key),
            compressed: self.compressed,
        }
    }

    /// Signs a 32-byte sighash directly (no further hashing) and returns the
    /// recoverable signature in `[recovery_id, r, s]` order.
    pub fn sign(&self, sighash: &[u8; 32]) -> MessageSignature {
        let message = Message::from_digest(*sighash);
        let signature = SECP256K1_CONTEXT.sign_ecdsa_recoverable(&message, &self.secret_key);
        MessageSignature::from_recoverable(&signature)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StacksPublicKey {
    key: PublicKey,
    compressed: bool,
}

impl StacksPublicKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, StacksError> {
        let key = PublicKey::from_slice(bytes)
            .map_err(|e| StacksError::CryptoError(format!("Invalid public key: {}", e)))?;
        Ok(StacksPublicKey {
            key,
            compressed: bytes.len() == 33,
        })
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Serialized key, 33 bytes when compressed and 65 bytes otherwise.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.compressed {
            self.key.serialize().to_vec()
        } else {
            self.key.serialize_uncompressed().to_vec()
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_bytes())
    }
}

/// Recoverable ECDSA signature as carried in a spending condition.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MessageSignature(pub [u8; RECOVERABLE_SIGNATURE_SIZE]);

impl fmt::Debug for MessageSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageSignature({})", hex::encode(self.0))
    }
}

impl MessageSignature {
    /// The all-zero placeholder used in unsigned transactions.
    pub fn empty() -> Self {
        MessageSignature([0u8; RECOVERABLE_SIGNATURE_SIZE])
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    fn from_recoverable(signature: &RecoverableSignature) -> Self {
        let (recovery_id, compact) = signature.serialize_compact();
        let mut bytes = [0u8; RECOVERABLE_SIGNATURE_SIZE];
        bytes[0] = recovery_id.to_i32() as u8;
        bytes[1..].copy_from_slice(&compact);
        MessageSignature(bytes)
    }

    fn to_recoverable(self) -> Result<RecoverableSignature, StacksError> {
        let recovery_id = RecoveryId::from_i32(i32::from(self.0[0]))
            .map_err(|e| StacksError::CryptoError(format!("Invalid recovery id: {}", e)))?;
        RecoverableSignature::from_compact(&self.0[1..], recovery_id)
            .map_err(|e| StacksError::CryptoError(format!("Invalid signature: {}", e)))
    }

    /// Recovers the public key that produced this signature over `sighash`.
    pub fn recover(
        &self,
        sighash: &[u8; 32],
        compressed: bool,
    ) -> Result<StacksPublicKey, StacksError> {
        let message = Message::from_digest(*sighash);
        let key = SECP256K1_CONTEXT
            .recover_ecdsa(&message, &self.to_recoverable()?)
            .map_err(|_| StacksError::CryptoError("Public key recovery failed".to_string()))?;
        Ok(StacksPublicKey { key, compressed })
    }
}
