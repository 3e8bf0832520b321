//! Building and signing STX token transfers

use crate::address::{get_address_from_private_key, PrincipalData, StacksAddress};
use crate::crypto::{MessageSignature, StacksPrivateKey};
use crate::error::StacksError;
use crate::network::StacksNetwork;
use crate::transaction::types::{
    AnchorMode, HashMode, KeyEncoding, Memo, PostConditionMode, SpendingCondition,
    StacksTransaction, TokenTransferPayload, Txid,
};
use tracing::debug;

/// An unsigned transfer intent: everything needed to produce a signed
/// transaction except the signature itself.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub recipient: PrincipalData,
    /// Amount in micro-STX
    pub amount: u64,
    /// Fee in micro-STX
    pub fee: u64,
    pub nonce: u64,
    pub memo: Memo,
    pub network: StacksNetwork,
    pub anchor_mode: AnchorMode,
    sender_key: StacksPrivateKey,
}

impl TransferRequest {
    pub fn new(
        recipient: PrincipalData,
        amount: u64,
        fee: u64,
        nonce: u64,
        memo: &str,
        network: StacksNetwork,
        sender_key: StacksPrivateKey,
    ) -> Result<Self, StacksError> {
        Ok(TransferRequest {
            recipient,
            amount,
            fee,
            nonce,
            memo: Memo::new(memo)?,
            network,
            anchor_mode: AnchorMode::default(),
            sender_key,
        })
    }

    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn with_anchor_mode(mut self, anchor_mode: AnchorMode) -> Self {
        self.anchor_mode = anchor_mode;
        self
    }

    pub fn sender_address(&self) -> StacksAddress {
        get_address_from_private_key(&self.sender_key, self.network)
    }

    /// The transaction this request describes, with an empty signature.
    pub fn unsigned_transaction(&self) -> StacksTransaction {
        let public_key = self.sender_key.public_key();
        let key_encoding = if public_key.is_compressed() {
            KeyEncoding::Compressed
        } else {
            KeyEncoding::Uncompressed
        };

        StacksTransaction {
            version: self.network.transaction_version(),
            chain_id: self.network.chain_id(),
            auth: SpendingCondition {
                hash_mode: HashMode::P2PKH,
                signer: public_key.hash160(),
                nonce: self.nonce,
                fee: self.fee,
                key_encoding,
                signature: MessageSignature::empty(),
            },
            anchor_mode: self.anchor_mode,
            post_condition_mode: PostConditionMode::Deny,
            payload: TokenTransferPayload {
                recipient: self.recipient.clone(),
                amount: self.amount,
                memo: self.memo,
            },
        }
    }

    pub fn sign(&self) -> SignedTransaction {
        let mut transaction = self.unsigned_transaction();
        let sighash = transaction.presign_sighash();
        transaction.auth.signature = self.sender_key.sign(&sighash);

        let signed = SignedTransaction::from_transaction(transaction);
        debug!(
            "Signed transfer {} of {} micro-STX to {} (nonce {}, fee {})",
            signed.txid(),
            self.amount,
            self.recipient,
            self.nonce,
            self.fee
        );
        signed
    }
}

/// A signed transaction together with its wire bytes and id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: StacksTransaction,
    bytes: Vec<u8>,
    txid: Txid,
}

impl SignedTransaction {
    fn from_transaction(transaction: StacksTransaction) -> Self {
        let bytes = transaction.serialize();
        let txid = Txid::from_tx_bytes(&bytes);
        SignedTransaction {
            transaction,
            bytes,
            txid,
        }
    }

    /// Decodes wire bytes; the transaction must carry a signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StacksError> {
        let transaction = StacksTransaction::deserialize(bytes)?;
        if !transaction.is_signed() {
            return Err(StacksError::InvalidTransaction(
                "Transaction not signed".to_string(),
            ));
        }
        Ok(SignedTransaction {
            transaction,
            bytes: bytes.to_vec(),
            txid: Txid::from_tx_bytes(bytes),
        })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, StacksError> {
        let hex_str = hex_str.trim();
        Self::from_bytes(&hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str))?)
    }

    pub fn transaction(&self) -> &StacksTransaction {
        &self.transaction
    }

    pub fn serialize(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn txid(&self) -> Txid {
        self.txid
    }

    pub fn memo(&self) -> String {
        self.transaction.memo()
    }
}

/// Option set for [`make_stx_token_transfer`].
#[derive(Debug, Clone)]
pub struct TokenTransferOptions {
    pub recipient: PrincipalData,
    pub amount: u64,
    pub fee: u64,
    pub nonce: u64,
    pub memo: String,
    pub network: StacksNetwork,
    pub sender_key: StacksPrivateKey,
}

/// Builds and signs a transfer in one step.
pub fn make_stx_token_transfer(options: TokenTransferOptions) -> Result<SignedTransaction, StacksError> {
    let request = TransferRequest::new(
        options.recipient,
        options.amount,
        options.fee,
        options.nonce,
        &options.memo,
        options.network,
        options.sender_key,
    )?;
    Ok(request.sign())
}
