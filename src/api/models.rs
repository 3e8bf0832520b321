//! Response models for the Stacks Blockchain API
//!
//! Field names follow the API's JSON. Amounts come back as decimal strings
//! (extended API) or `0x`-prefixed hex strings (core node API); both are
//! parsed into `u128` micro-STX.

use crate::transaction::{Memo, Txid, MEMO_LENGTH};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Deserialize an amount that may be a JSON number, a decimal string or a
/// `0x`-prefixed hex string.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| D::Error::custom(format!("invalid amount: {}", n))),
        JsonValue::String(s) => parse_amount(&s).map_err(D::Error::custom),
        _ => Err(D::Error::custom("expected number or string for amount")),
    }
}

/// Deserialize a proof field; the API sends an empty string when proofs
/// were not requested.
fn deserialize_proof<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|proof| !proof.is_empty()))
}

pub fn parse_amount(s: &str) -> Result<u128, String> {
    let s = s.trim();
    match s.strip_prefix("0x") {
        Some(hex_digits) if hex_digits.is_empty() => Ok(0),
        Some(hex_digits) => u128::from_str_radix(hex_digits, 16)
            .map_err(|e| format!("invalid hex amount '{}': {}", s, e)),
        None => s
            .parse::<u128>()
            .map_err(|e| format!("invalid amount '{}': {}", s, e)),
    }
}

/// `GET /v2/accounts/{principal}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Unlocked balance in micro-STX
    #[serde(deserialize_with = "deserialize_amount")]
    pub balance: u128,
    #[serde(deserialize_with = "deserialize_amount")]
    pub locked: u128,
    #[serde(default)]
    pub unlock_height: u64,
    pub nonce: u64,
    #[serde(default, deserialize_with = "deserialize_proof")]
    pub balance_proof: Option<String>,
    #[serde(default, deserialize_with = "deserialize_proof")]
    pub nonce_proof: Option<String>,
}

impl AccountInfo {
    pub fn has_proof(&self) -> bool {
        self.balance_proof.is_some() || self.nonce_proof.is_some()
    }

    /// Copy with the proof fields dropped.
    pub fn without_proof(&self) -> Self {
        AccountInfo {
            balance_proof: None,
            nonce_proof: None,
            ..self.clone()
        }
    }
}

/// `GET /extended/v1/address/{principal}/stx`, also the `stx` member of
/// the balances response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StxBalance {
    #[serde(deserialize_with = "deserialize_amount")]
    pub balance: u128,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_sent: u128,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_received: u128,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_fees_sent: u128,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_miner_rewards_received: u128,
    #[serde(default)]
    pub lock_tx_id: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub locked: u128,
    #[serde(default)]
    pub lock_height: u64,
    #[serde(default)]
    pub burnchain_lock_height: u64,
    #[serde(default)]
    pub burnchain_unlock_height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleTokenBalance {
    #[serde(deserialize_with = "deserialize_amount")]
    pub balance: u128,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_sent: u128,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_received: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonFungibleTokenHolding {
    #[serde(deserialize_with = "deserialize_amount")]
    pub count: u128,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_sent: u128,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_received: u128,
}

/// `GET /extended/v1/address/{principal}/balances`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub stx: StxBalance,
    #[serde(default)]
    pub fungible_tokens: BTreeMap<String, FungibleTokenBalance>,
    #[serde(default)]
    pub non_fungible_tokens: BTreeMap<String, NonFungibleTokenHolding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Success,
    AbortByResponse,
    AbortByPostCondition,
    DroppedReplaceByFee,
    DroppedReplaceAcrossFork,
    DroppedTooExpensive,
    DroppedStaleGarbageCollect,
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// Whether the transaction has left the mempool one way or another.
    pub fn is_final(&self) -> bool {
        !matches!(self, TransactionStatus::Pending | TransactionStatus::Unknown)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransferInfo {
    pub recipient_address: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: u128,
    /// Hex-encoded memo bytes, `0x`-prefixed
    #[serde(default)]
    pub memo: String,
}

impl TokenTransferInfo {
    /// Memo text with zero padding stripped; `None` if the hex is malformed.
    pub fn memo_text(&self) -> Option<String> {
        let hex_str = self.memo.strip_prefix("0x").unwrap_or(&self.memo);
        let bytes = hex::decode(hex_str).ok()?;
        if bytes.len() > MEMO_LENGTH {
            return None;
        }
        let mut padded = [0u8; MEMO_LENGTH];
        padded[..bytes.len()].copy_from_slice(&bytes);
        Some(Memo(padded).as_text())
    }
}

/// One transaction as returned by `/extended/v1/tx/{txid}` and in history
/// pages. Mempool and mined transactions share this shape; fields only one
/// of them carries are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub tx_id: Txid,
    pub tx_status: TransactionStatus,
    pub tx_type: String,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub fee_rate: u128,
    #[serde(default)]
    pub sender_address: Option<String>,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub burn_block_time: Option<i64>,
    #[serde(default)]
    pub receipt_time: Option<i64>,
    #[serde(default)]
    pub token_transfer: Option<TokenTransferInfo>,
}

/// `GET /extended/v1/address/{principal}/transactions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPage {
    pub limit: u32,
    pub offset: u32,
    pub total: u64,
    pub results: Vec<TransactionInfo>,
}

/// Optional `limit` / `offset` for history queries. Values are passed to
/// the API unchanged; the API caps `limit` at 50.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Pagination {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    pub(crate) fn to_query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        query
    }
}

/// `POST /extended/v1/faucets/stx`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaucetReceipt {
    pub success: bool,
    #[serde(rename = "txId", default)]
    pub tx_id: Option<Txid>,
    #[serde(rename = "txRaw", default)]
    pub tx_raw: Option<String>,
}

/// Fee for one transaction: rate from the node times serialized length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeEstimate {
    /// micro-STX per byte
    pub fee_rate: u64,
    pub byte_length: u64,
    /// micro-STX
    pub fee: u64,
}

/// Error body of a rejected `POST /v2/transactions`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BroadcastRejection {
    pub error: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reason_data: Option<JsonValue>,
    #[serde(default)]
    pub txid: Option<String>,
}

impl BroadcastRejection {
    pub fn describe(&self) -> String {
        let mut out = match &self.reason {
            Some(reason) => format!("{} ({})", self.error, reason),
            None => self.error.clone(),
        };
        if let Some(data) = &self.reason_data {
            out.push_str(&format!(": {}", data));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_amount_forms() {
        assert_eq!(parse_amount("0").unwrap(), 0);
        assert_eq!(parse_amount("1000000").unwrap(), 1_000_000);
        assert_eq!(parse_amount("0x0000000000000000000000000000000f").unwrap(), 15);
        assert_eq!(parse_amount("0x").unwrap(), 0);
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("0xzz").is_err());
    }

    #[test]
    fn test_account_info_with_and_without_proof() {
        let with_proof: AccountInfo = serde_json::from_value(json!({
            "balance": "0x0000000000000000000000003b9aca00",
            "locked": "0x00000000000000000000000000000000",
            "unlock_height": 0,
            "nonce": 3,
            "balance_proof": "0x01ab",
            "nonce_proof": "0x02cd"
        }))
        .unwrap();
        assert_eq!(with_proof.balance, 1_000_000_000);
        assert_eq!(with_proof.nonce, 3);
        assert!(with_proof.has_proof());

        let without: AccountInfo = serde_json::from_value(json!({
            "balance": "0x0000000000000000000000003b9aca00",
            "locked": "0x00000000000000000000000000000000",
            "unlock_height": 0,
            "nonce": 3,
            "balance_proof": "",
            "nonce_proof": ""
        }))
        .unwrap();
        assert!(!without.has_proof());
        assert_eq!(with_proof.without_proof(), without);
    }

    #[test]
    fn test_balance_response() {
        let balance: AccountBalance = serde_json::from_value(json!({
            "stx": {
                "balance": "500000000",
                "total_sent": "0",
                "total_received": "500000000",
                "total_fees_sent": "0",
                "total_miner_rewards_received": "0",
                "lock_tx_id": "",
                "locked": "0",
                "lock_height": 0,
                "burnchain_lock_height": 0,
                "burnchain_unlock_height": 0
            },
            "fungible_tokens": {
                "SP3K8BC0PPEVCV7NZ6QSRWPQ2JE9E5B6N3PA0KBR9.token::tok": {
                    "balance": "12", "total_sent": "0", "total_received": "12"
                }
            },
            "non_fungible_tokens": {}
        }))
        .unwrap();
        assert_eq!(balance.stx.balance, 500_000_000);
        assert_eq!(balance.fungible_tokens.len(), 1);
        assert!(balance.non_fungible_tokens.is_empty());
    }

    #[test]
    fn test_transaction_info_and_memo() {
        let info: TransactionInfo = serde_json::from_value(json!({
            "tx_id": "0x51e5aaaa6e56ea9edbc135858f1bb5c9ae2154def18133fbad7e34c7d334dd2c",
            "tx_status": "success",
            "tx_type": "token_transfer",
            "nonce": 0,
            "fee_rate": "2000",
            "sender_address": "STAW66WC3G8WA5F28JVNG1NTRJ6H76E7EMHDBMBN",
            "block_height": 12,
            "burn_block_time": 1_600_000_000,
            "token_transfer": {
                "recipient_address": "SP3FGQ8Z7JY9BWYZ5WM53E0M9NK7WHJF0691NZ159",
                "amount": "1000000",
                "memo": "0x68656c6c6f20776f726c6400000000000000000000000000000000000000000000"
            }
        }))
        .unwrap();
        assert_eq!(info.tx_status, TransactionStatus::Success);
        assert!(info.tx_status.is_final());
        assert_eq!(info.fee_rate, 2000);
        let transfer = info.token_transfer.unwrap();
        assert_eq!(transfer.amount, 1_000_000);
        assert_eq!(transfer.memo_text().as_deref(), Some("hello world"));
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let info: TransactionInfo = serde_json::from_value(json!({
            "tx_id": "0x51e5aaaa6e56ea9edbc135858f1bb5c9ae2154def18133fbad7e34c7d334dd2c",
            "tx_status": "something_new",
            "tx_type": "token_transfer",
            "receipt_time": 1_600_000_000
        }))
        .unwrap();
        assert_eq!(info.tx_status, TransactionStatus::Unknown);
        assert!(!info.tx_status.is_final());
        assert!(info.block_height.is_none());
    }

    #[test]
    fn test_pagination_query() {
        assert!(Pagination::default().to_query().is_empty());
        assert_eq!(
            Pagination::new(50, 50).to_query(),
            vec![("limit", "50".to_string()), ("offset", "50".to_string())]
        );
    }

    #[test]
    fn test_broadcast_rejection_description() {
        let rejection: BroadcastRejection = serde_json::from_value(json!({
            "error": "transaction rejected",
            "reason": "BadNonce",
            "reason_data": {"expected": 4, "actual": 0},
            "txid": "51e5aaaa6e56ea9edbc135858f1bb5c9ae2154def18133fbad7e34c7d334dd2c"
        }))
        .unwrap();
        let description = rejection.describe();
        assert!(description.starts_with("transaction rejected (BadNonce)"));
        assert!(description.contains("expected"));
    }
}
