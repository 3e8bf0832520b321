//! Transaction module split into types, wire codec, signing and validation

pub mod transfer;
pub mod types;
pub mod validation;
pub mod wire;

pub use transfer::*;
pub use types::*;
pub use wire::StacksMessageCodec;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::StacksPrivateKey;
    use crate::error::StacksError;
    use crate::network::StacksNetwork;

    const SENDER_KEY: &str = "edf9aee84d9b7abc145504dde6726c64f369d37ee34ded868fabd876c26570bc01";
    const RECIPIENT: &str = "SP3FGQ8Z7JY9BWYZ5WM53E0M9NK7WHJF0691NZ159";

    const UNSIGNED_HEX: &str = "8080000000040015c31b8c1c11c515e244b75806bac48d1399c7750000000000000000000000\
        0000000000000000000000000000000000000000000000000000000000000000000000000000\
        0000000000000000000000000000000000000000000000000000000000000000000302000000\
        00000516df0ba3e79792be7be5e50a370289accfc8c9e03200000000000f424068656c6c6f20\
        776f726c640000000000000000000000000000000000000000000000";

    const SIGNED_HEX: &str = "8080000000040015c31b8c1c11c515e244b75806bac48d1399c7750000000000000000000000\
        00000007d00001e8cecf6ce0d899fe95834149b68b1dac273d690f57f2ac9f46f32b6b03714d\
        f42b56708793fef830c88d6d1334e2313cc15abb87d0a2af0cf726bdc9360263980302000000\
        00000516df0ba3e79792be7be5e50a370289accfc8c9e03200000000000f424068656c6c6f20\
        776f726c640000000000000000000000000000000000000000000000";

    const SIGNED_TXID: &str = "0x51e5aaaa6e56ea9edbc135858f1bb5c9ae2154def18133fbad7e34c7d334dd2c";

    fn hello_world_request() -> TransferRequest {
        TransferRequest::new(
            RECIPIENT.parse().unwrap(),
            1_000_000,
            2000,
            0,
            "hello world",
            StacksNetwork::Testnet,
            StacksPrivateKey::from_hex(SENDER_KEY).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_unsigned_transaction_layout() {
        let tx = hello_world_request().with_fee(0).unsigned_transaction();
        assert!(!tx.is_signed());
        assert_eq!(tx.serialize_hex(), UNSIGNED_HEX);
    }

    #[test]
    fn test_sighashes() {
        let tx = hello_world_request().unsigned_transaction();
        assert_eq!(
            hex::encode(tx.initial_sighash()),
            "6893f5071c275b72d6c92a89570c8243e218368b71bbe5e6742a688ada5e524d"
        );
        assert_eq!(
            hex::encode(tx.presign_sighash()),
            "e6c5a8af18c3adbb9dabd09420382ea141bffb8cfbf0a77b50b03384515c428f"
        );
    }

    #[test]
    fn test_signed_transfer_vector() {
        let signed = hello_world_request().sign();
        assert_eq!(signed.serialize().len(), 180);
        assert_eq!(signed.to_hex(), SIGNED_HEX);
        assert_eq!(signed.txid().to_string(), SIGNED_TXID);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let first = hello_world_request().sign();
        let second = hello_world_request().sign();
        assert_eq!(first.serialize(), second.serialize());
        assert_eq!(first.txid(), second.txid());
        assert_eq!(first.txid(), first.transaction().txid());
    }

    #[test]
    fn test_decoded_memo() {
        let signed = hello_world_request().sign();
        let decoded = SignedTransaction::from_bytes(signed.serialize()).unwrap();
        assert_eq!(decoded.memo(), "hello world");
        assert_eq!(decoded.transaction().payload.amount, 1_000_000);
        assert_eq!(decoded.transaction().fee(), 2000);
        assert_eq!(decoded.transaction().nonce(), 0);
        assert_eq!(decoded.txid(), signed.txid());
    }

    #[test]
    fn test_signature_recovers_sender() {
        let request = hello_world_request();
        let signed = request.sign();
        assert!(signed.transaction().validate_signature().is_ok());
        assert_eq!(
            &signed.transaction().auth.signer,
            request.sender_address().hash160()
        );
    }

    #[test]
    fn test_changing_fee_changes_signature() {
        let low = hello_world_request().with_fee(180).sign();
        let high = hello_world_request().sign();
        assert_ne!(low.txid(), high.txid());
        assert_ne!(
            low.transaction().auth.signature,
            high.transaction().auth.signature
        );
        assert!(low.transaction().validate_signature().is_ok());
    }

    #[test]
    fn test_tampered_fee_fails_validation() {
        let signed = hello_world_request().sign();
        let mut tampered = signed.transaction().clone();
        tampered.auth.fee = 1;
        assert!(tampered.validate_signature().is_err());
    }

    #[test]
    fn test_unsigned_bytes_are_rejected() {
        let bytes = hello_world_request().unsigned_transaction().serialize();
        let err = SignedTransaction::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, StacksError::InvalidTransaction(_)));
    }

    #[test]
    fn test_memo_too_long() {
        let result = TransferRequest::new(
            RECIPIENT.parse().unwrap(),
            1,
            1,
            0,
            &"x".repeat(MEMO_LENGTH + 1),
            StacksNetwork::Testnet,
            StacksPrivateKey::generate(),
        );
        assert!(result.is_err());
        assert!(Memo::new(&"x".repeat(MEMO_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_flags_recipient_on_other_network() {
        // the recipient is a mainnet address, the transfer targets testnet
        let signed = hello_world_request().sign();
        let err = signed.transaction().validate().unwrap_err();
        assert!(err.to_string().contains("is not a testnet address"));

        let mainnet = TransferRequest::new(
            RECIPIENT.parse().unwrap(),
            1_000_000,
            2000,
            0,
            "hello world",
            StacksNetwork::Mainnet,
            StacksPrivateKey::from_hex(SENDER_KEY).unwrap(),
        )
        .unwrap()
        .sign();
        assert!(mainnet.transaction().validate().is_ok());
    }

    #[test]
    fn test_make_stx_token_transfer_matches_request() {
        let signed = make_stx_token_transfer(TokenTransferOptions {
            recipient: RECIPIENT.parse().unwrap(),
            amount: 1_000_000,
            fee: 2000,
            nonce: 0,
            memo: "hello world".to_string(),
            network: StacksNetwork::Testnet,
            sender_key: StacksPrivateKey::from_hex(SENDER_KEY).unwrap(),
        })
        .unwrap();
        assert_eq!(signed.txid().to_string(), SIGNED_TXID);
    }

    #[test]
    fn test_txid_parsing() {
        let txid: Txid = SIGNED_TXID.parse().unwrap();
        assert_eq!(txid.to_string(), SIGNED_TXID);
        let bare: Txid = SIGNED_TXID[2..].parse().unwrap();
        assert_eq!(bare, txid);
        assert!("0x1234".parse::<Txid>().is_err());
    }
}
