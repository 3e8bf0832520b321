//! AccountQueryFlow against a mocked Stacks Blockchain API

use httpmock::{Method, MockServer};
use serde_json::{json, Value};
use stacks_basics::address::StacksAddress;
use stacks_basics::api::models::Pagination;
use stacks_basics::api::Configuration;
use stacks_basics::error::StacksError;
use stacks_basics::flows::AccountQueryFlow;

const ADDRESS: &str = "ST0ANAYPAZ5A77ET8Q7V3NJ3S4WQ30TC2WCSQSS4";
const MAINNET_ADDRESS: &str = "SP3FGQ8Z7JY9BWYZ5WM53E0M9NK7WHJF0691NZ159";

fn flow_for(server: &MockServer, address: &str) -> AccountQueryFlow {
    let address: StacksAddress = address.parse().unwrap();
    AccountQueryFlow::new(&Configuration::new(server.base_url()), address).unwrap()
}

fn account_body(balance_proof: &str, nonce_proof: &str) -> Value {
    json!({
        "balance": "0x0000000000000000000000001dcd6500",
        "locked": "0x00000000000000000000000000000000",
        "unlock_height": 0,
        "nonce": 5,
        "balance_proof": balance_proof,
        "nonce_proof": nonce_proof
    })
}

fn history_entry(index: u64) -> Value {
    json!({
        "tx_id": format!("0x{:064x}", index),
        "tx_status": "success",
        "tx_type": "token_transfer",
        "nonce": index,
        "fee_rate": "180",
        "sender_address": ADDRESS,
        "block_height": 1000 + index,
        "burn_block_time": 1_650_000_000 + index as i64,
        "token_transfer": {
            "recipient_address": MAINNET_ADDRESS,
            "amount": "1000000",
            "memo": "0x00"
        }
    })
}

#[tokio::test]
async fn test_account_info_with_and_without_proof() {
    let server = MockServer::start_async().await;
    let path = format!("/v2/accounts/{}", ADDRESS);

    let mut with_proof = server
        .mock_async(|when, then| {
            when.method(Method::GET).path(path.as_str());
            then.status(200)
                .json_body(account_body("0x0123456789abcdef", "0xfedcba9876543210"));
        })
        .await;

    let flow = flow_for(&server, ADDRESS);
    let full = flow.get_account_info().await.unwrap();
    with_proof.assert_async().await;
    with_proof.delete_async().await;

    let without_proof = server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path(path.as_str())
                .query_param("proof", "0");
            then.status(200).json_body(account_body("", ""));
        })
        .await;

    let bare = flow.get_account_info_without_proof().await.unwrap();
    without_proof.assert_async().await;

    assert!(full.has_proof());
    assert!(!bare.has_proof());
    assert_eq!(full.balance, 500_000_000);
    assert_eq!(full.without_proof(), bare);
}

#[tokio::test]
async fn test_transaction_history_pagination() {
    let server = MockServer::start_async().await;
    let path = format!("/extended/v1/address/{}/transactions", ADDRESS);

    let first_page = server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path(path.as_str())
                .query_param("limit", "50")
                .query_param("offset", "0");
            then.status(200).json_body(json!({
                "limit": 50,
                "offset": 0,
                "total": 75,
                "results": (0..50).map(history_entry).collect::<Vec<_>>()
            }));
        })
        .await;
    let second_page = server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path(path.as_str())
                .query_param("limit", "50")
                .query_param("offset", "50");
            then.status(200).json_body(json!({
                "limit": 50,
                "offset": 50,
                "total": 75,
                "results": (50..75).map(history_entry).collect::<Vec<_>>()
            }));
        })
        .await;

    let flow = flow_for(&server, ADDRESS);
    let first = flow
        .get_account_transactions(Some(Pagination::new(50, 0)))
        .await
        .unwrap();
    let second = flow
        .get_account_transactions(Some(Pagination::new(50, 50)))
        .await
        .unwrap();

    first_page.assert_async().await;
    second_page.assert_async().await;

    assert_eq!(first.results.len(), 50);
    assert!(second.results.len() <= 50);
    assert_eq!(second.offset, 50);
    assert!(second
        .results
        .iter()
        .all(|tx| first.results.iter().all(|other| other.tx_id != tx.tx_id)));
}

#[tokio::test]
async fn test_history_without_pagination_sends_no_parameters() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path(format!("/extended/v1/address/{}/transactions", ADDRESS));
            then.status(200).json_body(json!({
                "limit": 20, "offset": 0, "total": 0, "results": []
            }));
        })
        .await;

    let page = flow_for(&server, ADDRESS)
        .get_account_transactions(None)
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(page.limit, 20);
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn test_balances() {
    let server = MockServer::start_async().await;
    let stx = json!({
        "balance": "500000000",
        "total_sent": "1000000",
        "total_received": "501000180",
        "total_fees_sent": "180",
        "total_miner_rewards_received": "0",
        "lock_tx_id": "",
        "locked": "0",
        "lock_height": 0,
        "burnchain_lock_height": 0,
        "burnchain_unlock_height": 0
    });

    let balances = server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path(format!("/extended/v1/address/{}/balances", ADDRESS));
            then.status(200).json_body(json!({
                "stx": stx.clone(),
                "fungible_tokens": {},
                "non_fungible_tokens": {}
            }));
        })
        .await;
    let stx_only = server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path(format!("/extended/v1/address/{}/stx", ADDRESS));
            then.status(200).json_body(stx.clone());
        })
        .await;

    let flow = flow_for(&server, ADDRESS);
    let balance = flow.get_account_balance().await.unwrap();
    let stx_balance = flow.get_stx_balance().await.unwrap();

    balances.assert_async().await;
    stx_only.assert_async().await;
    assert_eq!(balance.stx.balance, 500_000_000);
    assert_eq!(balance.stx, stx_balance);
    assert_eq!(stx_balance.total_fees_sent, 180);
}

#[tokio::test]
async fn test_faucet_funds_testnet_address() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(Method::POST)
                .path("/extended/v1/faucets/stx")
                .query_param("address", ADDRESS);
            then.status(200).json_body(json!({
                "success": true,
                "txId": "0x51e5aaaa6e56ea9edbc135858f1bb5c9ae2154def18133fbad7e34c7d334dd2c",
                "txRaw": "80800000000400"
            }));
        })
        .await;

    let receipt = flow_for(&server, ADDRESS)
        .request_faucet_funds()
        .await
        .unwrap();
    mock.assert_async().await;
    assert!(receipt.success);
    assert!(receipt.tx_id.is_some());
}

#[tokio::test]
async fn test_faucet_refuses_mainnet_address_locally() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(Method::POST).path("/extended/v1/faucets/stx");
            then.status(200).json_body(json!({ "success": true }));
        })
        .await;

    let err = flow_for(&server, MAINNET_ADDRESS)
        .request_faucet_funds()
        .await
        .unwrap_err();
    assert!(matches!(err, StacksError::FaucetUnavailable(_)));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_error_status_is_propagated() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path(format!("/extended/v1/address/{}/balances", ADDRESS));
            then.status(429).body("rate limited");
        })
        .await;

    let err = flow_for(&server, ADDRESS)
        .get_account_balance()
        .await
        .unwrap_err();
    match err {
        StacksError::ApiError { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path(format!("/extended/v1/address/{}/stx", ADDRESS));
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let err = flow_for(&server, ADDRESS)
        .get_stx_balance()
        .await
        .unwrap_err();
    assert!(matches!(err, StacksError::NetworkError(_)));
}

#[tokio::test]
async fn test_unreachable_service() {
    let address: StacksAddress = ADDRESS.parse().unwrap();
    let flow = AccountQueryFlow::new(&Configuration::new("http://127.0.0.1:1"), address).unwrap();
    let err = flow.get_account_info().await.unwrap_err();
    assert!(matches!(err, StacksError::NetworkError(_)));
}
