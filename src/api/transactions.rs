use crate::api::models::{BroadcastRejection, TransactionInfo};
use crate::api::ApiClient;
use crate::error::{Result, StacksError};
use crate::transaction::{SignedTransaction, Txid};
use tracing::{info, warn};

/// Broadcast and lookup of transactions.
#[derive(Debug, Clone)]
pub struct TransactionsApi {
    client: ApiClient,
}

impl TransactionsApi {
    pub fn new(client: ApiClient) -> Self {
        TransactionsApi { client }
    }

    /// `POST /v2/transactions` with the raw transaction bytes.
    ///
    /// The node answers with the txid as a JSON string on success and a
    /// JSON object with `error` / `reason` on rejection.
    pub async fn broadcast_transaction(&self, transaction: &SignedTransaction) -> Result<Txid> {
        let (status, body) = self
            .client
            .post_octets("/v2/transactions", transaction.serialize().to_vec())
            .await?;

        if (200..300).contains(&status) {
            let txid: Txid = body.parse()?;
            if txid != transaction.txid() {
                warn!(
                    "Node acknowledged {} but local txid is {}",
                    txid,
                    transaction.txid()
                );
            }
            info!("Broadcast {}", txid);
            return Ok(txid);
        }

        match serde_json::from_str::<BroadcastRejection>(&body) {
            Ok(rejection) => {
                warn!("Broadcast of {} rejected: {}", transaction.txid(), rejection.describe());
                Err(StacksError::BroadcastRejected {
                    reason: rejection.describe(),
                    txid: rejection.txid,
                })
            }
            Err(_) => Err(StacksError::ApiError { status, body }),
        }
    }

    /// `GET /extended/v1/tx/{txid}`
    pub async fn get_transaction_by_id(&self, txid: &Txid) -> Result<TransactionInfo> {
        self.client
            .get_json(&format!("/extended/v1/tx/{}", txid), &[])
            .await
    }
}
