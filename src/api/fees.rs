use crate::api::models::FeeEstimate;
use crate::api::ApiClient;
use crate::error::{Result, StacksError};
use crate::transaction::StacksTransaction;
use tracing::debug;

/// Fee rate lookups.
#[derive(Debug, Clone)]
pub struct FeesApi {
    client: ApiClient,
}

impl FeesApi {
    pub fn new(client: ApiClient) -> Self {
        FeesApi { client }
    }

    /// `GET /v2/fees/transfer`: micro-STX per byte, returned as a bare
    /// JSON number.
    pub async fn get_transfer_fee_rate(&self) -> Result<u64> {
        let body = self.client.get_text("/v2/fees/transfer").await?;
        let rate = body.trim().trim_matches('"').parse::<u64>().map_err(|e| {
            StacksError::NetworkError(format!("Malformed fee rate '{}': {}", body.trim(), e))
        })?;
        debug!("Transfer fee rate: {} micro-STX/byte", rate);
        Ok(rate)
    }

    /// Fee for `transaction`: current rate times its serialized length.
    pub async fn estimate_transfer(&self, transaction: &StacksTransaction) -> Result<FeeEstimate> {
        let fee_rate = self.get_transfer_fee_rate().await?;
        let byte_length = transaction.serialize().len() as u64;
        let fee = fee_rate.checked_mul(byte_length).ok_or_else(|| {
            StacksError::NetworkError(format!("Fee rate {} overflows", fee_rate))
        })?;
        Ok(FeeEstimate {
            fee_rate,
            byte_length,
            fee,
        })
    }
}
