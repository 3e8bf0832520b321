use crate::address::StacksAddress;
use crate::api::models::FaucetReceipt;
use crate::api::ApiClient;
use crate::error::{Result, StacksError};
use tracing::{info, warn};

/// Testnet STX faucet.
#[derive(Debug, Clone)]
pub struct FaucetsApi {
    client: ApiClient,
}

impl FaucetsApi {
    pub fn new(client: ApiClient) -> Self {
        FaucetsApi { client }
    }

    /// `POST /extended/v1/faucets/stx?address={address}`
    ///
    /// Only testnet addresses can be funded; anything else is refused
    /// before a request is made.
    pub async fn run_faucet_stx(&self, address: &StacksAddress) -> Result<FaucetReceipt> {
        if !address.is_testnet() {
            return Err(StacksError::FaucetUnavailable(format!(
                "{} is not a testnet address",
                address
            )));
        }

        let receipt: FaucetReceipt = self
            .client
            .post_json("/extended/v1/faucets/stx", &[("address", address.to_string())])
            .await?;

        match (receipt.success, &receipt.tx_id) {
            (true, Some(txid)) => info!("Faucet funding {} in {}", address, txid),
            (true, None) => info!("Faucet accepted request for {}", address),
            (false, _) => warn!("Faucet reported failure for {}", address),
        }
        Ok(receipt)
    }
}
