use crate::address::PrincipalData;
use crate::api::models::{AccountBalance, AccountInfo, Pagination, StxBalance, TransactionPage};
use crate::api::ApiClient;
use crate::error::Result;
use tracing::debug;

/// Account state endpoints. The principal is passed per call.
#[derive(Debug, Clone)]
pub struct AccountsApi {
    client: ApiClient,
}

impl AccountsApi {
    pub fn new(client: ApiClient) -> Self {
        AccountsApi { client }
    }

    /// `GET /v2/accounts/{principal}`. With `with_proof == false` the node
    /// is asked to skip the MARF proofs (`proof=0`).
    pub async fn get_account_info(
        &self,
        principal: &PrincipalData,
        with_proof: bool,
    ) -> Result<AccountInfo> {
        let query = if with_proof {
            Vec::new()
        } else {
            vec![("proof", "0".to_string())]
        };
        let info: AccountInfo = self
            .client
            .get_json(&format!("/v2/accounts/{}", principal), &query)
            .await?;
        debug!(
            "Account {}: balance {} locked {} nonce {}",
            principal, info.balance, info.locked, info.nonce
        );
        Ok(info)
    }

    /// `GET /extended/v1/address/{principal}/transactions`
    pub async fn get_account_transactions(
        &self,
        principal: &PrincipalData,
        page: Pagination,
    ) -> Result<TransactionPage> {
        let page: TransactionPage = self
            .client
            .get_json(
                &format!("/extended/v1/address/{}/transactions", principal),
                &page.to_query(),
            )
            .await?;
        debug!(
            "Account {}: {} of {} transactions from offset {}",
            principal,
            page.results.len(),
            page.total,
            page.offset
        );
        Ok(page)
    }

    /// `GET /extended/v1/address/{principal}/balances`
    pub async fn get_account_balance(&self, principal: &PrincipalData) -> Result<AccountBalance> {
        self.client
            .get_json(&format!("/extended/v1/address/{}/balances", principal), &[])
            .await
    }

    /// `GET /extended/v1/address/{principal}/stx`
    pub async fn get_account_stx_balance(&self, principal: &PrincipalData) -> Result<StxBalance> {
        self.client
            .get_json(&format!("/extended/v1/address/{}/stx", principal), &[])
            .await
    }

    /// Next nonce the node expects from this account.
    pub async fn get_account_nonce(&self, principal: &PrincipalData) -> Result<u64> {
        Ok(self.get_account_info(principal, false).await?.nonce)
    }
}
