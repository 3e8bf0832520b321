use crate::address::{PrincipalData, StacksAddress};
use crate::api::models::{
    AccountBalance, AccountInfo, FaucetReceipt, Pagination, StxBalance, TransactionPage,
};
use crate::api::{AccountsApi, ApiClient, Configuration, FaucetsApi};
use crate::error::Result;

/// Queries against a single, fixed account.
#[derive(Debug, Clone)]
pub struct AccountQueryFlow {
    address: StacksAddress,
    principal: PrincipalData,
    accounts: AccountsApi,
    faucets: FaucetsApi,
}

impl AccountQueryFlow {
    pub fn new(config: &Configuration, address: StacksAddress) -> Result<Self> {
        let client = ApiClient::new(config)?;
        Ok(AccountQueryFlow {
            principal: PrincipalData::from(address),
            address,
            accounts: AccountsApi::new(client.clone()),
            faucets: FaucetsApi::new(client),
        })
    }

    pub fn address(&self) -> &StacksAddress {
        &self.address
    }

    pub async fn get_account_info(&self) -> Result<AccountInfo> {
        self.accounts.get_account_info(&self.principal, true).await
    }

    pub async fn get_account_info_without_proof(&self) -> Result<AccountInfo> {
        self.accounts.get_account_info(&self.principal, false).await
    }

    /// One page of history; `None` leaves paging to the service defaults.
    pub async fn get_account_transactions(
        &self,
        page: Option<Pagination>,
    ) -> Result<TransactionPage> {
        self.accounts
            .get_account_transactions(&self.principal, page.unwrap_or_default())
            .await
    }

    pub async fn get_account_balance(&self) -> Result<AccountBalance> {
        self.accounts.get_account_balance(&self.principal).await
    }

    pub async fn get_stx_balance(&self) -> Result<StxBalance> {
        self.accounts.get_account_stx_balance(&self.principal).await
    }

    pub async fn request_faucet_funds(&self) -> Result<FaucetReceipt> {
        self.faucets.run_faucet_stx(&self.address).await
    }
}
