use crate::address::{get_address_from_private_key, PrincipalData, StacksAddress};
use crate::api::models::{FeeEstimate, TransactionInfo};
use crate::api::{AccountsApi, ApiClient, Configuration, FeesApi, TransactionsApi};
use crate::crypto::StacksPrivateKey;
use crate::error::Result;
use crate::network::StacksNetwork;
use crate::transaction::{SignedTransaction, TransferRequest, Txid};
use tracing::info;

/// The read-only half of a transfer: nonce and status lookups. Needs no key.
#[derive(Debug, Clone)]
pub struct TransferLookup {
    accounts: AccountsApi,
    transactions: TransactionsApi,
}

impl TransferLookup {
    pub fn new(config: &Configuration) -> Result<Self> {
        Ok(Self::from_client(ApiClient::new(config)?))
    }

    fn from_client(client: ApiClient) -> Self {
        TransferLookup {
            accounts: AccountsApi::new(client.clone()),
            transactions: TransactionsApi::new(client),
        }
    }

    pub fn lookup(&self) -> &TransferLookup {
        &self.lookup
    }

    pub async fn get_transaction_status(&self, txid: &Txid) -> Result<TransactionInfo> {
        self.lookup.get_transaction_status(txid).await
    }

    pub async fn fetch_nonce(&self, address: &StacksAddress) -> Result<u64> {
        self.lookup.fetch_nonce(address).await
    }
}

/// Builds, signs and submits transfers from one sender to one recipient.
#[derive(Debug, Clone)]
pub struct TransferFlow {
    network: StacksNetwork,
    sender_key: StacksPrivateKey,
    recipient: PrincipalData,
    fees: FeesApi,
    transactions: TransactionsApi,
    lookup: TransferLookup,
}

impl TransferFlow {
    pub fn new(
        config: &Configuration,
        network: StacksNetwork,
        sender_key: StacksPrivateKey,
        recipient: PrincipalData,
    ) -> Result<Self> {
        let client = ApiClient::new(config)?;
        Ok(TransferFlow {
            network,
            sender_key,
            recipient,
            fees: FeesApi::new(client.clone()),
            transactions: TransactionsApi::new(client.clone()),
            lookup: TransferLookup::from_client(client),
        })
    }

    pub fn network(&self) -> StacksNetwork {
        self.network
    }

    pub fn recipient(&self) -> &PrincipalData {
        &self.recipient
    }

    pub fn sender_address(&self) -> StacksAddress {
        get_address_from_private_key(&self.sender_key, self.network)
    }

    /// Amount and fee are in micro-STX. Fails only for an over-long memo.
    pub fn build_transfer_request(
        &self,
        amount: u64,
        fee: u64,
        nonce: u64,
        memo: &str,
    ) -> Result<TransferRequest> {
        TransferRequest::new(
            self.recipient.clone(),
            amount,
            fee,
            nonce,
            memo,
            self.network,
            self.sender_key.clone(),
        )
    }

    /// The signature slot is fixed-size, so the unsigned length used here
    /// is the length of the final signed transaction.
    pub async fn estimate_fee(&self, request: &TransferRequest) -> Result<FeeEstimate> {
        let estimate = self
            .fees
            .estimate_transfer(&request.unsigned_transaction())
            .await?;
        info!(
            "Estimated fee {} micro-STX ({} bytes at {}/byte)",
            estimate.fee, estimate.byte_length, estimate.fee_rate
        );
        Ok(estimate)
    }

    pub fn sign(&self, request: &TransferRequest) -> SignedTransaction {
        request.sign()
    }

    pub fn serialize(&self, transaction: &SignedTransaction) -> Vec<u8> {
        transaction.serialize().to_vec()
    }

    pub fn serialize_hex(&self, transaction: &SignedTransaction) -> String {
        transaction.to_hex()
    }

    pub async fn broadcast(&self, transaction: &SignedTransaction) -> Result<Txid> {
        self.transactions.broadcast_transaction(transaction).await
    }

    pub fn lookup(&self) -> &TransferLookup {
        &self.lookup
    }

    pub async fn get_transaction_status(&self, txid: &Txid) -> Result<TransactionInfo> {
        self.lookup.get_transaction_status(txid).await
    }

    pub async fn fetch_nonce(&self, address: &StacksAddress) -> Result<u64> {
        self.lookup.fetch_nonce(address).await
    }
}
