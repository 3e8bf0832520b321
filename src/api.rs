//! HTTP client for the Stacks Blockchain API
//!
//! The hosted API serves both the extended endpoints (`/extended/v1/...`)
//! and the proxied core node endpoints (`/v2/...`) under one base path.
//! Endpoints are grouped the same way the API documents them:
//!
//! - [`AccountsApi`] - account info, history, balances, nonces
//! - [`FaucetsApi`] - testnet STX faucet
//! - [`TransactionsApi`] - broadcast and lookup
//! - [`FeesApi`] - transfer fee rate and estimation
//!
//! Every call is a single round trip. Failures are returned as-is: there
//! is no retry and no caching.

pub mod accounts;
pub mod faucets;
pub mod fees;
pub mod models;
pub mod transactions;

pub use accounts::AccountsApi;
pub use faucets::FaucetsApi;
pub use fees::FeesApi;
pub use transactions::TransactionsApi;

use crate::error::{Result, StacksError};
use crate::network::StacksNetwork;
use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("stacks-basics/", env!("CARGO_PKG_VERSION"));

/// Where and how to reach the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub base_path: String,
    pub timeout: Duration,
}

impl Configuration {
    pub fn new(base_path: impl Into<String>) -> Self {
        Configuration {
            base_path: base_path.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn for_network(network: StacksNetwork) -> Self {
        Self::new(network.default_api_url())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::for_network(StacksNetwork::Testnet)
    }
}

/// Shared HTTP plumbing for the endpoint groups. Cloning is cheap; the
/// underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_path: String,
    http: HttpClient,
}

impl ApiClient {
    pub fn new(config: &Configuration) -> Result<Self> {
        if config.base_path.trim().is_empty() {
            return Err(StacksError::ConfigError(
                "API base path must not be empty".to_string(),
            ));
        }

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(ApiClient {
            base_path: config.base_path.trim().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }

    /// Turns a non-2xx response into an [`StacksError::ApiError`] carrying
    /// the status and body verbatim.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StacksError::ApiError {
            status: status.as_u16(),
            body,
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let response = self.http.get(&url).query(query).send().await?;
        let body = Self::check_status(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn get_text(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        Ok(Self::check_status(response).await?.text().await?)
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        debug!("POST {} {:?}", url, query);

        let response = self.http.post(&url).query(query).send().await?;
        let body = Self::check_status(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Posts raw bytes and hands back the status and body unchecked, for
    /// endpoints whose error bodies carry structured information.
    pub(crate) async fn post_octets(&self, path: &str, body: Vec<u8>) -> Result<(u16, String)> {
        let url = self.url(path);
        debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok((status, text))
    }
}
