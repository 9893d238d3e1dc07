//! Payaza virtual account adapter.
//!
//! Implements the `VirtualAccountProvider` trait against the Payaza
//! merchant collection API.
//!
//! # Security
//!
//! - API token handled via `secrecy::SecretString`
//! - The Authorization header is never logged
//!
//! # Idempotency
//!
//! Issuance requests carry the caller's deterministic
//! `account_reference`; Payaza returns the existing account for a
//! repeated reference, so retries are safe.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::finance::FinanceError;
use crate::ports::{IssuedAccount, VirtualAccountProvider, VirtualAccountRequest};

const PROVIDER_NAME: &str = "payaza";

/// Payaza API configuration.
#[derive(Clone)]
pub struct PayazaConfig {
    /// Payaza API token.
    api_token: SecretString,

    /// Base URL for the Payaza API.
    base_url: String,

    /// Request timeout.
    request_timeout: Duration,
}

impl PayazaConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: SecretString::new(api_token.into()),
            base_url: "https://api.payaza.africa".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Payaza virtual account adapter.
pub struct PayazaAdapter {
    config: PayazaConfig,
    http_client: reqwest::Client,
}

impl PayazaAdapter {
    /// Create a new adapter with the given configuration.
    ///
    /// The HTTP client carries a bounded timeout so a hung provider
    /// call cannot stall the provisioning consumer indefinitely.
    pub fn new(config: PayazaConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

/// Request body for reserved account creation.
#[derive(Debug, Serialize)]
struct CreateAccountBody<'a> {
    account_name: &'a str,
    account_reference: &'a str,
    customer_email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_phone: Option<&'a str>,
    currency: &'a str,
}

/// Payaza response wrapper.
#[derive(Debug, Deserialize)]
struct PayazaResponse<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Account details in the creation response.
#[derive(Debug, Deserialize)]
struct AccountData {
    account_number: String,
    bank_code: String,
    bank_name: String,
    account_name: String,
    account_reference: String,
}

#[async_trait]
impl VirtualAccountProvider for PayazaAdapter {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn create_reserved_account(
        &self,
        request: VirtualAccountRequest,
    ) -> Result<IssuedAccount, FinanceError> {
        let body = CreateAccountBody {
            account_name: &request.account_name,
            account_reference: &request.account_reference,
            customer_email: &request.email,
            customer_phone: request.phone_number.as_deref(),
            currency: "NGN",
        };

        tracing::debug!(
            account_reference = %request.account_reference,
            "Requesting reserved account from Payaza"
        );

        let response = self
            .http_client
            .post(self.endpoint("/merchant-collection/reserved-accounts"))
            .bearer_auth(self.config.api_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FinanceError::provider(PROVIDER_NAME, "Request timed out")
                } else {
                    FinanceError::provider(PROVIDER_NAME, format!("Transport error: {}", e))
                }
            })?;

        let status = response.status();
        let parsed: PayazaResponse<AccountData> = response.json().await.map_err(|e| {
            FinanceError::provider(PROVIDER_NAME, format!("Unreadable response: {}", e))
        })?;

        if !status.is_success() || !parsed.success {
            tracing::warn!(
                account_reference = %request.account_reference,
                http_status = %status,
                provider_message = %parsed.message,
                "Payaza rejected reserved account request"
            );
            return Err(FinanceError::provider(PROVIDER_NAME, parsed.message));
        }

        let data = parsed
            .data
            .ok_or_else(|| FinanceError::provider(PROVIDER_NAME, "Response missing account data"))?;

        Ok(IssuedAccount {
            account_number: data.account_number,
            bank_code: data.bank_code,
            bank_name: data.bank_name,
            account_name: data.account_name,
            account_reference: data.account_reference,
        })
    }
}
