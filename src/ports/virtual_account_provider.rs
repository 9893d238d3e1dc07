//! Virtual account provider port.
//!
//! Defines the contract for payment gateway integrations that issue
//! dedicated virtual account numbers (e.g., Payaza).
//!
//! # Design
//!
//! - **Gateway agnostic**: The same request shape works for any provider
//! - **Idempotent**: Issuance is keyed by a deterministic
//!   `account_reference`, so retries return the same account
//! - **Registry-based**: Callers resolve adapters by provider name at
//!   runtime, so new gateways plug in without touching call sites

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::finance::FinanceError;
use crate::domain::foundation::UserId;

/// Port for payment providers that issue reserved virtual accounts.
#[async_trait]
pub trait VirtualAccountProvider: Send + Sync {
    /// Provider name used for registry lookup and stored on issued
    /// accounts, e.g. `"payaza"`.
    fn name(&self) -> &str;

    /// Issue a dedicated virtual account for a member.
    ///
    /// Implementations must be idempotent over `account_reference`:
    /// calling twice with the same reference returns the same account.
    ///
    /// # Errors
    ///
    /// Returns `FinanceError::Provider` on gateway rejection or
    /// transport failure.
    async fn create_reserved_account(
        &self,
        request: VirtualAccountRequest,
    ) -> Result<IssuedAccount, FinanceError>;
}

/// Request to issue a virtual account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualAccountRequest {
    /// Internal user ID, for provider-side metadata.
    pub user_id: UserId,

    /// Name to print on the account.
    pub account_name: String,

    /// Customer email address.
    pub email: String,

    /// Customer phone number, if known.
    pub phone_number: Option<String>,

    /// Deterministic idempotency key, echoed back in webhooks.
    pub account_reference: String,
}

/// Account details returned by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedAccount {
    pub account_number: String,
    pub bank_code: String,
    pub bank_name: String,
    pub account_name: String,
    pub account_reference: String,
}

/// Name-keyed lookup of provider adapters.
///
/// The configured default provider serves provisioning; additional
/// providers can be registered for per-cooperative overrides.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn VirtualAccountProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under its own name.
    pub fn register(&mut self, provider: Arc<dyn VirtualAccountProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Resolves a provider by name.
    ///
    /// # Errors
    ///
    /// Returns `FinanceError::UnsupportedProvider` if no adapter is
    /// registered under that name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn VirtualAccountProvider>, FinanceError> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| FinanceError::unsupported_provider(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeProvider;

    #[async_trait]
    impl VirtualAccountProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn create_reserved_account(
            &self,
            request: VirtualAccountRequest,
        ) -> Result<IssuedAccount, FinanceError> {
            Ok(IssuedAccount {
                account_number: "0000000000".to_string(),
                bank_code: "000".to_string(),
                bank_name: "Fake Bank".to_string(),
                account_name: request.account_name,
                account_reference: request.account_reference,
            })
        }
    }

    #[test]
    fn registry_resolves_registered_provider() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(FakeProvider));
        assert!(registry.get("fake").is_ok());
    }

    #[test]
    fn registry_rejects_unknown_provider() {
        let registry = ProviderRegistry::new();
        let result = registry.get("missing");
        assert!(matches!(
            result,
            Err(FinanceError::UnsupportedProvider { .. })
        ));
    }
}
