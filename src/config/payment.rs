//! Payment provider configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Payaza)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Payaza API token
    pub payaza_api_token: String,

    /// Payaza webhook signing secret
    pub payaza_webhook_secret: String,

    /// Payaza API base URL
    #[serde(default = "default_payaza_base_url")]
    pub payaza_base_url: String,

    /// Provider used for account provisioning
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Provider request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl PaymentConfig {
    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.payaza_api_token.is_empty() {
            return Err(ValidationError::MissingRequired("PAYAZA_API_TOKEN"));
        }
        if self.payaza_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYAZA_WEBHOOK_SECRET"));
        }
        if !self.payaza_base_url.starts_with("https://")
            && !self.payaza_base_url.starts_with("http://")
        {
            return Err(ValidationError::InvalidProviderUrl);
        }
        if self.default_provider.is_empty() {
            return Err(ValidationError::MissingRequired("DEFAULT_PROVIDER"));
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            payaza_api_token: String::new(),
            payaza_webhook_secret: String::new(),
            payaza_base_url: default_payaza_base_url(),
            default_provider: default_provider(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_payaza_base_url() -> String {
    "https://api.payaza.africa".to_string()
}

fn default_provider() -> String {
    "payaza".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_missing_token() {
        let config = PaymentConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_missing_webhook_secret() {
        let config = PaymentConfig {
            payaza_api_token: "PZ78_xxx".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let config = PaymentConfig {
            payaza_api_token: "PZ78_xxx".to_string(),
            payaza_webhook_secret: "secret".to_string(),
            payaza_base_url: "ftp://api.payaza.africa".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = PaymentConfig {
            payaza_api_token: "PZ78_xxx".to_string(),
            payaza_webhook_secret: "secret".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.default_provider, "payaza");
    }
}
