//! Payaza webhook signature verification.
//!
//! Payaza signs the raw request body with HMAC-SHA512 and sends the
//! base64-encoded digest in the `x-payaza-signature` header.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;

/// Verifier for Payaza webhook signatures.
pub struct PayazaWebhookVerifier {
    /// Shared webhook secret from the Payaza dashboard.
    secret: String,
}

impl PayazaWebhookVerifier {
    /// Creates a new verifier with the given webhook secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies the signature header against the raw request body.
    ///
    /// The comparison runs in constant time over the decoded digests.
    /// A header that is not valid base64 fails verification the same
    /// way a wrong signature does.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidSignature` on any mismatch.
    pub fn verify(&self, payload: &[u8], signature_header: &str) -> Result<(), WebhookError> {
        let claimed = BASE64
            .decode(signature_header.trim())
            .map_err(|_| WebhookError::InvalidSignature)?;

        let expected = self.compute_signature(payload);

        if !constant_time_compare(&expected, &claimed) {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Computes the HMAC-SHA512 digest of the payload.
    fn compute_signature(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac =
            Hmac::<Sha512>::new_from_slice(self.secret.as_bytes()).expect("HMAC accepts any key");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes the base64 HMAC-SHA512 signature for use in test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha512>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(payload);
    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "payaza_test_secret_12345";

    #[test]
    fn verify_valid_signature() {
        let verifier = PayazaWebhookVerifier::new(TEST_SECRET);
        let payload = br#"{"event":"payment.successful","transaction_reference":"txn_1"}"#;
        let signature = compute_test_signature(TEST_SECRET, payload);

        assert!(verifier.verify(payload, &signature).is_ok());
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let verifier = PayazaWebhookVerifier::new("wrong_secret");
        let payload = br#"{"event":"payment.successful"}"#;
        let signature = compute_test_signature(TEST_SECRET, payload);

        let result = verifier.verify(payload, &signature);
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let verifier = PayazaWebhookVerifier::new(TEST_SECRET);
        let original = br#"{"amount":"100.00"}"#;
        let tampered = br#"{"amount":"999.00"}"#;
        let signature = compute_test_signature(TEST_SECRET, original);

        let result = verifier.verify(tampered, &signature);
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_non_base64_header_fails() {
        let verifier = PayazaWebhookVerifier::new(TEST_SECRET);
        let result = verifier.verify(b"{}", "not base64!!!");
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_tolerates_surrounding_whitespace_in_header() {
        let verifier = PayazaWebhookVerifier::new(TEST_SECRET);
        let payload = br#"{"ok":true}"#;
        let signature = format!("  {}  ", compute_test_signature(TEST_SECRET, payload));

        assert!(verifier.verify(payload, &signature).is_ok());
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
    }
}
