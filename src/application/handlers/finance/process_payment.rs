//! ProcessPaymentHandler - credits wallets from incoming payment events.
//!
//! Consumes authenticated webhook envelopes off the payment topic,
//! resolves the account reference to the owning member and applies the
//! deposit. Errors split two ways: payloads that can never succeed are
//! logged and acknowledged, while lookups that may succeed later (an
//! account provisioned after the first payment arrived) return an error
//! so the queue redelivers.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{
    BankAccountRepository, DepositOutcome, EventHandler, WalletRepository, TOPIC_INCOMING_PAYMENTS,
};

/// Provider event type that carries a settled deposit.
const EVENT_PAYMENT_SUCCESSFUL: &str = "payment.successful";

/// Fields extracted from a successful-payment webhook body.
#[derive(Debug)]
struct PaymentDetails {
    account_reference: String,
    transaction_reference: String,
    amount: String,
}

impl PaymentDetails {
    /// Pulls the reconciliation fields out of the provider body.
    ///
    /// The queue payload is the full webhook envelope; the provider's
    /// own JSON body sits under its `payload` key. Amounts arrive as
    /// either strings or numbers depending on the gateway version.
    fn from_webhook(payload: &JsonValue) -> Option<Self> {
        let body = payload.get("payload")?;

        let account_reference = body.get("account_reference")?.as_str()?.to_string();
        let transaction_reference = body.get("transaction_reference")?.as_str()?.to_string();
        let amount = match body.get("amount")? {
            JsonValue::String(s) => s.clone(),
            JsonValue::Number(n) => format!("{:.2}", n.as_f64()?),
            _ => return None,
        };

        Some(Self {
            account_reference,
            transaction_reference,
            amount,
        })
    }
}

/// Consumer that reconciles incoming payments against member wallets.
pub struct ProcessPaymentHandler {
    bank_account_repository: Arc<dyn BankAccountRepository>,
    wallet_repository: Arc<dyn WalletRepository>,
}

impl ProcessPaymentHandler {
    pub fn new(
        bank_account_repository: Arc<dyn BankAccountRepository>,
        wallet_repository: Arc<dyn WalletRepository>,
    ) -> Self {
        Self {
            bank_account_repository,
            wallet_repository,
        }
    }

    async fn apply_payment(&self, details: PaymentDetails) -> Result<(), DomainError> {
        // Account or wallet not found is retryable: provisioning runs on
        // a separate consumer and may not have caught up yet.
        let account = self
            .bank_account_repository
            .find_by_reference(&details.account_reference)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::BankAccountNotFound,
                    format!(
                        "No reserved account for reference {}",
                        details.account_reference
                    ),
                )
            })?;

        let wallet = self
            .wallet_repository
            .find_by_member(&account.member_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::WalletNotFound,
                    format!("No wallet for member {}", account.member_id),
                )
            })?;

        let outcome = self
            .wallet_repository
            .apply_deposit(&wallet.id, &details.amount, &details.transaction_reference)
            .await?;

        match outcome {
            DepositOutcome::Applied => {
                tracing::info!(
                    wallet_id = %wallet.id,
                    member_id = %account.member_id,
                    amount = %details.amount,
                    transaction_reference = %details.transaction_reference,
                    "deposit credited"
                );
            }
            DepositOutcome::Duplicate => {
                tracing::info!(
                    wallet_id = %wallet.id,
                    transaction_reference = %details.transaction_reference,
                    "deposit already applied, skipping replay"
                );
            }
        }

        Ok(())
    }
}

#[async_trait]
impl EventHandler for ProcessPaymentHandler {
    fn topic(&self) -> &str {
        TOPIC_INCOMING_PAYMENTS
    }

    fn name(&self) -> &'static str {
        "process_payment"
    }

    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if event.event_type != EVENT_PAYMENT_SUCCESSFUL {
            tracing::warn!(
                event_type = %event.event_type,
                event_id = %event.event_id,
                "unhandled payment event type, dropping"
            );
            return Ok(());
        }

        // A malformed body will be malformed on every redelivery, so it
        // is logged and acknowledged rather than left to loop.
        let Some(details) = PaymentDetails::from_webhook(&event.payload) else {
            tracing::warn!(
                event_id = %event.event_id,
                "payment webhook missing reconciliation fields, dropping"
            );
            return Ok(());
        };

        self.apply_payment(details).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryBankAccountRepository, InMemoryWalletRepository};
    use crate::domain::finance::{BankAccountStatus, ReservedBankAccount, Wallet};
    use crate::domain::foundation::{
        BankAccountId, CooperativeId, ErrorCode, EventId, MemberId, Timestamp, UserId,
    };
    use serde_json::json;

    struct Fixture {
        wallets: Arc<InMemoryWalletRepository>,
        handler: ProcessPaymentHandler,
        wallet: Wallet,
        account_reference: String,
    }

    async fn fixture() -> Fixture {
        let member_id = MemberId::new();
        let cooperative_id = CooperativeId::new();
        let user_id = UserId::new();

        let wallets = Arc::new(InMemoryWalletRepository::new());
        let wallet = Wallet::open(member_id, cooperative_id);
        wallets.save(&wallet).await.unwrap();

        let accounts = Arc::new(InMemoryBankAccountRepository::new());
        let account_reference = ReservedBankAccount::build_reference("THEOCR", user_id);
        let now = Timestamp::now();
        accounts
            .save(&ReservedBankAccount {
                id: BankAccountId::new(),
                member_id,
                cooperative_id,
                account_number: "8012345678".to_string(),
                bank_code: "1067".to_string(),
                bank_name: "Premium Trust Bank".to_string(),
                account_name: "THEOCR/Ada Obi".to_string(),
                account_reference: account_reference.clone(),
                provider: "payaza".to_string(),
                status: BankAccountStatus::Active,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let handler = ProcessPaymentHandler::new(accounts, wallets.clone());

        Fixture {
            wallets,
            handler,
            wallet,
            account_reference,
        }
    }

    fn payment_event(
        event_type: &str,
        account_reference: &str,
        transaction_reference: &str,
        amount: JsonValue,
    ) -> EventEnvelope {
        EventEnvelope::from_external(
            EventId::new(),
            event_type,
            json!({
                "event_id": "evt_123",
                "event_type": event_type,
                "signature_validated": true,
                "payload": {
                    "event": event_type,
                    "account_reference": account_reference,
                    "transaction_reference": transaction_reference,
                    "amount": amount,
                },
            }),
        )
    }

    #[tokio::test]
    async fn successful_payment_credits_the_wallet() {
        let fixture = fixture().await;

        fixture
            .handler
            .handle(payment_event(
                "payment.successful",
                &fixture.account_reference,
                "txn_001",
                json!("150.50"),
            ))
            .await
            .unwrap();

        let wallet = fixture
            .wallets
            .find_by_id(&fixture.wallet.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(wallet.balance, "150.50");
    }

    #[tokio::test]
    async fn numeric_amount_is_normalized() {
        let fixture = fixture().await;

        fixture
            .handler
            .handle(payment_event(
                "payment.successful",
                &fixture.account_reference,
                "txn_002",
                json!(200),
            ))
            .await
            .unwrap();

        let wallet = fixture
            .wallets
            .find_by_id(&fixture.wallet.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(wallet.balance, "200.00");
    }

    #[tokio::test]
    async fn replayed_transaction_is_credited_once() {
        let fixture = fixture().await;

        for _ in 0..3 {
            fixture
                .handler
                .handle(payment_event(
                    "payment.successful",
                    &fixture.account_reference,
                    "txn_replay",
                    json!("100.00"),
                ))
                .await
                .unwrap();
        }

        let wallet = fixture
            .wallets
            .find_by_id(&fixture.wallet.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(wallet.balance, "100.00");
    }

    #[tokio::test]
    async fn other_event_types_are_dropped() {
        let fixture = fixture().await;

        fixture
            .handler
            .handle(payment_event(
                "payment.failed",
                &fixture.account_reference,
                "txn_003",
                json!("75.00"),
            ))
            .await
            .unwrap();

        let wallet = fixture
            .wallets
            .find_by_id(&fixture.wallet.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(wallet.balance, "0.00");
    }

    #[tokio::test]
    async fn missing_fields_are_dropped_not_retried() {
        let fixture = fixture().await;

        let envelope = EventEnvelope::from_external(
            EventId::new(),
            "payment.successful",
            json!({ "payload": { "amount": "50.00" } }),
        );

        fixture.handler.handle(envelope).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_account_reference_is_retryable() {
        let fixture = fixture().await;

        let err = fixture
            .handler
            .handle(payment_event(
                "payment.successful",
                "ref_THEOCR_nobody",
                "txn_004",
                json!("10.00"),
            ))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::BankAccountNotFound);
    }
}
