//! ProvisionAccountsHandler - wallet and reserved bank account creation.
//!
//! Runs as the event-driven follow-up to member activation. The queue
//! is at-least-once, so every step is idempotent: an account that
//! already exists is reported, not re-created, and a provider failure
//! leaves whatever was created in place for the redelivery to finish.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::finance::{
    BankAccountStatus, FinanceError, ReservedBankAccount, Wallet,
};
use crate::domain::foundation::{
    BankAccountId, CooperativeId, DomainError, ErrorCode, EventEnvelope, MemberId, Timestamp,
    UserId,
};
use crate::domain::membership::MemberActivated;
use crate::ports::{
    BankAccountRepository, CooperativeRepository, EventHandler, Notification, Notifier,
    ProviderRegistry, VirtualAccountRequest, WalletRepository, TOPIC_MEMBERSHIP_EVENTS,
};

/// Command to provision a member's financial accounts.
#[derive(Debug, Clone)]
pub struct ProvisionAccountsCommand {
    pub member_id: MemberId,
    pub user_id: UserId,
    pub cooperative_id: CooperativeId,
    /// Member name as it should appear on the virtual account.
    pub display_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

/// Result of a provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisionAccountsResult {
    pub wallet: Wallet,
    pub bank_account: ReservedBankAccount,
    /// False when the wallet already existed.
    pub wallet_created: bool,
    /// False when the bank account already existed.
    pub bank_account_created: bool,
}

/// Handler for financial account provisioning.
pub struct ProvisionAccountsHandler {
    cooperative_repository: Arc<dyn CooperativeRepository>,
    wallet_repository: Arc<dyn WalletRepository>,
    bank_account_repository: Arc<dyn BankAccountRepository>,
    providers: Arc<ProviderRegistry>,
    default_provider: String,
    notifier: Arc<dyn Notifier>,
}

impl ProvisionAccountsHandler {
    pub fn new(
        cooperative_repository: Arc<dyn CooperativeRepository>,
        wallet_repository: Arc<dyn WalletRepository>,
        bank_account_repository: Arc<dyn BankAccountRepository>,
        providers: Arc<ProviderRegistry>,
        default_provider: impl Into<String>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cooperative_repository,
            wallet_repository,
            bank_account_repository,
            providers,
            default_provider: default_provider.into(),
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProvisionAccountsCommand,
    ) -> Result<ProvisionAccountsResult, FinanceError> {
        let cooperative = self
            .cooperative_repository
            .find_by_id(&cmd.cooperative_id)
            .await?
            .ok_or_else(|| {
                FinanceError::validation(
                    "cooperative_id",
                    format!("Cooperative {} does not exist", cmd.cooperative_id),
                )
            })?;

        let (wallet, wallet_created) = self.ensure_wallet(&cmd).await?;
        let (bank_account, bank_account_created) =
            self.ensure_bank_account(&cmd, &cooperative.acronym).await?;

        if wallet_created || bank_account_created {
            self.send_welcome(&cmd, &bank_account).await;
        }

        tracing::info!(
            member_id = %cmd.member_id,
            wallet_created,
            bank_account_created,
            account_reference = %bank_account.account_reference,
            "financial accounts provisioned"
        );

        Ok(ProvisionAccountsResult {
            wallet,
            bank_account,
            wallet_created,
            bank_account_created,
        })
    }

    async fn ensure_wallet(
        &self,
        cmd: &ProvisionAccountsCommand,
    ) -> Result<(Wallet, bool), FinanceError> {
        if let Some(existing) = self.wallet_repository.find_by_member(&cmd.member_id).await? {
            return Ok((existing, false));
        }

        let wallet = Wallet::open(cmd.member_id, cmd.cooperative_id);
        match self.wallet_repository.save(&wallet).await {
            Ok(()) => Ok((wallet, true)),
            // A concurrent run won the race; use its wallet.
            Err(e) if e.code == ErrorCode::DuplicateWallet => {
                let existing = self
                    .wallet_repository
                    .find_by_member(&cmd.member_id)
                    .await?
                    .ok_or_else(|| FinanceError::wallet_not_found(cmd.member_id))?;
                Ok((existing, false))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_bank_account(
        &self,
        cmd: &ProvisionAccountsCommand,
        acronym: &str,
    ) -> Result<(ReservedBankAccount, bool), FinanceError> {
        if let Some(existing) = self
            .bank_account_repository
            .find_by_member(&cmd.member_id)
            .await?
        {
            return Ok((existing, false));
        }

        let provider = self.providers.get(&self.default_provider)?;
        let account_reference = ReservedBankAccount::build_reference(acronym, cmd.user_id);

        let issued = provider
            .create_reserved_account(VirtualAccountRequest {
                user_id: cmd.user_id,
                account_name: format!("{}/{}", acronym, cmd.display_name),
                email: cmd.email.clone(),
                phone_number: cmd.phone_number.clone(),
                account_reference: account_reference.clone(),
            })
            .await?;

        let now = Timestamp::now();
        let account = ReservedBankAccount {
            id: BankAccountId::new(),
            member_id: cmd.member_id,
            cooperative_id: cmd.cooperative_id,
            account_number: issued.account_number,
            bank_code: issued.bank_code,
            bank_name: issued.bank_name,
            account_name: issued.account_name,
            account_reference: issued.account_reference,
            provider: provider.name().to_string(),
            status: BankAccountStatus::Active,
            created_at: now,
            updated_at: now,
        };

        match self.bank_account_repository.save(&account).await {
            Ok(()) => Ok((account, true)),
            Err(e) if e.code == ErrorCode::DuplicateBankAccount => {
                let existing = self
                    .bank_account_repository
                    .find_by_member(&cmd.member_id)
                    .await?
                    .ok_or_else(|| FinanceError::bank_account_not_found(cmd.member_id))?;
                Ok((existing, false))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Notification failures are logged and swallowed; provisioning
    /// never fails because an email did.
    async fn send_welcome(&self, cmd: &ProvisionAccountsCommand, account: &ReservedBankAccount) {
        let notification = Notification::new(
            cmd.user_id,
            "Your cooperative accounts are ready",
            format!(
                "Deposits to {} ({}) are credited to your wallet.",
                account.account_number, account.bank_name
            ),
        );
        if let Err(e) = self.notifier.notify(notification).await {
            tracing::warn!(user_id = %cmd.user_id, error = %e, "welcome notification failed");
        }
    }
}

/// Consumes `member.activated` events and triggers provisioning.
pub struct ProvisionOnActivationHandler {
    inner: Arc<ProvisionAccountsHandler>,
}

impl ProvisionOnActivationHandler {
    pub fn new(inner: Arc<ProvisionAccountsHandler>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl EventHandler for ProvisionOnActivationHandler {
    fn topic(&self) -> &str {
        TOPIC_MEMBERSHIP_EVENTS
    }

    fn name(&self) -> &'static str {
        "provision_on_activation"
    }

    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if event.event_type != "member.activated" {
            tracing::debug!(event_type = %event.event_type, "ignoring membership event");
            return Ok(());
        }

        let activated: MemberActivated = serde_json::from_value(event.payload).map_err(|e| {
            DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Malformed member.activated payload: {}", e),
            )
        })?;

        self.inner
            .handle(ProvisionAccountsCommand {
                member_id: activated.member_id,
                user_id: activated.user_id,
                cooperative_id: activated.cooperative_id,
                display_name: activated.display_name,
                email: activated.email,
                phone_number: activated.phone_number,
            })
            .await
            .map_err(|e| DomainError::new(e.code(), e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryBankAccountRepository, InMemoryCooperativeRepository, InMemoryWalletRepository,
    };
    use crate::adapters::notify::LogNotifier;
    use crate::domain::cooperative::Cooperative;
    use crate::ports::{IssuedAccount, VirtualAccountProvider};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FakeProvider {
        calls: AtomicU32,
        fail: bool,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl VirtualAccountProvider for FakeProvider {
        fn name(&self) -> &str {
            "payaza"
        }

        async fn create_reserved_account(
            &self,
            request: VirtualAccountRequest,
        ) -> Result<IssuedAccount, FinanceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FinanceError::provider("payaza", "gateway timeout"));
            }
            Ok(IssuedAccount {
                account_number: "8012345678".to_string(),
                bank_code: "1067".to_string(),
                bank_name: "Premium Trust Bank".to_string(),
                account_name: request.account_name,
                account_reference: request.account_reference,
            })
        }
    }

    struct Fixture {
        wallets: Arc<InMemoryWalletRepository>,
        accounts: Arc<InMemoryBankAccountRepository>,
        provider: Arc<FakeProvider>,
        handler: ProvisionAccountsHandler,
        cooperative_id: CooperativeId,
        acronym: String,
    }

    async fn fixture_with_provider(provider: FakeProvider, default_name: &str) -> Fixture {
        let coops = Arc::new(InMemoryCooperativeRepository::new());
        let coop =
            Cooperative::register(CooperativeId::new(), "Theocraft", "THEOCR", UserId::new())
                .unwrap();
        coops.save(&coop).await.unwrap();

        let wallets = Arc::new(InMemoryWalletRepository::new());
        let accounts = Arc::new(InMemoryBankAccountRepository::new());
        let provider = Arc::new(provider);

        let mut registry = ProviderRegistry::new();
        registry.register(provider.clone());

        let handler = ProvisionAccountsHandler::new(
            coops,
            wallets.clone(),
            accounts.clone(),
            Arc::new(registry),
            default_name,
            Arc::new(LogNotifier::new()),
        );

        Fixture {
            wallets,
            accounts,
            provider,
            handler,
            cooperative_id: coop.id,
            acronym: coop.acronym,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with_provider(FakeProvider::new(), "payaza").await
    }

    fn command(fixture: &Fixture) -> ProvisionAccountsCommand {
        ProvisionAccountsCommand {
            member_id: MemberId::new(),
            user_id: UserId::new(),
            cooperative_id: fixture.cooperative_id,
            display_name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: Some("+2348012345678".to_string()),
        }
    }

    #[tokio::test]
    async fn provisions_wallet_and_bank_account() {
        let fixture = fixture().await;
        let cmd = command(&fixture);

        let result = fixture.handler.handle(cmd.clone()).await.unwrap();

        assert!(result.wallet_created);
        assert!(result.bank_account_created);
        assert_eq!(result.wallet.balance, "0.00");
        assert_eq!(result.wallet.currency_code, "NGN");
        assert_eq!(
            result.bank_account.account_reference,
            format!("ref_{}_{}", fixture.acronym, cmd.user_id)
        );
        assert_eq!(result.bank_account.account_name, "THEOCR/Ada Obi");
        assert_eq!(result.bank_account.status, BankAccountStatus::Active);
    }

    #[tokio::test]
    async fn rerun_is_idempotent_and_calls_provider_once() {
        let fixture = fixture().await;
        let cmd = command(&fixture);

        let first = fixture.handler.handle(cmd.clone()).await.unwrap();
        let second = fixture.handler.handle(cmd).await.unwrap();

        assert!(!second.wallet_created);
        assert!(!second.bank_account_created);
        assert_eq!(second.wallet.id, first.wallet.id);
        assert_eq!(second.bank_account.id, first.bank_account.id);
        assert_eq!(fixture.provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fixture.wallets.count(), 1);
        assert_eq!(fixture.accounts.count(), 1);
    }

    #[tokio::test]
    async fn provider_failure_leaves_wallet_in_place() {
        let fixture = fixture_with_provider(FakeProvider::failing(), "payaza").await;
        let cmd = command(&fixture);

        let err = fixture.handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, FinanceError::Provider { .. }));
        assert_eq!(fixture.wallets.count(), 1);
        assert_eq!(fixture.accounts.count(), 0);
    }

    #[tokio::test]
    async fn unknown_provider_name_is_rejected() {
        let fixture = fixture_with_provider(FakeProvider::new(), "budpay").await;
        let cmd = command(&fixture);

        let err = fixture.handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, FinanceError::UnsupportedProvider { .. }));
    }

    #[tokio::test]
    async fn activation_event_triggers_provisioning() {
        use crate::domain::foundation::{EventId, SerializableDomainEvent};
        use crate::domain::membership::MemberActivated;

        let fixture = fixture().await;
        let wallets = fixture.wallets.clone();
        let handler = ProvisionOnActivationHandler::new(Arc::new(fixture.handler));

        let event = MemberActivated {
            event_id: EventId::new(),
            member_id: MemberId::new(),
            user_id: UserId::new(),
            cooperative_id: fixture.cooperative_id,
            membership_id: "THEO-2025-1".to_string(),
            display_name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: None,
            occurred_at: Timestamp::now(),
        };

        handler.handle(event.to_envelope()).await.unwrap();
        assert_eq!(wallets.count(), 1);
    }

    #[tokio::test]
    async fn unrelated_membership_events_are_ignored() {
        let fixture = fixture().await;
        let wallets = fixture.wallets.clone();
        let handler = ProvisionOnActivationHandler::new(Arc::new(fixture.handler));

        let envelope = EventEnvelope::from_external(
            crate::domain::foundation::EventId::new(),
            "member.suspended",
            serde_json::json!({}),
        );

        handler.handle(envelope).await.unwrap();
        assert_eq!(wallets.count(), 0);
    }
}
