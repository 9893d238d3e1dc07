//! End-to-end membership lifecycle over the in-memory adapters:
//! cooperative registration, member onboarding, activation with
//! identifier assignment, and queue-driven account provisioning.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use coop_connect::adapters::memory::{
    InMemoryBankAccountRepository, InMemoryCooperativeRepository, InMemoryMemberRepository,
    InMemoryWalletRepository,
};
use coop_connect::adapters::{InMemoryEventQueue, LogNotifier, QueueConsumer};
use coop_connect::application::handlers::cooperative::{
    CreateCooperativeCommand, CreateCooperativeHandler,
};
use coop_connect::application::handlers::finance::{
    ProvisionAccountsHandler, ProvisionOnActivationHandler,
};
use coop_connect::application::handlers::membership::{
    ActivateMemberCommand, ActivateMemberHandler, CreateMemberCommand, CreateMemberHandler,
};
use coop_connect::domain::finance::FinanceError;
use coop_connect::domain::foundation::{Timestamp, UserId};
use coop_connect::domain::membership::{
    CooperativeRole, MembershipError, MembershipStatus, MembershipType,
};
use coop_connect::ports::{
    BankAccountRepository, IssuedAccount, ProviderRegistry, VirtualAccountProvider,
    VirtualAccountRequest, WalletRepository,
};

struct FakeProvider {
    calls: AtomicU32,
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
        Ok(IssuedAccount {
            account_number: "8012345678".to_string(),
            bank_code: "1067".to_string(),
            bank_name: "Premium Trust Bank".to_string(),
            account_name: request.account_name,
            account_reference: request.account_reference,
        })
    }
}

struct TestApp {
    cooperatives: Arc<InMemoryCooperativeRepository>,
    members: Arc<InMemoryMemberRepository>,
    wallets: Arc<InMemoryWalletRepository>,
    bank_accounts: Arc<InMemoryBankAccountRepository>,
    queue: Arc<InMemoryEventQueue>,
    provider: Arc<FakeProvider>,
    consumer: QueueConsumer,
}

fn test_app() -> TestApp {
    let cooperatives = Arc::new(InMemoryCooperativeRepository::new());
    let members = Arc::new(InMemoryMemberRepository::new());
    let wallets = Arc::new(InMemoryWalletRepository::new());
    let bank_accounts = Arc::new(InMemoryBankAccountRepository::new());
    let queue = Arc::new(InMemoryEventQueue::new());

    let provider = Arc::new(FakeProvider {
        calls: AtomicU32::new(0),
    });
    let mut registry = ProviderRegistry::new();
    registry.register(provider.clone());

    let provisioner = Arc::new(ProvisionAccountsHandler::new(
        cooperatives.clone(),
        wallets.clone(),
        bank_accounts.clone(),
        Arc::new(registry),
        "payaza",
        Arc::new(LogNotifier::new()),
    ));

    let consumer = QueueConsumer::new(queue.clone())
        .register(Arc::new(ProvisionOnActivationHandler::new(provisioner)));

    TestApp {
        cooperatives,
        members,
        wallets,
        bank_accounts,
        queue,
        provider,
        consumer,
    }
}

impl TestApp {
    fn create_cooperative_handler(&self) -> CreateCooperativeHandler {
        CreateCooperativeHandler::new(self.cooperatives.clone(), self.members.clone())
    }

    fn create_member_handler(&self) -> CreateMemberHandler {
        CreateMemberHandler::new(self.members.clone(), self.cooperatives.clone())
    }

    fn activate_member_handler(&self) -> ActivateMemberHandler {
        ActivateMemberHandler::new(
            self.members.clone(),
            self.cooperatives.clone(),
            self.queue.clone(),
        )
    }
}

fn member_command(
    user_id: UserId,
    cooperative_id: coop_connect::domain::foundation::CooperativeId,
) -> CreateMemberCommand {
    CreateMemberCommand {
        user_id,
        cooperative_id,
        membership_type: MembershipType::Regular,
        emergency_contacts: Vec::new(),
        guarantors: Vec::new(),
        referrer: None,
    }
}

#[tokio::test]
async fn full_lifecycle_assigns_identifiers_and_provisions_accounts() {
    let app = test_app();
    let year = Timestamp::now().year();

    let registered = app
        .create_cooperative_handler()
        .handle(CreateCooperativeCommand {
            name: "Theocraft Multipurpose".to_string(),
            acronym: "THEOCR".to_string(),
            created_by: UserId::new(),
            creator_role: CooperativeRole::President,
        })
        .await
        .unwrap();

    assert_eq!(
        registered.root_member.membership_id.as_deref(),
        Some(format!("THEO-{}-1", year).as_str())
    );

    // A second user applies and is activated.
    let user_id = UserId::new();
    let applied = app
        .create_member_handler()
        .handle(member_command(user_id, registered.cooperative.id))
        .await
        .unwrap();
    assert_eq!(applied.member.status, MembershipStatus::PendingApproval);

    let activated = app
        .activate_member_handler()
        .handle(ActivateMemberCommand {
            member_id: applied.member.id,
            cooperative_id: registered.cooperative.id,
            display_name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: Some("+2348012345678".to_string()),
        })
        .await
        .unwrap();

    assert!(activated.first_activation);
    assert_eq!(activated.member.status, MembershipStatus::Active);
    assert_eq!(
        activated.member.membership_id.as_deref(),
        Some(format!("THEO-{}-2", year).as_str())
    );

    // The activation event drives provisioning through the consumer.
    app.consumer.poll_once().await.unwrap();

    let wallet = app
        .wallets
        .find_by_member(&applied.member.id)
        .await
        .unwrap()
        .expect("wallet provisioned");
    assert_eq!(wallet.balance, "0.00");

    let account = app
        .bank_accounts
        .find_by_member(&applied.member.id)
        .await
        .unwrap()
        .expect("bank account provisioned");
    assert_eq!(account.account_name, "THEOCR/Ada Obi");
    assert_eq!(
        account.account_reference,
        format!("ref_THEOCR_{}", user_id)
    );
    assert_eq!(app.provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reactivation_is_a_no_op_and_never_double_provisions() {
    let app = test_app();

    let registered = app
        .create_cooperative_handler()
        .handle(CreateCooperativeCommand {
            name: "Theocraft Multipurpose".to_string(),
            acronym: "THEOCR".to_string(),
            created_by: UserId::new(),
            creator_role: CooperativeRole::President,
        })
        .await
        .unwrap();

    let applied = app
        .create_member_handler()
        .handle(member_command(UserId::new(), registered.cooperative.id))
        .await
        .unwrap();

    let command = ActivateMemberCommand {
        member_id: applied.member.id,
        cooperative_id: registered.cooperative.id,
        display_name: "Ada Obi".to_string(),
        email: "ada@example.com".to_string(),
        phone_number: None,
    };

    let first = app
        .activate_member_handler()
        .handle(command.clone())
        .await
        .unwrap();
    let second = app
        .activate_member_handler()
        .handle(command)
        .await
        .unwrap();

    assert!(first.first_activation);
    assert!(!second.first_activation);
    assert_eq!(second.member.membership_id, first.member.membership_id);

    // Only the first activation published an event; redeliveries of it
    // are tolerated by the idempotent provisioner either way.
    assert_eq!(app.queue.events_of_type("member.activated").len(), 1);

    app.consumer.poll_once().await.unwrap();
    app.consumer.poll_once().await.unwrap();

    assert_eq!(app.wallets.count(), 1);
    assert_eq!(app.provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn duplicate_application_is_rejected() {
    let app = test_app();

    let registered = app
        .create_cooperative_handler()
        .handle(CreateCooperativeCommand {
            name: "Theocraft Multipurpose".to_string(),
            acronym: "THEOCR".to_string(),
            created_by: UserId::new(),
            creator_role: CooperativeRole::President,
        })
        .await
        .unwrap();

    let user_id = UserId::new();
    let handler = app.create_member_handler();
    handler
        .handle(member_command(user_id, registered.cooperative.id))
        .await
        .unwrap();

    let err = handler
        .handle(member_command(user_id, registered.cooperative.id))
        .await
        .unwrap_err();

    assert!(matches!(err, MembershipError::DuplicateMembership { .. }));
}
