//! Coop Connect server binary.
//!
//! Wires the Postgres adapters, the Payaza provider, the queue consumer
//! and the webhook ingress together, then serves until interrupted.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use coop_connect::adapters::events::PostgresEventQueue;
use coop_connect::adapters::http::{webhook_router, WebhookAppState};
use coop_connect::adapters::postgres::{
    PostgresBankAccountRepository, PostgresCooperativeRepository, PostgresWalletRepository,
};
use coop_connect::adapters::{
    LogNotifier, PayazaAdapter, PayazaConfig, QueueConsumer, QueueConsumerConfig,
};
use coop_connect::application::handlers::finance::{
    ProcessPaymentHandler, ProvisionAccountsHandler, ProvisionOnActivationHandler,
};
use coop_connect::application::handlers::webhook::HandlePayazaWebhookHandler;
use coop_connect::config::AppConfig;
use coop_connect::domain::webhook::PayazaWebhookVerifier;
use coop_connect::ports::ProviderRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    // Repositories and queue share the same pool.
    let queue = Arc::new(PostgresEventQueue::new(pool.clone()));
    let cooperative_repository = Arc::new(PostgresCooperativeRepository::new(pool.clone()));
    let wallet_repository = Arc::new(PostgresWalletRepository::new(pool.clone()));
    let bank_account_repository = Arc::new(PostgresBankAccountRepository::new(pool.clone()));

    let payaza = Arc::new(PayazaAdapter::new(
        PayazaConfig::new(config.payment.payaza_api_token.clone())
            .with_base_url(config.payment.payaza_base_url.clone())
            .with_request_timeout(Duration::from_secs(config.payment.request_timeout_secs)),
    ));
    let mut registry = ProviderRegistry::new();
    registry.register(payaza);

    let provisioner = Arc::new(ProvisionAccountsHandler::new(
        cooperative_repository.clone(),
        wallet_repository.clone(),
        bank_account_repository.clone(),
        Arc::new(registry),
        config.payment.default_provider.clone(),
        Arc::new(LogNotifier::new()),
    ));

    let consumer = QueueConsumer::new(queue.clone())
        .with_config(
            QueueConsumerConfig::default()
                .with_poll_interval(config.queue.poll_interval())
                .with_batch_size(config.queue.batch_size),
        )
        .register(Arc::new(ProvisionOnActivationHandler::new(provisioner)))
        .register(Arc::new(ProcessPaymentHandler::new(
            bank_account_repository.clone(),
            wallet_repository.clone(),
        )));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let consumer_task = tokio::spawn(async move { consumer.run(shutdown_rx).await });

    let webhook_handler = Arc::new(HandlePayazaWebhookHandler::new(
        PayazaWebhookVerifier::new(config.payment.payaza_webhook_secret.clone()),
        queue,
    ));
    let app = webhook_router(WebhookAppState { webhook_handler });

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    // Let the consumer drain its final batch before exiting.
    let _ = shutdown_tx.send(true);
    match consumer_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "consumer exited with error"),
        Err(e) => tracing::error!(error = %e, "consumer task panicked"),
    }

    Ok(())
}
