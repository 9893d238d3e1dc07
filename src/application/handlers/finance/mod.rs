//! Finance handlers - account provisioning and payment reconciliation.

mod process_payment;
mod provision_accounts;

pub use process_payment::ProcessPaymentHandler;
pub use provision_accounts::{
    ProvisionAccountsCommand, ProvisionAccountsHandler, ProvisionAccountsResult,
    ProvisionOnActivationHandler,
};
