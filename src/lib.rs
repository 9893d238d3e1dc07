//! Coop Connect - Cooperative Society Backend
//!
//! Implements the membership lifecycle for cooperative societies:
//! member onboarding and approval, per-cooperative membership identifier
//! generation, idempotent wallet and reserved-bank-account provisioning,
//! and Payaza payment webhook reconciliation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
