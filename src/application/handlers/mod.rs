//! Command handlers, one module per subdomain.
//!
//! Handlers own orchestration only: they load aggregates through
//! repository ports, invoke domain behavior, persist, and publish
//! events. Business rules live in `domain/`.

pub mod cooperative;
pub mod finance;
pub mod membership;
pub mod webhook;
