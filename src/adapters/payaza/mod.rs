//! Payaza payment provider adapter.

mod adapter;

pub use adapter::{PayazaAdapter, PayazaConfig};
