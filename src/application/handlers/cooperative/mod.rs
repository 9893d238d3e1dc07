//! Cooperative command handlers.

mod create_cooperative;
mod update_cooperative;

pub use create_cooperative::{
    CreateCooperativeCommand, CreateCooperativeHandler, CreateCooperativeResult,
};
pub use update_cooperative::{
    UpdateCooperativeCommand, UpdateCooperativeHandler, UpdateCooperativeResult,
};
