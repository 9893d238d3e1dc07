//! Membership command handlers.

mod activate_member;
mod create_member;
mod update_member;

pub use activate_member::{ActivateMemberCommand, ActivateMemberHandler, ActivateMemberResult};
pub use create_member::{CreateMemberCommand, CreateMemberHandler, CreateMemberResult};
pub use update_member::{UpdateMemberCommand, UpdateMemberHandler, UpdateMemberResult};
