//! Member roles and membership categories within a cooperative.

use serde::{Deserialize, Serialize};

/// Role a member holds inside their cooperative.
///
/// Officer roles (everything except `Member`) carry approval and
/// management permissions in the routing layer; the core only records
/// them and treats the acting officer as an opaque actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooperativeRole {
    President,
    Secretary,
    Treasurer,
    Accountant,
    Staff,
    Member,
}

impl CooperativeRole {
    /// Returns true for roles with administrative standing.
    pub fn is_officer(&self) -> bool {
        !matches!(self, CooperativeRole::Member)
    }
}

/// Category of membership held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipType {
    Regular,
    Corporate,
}

impl Default for MembershipType {
    fn default() -> Self {
        MembershipType::Regular
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_member_is_not_officer() {
        assert!(!CooperativeRole::Member.is_officer());
        assert!(CooperativeRole::President.is_officer());
        assert!(CooperativeRole::Treasurer.is_officer());
    }

    #[test]
    fn membership_type_defaults_to_regular() {
        assert_eq!(MembershipType::default(), MembershipType::Regular);
    }

    #[test]
    fn role_serializes_snake_case() {
        let json = serde_json::to_string(&CooperativeRole::President).unwrap();
        assert_eq!(json, "\"president\"");
    }
}
