//! Membership identifier generation.
//!
//! Produces the human-readable membership ID and referral code assigned
//! when a member first becomes active. Identifiers are scoped per
//! cooperative per calendar year:
//!
//! - membership ID: `{HANDLE}-{YEAR}-{N}` (e.g. `THEO-2025-1`)
//! - referral code: `{YEAR}-{N}-{RANDOM6}` (e.g. `2025-1-a3f9c1`)
//!
//! Generation is a pure function of its inputs. The caller supplies the
//! count of members already active in the cooperative for the year from
//! a consistent read; the storage unique constraint on the membership ID
//! is the authoritative guard against two activations computing the same
//! sequence number.

use uuid::Uuid;

use crate::domain::foundation::ValidationError;

/// Width of the cooperative handle prefix inside a membership ID.
const HANDLE_WIDTH: usize = 4;

/// Length of the random suffix inside a referral code.
const REFERRAL_SUFFIX_LEN: usize = 6;

/// Identifiers assigned to a member on first activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipIdentifiers {
    /// Human-readable, sequential per cooperative per year.
    pub membership_id: String,

    /// Year + sequence + random suffix. Unique with overwhelming
    /// probability but not guaranteed; no collision check is performed.
    pub referral_code: String,

    /// The sequence number embedded in both identifiers.
    pub sequence: u64,
}

impl MembershipIdentifiers {
    /// Generates identifiers for the next member of a cooperative.
    ///
    /// `existing_active_count` is the number of members already active in
    /// the cooperative for `year`; the new member takes sequence
    /// `existing_active_count + 1`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the acronym yields an empty handle.
    pub fn generate(
        acronym: &str,
        year: i32,
        existing_active_count: u64,
    ) -> Result<Self, ValidationError> {
        let handle = derive_handle(acronym)?;
        let sequence = existing_active_count + 1;

        let membership_id = format!("{}-{}-{}", handle, year, sequence);
        let referral_code = format!("{}-{}-{}", year, sequence, random_suffix());

        Ok(Self {
            membership_id,
            referral_code,
            sequence,
        })
    }
}

/// Derives the fixed-width handle prefix from a cooperative acronym.
///
/// Uppercased, whitespace stripped, truncated to `HANDLE_WIDTH` chars.
fn derive_handle(acronym: &str) -> Result<String, ValidationError> {
    let handle: String = acronym
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(HANDLE_WIDTH)
        .collect::<String>()
        .to_uppercase();

    if handle.is_empty() {
        return Err(ValidationError::empty_field("acronym"));
    }

    Ok(handle)
}

/// Random suffix for referral codes: first chars of a hyphen-stripped
/// UUIDv4, so lowercase hex.
fn random_suffix() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(REFERRAL_SUFFIX_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn generates_expected_membership_id_shape() {
        let ids = MembershipIdentifiers::generate("THEOCR", 2025, 0).unwrap();
        assert_eq!(ids.membership_id, "THEO-2025-1");
        assert_eq!(ids.sequence, 1);
    }

    #[test]
    fn sequence_is_count_plus_one() {
        let ids = MembershipIdentifiers::generate("THEOCR", 2025, 41).unwrap();
        assert_eq!(ids.membership_id, "THEO-2025-42");
        assert!(ids.referral_code.starts_with("2025-42-"));
    }

    #[test]
    fn handle_is_uppercased() {
        let ids = MembershipIdentifiers::generate("theocr", 2025, 0).unwrap();
        assert_eq!(ids.membership_id, "THEO-2025-1");
    }

    #[test]
    fn short_acronym_uses_full_handle() {
        let ids = MembershipIdentifiers::generate("ABC", 2025, 0).unwrap();
        assert_eq!(ids.membership_id, "ABC-2025-1");
    }

    #[test]
    fn whitespace_only_acronym_fails() {
        let result = MembershipIdentifiers::generate("   ", 2025, 0);
        assert!(result.is_err());
    }

    #[test]
    fn empty_acronym_fails() {
        let result = MembershipIdentifiers::generate("", 2025, 0);
        assert!(result.is_err());
    }

    #[test]
    fn referral_code_embeds_year_and_sequence() {
        let ids = MembershipIdentifiers::generate("THEOCR", 2025, 2).unwrap();
        let parts: Vec<&str> = ids.referral_code.splitn(3, '-').collect();
        assert_eq!(parts[0], "2025");
        assert_eq!(parts[1], "3");
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn sequential_generation_yields_distinct_ids() {
        let first = MembershipIdentifiers::generate("THEOCR", 2025, 0).unwrap();
        let second = MembershipIdentifiers::generate("THEOCR", 2025, 1).unwrap();
        assert_ne!(first.membership_id, second.membership_id);
        assert_ne!(first.referral_code, second.referral_code);
    }

    proptest! {
        #[test]
        fn membership_id_always_has_three_parts(
            acronym in "[A-Za-z]{6,12}",
            year in 2025i32..2100,
            count in 0u64..100_000,
        ) {
            let ids = MembershipIdentifiers::generate(&acronym, year, count).unwrap();
            let parts: Vec<&str> = ids.membership_id.split('-').collect();
            prop_assert_eq!(parts.len(), 3);
            prop_assert_eq!(parts[0].len(), 4);
            prop_assert!(parts[0].chars().all(|c| c.is_ascii_uppercase()));
            prop_assert_eq!(parts[1], year.to_string());
            prop_assert_eq!(parts[2], (count + 1).to_string());
        }

        #[test]
        fn referral_suffix_is_six_lowercase_hex(
            count in 0u64..1_000,
        ) {
            let ids = MembershipIdentifiers::generate("THEOCR", 2025, count).unwrap();
            let suffix = ids.referral_code.rsplit('-').next().unwrap();
            prop_assert_eq!(suffix.len(), 6);
            prop_assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }
}
