//! Cooperative update audit trail.
//!
//! A bounded-format, reverse-chronological log of "what changed and by
//! whom", embedded inside the cooperative's open `meta` map under the
//! `update_trail` key. The trail is rewritten newest-first on every
//! update and folded into the same persistence write as the rest of the
//! cooperative's fields.
//!
//! Growth is unbounded, and every update re-sorts the full trail; both
//! are preserved from the original trail format rather than silently
//! fixed.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{MemberId, Timestamp};

/// Key under which the trail lives inside `Cooperative.meta`.
const TRAIL_KEY: &str = "update_trail";

/// One audit trail entry: what changed, when, and by whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTrailEntry {
    pub date_updated: Timestamp,
    pub updated_by: MemberId,
    pub values: Vec<String>,
}

/// The embedded audit trail, newest entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTrail(Vec<UpdateTrailEntry>);

impl UpdateTrail {
    /// Reads the trail out of a cooperative's `meta` map.
    ///
    /// A missing or malformed `update_trail` key yields an empty trail;
    /// the next write repairs it.
    pub fn from_meta(meta: &JsonValue) -> Self {
        let entries = meta
            .get(TRAIL_KEY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        Self(entries)
    }

    /// Appends a new entry and stores the trail newest-first into `meta`.
    ///
    /// `changed_fields` lists exactly the fields touched by this update.
    pub fn record(
        meta: &mut JsonValue,
        changed_fields: Vec<String>,
        actor: MemberId,
        now: Timestamp,
    ) {
        let mut trail = Self::from_meta(meta);
        trail.0.insert(
            0,
            UpdateTrailEntry {
                date_updated: now,
                updated_by: actor,
                values: changed_fields,
            },
        );
        // Newest-first order is the stored order.
        trail.0.sort_by(|a, b| b.date_updated.cmp(&a.date_updated));

        if !meta.is_object() {
            *meta = JsonValue::Object(serde_json::Map::new());
        }
        meta[TRAIL_KEY] = serde_json::to_value(&trail.0)
            .expect("trail entries are plain data and always serialize");
    }

    /// Returns the entries, newest first.
    pub fn entries(&self) -> &[UpdateTrailEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
