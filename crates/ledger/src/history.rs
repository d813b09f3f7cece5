//! Append-only audit trail of payment-status transitions.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Month;

/// The direction of a recorded transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    MarkedPaid,
    MarkedUnpaid,
}

impl HistoryAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::MarkedPaid => "marked_paid",
            HistoryAction::MarkedUnpaid => "marked_unpaid",
        }
    }
}

/// Who performed a mutation.
///
/// Defaults to [`Anonymous`] so documents written before the tag existed
/// still deserialize.
///
///  [`Anonymous`]: Actor::Anonymous
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Admin,
    #[default]
    Anonymous,
}

impl Actor {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Actor::Admin => "admin",
            Actor::Anonymous => "anonymous",
        }
    }
}

/// One recorded payment-status transition.
///
/// Entries are never edited or removed once appended; removing a member
/// leaves its entries in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub member: String,
    pub month: Month,
    pub year: i32,
    pub old_status: bool,
    pub new_status: bool,
    pub action: HistoryAction,
    #[serde(default)]
    pub actor: Actor,
}

impl HistoryEntry {
    /// Builds the entry recording an `old -> new` flip for `member`.
    #[must_use]
    pub fn transition(
        member: &str,
        month: Month,
        year: i32,
        old_status: bool,
        new_status: bool,
        actor: Actor,
        at: DateTime<Utc>,
    ) -> Self {
        let action = if new_status {
            HistoryAction::MarkedPaid
        } else {
            HistoryAction::MarkedUnpaid
        };
        Self {
            timestamp: at,
            member: member.to_string(),
            month,
            year,
            old_status,
            new_status,
            action,
            actor,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn transition_derives_the_action() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let paid = HistoryEntry::transition("Anna", Month::Mar, 2026, false, true, Actor::Admin, at);
        assert_eq!(paid.action, HistoryAction::MarkedPaid);
        assert_eq!(paid.actor.as_str(), "admin");

        let unpaid = HistoryEntry::transition("Anna", Month::Mar, 2026, true, false, Actor::Admin, at);
        assert_eq!(unpaid.action, HistoryAction::MarkedUnpaid);
    }

    #[test]
    fn serializes_with_snake_case_tags() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let entry = HistoryEntry::transition("Anna", Month::Mar, 2026, false, true, Actor::Admin, at);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["action"], "marked_paid");
        assert_eq!(json["actor"], "admin");
        assert_eq!(json["month"], "Mar");
    }

    #[test]
    fn actor_defaults_to_anonymous_when_missing() {
        let raw = r#"{
            "timestamp": "2026-03-01T09:00:00Z",
            "member": "Anna",
            "month": "Mar",
            "year": 2026,
            "old_status": false,
            "new_status": true,
            "action": "marked_paid"
        }"#;
        let entry: HistoryEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.actor, Actor::Anonymous);
    }
}
