//! The persisted state of one subscription year.
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Actor, HistoryEntry, LedgerError, MoneyCents, Month, ResultLedger};

/// Characters that may not appear in a member name.
const FORBIDDEN_NAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
/// Longest accepted member name, in characters.
const MAX_NAME_CHARS: usize = 50;

/// Per-year pricing and capacity settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Total monthly price of the subscription, split across the slots.
    pub total_price: MoneyCents,
    /// Number of participation seats the subscription offers.
    pub max_slots: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_price: MoneyCents::new(100_00),
            max_slots: 10,
        }
    }
}

impl Settings {
    /// The monthly share one slot owes, rounded half-up to the cent.
    pub fn price_per_slot(&self) -> ResultLedger<MoneyCents> {
        self.total_price.split_among(self.max_slots)
    }
}

/// The full persisted state for one calendar year.
///
/// Field order is the serialization order of the backing document, so it
/// must not be reshuffled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: i32,
    /// Display names, insertion order = display order.
    pub members: Vec<String>,
    /// Month flags per member. Rows written by this crate carry all twelve
    /// months; sparse rows from older documents are read as all-unpaid
    /// where absent.
    pub payments: BTreeMap<String, BTreeMap<Month, bool>>,
    #[serde(default)]
    pub payment_history: Vec<HistoryEntry>,
    pub settings: Settings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl YearRecord {
    /// The default record for `year`: no members, default settings.
    #[must_use]
    pub fn new(year: i32, now: DateTime<Utc>) -> Self {
        Self {
            year,
            members: Vec::new(),
            payments: BTreeMap::new(),
            payment_history: Vec::new(),
            settings: Settings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn blank_row() -> BTreeMap<Month, bool> {
        Month::ALL.iter().map(|&month| (month, false)).collect()
    }

    /// Checks a display name against the naming rules and returns the
    /// trimmed form.
    pub fn validate_name(name: &str) -> ResultLedger<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidName("name cannot be empty".to_string()));
        }
        if trimmed.chars().count() > MAX_NAME_CHARS {
            return Err(LedgerError::InvalidName(format!(
                "name longer than {MAX_NAME_CHARS} characters"
            )));
        }
        if trimmed.contains(FORBIDDEN_NAME_CHARS) {
            return Err(LedgerError::InvalidName(format!(
                "name contains a forbidden character: {trimmed}"
            )));
        }
        Ok(trimmed.to_string())
    }

    /// Adds a member with an all-unpaid payment row. A colliding name is a
    /// duplicate even when the roster is also full.
    pub fn add_member(&mut self, name: &str, now: DateTime<Utc>) -> ResultLedger<()> {
        let name = Self::validate_name(name)?;
        if self.members.contains(&name) {
            return Err(LedgerError::Duplicate(name));
        }
        if self.members.len() as u64 >= u64::from(self.settings.max_slots) {
            return Err(LedgerError::Capacity(format!(
                "all {} slots are taken",
                self.settings.max_slots
            )));
        }
        self.payments.insert(name.clone(), Self::blank_row());
        self.members.push(name);
        self.touch(now);
        Ok(())
    }

    /// Removes a member and its payment row. History entries stay.
    pub fn remove_member(&mut self, name: &str, now: DateTime<Utc>) -> ResultLedger<()> {
        if !self.members.iter().any(|member| member == name) {
            return Err(LedgerError::NotFound(name.to_string()));
        }
        self.members.retain(|member| member != name);
        self.payments.remove(name);
        self.touch(now);
        Ok(())
    }

    /// Replaces the roster wholesale, resetting every payment row to
    /// all-unpaid. Used when seeding a year from another one; history and
    /// settings stay.
    pub fn replace_members(&mut self, names: &[String], now: DateTime<Utc>) -> ResultLedger<()> {
        if names.len() as u64 > u64::from(self.settings.max_slots) {
            return Err(LedgerError::Capacity(format!(
                "{} members do not fit in {} slots",
                names.len(),
                self.settings.max_slots
            )));
        }
        self.members = names.to_vec();
        self.payments = names
            .iter()
            .map(|name| (name.clone(), Self::blank_row()))
            .collect();
        self.touch(now);
        Ok(())
    }

    /// Sets one payment flag. Appends a history entry only when the value
    /// actually changes; returns whether it did.
    pub fn set_payment(
        &mut self,
        member: &str,
        month: Month,
        paid: bool,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> ResultLedger<bool> {
        if !self.members.iter().any(|m| m == member) {
            return Err(LedgerError::NotFound(member.to_string()));
        }
        let row = self
            .payments
            .entry(member.to_string())
            .or_insert_with(Self::blank_row);
        let old = row.insert(month, paid).unwrap_or(false);
        let changed = old != paid;
        if changed {
            self.payment_history.push(HistoryEntry::transition(
                member, month, self.year, old, paid, actor, now,
            ));
        }
        self.touch(now);
        Ok(changed)
    }

    /// The payment flag for one member and month; absent flags read as
    /// unpaid.
    #[must_use]
    pub fn is_paid(&self, member: &str, month: Month) -> bool {
        self.payments
            .get(member)
            .is_some_and(|row| row.get(&month).copied().unwrap_or(false))
    }

    /// Count of months `member` has paid.
    #[must_use]
    pub fn paid_months(&self, member: &str) -> u32 {
        self.payments
            .get(member)
            .map_or(0, |row| row.values().filter(|&&paid| paid).count() as u32)
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Structural invariants every stored document must satisfy. Violations
    /// are storage errors: the document is rejected, not patched up.
    pub fn validate(&self) -> ResultLedger<()> {
        let names: BTreeSet<&str> = self.members.iter().map(String::as_str).collect();
        if names.len() != self.members.len() {
            return Err(LedgerError::Storage(format!(
                "year {}: duplicate member names",
                self.year
            )));
        }
        let rows: BTreeSet<&str> = self.payments.keys().map(String::as_str).collect();
        if names != rows {
            return Err(LedgerError::Storage(format!(
                "year {}: payment rows do not match the member list",
                self.year
            )));
        }
        if self.members.len() as u64 > u64::from(self.settings.max_slots) {
            return Err(LedgerError::Storage(format!(
                "year {}: {} members exceed {} slots",
                self.year,
                self.members.len(),
                self.settings.max_slots
            )));
        }
        if self.settings.total_price.is_negative() {
            return Err(LedgerError::Storage(format!(
                "year {}: negative total price",
                self.year
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::HistoryAction;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn record_with(names: &[&str]) -> YearRecord {
        let mut record = YearRecord::new(2026, at());
        for name in names {
            record.add_member(name, at()).unwrap();
        }
        record
    }

    #[test]
    fn add_member_initializes_a_blank_row() {
        let record = record_with(&["Anna"]);
        assert_eq!(record.members, vec!["Anna"]);
        let row = &record.payments["Anna"];
        assert_eq!(row.len(), 12);
        assert!(row.values().all(|&paid| !paid));
        record.validate().unwrap();
    }

    #[test]
    fn add_member_trims_and_validates_names() {
        let mut record = YearRecord::new(2026, at());
        record.add_member("  Bruno  ", at()).unwrap();
        assert_eq!(record.members, vec!["Bruno"]);

        assert!(matches!(
            record.add_member("   ", at()),
            Err(LedgerError::InvalidName(_))
        ));
        assert!(matches!(
            record.add_member("a/b", at()),
            Err(LedgerError::InvalidName(_))
        ));
        assert!(matches!(
            record.add_member(&"x".repeat(51), at()),
            Err(LedgerError::InvalidName(_))
        ));
    }

    #[test]
    fn add_member_rejects_duplicates() {
        let mut record = record_with(&["Anna"]);
        assert_eq!(
            record.add_member("Anna", at()),
            Err(LedgerError::Duplicate("Anna".to_string()))
        );
        assert_eq!(record.members.len(), 1);
    }

    #[test]
    fn add_member_rejects_when_full() {
        let mut record = record_with(&["Anna", "Bruno"]);
        record.settings.max_slots = 2;
        let before = record.members.clone();
        assert!(matches!(
            record.add_member("Carla", at()),
            Err(LedgerError::Capacity(_))
        ));
        assert_eq!(record.members, before);
    }

    #[test]
    fn re_adding_to_a_full_roster_reports_the_duplicate() {
        let mut record = record_with(&["Anna", "Bruno"]);
        record.settings.max_slots = 2;
        assert_eq!(
            record.add_member("Anna", at()),
            Err(LedgerError::Duplicate("Anna".to_string()))
        );
        assert_eq!(record.members, vec!["Anna", "Bruno"]);
    }

    #[test]
    fn remove_member_keeps_history() {
        let mut record = record_with(&["Anna"]);
        record
            .set_payment("Anna", Month::Jan, true, Actor::Admin, at())
            .unwrap();
        record.remove_member("Anna", at()).unwrap();
        assert!(record.members.is_empty());
        assert!(record.payments.is_empty());
        assert_eq!(record.payment_history.len(), 1);
        record.validate().unwrap();
    }

    #[test]
    fn remove_unknown_member_changes_nothing() {
        let mut record = record_with(&["Anna"]);
        let before = record.clone();
        assert_eq!(
            record.remove_member("Nonexistent", at()),
            Err(LedgerError::NotFound("Nonexistent".to_string()))
        );
        assert_eq!(record, before);
    }

    #[test]
    fn set_payment_logs_only_on_change() {
        let mut record = record_with(&["Anna"]);
        assert!(record.set_payment("Anna", Month::Mar, true, Actor::Admin, at()).unwrap());
        assert!(!record.set_payment("Anna", Month::Mar, true, Actor::Admin, at()).unwrap());
        assert_eq!(record.payment_history.len(), 1);

        assert!(record.set_payment("Anna", Month::Mar, false, Actor::Admin, at()).unwrap());
        assert_eq!(record.payment_history.len(), 2);
        let last = &record.payment_history[1];
        assert_eq!(last.action, HistoryAction::MarkedUnpaid);
        assert!(last.old_status);
        assert!(!last.new_status);
    }

    #[test]
    fn set_payment_rejects_unknown_member() {
        let mut record = record_with(&["Anna"]);
        assert_eq!(
            record.set_payment("Bruno", Month::Jan, true, Actor::Admin, at()),
            Err(LedgerError::NotFound("Bruno".to_string()))
        );
        assert!(record.payment_history.is_empty());
    }

    #[test]
    fn add_then_remove_restores_roster_but_history_grows() {
        let mut record = record_with(&["Anna"]);
        record
            .set_payment("Anna", Month::Feb, true, Actor::Admin, at())
            .unwrap();
        let entries_before = record.payment_history.len();

        record.add_member("Bruno", at()).unwrap();
        record
            .set_payment("Bruno", Month::Feb, true, Actor::Admin, at())
            .unwrap();
        record.remove_member("Bruno", at()).unwrap();

        assert_eq!(record.members, vec!["Anna"]);
        assert!(record.payment_history.len() > entries_before);
        record.validate().unwrap();
    }

    #[test]
    fn replace_members_resets_rows() {
        let mut record = record_with(&["Anna", "Bruno"]);
        record
            .set_payment("Anna", Month::Jan, true, Actor::Admin, at())
            .unwrap();
        record
            .replace_members(&["Carla".to_string(), "Dario".to_string()], at())
            .unwrap();
        assert_eq!(record.members, vec!["Carla", "Dario"]);
        assert!(!record.is_paid("Carla", Month::Jan));
        assert_eq!(record.payment_history.len(), 1);
        record.validate().unwrap();
    }

    #[test]
    fn replace_members_respects_capacity() {
        let mut record = YearRecord::new(2026, at());
        record.settings.max_slots = 1;
        let names = vec!["Anna".to_string(), "Bruno".to_string()];
        assert!(matches!(
            record.replace_members(&names, at()),
            Err(LedgerError::Capacity(_))
        ));
        assert!(record.members.is_empty());
    }

    #[test]
    fn validate_rejects_mismatched_rows() {
        let mut record = record_with(&["Anna"]);
        record.payments.remove("Anna");
        assert!(matches!(record.validate(), Err(LedgerError::Storage(_))));

        let mut record = record_with(&["Anna"]);
        record.payments.insert("Ghost".to_string(), YearRecord::blank_row());
        assert!(matches!(record.validate(), Err(LedgerError::Storage(_))));
    }

    #[test]
    fn sparse_rows_read_as_unpaid() {
        let mut record = record_with(&["Anna"]);
        record.payments.insert("Anna".to_string(), BTreeMap::new());
        assert!(!record.is_paid("Anna", Month::Jul));
        assert_eq!(record.paid_months("Anna"), 0);
    }
}
