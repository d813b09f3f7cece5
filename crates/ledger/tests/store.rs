use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Barrier;
use std::thread;

use ledger::{Actor, Backup, BulkAssignment, Ledger, LedgerError, MoneyCents, Month};
use uuid::Uuid;

fn open_store() -> (Ledger, PathBuf) {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_data");
    fs::create_dir_all(&root).unwrap();

    let dir = root.join(format!("ledger_{}", Uuid::new_v4()));
    let ledger = Ledger::open(&dir).unwrap();
    (ledger, dir)
}

fn year_file(dir: &PathBuf, year: i32) -> PathBuf {
    dir.join(format!("subscription_data_{year}.json"))
}

#[test]
fn load_creates_and_persists_the_default_record() {
    let (ledger, dir) = open_store();

    let record = ledger.load(2026).unwrap();
    assert_eq!(record.year, 2026);
    assert!(record.members.is_empty());
    assert_eq!(record.settings.total_price, MoneyCents::new(100_00));
    assert_eq!(record.settings.max_slots, 10);
    assert!(year_file(&dir, 2026).exists());

    // a second load reads the persisted file back
    let again = ledger.load(2026).unwrap();
    assert_eq!(again.members, record.members);
    assert_eq!(again.created_at, record.created_at);
}

#[test]
fn concurrent_first_loads_both_succeed() {
    let (ledger, _dir) = open_store();
    let barrier = Barrier::new(2);

    for year in 2000..2200 {
        thread::scope(|scope| {
            let first = scope.spawn(|| {
                barrier.wait();
                ledger.load(year)
            });
            let second = scope.spawn(|| {
                barrier.wait();
                ledger.load(year)
            });
            first.join().unwrap().unwrap();
            second.join().unwrap().unwrap();
        });
        // whichever writer won, the document on disk is complete
        assert_eq!(ledger.load(year).unwrap().year, year);
    }
}

#[test]
fn save_load_round_trip_is_byte_stable() {
    let (ledger, dir) = open_store();
    ledger.add_member(2026, "Anna").unwrap();
    ledger
        .set_payment(2026, "Anna", Month::Feb, true, Actor::Admin)
        .unwrap();

    let before = fs::read(year_file(&dir, 2026)).unwrap();
    let mut record = ledger.load(2026).unwrap();
    ledger.save(&mut record).unwrap();
    let after = fs::read(year_file(&dir, 2026)).unwrap();

    let mut old: serde_json::Value = serde_json::from_slice(&before).unwrap();
    let mut new: serde_json::Value = serde_json::from_slice(&after).unwrap();
    // only the write timestamp may differ
    old["updated_at"] = serde_json::Value::Null;
    new["updated_at"] = serde_json::Value::Null;
    assert_eq!(
        serde_json::to_vec_pretty(&old).unwrap(),
        serde_json::to_vec_pretty(&new).unwrap()
    );
}

#[test]
fn malformed_document_is_a_storage_error() {
    let (ledger, dir) = open_store();
    fs::write(year_file(&dir, 2026), b"{ definitely not json").unwrap();

    assert!(matches!(ledger.load(2026), Err(LedgerError::Storage(_))));
}

#[test]
fn mismatched_year_field_is_rejected() {
    let (ledger, dir) = open_store();
    ledger.load(2026).unwrap();
    fs::copy(year_file(&dir, 2026), year_file(&dir, 2027)).unwrap();

    assert!(matches!(ledger.load(2027), Err(LedgerError::Storage(_))));
}

#[test]
fn membership_lifecycle_persists() {
    let (ledger, _dir) = open_store();

    ledger.add_member(2026, "Anna").unwrap();
    ledger.add_member(2026, "Bruno").unwrap();
    let record = ledger.load(2026).unwrap();
    assert_eq!(record.members, vec!["Anna", "Bruno"]);
    assert_eq!(record.payments.len(), 2);

    ledger.remove_member(2026, "Anna").unwrap();
    let record = ledger.load(2026).unwrap();
    assert_eq!(record.members, vec!["Bruno"]);
    assert!(!record.payments.contains_key("Anna"));

    assert_eq!(
        ledger.remove_member(2026, "Anna"),
        Err(LedgerError::NotFound("Anna".to_string()))
    );
}

#[test]
fn full_roster_rejects_additions() {
    let (ledger, _dir) = open_store();
    ledger
        .update_settings(2026, MoneyCents::new(100_00), 1)
        .unwrap();
    ledger.add_member(2026, "Anna").unwrap();

    assert!(matches!(
        ledger.add_member(2026, "Bruno"),
        Err(LedgerError::Capacity(_))
    ));
    assert!(matches!(
        ledger.add_member(2026, "Anna"),
        Err(LedgerError::Duplicate(_))
    ));
    assert_eq!(ledger.load(2026).unwrap().members, vec!["Anna"]);
}

#[test]
fn set_payment_is_idempotent_on_disk() {
    let (ledger, _dir) = open_store();
    ledger.add_member(2026, "Anna").unwrap();

    ledger
        .set_payment(2026, "Anna", Month::Mar, true, Actor::Admin)
        .unwrap();
    ledger
        .set_payment(2026, "Anna", Month::Mar, true, Actor::Admin)
        .unwrap();

    let record = ledger.load(2026).unwrap();
    assert!(record.is_paid("Anna", Month::Mar));
    assert_eq!(record.payment_history.len(), 1);
    assert_eq!(record.payment_history[0].actor, Actor::Admin);
}

#[test]
fn bulk_updates_apply_partially() {
    let (ledger, _dir) = open_store();
    ledger.add_member(2026, "Anna").unwrap();

    let assignments = vec![
        BulkAssignment {
            member: "Anna".to_string(),
            month: Month::Jan,
            paid: true,
        },
        BulkAssignment {
            member: "Ghost".to_string(),
            month: Month::Jan,
            paid: true,
        },
        BulkAssignment {
            member: "Anna".to_string(),
            month: Month::Feb,
            paid: true,
        },
    ];
    let (record, failures) = ledger
        .bulk_set_payments(2026, &assignments, Actor::Admin)
        .unwrap();

    assert!(record.is_paid("Anna", Month::Jan));
    assert!(record.is_paid("Anna", Month::Feb));
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].member, "Ghost");

    // the applied part went to disk despite the failure
    let reloaded = ledger.load(2026).unwrap();
    assert!(reloaded.is_paid("Anna", Month::Feb));
    assert_eq!(reloaded.payment_history.len(), 2);
}

#[test]
fn copy_members_requires_a_source_year() {
    let (ledger, _dir) = open_store();
    assert_eq!(
        ledger.copy_members(2025, 2026),
        Err(LedgerError::NotFound("year 2025".to_string()))
    );
}

#[test]
fn copy_members_resets_rows_and_keeps_target_history() {
    let (ledger, _dir) = open_store();
    ledger.add_member(2025, "Anna").unwrap();
    ledger.add_member(2025, "Bruno").unwrap();
    ledger
        .set_payment(2025, "Anna", Month::Dec, true, Actor::Admin)
        .unwrap();

    ledger.add_member(2026, "Carla").unwrap();
    ledger
        .set_payment(2026, "Carla", Month::Jan, true, Actor::Admin)
        .unwrap();

    let record = ledger.copy_members(2025, 2026).unwrap();
    assert_eq!(record.members, vec!["Anna", "Bruno"]);
    assert!(!record.is_paid("Anna", Month::Dec));
    // the target's audit trail survives the reseeding
    assert_eq!(record.payment_history.len(), 1);
    assert_eq!(record.payment_history[0].member, "Carla");
}

#[test]
fn create_year_rejects_existing() {
    let (ledger, _dir) = open_store();
    ledger.create_year(2026).unwrap();
    assert_eq!(
        ledger.create_year(2026),
        Err(LedgerError::Duplicate("year 2026".to_string()))
    );
}

#[test]
fn available_years_lists_backing_files() {
    let (ledger, dir) = open_store();
    assert!(ledger.available_years().unwrap().is_empty());

    ledger.load(2026).unwrap();
    ledger.load(2024).unwrap();
    ledger.load(2025).unwrap();
    fs::write(dir.join("notes.txt"), b"ignore me").unwrap();
    fs::write(dir.join("subscription_data_later.json"), b"{}").unwrap();

    assert_eq!(ledger.available_years().unwrap(), vec![2024, 2025, 2026]);
}

#[test]
fn update_settings_guards_the_invariants() {
    let (ledger, _dir) = open_store();
    ledger.add_member(2026, "Anna").unwrap();
    ledger.add_member(2026, "Bruno").unwrap();

    assert!(matches!(
        ledger.update_settings(2026, MoneyCents::new(100_00), 0),
        Err(LedgerError::Configuration(_))
    ));
    assert!(matches!(
        ledger.update_settings(2026, MoneyCents::new(-1), 10),
        Err(LedgerError::InvalidAmount(_))
    ));
    assert!(matches!(
        ledger.update_settings(2026, MoneyCents::new(100_00), 1),
        Err(LedgerError::Capacity(_))
    ));

    let record = ledger
        .update_settings(2026, MoneyCents::new(120_00), 6)
        .unwrap();
    assert_eq!(record.settings.total_price, MoneyCents::new(120_00));
    assert_eq!(record.settings.max_slots, 6);
}

#[test]
fn history_is_filtered_and_limited() {
    let (ledger, _dir) = open_store();
    ledger.add_member(2026, "Anna").unwrap();
    ledger.add_member(2026, "Bruno").unwrap();
    for month in [Month::Jan, Month::Feb, Month::Mar] {
        ledger
            .set_payment(2026, "Anna", month, true, Actor::Admin)
            .unwrap();
    }
    ledger
        .set_payment(2026, "Bruno", Month::Jan, true, Actor::Admin)
        .unwrap();

    let all = ledger.payment_history(2026, None, None).unwrap();
    assert_eq!(all.len(), 4);
    // newest first
    assert!(all.windows(2).all(|pair| pair[0].timestamp >= pair[1].timestamp));

    let anna = ledger.payment_history(2026, Some("Anna"), None).unwrap();
    assert_eq!(anna.len(), 3);
    assert!(anna.iter().all(|entry| entry.member == "Anna"));

    let limited = ledger.payment_history(2026, None, Some(2)).unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn backup_and_restore_round_trip() {
    let (ledger, _dir) = open_store();
    ledger.add_member(2025, "Anna").unwrap();
    ledger.add_member(2026, "Bruno").unwrap();
    ledger
        .set_payment(2026, "Bruno", Month::Jun, true, Actor::Admin)
        .unwrap();

    let backup = ledger.full_backup().unwrap();
    assert_eq!(backup.years.len(), 2);

    let (other, _other_dir) = open_store();
    let outcome = other.restore_backup(&backup).unwrap();
    assert_eq!(outcome.restored, vec![2025, 2026]);
    assert!(outcome.skipped.is_empty());

    let record = other.load(2026).unwrap();
    assert_eq!(record.members, vec!["Bruno"]);
    assert!(record.is_paid("Bruno", Month::Jun));
    assert_eq!(record.payment_history.len(), 1);
}

#[test]
fn restore_skips_invalid_entries() {
    let (ledger, _dir) = open_store();
    ledger.add_member(2025, "Anna").unwrap();
    let valid = ledger.load(2025).unwrap();

    let mut broken = valid.clone();
    broken
        .payments
        .insert("Ghost".to_string(), BTreeMap::new());

    let mut backup = Backup {
        backup_timestamp: valid.updated_at,
        years: BTreeMap::new(),
    };
    backup.years.insert("2031".to_string(), valid);
    backup.years.insert("later".to_string(), broken.clone());
    backup.years.insert("2032".to_string(), broken);

    let (other, _other_dir) = open_store();
    let outcome = other.restore_backup(&backup).unwrap();
    assert_eq!(outcome.restored, vec![2031]);
    assert_eq!(outcome.skipped.len(), 2);

    // the restored document is normalized to its key year
    assert_eq!(other.load(2031).unwrap().year, 2031);
    assert_eq!(other.available_years().unwrap(), vec![2031]);
}

#[test]
fn restore_reports_an_unwritable_year_and_continues() {
    let (ledger, _dir) = open_store();
    ledger.add_member(2030, "Anna").unwrap();
    let valid = ledger.load(2030).unwrap();

    let mut backup = Backup {
        backup_timestamp: valid.updated_at,
        years: BTreeMap::new(),
    };
    backup.years.insert("2030".to_string(), valid.clone());
    backup.years.insert("2031".to_string(), valid.clone());
    backup.years.insert("2032".to_string(), valid);

    let (other, other_dir) = open_store();
    // a directory squatting on 2031's backing path makes its rename fail
    fs::create_dir(year_file(&other_dir, 2031)).unwrap();

    let outcome = other.restore_backup(&backup).unwrap();
    assert_eq!(outcome.restored, vec![2030, 2032]);
    assert_eq!(outcome.skipped.len(), 1);
    assert!(outcome.skipped[0].starts_with("2031"));

    assert_eq!(other.load(2030).unwrap().members, vec!["Anna"]);
    assert_eq!(other.load(2032).unwrap().members, vec!["Anna"]);
}
