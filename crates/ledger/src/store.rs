//! File-backed store: one JSON document per subscription year.
//!
//! Documents are written through a sibling temp file followed by a rename,
//! so a crash mid-write can lose the latest update but never leaves a torn
//! document behind. Each write gets its own temp file, so concurrent
//! writers race as last-writer-wins over complete documents; callers that
//! need stricter ordering must serialize access themselves.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::{
    Actor, Backup, HistoryEntry, LedgerError, MoneyCents, Month, RestoreOutcome, ResultLedger,
    Settings, YearRecord,
};

/// Backing file name prefix, followed by the year.
const FILE_PREFIX: &str = "subscription_data_";

/// Distinguishes temp files written concurrently by this process.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// One payment assignment inside a bulk update.
#[derive(Clone, Debug, PartialEq)]
pub struct BulkAssignment {
    pub member: String,
    pub month: Month,
    pub paid: bool,
}

/// A single failed assignment from a bulk update.
#[derive(Clone, Debug, PartialEq)]
pub struct BulkFailure {
    pub member: String,
    pub month: Month,
    pub error: String,
}

/// Explicit handle over the data directory, constructed once at process
/// start and handed to every request handler.
///
/// Every operation is one load-mutate-save cycle over a single year
/// document; nothing is cached between calls.
#[derive(Clone, Debug)]
pub struct Ledger {
    data_dir: PathBuf,
}

impl Ledger {
    /// Opens the store rooted at `data_dir`, creating the directory if
    /// missing.
    pub fn open(data_dir: impl Into<PathBuf>) -> ResultLedger<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn year_path(&self, year: i32) -> PathBuf {
        self.data_dir.join(format!("{FILE_PREFIX}{year}.json"))
    }

    /// Loads the record for `year`, creating and persisting the default one
    /// if no backing file exists. An unreadable or invalid document is a
    /// storage error, not silently replaced.
    pub fn load(&self, year: i32) -> ResultLedger<YearRecord> {
        let path = self.year_path(year);
        if !path.exists() {
            let mut record = YearRecord::new(year, Utc::now());
            self.save(&mut record)?;
            return Ok(record);
        }
        let raw = fs::read(&path)?;
        let record: YearRecord = serde_json::from_slice(&raw)?;
        if record.year != year {
            return Err(LedgerError::Storage(format!(
                "{} claims year {}, expected {year}",
                path.display(),
                record.year
            )));
        }
        record.validate()?;
        Ok(record)
    }

    /// Persists `record`, refreshing its `updated_at`. The temp file name is
    /// unique per write, so two writers flushing the same year never share
    /// one and each rename installs a complete document.
    pub fn save(&self, record: &mut YearRecord) -> ResultLedger<()> {
        record.touch(Utc::now());
        let path = self.year_path(record.year);
        let json = serde_json::to_vec_pretty(record)?;
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("json.{}.{seq}.tmp", std::process::id()));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Years that currently have a backing file, ascending.
    pub fn available_years(&self) -> ResultLedger<Vec<i32>> {
        let mut years = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(rest) = name.strip_prefix(FILE_PREFIX)
                && let Some(year) = rest.strip_suffix(".json")
                && let Ok(year) = year.parse::<i32>()
            {
                years.push(year);
            }
        }
        years.sort_unstable();
        Ok(years)
    }

    /// Creates the record for `year`; fails if it already exists.
    pub fn create_year(&self, year: i32) -> ResultLedger<YearRecord> {
        if self.year_path(year).exists() {
            return Err(LedgerError::Duplicate(format!("year {year}")));
        }
        self.load(year)
    }

    /// Copies the member roster of `from_year` onto `to_year`, resetting
    /// every payment row to all-unpaid. `to_year` keeps its history and
    /// settings and is created if absent.
    pub fn copy_members(&self, from_year: i32, to_year: i32) -> ResultLedger<YearRecord> {
        if !self.year_path(from_year).exists() {
            return Err(LedgerError::NotFound(format!("year {from_year}")));
        }
        let source = self.load(from_year)?;
        let mut target = self.load(to_year)?;
        target.replace_members(&source.members, Utc::now())?;
        self.save(&mut target)?;
        Ok(target)
    }

    /// Adds `name` to `year`'s roster.
    pub fn add_member(&self, year: i32, name: &str) -> ResultLedger<YearRecord> {
        let mut record = self.load(year)?;
        record.add_member(name, Utc::now())?;
        self.save(&mut record)?;
        Ok(record)
    }

    /// Removes `name` from `year`'s roster; its audit entries stay.
    pub fn remove_member(&self, year: i32, name: &str) -> ResultLedger<YearRecord> {
        let mut record = self.load(year)?;
        record.remove_member(name, Utc::now())?;
        self.save(&mut record)?;
        Ok(record)
    }

    /// Sets one payment flag, recording the transition when the value
    /// changes.
    pub fn set_payment(
        &self,
        year: i32,
        member: &str,
        month: Month,
        paid: bool,
        actor: Actor,
    ) -> ResultLedger<YearRecord> {
        let mut record = self.load(year)?;
        record.set_payment(member, month, paid, actor, Utc::now())?;
        self.save(&mut record)?;
        Ok(record)
    }

    /// Applies every assignment in order within one load-mutate-save cycle.
    /// A failed assignment does not roll back earlier ones; failures are
    /// reported alongside the updated record.
    pub fn bulk_set_payments(
        &self,
        year: i32,
        assignments: &[BulkAssignment],
        actor: Actor,
    ) -> ResultLedger<(YearRecord, Vec<BulkFailure>)> {
        let mut record = self.load(year)?;
        let mut failures = Vec::new();
        for assignment in assignments {
            if let Err(err) = record.set_payment(
                &assignment.member,
                assignment.month,
                assignment.paid,
                actor,
                Utc::now(),
            ) {
                failures.push(BulkFailure {
                    member: assignment.member.clone(),
                    month: assignment.month,
                    error: err.to_string(),
                });
            }
        }
        self.save(&mut record)?;
        Ok((record, failures))
    }

    /// Replaces `year`'s settings. Shrinking below the current roster is
    /// rejected so the structural invariants keep holding.
    pub fn update_settings(
        &self,
        year: i32,
        total_price: MoneyCents,
        max_slots: u32,
    ) -> ResultLedger<YearRecord> {
        if max_slots == 0 {
            return Err(LedgerError::Configuration(
                "max_slots must be at least 1".to_string(),
            ));
        }
        if total_price.is_negative() {
            return Err(LedgerError::InvalidAmount(
                "total price cannot be negative".to_string(),
            ));
        }
        let mut record = self.load(year)?;
        if record.members.len() as u64 > u64::from(max_slots) {
            return Err(LedgerError::Capacity(format!(
                "{} members already enrolled, cannot shrink to {max_slots} slots",
                record.members.len()
            )));
        }
        record.settings = Settings {
            total_price,
            max_slots,
        };
        self.save(&mut record)?;
        Ok(record)
    }

    /// Audit entries for `year`, newest first, optionally filtered by
    /// member and truncated to `limit`.
    pub fn payment_history(
        &self,
        year: i32,
        member: Option<&str>,
        limit: Option<usize>,
    ) -> ResultLedger<Vec<HistoryEntry>> {
        let record = self.load(year)?;
        let mut entries: Vec<HistoryEntry> = record
            .payment_history
            .into_iter()
            .filter(|entry| member.is_none_or(|name| entry.member == name))
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    /// Snapshot of every available year in one document.
    pub fn full_backup(&self) -> ResultLedger<Backup> {
        let mut years = BTreeMap::new();
        for year in self.available_years()? {
            years.insert(year.to_string(), self.load(year)?);
        }
        Ok(Backup {
            backup_timestamp: Utc::now(),
            years,
        })
    }

    /// Restores year documents from `backup`, overwriting backing files.
    /// Entries with unparseable year keys, invalid documents, or failing
    /// writes are skipped and reported; the rest are restored and the
    /// stored `year` field is normalized to the key.
    pub fn restore_backup(&self, backup: &Backup) -> ResultLedger<RestoreOutcome> {
        let mut outcome = RestoreOutcome::default();
        for (key, record) in &backup.years {
            let Ok(year) = key.parse::<i32>() else {
                outcome.skipped.push(format!("{key}: not a year"));
                continue;
            };
            let mut record = record.clone();
            record.year = year;
            if let Err(err) = record.validate() {
                outcome.skipped.push(format!("{key}: {err}"));
                continue;
            }
            if let Err(err) = self.save(&mut record) {
                outcome.skipped.push(format!("{key}: {err}"));
                continue;
            }
            outcome.restored.push(year);
        }
        outcome.restored.sort_unstable();
        Ok(outcome)
    }
}
