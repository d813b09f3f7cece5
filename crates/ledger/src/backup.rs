//! Whole-store snapshots: every year document in one file.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::YearRecord;

/// A full snapshot of the data directory.
///
/// Year keys are strings so the document round-trips as plain JSON
/// (`"years": {"2026": {...}}`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub backup_timestamp: DateTime<Utc>,
    pub years: BTreeMap<String, YearRecord>,
}

/// What a restore actually did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestoreOutcome {
    /// Years written back, ascending.
    pub restored: Vec<i32>,
    /// Entries skipped, each with the reason.
    pub skipped: Vec<String>,
}
