//! CSV report builders shared by the HTTP API and the admin CLI.
use csv::{Writer, WriterBuilder};
use serde::Serialize;

use crate::{HistoryEntry, LedgerError, Month, ResultLedger, YearRecord, stats};

/// Year report: one row per member with the twelve month flags and the
/// derived balance columns.
pub fn year_report_csv(record: &YearRecord) -> ResultLedger<Vec<u8>> {
    let mut writer = Writer::from_writer(vec![]);

    let mut header = vec!["Member".to_string()];
    header.extend(Month::ALL.iter().map(|month| month.as_str().to_string()));
    header.extend(
        ["Months Paid", "Amount Paid", "Amount Owed"]
            .iter()
            .map(|column| (*column).to_string()),
    );
    writer.write_record(&header)?;

    for summary in stats::member_summaries(record)? {
        let mut row = vec![summary.member.clone()];
        row.extend(Month::ALL.iter().map(|&month| {
            if record.is_paid(&summary.member, month) {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }));
        row.push(summary.paid_months.to_string());
        row.push(summary.amount_paid.to_string());
        row.push(summary.amount_due.to_string());
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|err| LedgerError::Storage(err.to_string()))
}

#[derive(Serialize)]
struct HistoryRow<'a> {
    timestamp: String,
    member: &'a str,
    month: &'static str,
    year: i32,
    action: &'static str,
    old_status: bool,
    new_status: bool,
    actor: &'static str,
}

/// History report, one row per audit entry in the order given. The header
/// row is written even when the history is empty.
pub fn history_csv(entries: &[HistoryEntry]) -> ResultLedger<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(vec![]);
    writer.write_record([
        "timestamp",
        "member",
        "month",
        "year",
        "action",
        "old_status",
        "new_status",
        "actor",
    ])?;
    for entry in entries {
        writer.serialize(HistoryRow {
            timestamp: entry.timestamp.to_rfc3339(),
            member: &entry.member,
            month: entry.month.as_str(),
            year: entry.year,
            action: entry.action.as_str(),
            old_status: entry.old_status,
            new_status: entry.new_status,
            actor: entry.actor.as_str(),
        })?;
    }
    writer
        .into_inner()
        .map_err(|err| LedgerError::Storage(err.to_string()))
}
