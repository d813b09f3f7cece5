//! Read-side computations over a [`YearRecord`]. Nothing here mutates
//! stored state.
//!
//! All amounts are exact multiples of the per-slot share
//! (`total_price / max_slots`, rounded half-up to the cent once), so
//! `collected <= expected` holds without tolerance comparisons.
//!
//!  [`YearRecord`]: crate::YearRecord
use crate::{LedgerError, MoneyCents, Month, ResultLedger, YearRecord};

const MONTHS_PER_YEAR: u32 = 12;

/// Balance view for a single member.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberSummary {
    pub member: String,
    pub paid_months: u32,
    pub owed_months: u32,
    pub amount_paid: MoneyCents,
    pub amount_due: MoneyCents,
    /// Share of the year already covered, as a percentage. Display only.
    pub payment_rate: f64,
}

/// Aggregates across the whole year.
#[derive(Clone, Debug, PartialEq)]
pub struct YearTotals {
    pub members: u32,
    pub collected: MoneyCents,
    pub expected: MoneyCents,
    pub outstanding: MoneyCents,
    pub slots_used: u32,
    pub slots_free: u32,
}

/// Paid/unpaid member counts for one month.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyCount {
    pub month: Month,
    pub paid_count: u32,
    pub unpaid_count: u32,
}

/// Balance summary for `member`.
pub fn member_summary(record: &YearRecord, member: &str) -> ResultLedger<MemberSummary> {
    if !record.members.iter().any(|name| name == member) {
        return Err(LedgerError::NotFound(member.to_string()));
    }
    let share = record.settings.price_per_slot()?;
    let paid_months = record.paid_months(member);
    let owed_months = MONTHS_PER_YEAR - paid_months;
    Ok(MemberSummary {
        member: member.to_string(),
        paid_months,
        owed_months,
        amount_paid: share * i64::from(paid_months),
        amount_due: share * i64::from(owed_months),
        payment_rate: f64::from(paid_months) / f64::from(MONTHS_PER_YEAR) * 100.0,
    })
}

/// Summaries for every member, in display order.
pub fn member_summaries(record: &YearRecord) -> ResultLedger<Vec<MemberSummary>> {
    record
        .members
        .iter()
        .map(|name| member_summary(record, name))
        .collect()
}

/// Totals for the whole year.
pub fn year_totals(record: &YearRecord) -> ResultLedger<YearTotals> {
    let share = record.settings.price_per_slot()?;
    let members = record.members.len() as u32;
    let paid_flags: u32 = record
        .members
        .iter()
        .map(|name| record.paid_months(name))
        .sum();
    let collected = share * i64::from(paid_flags);
    let expected = share * i64::from(MONTHS_PER_YEAR * members);
    Ok(YearTotals {
        members,
        collected,
        expected,
        outstanding: expected - collected,
        slots_used: members,
        slots_free: record.settings.max_slots.saturating_sub(members),
    })
}

/// Paid/unpaid counts per month, in calendar order.
#[must_use]
pub fn monthly_breakdown(record: &YearRecord) -> Vec<MonthlyCount> {
    let members = record.members.len() as u32;
    Month::ALL
        .iter()
        .map(|&month| {
            let paid_count = record
                .members
                .iter()
                .filter(|name| record.is_paid(name, month))
                .count() as u32;
            MonthlyCount {
                month,
                paid_count,
                unpaid_count: members - paid_count,
            }
        })
        .collect()
}

/// Members that have not paid `month`, in display order.
#[must_use]
pub fn unpaid_members(record: &YearRecord, month: Month) -> Vec<String> {
    record
        .members
        .iter()
        .filter(|name| !record.is_paid(name, month))
        .cloned()
        .collect()
}
