//! Statistics API endpoints. All read-only.

use api_types::stats::{
    MemberSummaryView, MonthlyBreakdownResponse, MonthlyCountView, SummaryResponse, TotalsView,
    UnpaidQuery, UnpaidResponse,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;

use crate::{ServerError, months, server::ServerState};
use ledger::{Month, stats};

/// Per-member balances plus the per-slot share they are computed from.
pub async fn summary(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let ledger = state.ledger.read().await;
    let record = ledger.load(year)?;
    let share = record.settings.price_per_slot()?;

    let members = stats::member_summaries(&record)?
        .into_iter()
        .map(|summary| MemberSummaryView {
            member: summary.member,
            paid_months: summary.paid_months,
            owed_months: summary.owed_months,
            amount_paid_minor: summary.amount_paid.cents(),
            amount_due_minor: summary.amount_due.cents(),
            payment_rate: summary.payment_rate,
        })
        .collect();

    Ok(Json(SummaryResponse {
        year,
        price_per_slot_minor: share.cents(),
        members,
    }))
}

/// Collected and expected totals plus slot utilization.
pub async fn totals(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
) -> Result<Json<TotalsView>, ServerError> {
    let ledger = state.ledger.read().await;
    let record = ledger.load(year)?;
    let totals = stats::year_totals(&record)?;

    Ok(Json(TotalsView {
        year,
        members: totals.members,
        collected_minor: totals.collected.cents(),
        expected_minor: totals.expected.cents(),
        outstanding_minor: totals.outstanding.cents(),
        slots_used: totals.slots_used,
        slots_free: totals.slots_free,
    }))
}

/// Paid and unpaid member counts per calendar month.
pub async fn monthly(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
) -> Result<Json<MonthlyBreakdownResponse>, ServerError> {
    let ledger = state.ledger.read().await;
    let record = ledger.load(year)?;

    let months = stats::monthly_breakdown(&record)
        .into_iter()
        .map(|count| MonthlyCountView {
            month: months::to_api(count.month),
            paid_count: count.paid_count,
            unpaid_count: count.unpaid_count,
        })
        .collect();

    Ok(Json(MonthlyBreakdownResponse { year, months }))
}

/// Members that have not paid the requested month. Without a query the
/// month defaults to the current one.
pub async fn unpaid(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
    Query(query): Query<UnpaidQuery>,
) -> Result<Json<UnpaidResponse>, ServerError> {
    let month = query
        .month
        .map_or_else(|| Month::containing(Utc::now()), months::to_ledger);

    let ledger = state.ledger.read().await;
    let record = ledger.load(year)?;
    let members = stats::unpaid_members(&record, month);

    Ok(Json(UnpaidResponse {
        year,
        month: months::to_api(month),
        members,
    }))
}
