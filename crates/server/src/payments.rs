//! Payment grid API endpoints. Every change that flips a flag lands in
//! the audit trail with the admin actor tag.

use api_types::{
    payment::{BulkFailureView, BulkOutcome, BulkPayments, PaymentSet},
    year::YearView,
};
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{ServerError, months, server::ServerState, years::year_view};
use ledger::{Actor, BulkAssignment};

/// Sets one payment flag.
pub async fn set(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
    Json(payload): Json<PaymentSet>,
) -> Result<Json<YearView>, ServerError> {
    let ledger = state.ledger.write().await;
    let record = ledger.set_payment(
        year,
        &payload.member,
        months::to_ledger(payload.month),
        payload.paid,
        Actor::Admin,
    )?;

    Ok(Json(year_view(&record)))
}

/// Applies several assignments in one persisted cycle. Failed
/// assignments are reported, not rolled back.
pub async fn bulk(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
    Json(payload): Json<BulkPayments>,
) -> Result<Json<BulkOutcome>, ServerError> {
    if payload.assignments.is_empty() {
        return Err(ServerError::Generic("no assignments given".to_string()));
    }

    let assignments: Vec<BulkAssignment> = payload
        .assignments
        .iter()
        .map(|assignment| BulkAssignment {
            member: assignment.member.clone(),
            month: months::to_ledger(assignment.month),
            paid: assignment.paid,
        })
        .collect();

    let ledger = state.ledger.write().await;
    let (_, failures) = ledger.bulk_set_payments(year, &assignments, Actor::Admin)?;

    let applied = (assignments.len() - failures.len()) as u32;
    let failures = failures
        .into_iter()
        .map(|failure| BulkFailureView {
            member: failure.member,
            month: months::to_api(failure.month),
            error: failure.error,
        })
        .collect();

    Ok(Json(BulkOutcome { applied, failures }))
}
