//! Audit trail API endpoint.

use api_types::history::{HistoryEntryView, HistoryQuery, HistoryResponse};
use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{ServerError, months, server::ServerState};

const DEFAULT_LIMIT: usize = 50;

/// Payment transitions for the year, newest first. Optionally filtered
/// by member; capped at the 50 newest unless a limit is given.
pub async fn list(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ServerError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let ledger = state.ledger.read().await;
    let entries = ledger.payment_history(year, query.member.as_deref(), Some(limit))?;

    let entries = entries
        .into_iter()
        .map(|entry| HistoryEntryView {
            timestamp: entry.timestamp,
            member: entry.member,
            month: months::to_api(entry.month),
            year: entry.year,
            old_status: entry.old_status,
            new_status: entry.new_status,
            action: entry.action.as_str().to_string(),
            actor: entry.actor.as_str().to_string(),
        })
        .collect();

    Ok(Json(HistoryResponse { year, entries }))
}
