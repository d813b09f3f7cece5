//! Roster management API endpoints.

use api_types::{member::MemberNew, year::YearView};
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{ServerError, server::ServerState, years::year_view};

/// Adds a member to the year's roster with a blank payment row.
pub async fn add(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
    Json(payload): Json<MemberNew>,
) -> Result<Json<YearView>, ServerError> {
    let ledger = state.ledger.write().await;
    let record = ledger.add_member(year, &payload.name)?;

    Ok(Json(year_view(&record)))
}

/// Removes a member and their payment row. Audit entries stay.
pub async fn remove(
    State(state): State<ServerState>,
    Path((year, name)): Path<(i32, String)>,
) -> Result<Json<YearView>, ServerError> {
    let ledger = state.ledger.write().await;
    let record = ledger.remove_member(year, &name)?;

    Ok(Json(year_view(&record)))
}
