//! Settings API endpoint.

use api_types::{settings::SettingsUpdate, year::YearView};
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{ServerError, server::ServerState, years::year_view};
use ledger::MoneyCents;

/// Replaces the year's pricing settings. Shrinking the slot count below
/// the enrolled roster is rejected.
pub async fn update(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
    Json(payload): Json<SettingsUpdate>,
) -> Result<Json<YearView>, ServerError> {
    let ledger = state.ledger.write().await;
    let record = ledger.update_settings(
        year,
        MoneyCents::new(payload.total_price_minor),
        payload.max_slots,
    )?;

    Ok(Json(year_view(&record)))
}
