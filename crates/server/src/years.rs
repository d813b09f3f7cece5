//! Year management API endpoints.

use api_types::{
    settings::SettingsView,
    year::{CopyMembers, MemberPayments, YearNew, YearView, YearsResponse},
};
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{ServerError, months, server::ServerState};
use ledger::{Month, YearRecord};

pub(crate) fn year_view(record: &YearRecord) -> YearView {
    let members = record
        .members
        .iter()
        .map(|name| MemberPayments {
            name: name.clone(),
            months: Month::ALL
                .iter()
                .map(|&month| (months::to_api(month), record.is_paid(name, month)))
                .collect(),
        })
        .collect();

    YearView {
        year: record.year,
        members,
        settings: SettingsView {
            total_price_minor: record.settings.total_price.cents(),
            max_slots: record.settings.max_slots,
        },
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// Years that have a backing document, ascending.
pub async fn list(State(state): State<ServerState>) -> Result<Json<YearsResponse>, ServerError> {
    let ledger = state.ledger.read().await;
    let years = ledger.available_years()?;

    Ok(Json(YearsResponse { years }))
}

/// Full view of one year. Loading a year that has no document yet
/// creates it with default settings.
pub async fn view(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
) -> Result<Json<YearView>, ServerError> {
    let ledger = state.ledger.read().await;
    let record = ledger.load(year)?;

    Ok(Json(year_view(&record)))
}

/// Creates a year explicitly; an existing document is a conflict.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<YearNew>,
) -> Result<Json<YearView>, ServerError> {
    let ledger = state.ledger.write().await;
    let record = ledger.create_year(payload.year)?;

    Ok(Json(year_view(&record)))
}

/// Seeds the roster from another year. All payment flags start unpaid.
pub async fn copy_members(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
    Json(payload): Json<CopyMembers>,
) -> Result<Json<YearView>, ServerError> {
    let ledger = state.ledger.write().await;
    let record = ledger.copy_members(payload.from_year, year)?;

    Ok(Json(year_view(&record)))
}
