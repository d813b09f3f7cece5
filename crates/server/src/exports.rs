//! CSV export API endpoints. Both serve the file as an attachment.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{ServerError, server::ServerState};
use ledger::report;

fn csv_attachment(filename: String, body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// Payment grid report: one row per member, months as Yes/No flags,
/// amounts in major units.
pub async fn year_report(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
) -> Result<Response, ServerError> {
    let ledger = state.ledger.read().await;
    let record = ledger.load(year)?;
    let csv = report::year_report_csv(&record)?;

    Ok(csv_attachment(format!("subscription_report_{year}.csv"), csv))
}

/// Full audit trail for the year, newest first.
pub async fn history_report(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
) -> Result<Response, ServerError> {
    let ledger = state.ledger.read().await;
    let entries = ledger.payment_history(year, None, None)?;
    let csv = report::history_csv(&entries)?;

    Ok(csv_attachment(format!("payment_history_{year}.csv"), csv))
}
