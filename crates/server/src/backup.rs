//! Backup and restore API endpoints.

use api_types::backup::RestoreResult;
use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::{ServerError, server::ServerState};
use ledger::Backup;

/// Downloads a snapshot of every available year as one document.
pub async fn download(State(state): State<ServerState>) -> Result<Response, ServerError> {
    let ledger = state.ledger.read().await;
    let backup = ledger.full_backup()?;

    let filename = format!(
        "subscription_backup_{}.json",
        backup.backup_timestamp.format("%Y%m%d_%H%M%S")
    );

    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )],
        Json(backup),
    )
        .into_response())
}

/// Restores year documents from an uploaded backup. Invalid entries are
/// skipped and reported; a backup with nothing restorable is rejected.
pub async fn restore(
    State(state): State<ServerState>,
    Json(payload): Json<Backup>,
) -> Result<Json<RestoreResult>, ServerError> {
    let ledger = state.ledger.write().await;
    let outcome = ledger.restore_backup(&payload)?;

    if outcome.restored.is_empty() {
        return Err(ServerError::Generic(
            "no valid year data in backup".to_string(),
        ));
    }

    Ok(Json(RestoreResult {
        restored: outcome.restored,
        skipped: outcome.skipped,
    }))
}
