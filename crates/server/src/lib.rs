use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod backup;
mod exports;
mod history;
mod members;
mod months;
mod payments;
mod server;
mod settings;
mod statistics;
mod years;

pub mod types {
    pub mod year {
        pub use api_types::year::{CopyMembers, MemberPayments, YearNew, YearView, YearsResponse};
    }

    pub mod member {
        pub use api_types::member::MemberNew;
    }

    pub mod payment {
        pub use api_types::payment::{BulkFailureView, BulkOutcome, BulkPayments, PaymentSet};
    }

    pub mod settings {
        pub use api_types::settings::{SettingsUpdate, SettingsView};
    }

    pub mod stats {
        pub use api_types::stats::{
            MemberSummaryView, MonthlyBreakdownResponse, MonthlyCountView, SummaryResponse,
            TotalsView, UnpaidQuery, UnpaidResponse,
        };
    }

    pub mod history {
        pub use api_types::history::{HistoryEntryView, HistoryQuery, HistoryResponse};
    }

    pub mod backup {
        pub use api_types::backup::RestoreResult;
        pub use ledger::Backup;
    }
}

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::Duplicate(_) => StatusCode::CONFLICT,
        LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        LedgerError::Capacity(_)
        | LedgerError::Configuration(_)
        | LedgerError::InvalidAmount(_)
        | LedgerError::InvalidName(_)
        | LedgerError::InvalidMonth(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Storage(detail) => {
            tracing::error!("storage error: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => (status_for_ledger_error(&err), message_for_ledger_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::from(LedgerError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_maps_to_409() {
        let res = ServerError::from(LedgerError::Duplicate("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn capacity_maps_to_422() {
        let res = ServerError::from(LedgerError::Capacity("full".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn configuration_maps_to_422() {
        let res = ServerError::from(LedgerError::Configuration("slots".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn storage_maps_to_500_with_a_generic_message() {
        let res = ServerError::from(LedgerError::Storage("disk on fire".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
