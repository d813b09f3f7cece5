pub use backup::{Backup, RestoreOutcome};
pub use error::LedgerError;
pub use history::{Actor, HistoryAction, HistoryEntry};
pub use money::MoneyCents;
pub use month::Month;
pub use record::{Settings, YearRecord};
pub use store::{BulkAssignment, BulkFailure, Ledger};

mod backup;
mod error;
mod history;
mod money;
mod month;
mod record;
pub mod report;
pub mod stats;
mod store;

type ResultLedger<T> = Result<T, LedgerError>;
