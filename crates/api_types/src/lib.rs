use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Calendar month, serialized by its short label (`"Jan"` … `"Dec"`).
///
/// Mirrors the labels used by the backing documents so payment grids
/// round-trip unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jan => "Jan",
            Self::Feb => "Feb",
            Self::Mar => "Mar",
            Self::Apr => "Apr",
            Self::May => "May",
            Self::Jun => "Jun",
            Self::Jul => "Jul",
            Self::Aug => "Aug",
            Self::Sep => "Sep",
            Self::Oct => "Oct",
            Self::Nov => "Nov",
            Self::Dec => "Dec",
        }
    }
}

pub mod year {
    use std::collections::BTreeMap;

    use super::*;

    /// Request body for creating a year.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct YearNew {
        pub year: i32,
    }

    /// Request body for seeding a year's roster from another year.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CopyMembers {
        pub from_year: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct YearsResponse {
        pub years: Vec<i32>,
    }

    /// Full view of one year: roster, payment grid, settings.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct YearView {
        pub year: i32,
        pub members: Vec<MemberPayments>,
        pub settings: super::settings::SettingsView,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// One member's row, all twelve months explicit.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberPayments {
        pub name: String,
        pub months: BTreeMap<Month, bool>,
    }
}

pub mod member {
    use super::*;

    /// Request body for adding a member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberNew {
        pub name: String,
    }
}

pub mod payment {
    use super::*;

    /// One payment flag assignment.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct PaymentSet {
        pub member: String,
        pub month: Month,
        pub paid: bool,
    }

    /// Request body for applying several assignments in one call.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkPayments {
        pub assignments: Vec<PaymentSet>,
    }

    /// Outcome of a bulk update. Failed assignments are reported, not
    /// rolled back.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkOutcome {
        pub applied: u32,
        pub failures: Vec<BulkFailureView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkFailureView {
        pub member: String,
        pub month: Month,
        pub error: String,
    }
}

pub mod settings {
    use super::*;

    /// Pricing and capacity settings; money in minor units.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettingsView {
        pub total_price_minor: i64,
        pub max_slots: u32,
    }

    /// Request body for replacing a year's settings.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettingsUpdate {
        pub total_price_minor: i64,
        pub max_slots: u32,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberSummaryView {
        pub member: String,
        pub paid_months: u32,
        pub owed_months: u32,
        pub amount_paid_minor: i64,
        pub amount_due_minor: i64,
        /// Percentage of the year already covered.
        pub payment_rate: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub year: i32,
        pub price_per_slot_minor: i64,
        pub members: Vec<MemberSummaryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TotalsView {
        pub year: i32,
        pub members: u32,
        pub collected_minor: i64,
        pub expected_minor: i64,
        pub outstanding_minor: i64,
        pub slots_used: u32,
        pub slots_free: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyCountView {
        pub month: Month,
        pub paid_count: u32,
        pub unpaid_count: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyBreakdownResponse {
        pub year: i32,
        pub months: Vec<MonthlyCountView>,
    }

    /// Query string for the unpaid view. The month defaults to the current
    /// one.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UnpaidQuery {
        pub month: Option<Month>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UnpaidResponse {
        pub year: i32,
        pub month: Month,
        pub members: Vec<String>,
    }
}

pub mod history {
    use super::*;

    /// Query string for listing audit entries.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct HistoryQuery {
        pub member: Option<String>,
        /// Defaults to the 50 newest entries.
        pub limit: Option<usize>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryResponse {
        pub year: i32,
        pub entries: Vec<HistoryEntryView>,
    }

    /// One audit entry. `action` and `actor` carry the canonical snake_case
    /// tags from the backing documents.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryEntryView {
        pub timestamp: DateTime<Utc>,
        pub member: String,
        pub month: Month,
        pub year: i32,
        pub old_status: bool,
        pub new_status: bool,
        pub action: String,
        pub actor: String,
    }
}

pub mod backup {
    use super::*;

    /// Outcome of a restore: what was written back and what was skipped.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RestoreResult {
        pub restored: Vec<i32>,
        pub skipped: Vec<String>,
    }
}
