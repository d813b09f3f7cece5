//! Calendar months as used by the payment grid and the audit trail.
use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// One of the twelve calendar months.
///
/// Serialized by its short label (`"Jan"` … `"Dec"`), which is also the key
/// format of the payment grid in the backing documents. The derived ordering
/// is calendar order, so month-keyed maps iterate January first.
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
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    /// 1-based month number (January is 1).
    #[must_use]
    pub const fn number(&self) -> u8 {
        *self as u8 + 1
    }

    /// The month containing `now`.
    #[must_use]
    pub fn containing(now: DateTime<Utc>) -> Month {
        Self::ALL[now.month0() as usize]
    }

    /// `count` consecutive months starting at `start`, wrapping past
    /// December back to January.
    #[must_use]
    pub fn sequence_from(start: Month, count: u32) -> Vec<Month> {
        let first = start as usize;
        (0..count as usize).map(|i| Self::ALL[(first + i) % 12]).collect()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Month {
    type Error = LedgerError;

    /// Parses a short label (`"Jan"`) or a 1-based number (`"1"`).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if let Ok(number) = trimmed.parse::<u8>() {
            return Self::ALL
                .get(usize::from(number).wrapping_sub(1))
                .copied()
                .ok_or_else(|| LedgerError::InvalidMonth(format!("month number out of range: {number}")));
        }
        Self::ALL
            .iter()
            .find(|month| month.as_str().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| LedgerError::InvalidMonth(format!("unknown month: {trimmed}")))
    }
}
