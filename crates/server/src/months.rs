//! Conversions between the wire month labels and the ledger month type.

pub(crate) fn to_ledger(month: api_types::Month) -> ledger::Month {
    match month {
        api_types::Month::Jan => ledger::Month::Jan,
        api_types::Month::Feb => ledger::Month::Feb,
        api_types::Month::Mar => ledger::Month::Mar,
        api_types::Month::Apr => ledger::Month::Apr,
        api_types::Month::May => ledger::Month::May,
        api_types::Month::Jun => ledger::Month::Jun,
        api_types::Month::Jul => ledger::Month::Jul,
        api_types::Month::Aug => ledger::Month::Aug,
        api_types::Month::Sep => ledger::Month::Sep,
        api_types::Month::Oct => ledger::Month::Oct,
        api_types::Month::Nov => ledger::Month::Nov,
        api_types::Month::Dec => ledger::Month::Dec,
    }
}

pub(crate) fn to_api(month: ledger::Month) -> api_types::Month {
    match month {
        ledger::Month::Jan => api_types::Month::Jan,
        ledger::Month::Feb => api_types::Month::Feb,
        ledger::Month::Mar => api_types::Month::Mar,
        ledger::Month::Apr => api_types::Month::Apr,
        ledger::Month::May => api_types::Month::May,
        ledger::Month::Jun => api_types::Month::Jun,
        ledger::Month::Jul => api_types::Month::Jul,
        ledger::Month::Aug => api_types::Month::Aug,
        ledger::Month::Sep => api_types::Month::Sep,
        ledger::Month::Oct => api_types::Month::Oct,
        ledger::Month::Nov => api_types::Month::Nov,
        ledger::Month::Dec => api_types::Month::Dec,
    }
}
