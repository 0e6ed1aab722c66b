//! # Report Commands

use chrono::Utc;
use tracing::debug;

use crate::state::StoreState;
use tally_core::{ReportPeriod, SalesReport};

/// Sales report for `period`, as of now.
pub fn sales_report(store: &StoreState, period: ReportPeriod) -> SalesReport {
    debug!(period = ?period, "sales_report command");
    store.with_store(|s| {
        SalesReport::build(s.ledger.transactions(), s.ledger.refunds(), period, Utc::now())
    })
}
