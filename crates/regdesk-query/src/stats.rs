//! Aggregates for the overview page and `GET /api/v1/stats`.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use regdesk_state::{Registration, RegistrationStatus};
use serde::Serialize;

/// Per-status counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub upcoming: usize,
    pub pending: usize,
    pub completed: usize,
}

impl StatusSummary {
    pub fn from_records(records: &[Registration]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            match r.status {
                RegistrationStatus::Upcoming => acc.upcoming += 1,
                RegistrationStatus::Pending => acc.pending += 1,
                RegistrationStatus::Completed => acc.completed += 1,
            }
            acc
        })
    }

    pub fn count(&self, status: RegistrationStatus) -> usize {
        match status {
            RegistrationStatus::Upcoming => self.upcoming,
            RegistrationStatus::Pending => self.pending,
            RegistrationStatus::Completed => self.completed,
        }
    }
}

/// Registrations whose call falls in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub year: i32,
    pub month: u32,
    /// e.g. `Jan 2025`
    pub label: String,
    pub count: usize,
}

/// Counts per month of `callDateTime`, oldest first. Records without a
/// call date are not counted; months with no calls are omitted.
pub fn monthly_counts(records: &[Registration]) -> Vec<MonthlyCount> {
    let mut buckets: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for dt in records.iter().filter_map(|r| r.call_date_time) {
        *buckets.entry((dt.year(), dt.month())).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|((year, month), count)| MonthlyCount {
            year,
            month,
            label: NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_else(|| format!("{year}-{month:02}")),
            count,
        })
        .collect()
}
