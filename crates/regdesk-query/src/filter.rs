//! Search, status and date filters over registrations.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use regdesk_state::{Registration, RegistrationStatus};
use serde::{Deserialize, Serialize};

use crate::collate::contains_ignore_case;
use crate::error::QueryError;
use crate::page::{Page, paginate};
use crate::sort::{SortKey, sort_records};

// ── Status filter ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Upcoming,
    Pending,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Upcoming,
        StatusFilter::Pending,
        StatusFilter::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Upcoming => "upcoming",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn matches(self, status: RegistrationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Upcoming => status == RegistrationStatus::Upcoming,
            StatusFilter::Pending => status == RegistrationStatus::Pending,
            StatusFilter::Completed => status == RegistrationStatus::Completed,
        }
    }
}

impl From<RegistrationStatus> for StatusFilter {
    fn from(status: RegistrationStatus) -> Self {
        match status {
            RegistrationStatus::Upcoming => StatusFilter::Upcoming,
            RegistrationStatus::Pending => StatusFilter::Pending,
            RegistrationStatus::Completed => StatusFilter::Completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "upcoming" => Ok(StatusFilter::Upcoming),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            _ => Err(QueryError::InvalidStatus(s.trim().to_string())),
        }
    }
}

// ── Date presets ───────────────────────────────────────────────────

/// Shortcut ranges offered by the dashboard filter bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePreset {
    #[default]
    All,
    Today,
    Last7Days,
    Last30Days,
}

impl DatePreset {
    pub const ALL: [DatePreset; 4] = [
        DatePreset::All,
        DatePreset::Today,
        DatePreset::Last7Days,
        DatePreset::Last30Days,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatePreset::All => "all",
            DatePreset::Today => "today",
            DatePreset::Last7Days => "last7days",
            DatePreset::Last30Days => "last30days",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DatePreset::All => "All time",
            DatePreset::Today => "Today",
            DatePreset::Last7Days => "Last 7 days",
            DatePreset::Last30Days => "Last 30 days",
        }
    }

    /// Inclusive `(start, end)` ending on `today`; `None` for `All`.
    pub fn range(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let back = match self {
            DatePreset::All => return None,
            DatePreset::Today => 0,
            DatePreset::Last7Days => 6,
            DatePreset::Last30Days => 29,
        };
        let start = today.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        Some((start, today))
    }
}

impl FromStr for DatePreset {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() {
            return Ok(DatePreset::All);
        }
        DatePreset::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| QueryError::InvalidPreset(wanted.to_string()))
    }
}

// ── Query ──────────────────────────────────────────────────────────

/// Everything needed to turn the full record set into one table page.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationQuery {
    /// Case-insensitive substring; blank matches everything.
    pub search: String,
    pub status: StatusFilter,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// `None` keeps the input order.
    pub sort: Option<SortKey>,
    pub ascending: bool,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for RegistrationQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            start: None,
            end: None,
            sort: None,
            ascending: true,
            page: 1,
            page_size: 10,
        }
    }
}

impl RegistrationQuery {
    /// True if `reg` passes the search, status and date filters.
    pub fn accepts(&self, reg: &Registration) -> bool {
        self.status.matches(reg.status) && self.matches_search(reg) && self.in_range(reg)
    }

    /// Records passing every filter, in input order.
    pub fn filter<'a>(&self, records: &'a [Registration]) -> Vec<&'a Registration> {
        records.iter().filter(|r| self.accepts(r)).collect()
    }

    /// Filtered and sorted, without paging.
    pub fn matching<'a>(&self, records: &'a [Registration]) -> Vec<&'a Registration> {
        let mut rows = self.filter(records);
        if let Some(key) = self.sort {
            sort_records(&mut rows, key, self.ascending);
        }
        rows
    }

    /// Filter, sort and cut out the requested page.
    pub fn apply(&self, records: &[Registration]) -> Page<Registration> {
        let rows: Vec<Registration> = self.matching(records).into_iter().cloned().collect();
        paginate(&rows, self.page, self.page_size)
    }

    fn matches_search(&self, reg: &Registration) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        contains_ignore_case(&reg.full_name, &needle)
            || contains_ignore_case(&reg.email, &needle)
            || reg
                .current_profession
                .as_deref()
                .is_some_and(|p| contains_ignore_case(p, &needle))
            || contains_ignore_case(&reg.id, &needle)
            || reg
                .ticket_no
                .is_some_and(|t| t.to_string().contains(&needle))
    }

    fn in_range(&self, reg: &Registration) -> bool {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return true;
        };
        reg.call_date_time
            .map(|dt| dt.date_naive())
            .is_some_and(|day| day >= start && day <= end)
    }
}
