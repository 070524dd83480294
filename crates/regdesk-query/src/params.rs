//! Raw list query parameters shared by the REST API and the dashboard.
//!
//! Every field arrives as an optional string; `to_query` validates them into
//! a [`RegistrationQuery`](crate::filter::RegistrationQuery).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::filter::{DatePreset, RegistrationQuery, StatusFilter};
use crate::sort::SortKey;

/// Raw query-string parameters shared by the list API and the dashboard
/// table. Everything arrives as text so that bad values become a
/// `QueryError` instead of an extractor rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
}

impl QueryParams {
    /// True if the caller asked for a specific page.
    pub fn is_paged(&self) -> bool {
        present(&self.page).is_some()
    }

    /// Validate and resolve into a query. An explicit `start`/`end` pair
    /// wins over `preset`, which resolves relative to `today`.
    pub fn to_query(
        &self,
        today: NaiveDate,
        default_page_size: usize,
    ) -> Result<RegistrationQuery, QueryError> {
        let mut query = RegistrationQuery {
            search: present(&self.search).unwrap_or_default().to_string(),
            page_size: default_page_size,
            ..Default::default()
        };

        if let Some(status) = present(&self.status) {
            query.status = status.parse::<StatusFilter>()?;
        }
        if let Some(sort) = present(&self.sort) {
            query.sort = Some(sort.parse::<SortKey>()?);
        }
        if let Some(order) = present(&self.order) {
            query.ascending = match order.to_ascii_lowercase().as_str() {
                "asc" => true,
                "desc" => false,
                _ => return Err(QueryError::InvalidOrder(order.to_string())),
            };
        }
        if let Some(page) = present(&self.page) {
            query.page = parse_number(page)?;
        }
        if let Some(size) = present(&self.page_size) {
            query.page_size = parse_number(size)?;
        }

        query.start = present(&self.start).map(parse_date).transpose()?;
        query.end = present(&self.end).map(parse_date).transpose()?;

        if query.start.is_none() || query.end.is_none() {
            let preset = present(&self.preset)
                .map(|p| p.parse::<DatePreset>())
                .transpose()?
                .unwrap_or_default();
            if let Some((start, end)) = preset.range(today) {
                query.start = Some(start);
                query.end = Some(end);
            }
        }

        Ok(query)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| QueryError::InvalidDate(raw.to_string()))
}

fn parse_number(raw: &str) -> Result<usize, QueryError> {
    raw.parse::<usize>()
        .map_err(|_| QueryError::InvalidNumber(raw.to_string()))
}
