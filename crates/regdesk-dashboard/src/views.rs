//! View types for dashboard template rendering.
//!
//! These types are purpose-built for Askama templates: they carry
//! pre-formatted strings and computed fields so templates stay simple.

use chrono::{DateTime, Utc};
use regdesk_query::{MonthlyCount, QueryParams, SortKey, StatusSummary};
use regdesk_state::{Registration, RegistrationStatus};

const MISSING: &str = "N/A";

// ── KPI cards and charts ────────────────────────────────────────

pub struct KpiCard {
    pub label: &'static str,
    pub value: usize,
    pub accent: &'static str,
}

pub fn kpi_cards(summary: &StatusSummary) -> Vec<KpiCard> {
    let mut cards = vec![KpiCard {
        label: "Total Registrations",
        value: summary.total,
        accent: "border-slate-400",
    }];
    cards.extend(RegistrationStatus::ALL.iter().map(|&s| KpiCard {
        label: s.label(),
        value: summary.count(s),
        accent: status_border(s),
    }));
    cards
}

/// One horizontal or vertical CSS bar.
pub struct BarView {
    pub label: String,
    pub count: usize,
    /// Share of the largest bar, 0-100, pre-rounded for `style="width: N%"`.
    pub percent_int: String,
    pub color: &'static str,
}

impl BarView {
    fn new(label: String, count: usize, max: usize, color: &'static str) -> Self {
        let percent = if max > 0 {
            (count as f64 / max as f64) * 100.0
        } else {
            0.0
        };
        Self {
            label,
            count,
            percent_int: format!("{:.0}", percent),
            color,
        }
    }
}

pub fn monthly_bars(months: &[MonthlyCount]) -> Vec<BarView> {
    let max = months.iter().map(|m| m.count).max().unwrap_or(0);
    months
        .iter()
        .map(|m| BarView::new(m.label.clone(), m.count, max, "bg-sky-500"))
        .collect()
}

pub fn status_bars(summary: &StatusSummary) -> Vec<BarView> {
    RegistrationStatus::ALL
        .iter()
        .map(|&s| {
            BarView::new(
                s.label().to_string(),
                summary.count(s),
                summary.total,
                status_bar_color(s),
            )
        })
        .collect()
}

// ── Registration rows ───────────────────────────────────────────

pub struct RegistrationRow {
    pub id: String,
    pub ticket_display: String,
    pub full_name: String,
    pub email: String,
    pub phone_display: String,
    pub profession_display: String,
    pub call_display: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub created_display: String,
}

impl RegistrationRow {
    pub fn from_registration(r: &Registration) -> Self {
        Self {
            id: r.id.clone(),
            ticket_display: ticket_display(r.ticket_no),
            full_name: r.full_name.clone(),
            email: r.email.clone(),
            phone_display: or_missing(&r.phone_number),
            profession_display: or_missing(&r.current_profession),
            call_display: format_datetime(r.call_date_time),
            status: r.status.as_str(),
            status_label: r.status.label(),
            status_class: status_badge(r.status),
            created_display: format_relative_time(r.created_at),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────

pub struct DetailField {
    pub label: &'static str,
    pub value: String,
    pub href: Option<String>,
}

impl DetailField {
    fn text(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            href: None,
        }
    }
}

pub struct RegistrationDetail {
    pub id: String,
    pub full_name: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub fields: Vec<DetailField>,
}

impl RegistrationDetail {
    pub fn from_registration(r: &Registration) -> Self {
        let upload = match &r.upload_id {
            Some(id) => DetailField {
                label: "ID Card Upload",
                value: "View file".to_string(),
                href: Some(format!("/api/v1/files?id={id}")),
            },
            None => DetailField::text("ID Card Upload", MISSING.to_string()),
        };

        let fields = vec![
            DetailField::text("Internal ID", r.id.clone()),
            DetailField::text("Ticket No.", ticket_display(r.ticket_no)),
            DetailField::text("Full Name", r.full_name.clone()),
            DetailField::text("Email Address", r.email.clone()),
            DetailField::text("Phone Number", or_missing(&r.phone_number)),
            DetailField::text(
                "Date of Birth",
                r.dob
                    .map(|d| d.format("%b %-d, %Y").to_string())
                    .unwrap_or_else(|| MISSING.to_string()),
            ),
            DetailField::text("Professional Experience", or_missing(&r.experience)),
            DetailField::text("Institution", or_missing(&r.institution)),
            DetailField::text("Registration Date", format_datetime(r.call_date_time)),
            DetailField::text("Heard About Us", or_missing(&r.hear_about_us)),
            DetailField::text("Current Profession", or_missing(&r.current_profession)),
            DetailField::text("Area of Specialization", or_missing(&r.specialization)),
            DetailField::text("Learning Goals", or_missing(&r.learning_goals)),
            DetailField::text("Training Programs", list_or_missing(&r.training_programs)),
            DetailField::text(
                "Additional Programs",
                list_or_missing(&r.additional_programs),
            ),
            upload,
            DetailField::text("Training Status", r.status.label().to_string()),
            DetailField::text(
                "Ticket State",
                if r.is_expired { "Expired" } else { "Active" }.to_string(),
            ),
            DetailField::text("Created", format_timestamp(r.created_at)),
            DetailField::text("Last Updated", format_timestamp(r.updated_at)),
        ];

        Self {
            id: r.id.clone(),
            full_name: r.full_name.clone(),
            status: r.status.as_str(),
            status_label: r.status.label(),
            status_class: status_badge(r.status),
            fields,
        }
    }
}

// ── Table controls ──────────────────────────────────────────────

/// A column header that links to the table sorted on it.
pub struct SortHeader {
    pub label: &'static str,
    pub href: String,
    /// `▲`, `▼` or empty.
    pub indicator: &'static str,
}

pub const SORTABLE_COLUMNS: &[(SortKey, &str)] = &[
    (SortKey::TicketNo, "Ticket"),
    (SortKey::FullName, "Name"),
    (SortKey::Email, "Email"),
    (SortKey::CurrentProfession, "Profession"),
    (SortKey::CallDateTime, "Registration Date"),
    (SortKey::Status, "Status"),
];

/// Headers for the table. Clicking the active column flips direction;
/// clicking another starts ascending. Paging resets to page 1.
pub fn sort_headers(params: &QueryParams, active: Option<SortKey>, ascending: bool) -> Vec<SortHeader> {
    SORTABLE_COLUMNS
        .iter()
        .map(|&(key, label)| {
            let is_active = active == Some(key);
            let next_ascending = !(is_active && ascending);
            let mut next = params.clone();
            next.sort = Some(key.as_str().to_string());
            next.order = Some(if next_ascending { "asc" } else { "desc" }.to_string());
            next.page = None;
            SortHeader {
                label,
                href: registrations_href(&next),
                indicator: match (is_active, ascending) {
                    (true, true) => "▲",
                    (true, false) => "▼",
                    _ => "",
                },
            }
        })
        .collect()
}

pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

pub struct Pagination {
    pub showing: String,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub pages: Vec<PageLink>,
}

pub fn pagination(
    params: &QueryParams,
    page: usize,
    total_pages: usize,
    first: usize,
    last: usize,
    total: usize,
) -> Pagination {
    let href_for = |n: usize| {
        let mut next = params.clone();
        next.page = Some(n.to_string());
        registrations_href(&next)
    };

    // At most seven numbered links centred on the current page.
    let window_start = page.saturating_sub(3).max(1);
    let window_end = (window_start + 6).min(total_pages);

    Pagination {
        showing: format!("Showing {first} to {last} of {total} results"),
        prev_href: (page > 1 && total_pages > 0).then(|| href_for(page - 1)),
        next_href: (page < total_pages).then(|| href_for(page + 1)),
        pages: (window_start..=window_end)
            .map(|n| PageLink {
                number: n,
                href: href_for(n),
                current: n == page,
            })
            .collect(),
    }
}

/// `/dashboard/registrations` with `params` as the query string.
pub fn registrations_href(params: &QueryParams) -> String {
    let query = serde_urlencoded::to_string(params).unwrap_or_default();
    if query.is_empty() {
        "/dashboard/registrations".to_string()
    } else {
        format!("/dashboard/registrations?{query}")
    }
}

/// Export link for the current filter. Exports take ids, so the filtered
/// ids are passed explicitly; an unfiltered view exports `all`. A filter
/// that matches nothing has no link.
pub fn export_href(format: &str, ids: Option<&[String]>) -> Option<String> {
    match ids {
        Some([]) => None,
        Some(ids) => Some(format!(
            "/api/v1/export?format={format}&ids={}",
            ids.join(",")
        )),
        None => Some(format!("/api/v1/export?format={format}&ids=all")),
    }
}

/// Export link for a single record.
pub fn record_export_href(format: &str, id: &str) -> String {
    format!("/api/v1/export?format={format}&ids={id}")
}

// ── Format Helpers ──────────────────────────────────────────────

fn or_missing(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| MISSING.to_string())
}

fn list_or_missing(values: &[String]) -> String {
    if values.is_empty() {
        MISSING.to_string()
    } else {
        values.join(", ")
    }
}

pub fn ticket_display(ticket: Option<u64>) -> String {
    ticket.map_or_else(|| MISSING.to_string(), |t| format!("#{t}"))
}

pub fn format_datetime(dt: Option<DateTime<Utc>>) -> String {
    dt.map(|dt| dt.format("%b %-d, %Y %H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn format_relative_time(dt: DateTime<Utc>) -> String {
    let delta = (Utc::now() - dt).num_seconds().max(0);

    if delta < 60 {
        format!("{delta}s ago")
    } else if delta < 3600 {
        format!("{}m ago", delta / 60)
    } else if delta < 86400 {
        format!("{}h ago", delta / 3600)
    } else {
        format!("{}d ago", delta / 86400)
    }
}

pub fn status_badge(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Upcoming => "bg-blue-100 text-blue-800",
        RegistrationStatus::Pending => "bg-yellow-100 text-yellow-800",
        RegistrationStatus::Completed => "bg-green-100 text-green-800",
    }
}

fn status_border(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Upcoming => "border-blue-500",
        RegistrationStatus::Pending => "border-yellow-500",
        RegistrationStatus::Completed => "border-green-500",
    }
}

fn status_bar_color(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Upcoming => "bg-blue-500",
        RegistrationStatus::Pending => "bg-yellow-500",
        RegistrationStatus::Completed => "bg-green-500",
    }
}
