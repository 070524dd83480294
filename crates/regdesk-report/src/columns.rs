//! Spreadsheet column table.

use regdesk_state::Registration;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(value: &str) -> Cell {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }

    fn opt(value: &Option<String>) -> Cell {
        value.as_deref().map_or(Cell::Empty, Cell::text)
    }

    fn list(values: &[String]) -> Cell {
        Cell::text(&values.join(", "))
    }
}

/// A header title and how to read its value out of a record.
pub struct Column {
    pub title: &'static str,
    pub value: fn(&Registration) -> Cell,
}

pub const COLUMNS: &[Column] = &[
    Column {
        title: "Ticket No.",
        value: |r| r.ticket_no.map_or(Cell::Empty, |t| Cell::Number(t as f64)),
    },
    Column {
        title: "Full Name",
        value: |r| Cell::text(&r.full_name),
    },
    Column {
        title: "Email Address",
        value: |r| Cell::text(&r.email),
    },
    Column {
        title: "Phone Number",
        value: |r| Cell::opt(&r.phone_number),
    },
    Column {
        title: "Date of Birth",
        value: |r| {
            r.dob
                .map_or(Cell::Empty, |d| Cell::Text(d.format("%Y-%m-%d").to_string()))
        },
    },
    Column {
        title: "Professional Experience",
        value: |r| Cell::opt(&r.experience),
    },
    Column {
        title: "Institution",
        value: |r| Cell::opt(&r.institution),
    },
    Column {
        title: "Call Date & Time",
        value: |r| {
            r.call_date_time.map_or(Cell::Empty, |dt| {
                Cell::Text(dt.format("%Y-%m-%d %H:%M").to_string())
            })
        },
    },
    Column {
        title: "Heard About Us",
        value: |r| Cell::opt(&r.hear_about_us),
    },
    Column {
        title: "Current Profession",
        value: |r| Cell::opt(&r.current_profession),
    },
    Column {
        title: "Area of Specialization",
        value: |r| Cell::opt(&r.specialization),
    },
    Column {
        title: "Learning Goals",
        value: |r| Cell::opt(&r.learning_goals),
    },
    Column {
        title: "Training Programs",
        value: |r| Cell::list(&r.training_programs),
    },
    Column {
        title: "Additional Programs",
        value: |r| Cell::list(&r.additional_programs),
    },
    Column {
        title: "Training Status",
        value: |r| Cell::text(r.status.label()),
    },
    Column {
        title: "Expired",
        value: |r| Cell::text(if r.is_expired { "Yes" } else { "No" }),
    },
    Column {
        title: "Registered At",
        value: |r| Cell::Text(r.created_at.format("%Y-%m-%d %H:%M").to_string()),
    },
    Column {
        title: "Internal ID",
        value: |r| Cell::text(&r.id),
    },
];

pub fn titles() -> impl Iterator<Item = &'static str> {
    COLUMNS.iter().map(|c| c.title)
}
